//! Thread graph data structures
//!
//! The builder works in two phases. Every parent → child claim found in the
//! headers is first recorded as a [`CandidateEdge`]; the final
//! [`ThreadGraph`] is then derived from those candidates and never mutated
//! afterwards.

use std::collections::{HashMap, HashSet};

/// A parent → child claim taken from one message's headers.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CandidateEdge {
    pub parent: String,
    pub child: String,
}

/// Candidate edges in registration order, without duplicates.
#[derive(Debug, Default)]
pub struct CandidateEdges {
    edges: Vec<CandidateEdge>,
    seen: HashSet<(String, String)>,
}

impl CandidateEdges {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an edge (avoiding duplicates and self-loops)
    pub fn register(&mut self, parent: &str, child: &str) -> bool {
        if parent == child {
            return false;
        }
        if !self.seen.insert((parent.to_string(), child.to_string())) {
            return false;
        }
        self.edges.push(CandidateEdge {
            parent: parent.to_string(),
            child: child.to_string(),
        });
        true
    }

    pub fn iter(&self) -> impl Iterator<Item = &CandidateEdge> {
        self.edges.iter()
    }

    pub fn len(&self) -> usize {
        self.edges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.edges.is_empty()
    }
}

/// Final, frozen conversation graph.
///
/// Every message id of the store has an entry in `children` (possibly
/// empty), appears as a child under at most one parent, and the graph has no
/// cycles. `roots` lists every message without a resolved parent, ordered for
/// display.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ThreadGraph {
    children: HashMap<String, Vec<String>>,
    parents: HashMap<String, String>,
    roots: Vec<String>,
}

impl ThreadGraph {
    pub(crate) fn from_parts(
        children: HashMap<String, Vec<String>>,
        parents: HashMap<String, String>,
        roots: Vec<String>,
    ) -> Self {
        ThreadGraph {
            children,
            parents,
            roots,
        }
    }

    /// Ordered replies of a message (empty for unknown ids).
    pub fn children(&self, message_id: &str) -> &[String] {
        self.children
            .get(message_id)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    /// Resolved parent of a message.
    pub fn parent(&self, message_id: &str) -> Option<&str> {
        self.parents.get(message_id).map(String::as_str)
    }

    pub fn roots(&self) -> &[String] {
        &self.roots
    }

    pub fn contains(&self, message_id: &str) -> bool {
        self.children.contains_key(message_id)
    }

    /// Number of nodes.
    pub fn len(&self) -> usize {
        self.children.len()
    }

    pub fn is_empty(&self) -> bool {
        self.children.is_empty()
    }

    /// Number of parent → child edges.
    pub fn edge_count(&self) -> usize {
        self.parents.len()
    }

    /// Adjacency view: message id → ordered children.
    pub fn adjacency(&self) -> &HashMap<String, Vec<String>> {
        &self.children
    }
}
