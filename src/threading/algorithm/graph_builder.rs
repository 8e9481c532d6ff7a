//! Thread graph construction
//!
//! ## Algorithm Overview
//!
//! 1. **Collect Candidates**: register a parent → child edge for every claim in
//!    the headers: the authoritative parent of each message, every adjacent
//!    pair of its References chain, and the chain's last element → the
//!    In-Reply-To target when they differ
//! 2. **Synthesize Fillers**: every id that appears in an edge but was never
//!    loaded gets a filler message, so no edge points to a missing node
//! 3. **Prune**: keep an edge only if the child's authoritative parent is the
//!    edge's parent; pruning never reassigns, it only drops
//! 4. **Break Cycles**: drop edges whose parent is a descendant of the child
//! 5. **Drop Empty Fillers**: fillers left without children carry nothing
//! 6. **Assemble**: derive ordered child lists and the ordered root set
//!
//! Candidate edges are an immutable collection after step 1; the pruned
//! adjacency is derived from them instead of being edited in place.

use std::collections::{HashMap, HashSet};

use chrono::{DateTime, Utc};

use super::super::container::{CandidateEdges, ThreadGraph};
use super::cycle_detection::break_cycles;
use super::ordering::sort_by_timestamp;
use crate::store::MessageStore;

/// Counters describing one graph build.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GraphStats {
    pub candidate_edges: usize,
    pub retained_edges: usize,
    pub fillers: usize,
    pub cycles_broken: usize,
    pub roots: usize,
}

/// Build the thread graph for every message in `store`.
///
/// Fillers for referenced but missing ancestors are added to `store`; loaded
/// records are left untouched.
pub fn build_thread_graph(store: &mut MessageStore) -> (ThreadGraph, GraphStats) {
    // Step 1: Register every parent claim found in the headers
    let candidates = collect_candidate_edges(store);

    // Step 2: Placeholders for ids that were referenced but never loaded
    synthesize_fillers(store, &candidates);

    // Step 3: Keep only edges agreeing with the child's own claim
    let mut parents = prune_candidates(store, &candidates);

    // Step 4: Mutual or circular claims
    let order: Vec<String> = store.iter().map(|m| m.message_id.clone()).collect();
    let broken = break_cycles(&mut parents, order.iter().map(String::as_str));

    // Step 5: Fillers nobody hangs off
    remove_childless_fillers(store, &mut parents);

    // Step 6: Ordered adjacency and root set
    let graph = assemble_graph(store, &candidates, parents);

    let stats = GraphStats {
        candidate_edges: candidates.len(),
        retained_edges: graph.edge_count(),
        fillers: store.filler_count(),
        cycles_broken: broken.len(),
        roots: graph.roots().len(),
    };
    log::info!(
        "threaded {} messages: {} of {} candidate edges kept, {} fillers, {} roots",
        store.len(),
        stats.retained_edges,
        stats.candidate_edges,
        stats.fillers,
        stats.roots
    );

    (graph, stats)
}

/// Register candidate edges from every loaded message.
///
/// ```text
/// Message M has References: <r1> <r2> <r3>, In-Reply-To: <p>
///
/// Candidates:
///   r1 → r2, r2 → r3     (adjacent pairs of the chain)
///   r3 → p               (chain end → In-Reply-To target)
///   p  → M               (authoritative parent)
/// ```
fn collect_candidate_edges(store: &MessageStore) -> CandidateEdges {
    let mut edges = CandidateEdges::new();

    for message in store.iter() {
        let mut previous_reference: Option<&str> = None;
        for referenced_message_id in &message.references {
            if let Some(prev) = previous_reference {
                edges.register(prev, referenced_message_id);
            }
            previous_reference = Some(referenced_message_id);
        }

        if let (Some(last), Some(in_reply_to)) =
            (message.references.last(), message.in_reply_to.as_deref())
        {
            if last != in_reply_to {
                edges.register(last, in_reply_to);
            }
        }

        if let Some(parent) = message.authoritative_parent() {
            edges.register(parent, &message.message_id);
        }
    }

    edges
}

/// Create fillers for every edge endpoint that has no message.
///
/// A filler's inferred parent is the parent of the first candidate edge that
/// names it as a child, i.e. its predecessor in the first chain it appeared in.
fn synthesize_fillers(store: &mut MessageStore, candidates: &CandidateEdges) {
    let mut first_claim: HashMap<&str, &str> = HashMap::new();
    for edge in candidates.iter() {
        first_claim
            .entry(edge.child.as_str())
            .or_insert(edge.parent.as_str());
    }

    for edge in candidates.iter() {
        for endpoint in [edge.parent.as_str(), edge.child.as_str()] {
            if store.ensure_filler(endpoint, first_claim.get(endpoint).copied()) {
                log::debug!("synthesized filler for missing message {}", endpoint);
            }
        }
    }
}

/// Derive child → parent for the edges that survive pruning.
fn prune_candidates(store: &MessageStore, candidates: &CandidateEdges) -> HashMap<String, String> {
    let mut parents = HashMap::new();

    for edge in candidates.iter() {
        let Some(child) = store.get(&edge.child) else {
            continue;
        };
        if child.authoritative_parent() == Some(edge.parent.as_str()) {
            parents.insert(edge.child.clone(), edge.parent.clone());
        } else {
            log::trace!("pruned candidate edge {} -> {}", edge.parent, edge.child);
        }
    }

    parents
}

/// Remove fillers without children until none are left.
///
/// Removing a filler can leave its own (filler) parent childless, hence the loop.
fn remove_childless_fillers(store: &mut MessageStore, parents: &mut HashMap<String, String>) {
    loop {
        let has_children: HashSet<&str> = parents.values().map(String::as_str).collect();
        let childless: HashSet<String> = store
            .iter()
            .filter(|m| m.is_filler() && !has_children.contains(m.message_id.as_str()))
            .map(|m| m.message_id.clone())
            .collect();

        if childless.is_empty() {
            break;
        }

        for message_id in &childless {
            parents.remove(message_id);
        }
        store.retain_fillers(|m| !childless.contains(&m.message_id));
    }
}

fn assemble_graph(
    store: &MessageStore,
    candidates: &CandidateEdges,
    parents: HashMap<String, String>,
) -> ThreadGraph {
    let mut children: HashMap<String, Vec<String>> = store
        .iter()
        .map(|m| (m.message_id.clone(), Vec::new()))
        .collect();

    // Registration order is the encounter order used to break timestamp ties
    for edge in candidates.iter() {
        if parents.get(&edge.child) != Some(&edge.parent) {
            continue;
        }
        if let Some(list) = children.get_mut(&edge.parent) {
            list.push(edge.child.clone());
        }
    }

    let date_of = |message_id: &str| store.get(message_id).and_then(|m| m.date);

    for list in children.values_mut() {
        sort_by_timestamp(list, date_of);
    }

    let mut roots: Vec<String> = store
        .iter()
        .filter(|m| !parents.contains_key(&m.message_id))
        .map(|m| m.message_id.clone())
        .collect();

    // A filler root has no date of its own; it takes its earliest reply's
    let resolved_date = |message_id: &str| -> Option<DateTime<Utc>> {
        let message = store.get(message_id)?;
        if !message.is_filler() {
            return message.date;
        }
        children
            .get(message_id)
            .and_then(|list| list.first())
            .and_then(|first| date_of(first.as_str()))
    };
    sort_by_timestamp(&mut roots, resolved_date);

    ThreadGraph::from_parts(children, parents, roots)
}
