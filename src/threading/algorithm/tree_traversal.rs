//! Tree traversal utilities for the thread graph
//!
//! Functions for walking the thread forest in display order. All functions
//! use iterative approaches to avoid stack overflow on deeply nested threads.

use std::collections::HashSet;

use super::super::container::ThreadGraph;

/// One message in a depth-first walk of the forest.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TreeEntry {
    pub message_id: String,
    /// 0 for roots
    pub depth: usize,
}

/// Collect every message of one thread with its depth
///
/// Performs a pre-order, left-to-right traversal starting from `root_message_id`.
///
/// ## Algorithm
///
/// Uses iterative depth-first search with an explicit stack. Each stack
/// entry contains (message_id, depth_in_tree). A message that was already
/// emitted is never entered again, so a malformed adjacency cannot loop.
pub fn collect_thread_members(
    graph: &ThreadGraph,
    root_message_id: &str,
    visited: &mut HashSet<String>,
    collected_members: &mut Vec<TreeEntry>,
) {
    // Stack for iterative DFS: (message_id, depth_in_tree)
    let mut traversal_stack = vec![(root_message_id.to_string(), 0usize)];

    while let Some((current_message_id, current_depth)) = traversal_stack.pop() {
        if !visited.insert(current_message_id.clone()) {
            log::warn!(
                "message {} reached twice while walking threads, skipping",
                current_message_id
            );
            continue;
        }

        // Add children in reverse order to maintain DFS left-to-right order
        for child_message_id in graph.children(&current_message_id).iter().rev() {
            traversal_stack.push((child_message_id.clone(), current_depth + 1));
        }

        collected_members.push(TreeEntry {
            message_id: current_message_id,
            depth: current_depth,
        });
    }
}

/// Walk every thread, roots in root-set order.
pub fn walk_forest(graph: &ThreadGraph) -> Vec<TreeEntry> {
    let mut visited = HashSet::new();
    let mut entries = Vec::with_capacity(graph.len());

    for root_message_id in graph.roots() {
        collect_thread_members(graph, root_message_id, &mut visited, &mut entries);
    }

    entries
}
