//! Cycle detection for the thread graph
//!
//! Pruning leaves every message with at most one parent, but two messages can
//! still claim each other (A replies to B, B replies to A). Such edges would
//! make a subtree unreachable from the root set, so they are detected by
//! walking the resolved-parent chain.

use std::collections::{HashMap, HashSet};

/// Check whether `child` is already an ancestor of `parent`
///
/// Walks up the parent chain starting at `parent`. Reaching `child`, or
/// revisiting a node, means that keeping the `parent → child` edge closes a
/// cycle.
///
/// ```text
/// Current tree:  A → B → C
///
/// Edge C → A: walk C, B, A reaches A  => cycle
/// Edge C → D: walk C, B, A ends        => safe
/// ```
pub fn detect_cycle_in_ancestry(
    parents: &HashMap<String, String>,
    child_message_id: &str,
    parent_message_id: &str,
) -> bool {
    // Track visited nodes to detect cycles in the parent chain itself
    let mut visited_message_ids = HashSet::new();
    let mut current_message_id = Some(parent_message_id);

    while let Some(msg_id) = current_message_id {
        if !visited_message_ids.insert(msg_id) {
            return true;
        }

        if msg_id == child_message_id {
            return true;
        }

        current_message_id = parents.get(msg_id).map(String::as_str);
    }

    false
}

/// Drop every edge that closes a cycle.
///
/// Children are examined in `order`; the first member of a cycle that is
/// examined loses its parent and becomes a root. Returns the ids whose edge
/// was dropped.
pub fn break_cycles<'a, I>(parents: &mut HashMap<String, String>, order: I) -> Vec<String>
where
    I: IntoIterator<Item = &'a str>,
{
    let mut broken = Vec::new();
    for child in order {
        let Some(parent) = parents.get(child).cloned() else {
            continue;
        };
        if detect_cycle_in_ancestry(parents, child, &parent) {
            log::debug!("dropping edge {} -> {}: closes a reply cycle", parent, child);
            parents.remove(child);
            broken.push(child.to_string());
        }
    }
    broken
}
