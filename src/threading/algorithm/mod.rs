//! Thread graph algorithm implementation
//!
//! Header-chasing heuristics for organizing archived messages into
//! conversation threads.
//!
//! ## Main Entry Point
//!
//! Use `build_thread_graph()` to thread a loaded message store, and
//! `walk_forest()` to visit the result in display order.

mod cycle_detection;
mod graph_builder;
mod ordering;
mod tree_traversal;

// Re-export the main threading function
pub use graph_builder::{GraphStats, build_thread_graph};
pub use tree_traversal::{TreeEntry, walk_forest};
