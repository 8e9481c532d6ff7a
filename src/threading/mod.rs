//! Message threading module
//!
//! Reconstructs reply trees from the In-Reply-To and References headers of
//! the loaded messages. Headers in real archives are unreliable: ancestors
//! may be missing, chains may disagree with In-Reply-To, and two messages can
//! even claim each other.
//!
//! ## Threading Strategy
//!
//! 1. **Authoritative Parent**: each message names at most one parent, from
//!    In-Reply-To or else the last References entry
//! 2. **References Chains**: adjacent chain pairs add candidate edges so
//!    missing ancestors can be placed
//! 3. **Fillers**: referenced but missing messages get placeholder records
//! 4. **Pruning**: only edges matching the child's own claim survive
//!
//! ## Module Structure
//!
//! - `container`: Candidate edges and the frozen thread graph
//! - `algorithm`: Graph construction, cycle breaking, ordering and traversal

pub mod algorithm;
pub mod container;

// Re-export main types and functions
pub use algorithm::{GraphStats, TreeEntry, build_thread_graph, walk_forest};
pub use container::{CandidateEdge, CandidateEdges, ThreadGraph};
