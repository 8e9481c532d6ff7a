//! Static HTML archives from mbox files.
//!
//! The pipeline has three stages:
//!
//! 1. [`store`]: split and parse the mbox into a [`MessageStore`]
//! 2. [`threading`]: rebuild reply trees from the threading headers
//! 3. [`render`]: extract each message's content ([`content`]) and write the
//!    pages and the index
//!
//! [`redact`] is an independent post-pass over a rendered directory.

pub mod config;
pub mod content;
pub mod error;
pub mod redact;
pub mod render;
pub mod store;
pub mod threading;

use std::path::Path;

pub use config::{BodyPreference, LoadOptions, RenderConfig};
pub use error::ArchiveError;
pub use render::{RenderFailure, RenderReport};
pub use store::{LoadStats, Message, MessageStore};
pub use threading::{GraphStats, ThreadGraph};

/// What one archive run did.
#[derive(Debug)]
pub struct ArchiveSummary {
    pub load: LoadStats,
    pub graph: GraphStats,
    pub render: RenderReport,
}

/// Load `archive`, thread it and render it into `output_dir`.
///
/// Per-message render failures are reported in the summary; only loading
/// problems and index or directory failures are returned as errors.
pub fn generate_archive(
    archive: &Path,
    output_dir: &Path,
    options: &LoadOptions,
    config: &RenderConfig,
) -> Result<ArchiveSummary, ArchiveError> {
    let (mut store, load) = store::load_archive(archive, options)?;
    let (thread_graph, graph_stats) = threading::build_thread_graph(&mut store);
    let render = render::render_archive(&store, &thread_graph, config, output_dir)?;

    Ok(ArchiveSummary {
        load,
        graph: graph_stats,
        render,
    })
}
