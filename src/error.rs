use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::render::RenderError;

/// Errors that abort an archive run.
///
/// Per-record and per-message problems never surface here: malformed records
/// are skipped while loading and page failures are collected in the
/// [`RenderReport`](crate::render::RenderReport).
#[derive(Debug, Error)]
pub enum ArchiveError {
    #[error("`{0}` is not a regular file")]
    NotARegularFile(PathBuf),
    #[error("I/O error on `{path}`: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to write archive output: {0}")]
    Output(#[from] RenderError),
}

impl ArchiveError {
    pub fn io(path: &Path, source: io::Error) -> Self {
        ArchiveError::Io {
            path: path.to_path_buf(),
            source,
        }
    }
}
