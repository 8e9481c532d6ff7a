use std::io;
use std::path::{Path, PathBuf};

use mailparse::MailParseError;
use thiserror::Error;

/// Failure while writing one page or the index.
#[derive(Debug, Error)]
pub enum RenderError {
    #[error("I/O error on `{path}`: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("cannot parse MIME structure of {message_id}: {source}")]
    Mime {
        message_id: String,
        #[source]
        source: MailParseError,
    },
}

impl RenderError {
    pub fn io(path: &Path, source: io::Error) -> Self {
        RenderError::Io {
            path: path.to_path_buf(),
            source,
        }
    }
}
