//! Archive loading.
//!
//! Reads an mbox file into a [`MessageStore`]:
//!
//! 1. **Split**: break the file into raw messages (`mbox`)
//! 2. **Parallel Parsing**: parse headers of every entry using the Rayon
//!    thread pool (CPU-bound; load order is preserved)
//! 3. **Filter**: drop records that fail to parse or do not match the
//!    recipient filter, keep the first record of a duplicated Message-ID
//!
//! Failed parses are logged but never stop the load.

pub mod mbox;
pub mod message;
pub mod parser;

use std::fs;
use std::path::Path;

use rayon::prelude::*;

use crate::config::LoadOptions;
use crate::error::ArchiveError;

pub use mbox::split_mbox;
pub use message::{FILLER_DATE, FILLER_SENDER, FILLER_SUBJECT, Message, MessageStore};
pub use parser::{ParseRecordError, parse_record};

/// Counters describing one load.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoadStats {
    pub entries: usize,
    pub loaded: usize,
    pub malformed: usize,
    pub filtered: usize,
    pub duplicates: usize,
}

/// Load and parse every message of the mbox at `path`.
pub fn load_archive(
    path: &Path,
    options: &LoadOptions,
) -> Result<(MessageStore, LoadStats), ArchiveError> {
    match fs::metadata(path) {
        Ok(metadata) if metadata.is_file() => {}
        _ => return Err(ArchiveError::NotARegularFile(path.to_path_buf())),
    }

    let data = fs::read(path).map_err(|source| ArchiveError::io(path, source))?;
    let (store, stats) = load_from_bytes(&data, options);

    log::info!(
        "loaded {} of {} messages from {} ({} malformed, {} filtered, {} duplicate)",
        stats.loaded,
        stats.entries,
        path.display(),
        stats.malformed,
        stats.filtered,
        stats.duplicates
    );

    Ok((store, stats))
}

/// Build a store from in-memory mbox bytes.
pub fn load_from_bytes(data: &[u8], options: &LoadOptions) -> (MessageStore, LoadStats) {
    let entries = split_mbox(data);
    let mut stats = LoadStats {
        entries: entries.len(),
        ..LoadStats::default()
    };

    let parsed: Vec<Result<Message, ParseRecordError>> =
        entries.into_par_iter().map(parse_record).collect();

    let mut store = MessageStore::new();
    for (position, result) in parsed.into_iter().enumerate() {
        let message = match result {
            Ok(message) => message,
            Err(err) => {
                log::warn!("skipping mbox entry {}: {}", position, err);
                stats.malformed += 1;
                continue;
            }
        };

        if let Some(needle) = options.list_filter.as_deref() {
            if !message.matches_recipient(needle) {
                log::debug!("message {} not sent to `{}`, skipping", message.message_id, needle);
                stats.filtered += 1;
                continue;
            }
        }

        let message_id = message.message_id.clone();
        if store.insert(message) {
            stats.loaded += 1;
        } else {
            log::warn!("duplicate Message-ID {}, keeping the first copy", message_id);
            stats.duplicates += 1;
        }
    }

    (store, stats)
}
