//! Archive rendering
//!
//! Writes one page per message (placeholders included) and a nested index.
//!
//! ## Regeneration
//!
//! Each message's previous page and attachment directory are deleted before
//! its output is written again, so two runs over the same input leave
//! byte-identical trees. Body parts are appended to the page one at a time
//! and attachments are written as separate files.
//!
//! ## Failure Isolation
//!
//! A message that fails to render is logged and recorded in the
//! [`RenderReport`]; the remaining messages are still written. Only a failure
//! to create the output directory or write the index aborts the run.

mod error;
pub mod html;
pub mod index;
pub mod output;
pub mod page;

use std::collections::HashSet;
use std::path::Path;

pub use error::RenderError;
pub use output::OutputDir;

use crate::config::RenderConfig;
use crate::content::{MimeNode, extract_parts};
use crate::store::{Message, MessageStore};
use crate::threading::ThreadGraph;
use html::{attachment_href, sanitize_file_name};
use page::{AttachmentLink, ParentLink, ReplyLink};

/// A message whose page could not be written.
#[derive(Debug)]
pub struct RenderFailure {
    pub message_id: String,
    pub error: RenderError,
}

/// Outcome of one archive render.
#[derive(Debug, Default)]
pub struct RenderReport {
    /// Pages written for loaded messages
    pub pages: usize,
    /// Pages written for filler messages
    pub placeholders: usize,
    pub attachments: usize,
    pub failures: Vec<RenderFailure>,
}

impl RenderReport {
    pub fn is_complete(&self) -> bool {
        self.failures.is_empty()
    }
}

/// Renders a threaded store into an output directory.
pub struct ArchiveRenderer<'a> {
    store: &'a MessageStore,
    graph: &'a ThreadGraph,
    config: &'a RenderConfig,
    output: OutputDir,
}

impl<'a> ArchiveRenderer<'a> {
    pub fn new(
        store: &'a MessageStore,
        graph: &'a ThreadGraph,
        config: &'a RenderConfig,
        output_dir: &Path,
    ) -> Result<Self, RenderError> {
        Ok(ArchiveRenderer {
            store,
            graph,
            config,
            output: OutputDir::create(output_dir)?,
        })
    }

    /// Write every page, then the index.
    pub fn render_all(&self) -> Result<RenderReport, RenderError> {
        let mut report = RenderReport::default();

        for message in self.store.iter() {
            match self.render_message(message) {
                Ok(attachments) => {
                    if message.is_filler() {
                        report.placeholders += 1;
                    } else {
                        report.pages += 1;
                    }
                    report.attachments += attachments;
                }
                Err(error) => {
                    log::error!("failed to render {}: {}", message.message_id, error);
                    report.failures.push(RenderFailure {
                        message_id: message.message_id.clone(),
                        error,
                    });
                }
            }
        }

        let index = index::render_index(self.store, self.graph, &self.config.title);
        let index_path = self.output.write_index(&index)?;

        log::info!(
            "wrote {} pages, {} placeholders and {} attachments; index at {}",
            report.pages,
            report.placeholders,
            report.attachments,
            index_path.display()
        );
        if !report.is_complete() {
            log::warn!("{} messages failed to render", report.failures.len());
        }

        Ok(report)
    }

    /// Write the page of one message. Returns the number of attachments.
    fn render_message(&self, message: &Message) -> Result<usize, RenderError> {
        let message_id = message.message_id.as_str();
        self.output.clear_message(message_id)?;

        let parent = self.parent_link(message_id);
        let mut writer = self.output.open_page(message_id)?;
        writer.append(&page::page_header(message, &parent, &self.config.title))?;

        let mut attachments = Vec::new();
        if message.is_filler() {
            writer.append(&page::filler_notice(message_id))?;
        } else {
            let tree = MimeNode::parse(&message.raw).map_err(|source| RenderError::Mime {
                message_id: message_id.to_string(),
                source,
            })?;

            let mut used_names = HashSet::new();
            for (position, part) in extract_parts(&tree, self.config.prefer)
                .iter()
                .enumerate()
            {
                let Some(name) = part.name.as_deref() else {
                    writer.append(&page::body_part(part.body_text()))?;
                    continue;
                };

                let file_name = claim_file_name(&mut used_names, name, position + 1);
                self.output
                    .write_attachment(message_id, &file_name, part.bytes())?;
                attachments.push(AttachmentLink {
                    href: attachment_href(message_id, &file_name),
                    file_name,
                });
            }
        }

        let replies: Vec<ReplyLink> = self
            .graph
            .children(message_id)
            .iter()
            .filter_map(|child_id| self.store.get(child_id))
            .map(|child| ReplyLink {
                message_id: child.message_id.clone(),
                subject: child.subject.clone(),
            })
            .collect();

        writer.append(&page::page_footer(
            &attachments,
            &replies,
            &self.config.attachment_notice,
        ))?;
        let path = writer.finish()?;

        log::debug!(
            "wrote {} ({} attachments, {} replies)",
            path.display(),
            attachments.len(),
            replies.len()
        );
        Ok(attachments.len())
    }

    fn parent_link(&self, message_id: &str) -> ParentLink {
        match self.graph.parent(message_id).and_then(|id| self.store.get(id)) {
            None => ParentLink::None,
            Some(parent) if parent.is_filler() => ParentLink::NotArchived {
                message_id: parent.message_id.clone(),
            },
            Some(parent) => ParentLink::Archived {
                message_id: parent.message_id.clone(),
            },
        }
    }
}

/// Pick a unique, safe file name for an attachment within one message.
fn claim_file_name(used: &mut HashSet<String>, name: &str, position: usize) -> String {
    let base = sanitize_file_name(name).unwrap_or_else(|| format!("attachment-{}", position));

    let mut candidate = base.clone();
    let mut counter = 2;
    while !used.insert(candidate.clone()) {
        candidate = format!("{}-{}", counter, base);
        counter += 1;
    }
    candidate
}

/// Render `store` and `graph` into `output_dir`.
pub fn render_archive(
    store: &MessageStore,
    graph: &ThreadGraph,
    config: &RenderConfig,
    output_dir: &Path,
) -> Result<RenderReport, RenderError> {
    ArchiveRenderer::new(store, graph, config, output_dir)?.render_all()
}
