//! Content-part tree flattening.
//!
//! Walks a [`MimeNode`] tree depth-first, left to right, and emits the
//! renderable [`ContentPart`]s in order. Dispatch is by declared media type:
//!
//! - **text leaves** are decoded; body text becomes an HTML fragment, named
//!   text leaves become text attachments
//! - **`multipart/alternative`** contributes exactly one chosen child
//! - **other containers** and embedded messages contribute all children
//! - **signatures** become inline body text, never attachments
//! - **delivery-status reports** are dropped
//! - **anything else** is a byte-exact binary attachment

use crate::config::BodyPreference;

use super::charset::decode_bytes;
use super::mime_tree::{MAX_NESTING_DEPTH, MimeNode};
use super::text::plain_to_markup;

const SIGNATURE_TYPES: &[&str] = &[
    "application/pgp-signature",
    "application/pkcs7-signature",
    "application/x-pkcs7-signature",
];

const DELIVERY_STATUS_TYPES: &[&str] = &[
    "message/delivery-status",
    "message/global-delivery-status",
];

/// HTML-family subtypes that are embedded as-is.
const MARKUP_SUBTYPES: &[&str] = &["html", "xhtml+xml"];

/// Payload of an extracted part.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Payload {
    Text(String),
    Binary(Vec<u8>),
}

/// One unit of renderable material.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContentPart {
    /// Attachment file name. `None` means body text appended to the page.
    pub name: Option<String>,
    pub media_type: String,
    pub payload: Payload,
}

impl ContentPart {
    pub fn is_body(&self) -> bool {
        self.name.is_none()
    }

    pub fn is_binary(&self) -> bool {
        matches!(self.payload, Payload::Binary(_))
    }

    /// Payload bytes as they are written to disk.
    pub fn bytes(&self) -> &[u8] {
        match &self.payload {
            Payload::Text(text) => text.as_bytes(),
            Payload::Binary(data) => data,
        }
    }

    /// Body text, or `""` for attachments.
    pub fn body_text(&self) -> &str {
        match (&self.name, &self.payload) {
            (None, Payload::Text(text)) => text,
            _ => "",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum NodeKind {
    Alternative,
    Container,
    Signature,
    DeliveryStatus,
    Text,
    Binary,
}

fn classify(node: &MimeNode) -> NodeKind {
    let media_type = node.media_type.as_str();
    if media_type == "multipart/alternative" && !node.children.is_empty() {
        NodeKind::Alternative
    } else if node.is_container() {
        NodeKind::Container
    } else if SIGNATURE_TYPES.contains(&media_type) {
        NodeKind::Signature
    } else if DELIVERY_STATUS_TYPES.contains(&media_type) {
        NodeKind::DeliveryStatus
    } else if node.main_type() == "text" {
        NodeKind::Text
    } else {
        NodeKind::Binary
    }
}

struct Frame<'a> {
    node: &'a MimeNode,
    depth: usize,
    /// Filename of the alternative group this leaf was chosen from.
    group_name: Option<&'a str>,
}

/// Flatten a content-part tree into its ordered parts.
pub fn extract_parts(root: &MimeNode, prefer: BodyPreference) -> Vec<ContentPart> {
    let mut parts = Vec::new();
    let mut unnamed_attachments = 0usize;

    // Explicit stack; children pushed in reverse to keep left-to-right order
    let mut stack = vec![Frame {
        node: root,
        depth: 0,
        group_name: None,
    }];

    while let Some(Frame {
        node,
        depth,
        group_name,
    }) = stack.pop()
    {
        let kind = classify(node);
        let is_container = matches!(kind, NodeKind::Alternative | NodeKind::Container);
        if is_container && depth >= MAX_NESTING_DEPTH {
            log::debug!(
                "skipping {} nested deeper than {}",
                node.media_type,
                MAX_NESTING_DEPTH
            );
            continue;
        }

        match kind {
            NodeKind::Alternative => {
                let Some(chosen) = choose_alternative(&node.children, prefer) else {
                    continue;
                };
                // The group name only labels a chosen leaf
                let group_name = if chosen.is_container() {
                    None
                } else {
                    node.filename.as_deref().or(group_name)
                };
                stack.push(Frame {
                    node: chosen,
                    depth: depth + 1,
                    group_name,
                });
            }
            NodeKind::Container => {
                for child in node.children.iter().rev() {
                    stack.push(Frame {
                        node: child,
                        depth: depth + 1,
                        group_name: None,
                    });
                }
            }
            NodeKind::Signature => {
                let text = decode_bytes(payload_of(node), node.charset.as_deref());
                parts.push(ContentPart {
                    name: None,
                    media_type: node.media_type.clone(),
                    payload: Payload::Text(signature_markup(&text)),
                });
            }
            NodeKind::DeliveryStatus => {
                log::debug!("dropping {} part", node.media_type);
            }
            NodeKind::Text => {
                parts.push(text_part(node, group_name));
            }
            NodeKind::Binary => {
                let name = match node.filename.as_deref().or(group_name) {
                    Some(name) => name.to_string(),
                    None => {
                        unnamed_attachments += 1;
                        generated_name(&node.media_type, unnamed_attachments)
                    }
                };
                parts.push(ContentPart {
                    name: Some(name),
                    media_type: node.media_type.clone(),
                    payload: Payload::Binary(payload_of(node).to_vec()),
                });
            }
        }
    }

    parts
}

fn payload_of(node: &MimeNode) -> &[u8] {
    node.payload.as_deref().unwrap_or_default()
}

fn text_part(node: &MimeNode, group_name: Option<&str>) -> ContentPart {
    let text = decode_bytes(payload_of(node), node.charset.as_deref());
    let name = node.filename.as_deref().or(group_name).map(str::to_string);

    let payload = if name.is_some() || MARKUP_SUBTYPES.contains(&node.subtype()) {
        text
    } else {
        plain_to_markup(&text)
    };

    ContentPart {
        name,
        media_type: node.media_type.clone(),
        payload: Payload::Text(payload),
    }
}

fn signature_markup(text: &str) -> String {
    format!(
        "<div class=\"signature\"><p>-- signature --</p><pre>{}</pre></div>",
        html_escape::encode_text(text.trim_end())
    )
}

/// Pick the representative child of an alternative group.
///
/// Lower rank wins; among equal ranks the later child wins, since senders
/// list alternatives in increasing order of faithfulness.
fn choose_alternative(children: &[MimeNode], prefer: BodyPreference) -> Option<&MimeNode> {
    children
        .iter()
        .enumerate()
        .min_by_key(|(index, child)| (alternative_rank(child, prefer), usize::MAX - index))
        .map(|(_, child)| child)
}

fn alternative_rank(node: &MimeNode, prefer: BodyPreference) -> u8 {
    let (html, plain) = match prefer {
        BodyPreference::Html => (0, 2),
        BodyPreference::Plain => (2, 0),
    };
    match node.media_type.as_str() {
        "text/html" => html,
        "multipart/related" | "multipart/mixed" => 1,
        "text/plain" => plain,
        _ if node.main_type() == "text" => 3,
        _ => 4,
    }
}

fn generated_name(media_type: &str, index: usize) -> String {
    let extension = mime_guess::get_mime_extensions_str(media_type)
        .and_then(|extensions| extensions.first())
        .copied()
        .unwrap_or("bin");
    format!("attachment-{}.{}", index, extension)
}
