//! Owned content-part tree.
//!
//! `mailparse::ParsedMail` borrows from the raw message bytes, and it leaves
//! `message/rfc822` bodies unparsed. [`MimeNode`] is an owned copy of the
//! structure with embedded messages expanded into child nodes, which lets the
//! extractor work on a plain tree (and tests build trees by hand).

use mailparse::{MailParseError, ParsedMail};

/// Maximum depth of embedded messages and nested containers that is descended into.
pub const MAX_NESTING_DEPTH: usize = 64;

/// One node of a message's content-part tree.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MimeNode {
    /// Lowercase `type/subtype`.
    pub media_type: String,
    /// Charset parameter, only when the part declared one.
    pub charset: Option<String>,
    /// Declared filename (`Content-Disposition: filename` or `Content-Type: name`).
    pub filename: Option<String>,
    /// Transfer-decoded payload of a leaf. `None` when absent or undecodable.
    pub payload: Option<Vec<u8>>,
    pub children: Vec<MimeNode>,
}

impl MimeNode {
    pub fn leaf(media_type: &str, payload: impl Into<Vec<u8>>) -> Self {
        MimeNode {
            media_type: media_type.to_ascii_lowercase(),
            payload: Some(payload.into()),
            ..MimeNode::default()
        }
    }

    pub fn container(media_type: &str, children: Vec<MimeNode>) -> Self {
        MimeNode {
            media_type: media_type.to_ascii_lowercase(),
            children,
            ..MimeNode::default()
        }
    }

    pub fn with_filename(mut self, filename: &str) -> Self {
        self.filename = Some(filename.to_string());
        self
    }

    pub fn with_charset(mut self, charset: &str) -> Self {
        self.charset = Some(charset.to_string());
        self
    }

    /// `type` half of the media type.
    pub fn main_type(&self) -> &str {
        self.media_type.split('/').next().unwrap_or_default()
    }

    /// `subtype` half of the media type.
    pub fn subtype(&self) -> &str {
        self.media_type.split_once('/').map(|(_, sub)| sub).unwrap_or_default()
    }

    pub fn is_container(&self) -> bool {
        self.main_type() == "multipart" || !self.children.is_empty()
    }

    /// Parse raw message bytes into a tree.
    pub fn parse(raw: &[u8]) -> Result<MimeNode, MailParseError> {
        let parsed = mailparse::parse_mail(raw)?;
        Ok(MimeNode::from_parsed(&parsed, 0))
    }

    fn from_parsed(parsed: &ParsedMail, depth: usize) -> MimeNode {
        let media_type = parsed.ctype.mimetype.to_ascii_lowercase();
        let charset = parsed
            .ctype
            .params
            .contains_key("charset")
            .then(|| parsed.ctype.charset.clone());
        let filename = part_filename(parsed);

        if !parsed.subparts.is_empty() {
            let children = if depth < MAX_NESTING_DEPTH {
                parsed
                    .subparts
                    .iter()
                    .map(|sub| MimeNode::from_parsed(sub, depth + 1))
                    .collect()
            } else {
                log::debug!("content tree deeper than {}, truncating", MAX_NESTING_DEPTH);
                Vec::new()
            };
            return MimeNode {
                media_type,
                charset,
                filename,
                payload: None,
                children,
            };
        }

        let payload = parsed.get_body_raw().ok();

        if media_type == "message/rfc822" && depth < MAX_NESTING_DEPTH {
            if let Some(inner) = payload
                .as_deref()
                .and_then(|bytes| mailparse::parse_mail(bytes).ok())
            {
                return MimeNode {
                    media_type,
                    charset,
                    filename,
                    payload: None,
                    children: vec![MimeNode::from_parsed(&inner, depth + 1)],
                };
            }
        }

        MimeNode {
            media_type,
            charset,
            filename,
            payload,
            children: Vec::new(),
        }
    }
}

fn part_filename(parsed: &ParsedMail) -> Option<String> {
    let disposition = parsed.get_content_disposition();
    disposition
        .params
        .get("filename")
        .cloned()
        .or_else(|| parsed.ctype.params.get("name").cloned())
        .map(|name| name.trim().to_string())
        .filter(|name| !name.is_empty())
}
