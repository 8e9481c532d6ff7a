//! Naming and escaping helpers shared by pages and the index.

use std::borrow::Cow;
use std::fmt::Write;

use crate::store::Message;

/// Display format for parsed dates, e.g. `January 02, 2020`.
pub const DATE_FORMAT: &str = "%B %d, %Y";

/// Escape message-derived text for an element body.
pub fn escape(text: &str) -> Cow<'_, str> {
    html_escape::encode_text(text)
}

/// Escape a value placed inside a double-quoted attribute.
pub fn escape_attr(text: &str) -> Cow<'_, str> {
    html_escape::encode_double_quoted_attribute(text)
}

/// Suffix of a message's attachment directory.
pub const ATTACHMENT_DIR_SUFFIX: &str = ".files";

/// File system stem for a message's page and attachment directory.
///
/// The mapping is injective: `_` is the escape character, so it is written
/// as `_5F` along with path separators, NUL and other control characters
/// (`_` followed by two hex digits). A stem that would be hidden or collide
/// with the index has its first character escaped; the empty id becomes `_`.
pub fn page_stem(message_id: &str) -> String {
    let mut stem = String::with_capacity(message_id.len());
    for (position, c) in message_id.chars().enumerate() {
        let guarded = position == 0
            && (c == '.' || message_id.eq_ignore_ascii_case("index"));
        if guarded || matches!(c, '_' | '/' | '\\') || c.is_control() {
            let mut buf = [0u8; 4];
            for byte in c.encode_utf8(&mut buf).bytes() {
                let _ = write!(stem, "_{:02X}", byte);
            }
        } else {
            stem.push(c);
        }
    }

    if stem.is_empty() {
        stem.push('_');
    }
    stem
}

pub fn page_file_name(message_id: &str) -> String {
    format!("{}.html", page_stem(message_id))
}

/// Directory holding a message's attachments, e.g. `id@x.files`.
pub fn attachment_dir_name(message_id: &str) -> String {
    format!("{}{}", page_stem(message_id), ATTACHMENT_DIR_SUFFIX)
}

/// Relative link to a message page, percent-encoded.
pub fn page_href(message_id: &str) -> String {
    urlencoding::encode(&page_file_name(message_id)).into_owned()
}

/// Relative link to an attachment of a message.
pub fn attachment_href(message_id: &str, file_name: &str) -> String {
    format!(
        "{}/{}",
        urlencoding::encode(&attachment_dir_name(message_id)),
        urlencoding::encode(file_name)
    )
}

/// Reduce an attachment name to a safe single path component.
///
/// Directory parts are dropped; `None` when nothing usable remains.
pub fn sanitize_file_name(name: &str) -> Option<String> {
    let last = name.rsplit(['/', '\\']).next().unwrap_or_default();
    let cleaned: String = last
        .chars()
        .filter(|c| *c != '\0' && !c.is_control())
        .collect();
    let cleaned = cleaned.trim();

    match cleaned {
        "" | "." | ".." => None,
        other => Some(other.to_string()),
    }
}

/// Date shown for a message: formatted when parsed, raw header text otherwise.
pub fn format_date(message: &Message) -> String {
    match message.date {
        Some(date) => date.format(DATE_FORMAT).to_string(),
        None => message.date_raw.clone(),
    }
}
