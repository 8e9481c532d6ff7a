//! Message record parsing.
//!
//! Turns the raw bytes of one mbox entry into a [`Message`]. Only headers are
//! interpreted here; the content-part tree is built later, per message, by
//! the content extractor from the retained raw bytes.
//!
//! # Header Decoding
//!
//! Header values pass through a single decode step:
//!
//! - **ASCII values** are decoded by `mailparse`, which handles RFC 2047
//!   encoded words (`=?utf-8?q?...?=`)
//! - **Raw 8-bit values** are decoded with the message's declared charset via
//!   [`decode_bytes`], falling back to a best guess
//!
//! # Error Handling
//!
//! - Missing Message-ID: the record is rejected with
//!   [`ParseRecordError::MissingMessageId`]
//! - Unparsable Date: not an error; the raw text is kept and the parsed
//!   timestamp is `None`
//! - Missing Subject or From: replaced by placeholders

use std::sync::OnceLock;

use chrono::{DateTime, NaiveTime, Utc};
use mailparse::{MailHeaderMap, ParsedMail, parse_mail};
use regex::Regex;
use thiserror::Error;

use super::message::Message;
use crate::content::decode_bytes;

/// Headers whose values are matched by the recipient filter.
const RECIPIENT_HEADERS: &[&str] = &["To", "Cc", "Reply-To"];

/// Errors that can be returned while parsing a record.
#[derive(Debug, Error)]
pub enum ParseRecordError {
    #[error("failed to parse MIME structure: {0}")]
    MimeParse(#[from] mailparse::MailParseError),
    #[error("missing Message-ID header")]
    MissingMessageId,
}

/// Remove NUL bytes and surrounding whitespace.
fn sanitize_text(text: &str) -> String {
    text.replace('\0', "").trim().to_string()
}

/// Clean a message id by removing angle brackets and whitespace
pub fn normalize_message_id(msg_id: &str) -> Option<String> {
    let cleaned = msg_id.trim().trim_matches(&['<', '>'][..]).trim();
    if cleaned.is_empty() {
        None
    } else {
        Some(sanitize_text(cleaned))
    }
}

/// Extract message ids from an In-Reply-To or References value.
///
/// Bracketed ids (`<a@b> <c@d>`, also without separating whitespace) are
/// preferred; values without brackets are split on whitespace. Anything
/// outside brackets, such as comments, is ignored.
pub fn extract_message_ids(header_value: &str) -> Vec<String> {
    let mut ids = Vec::new();
    let mut rest = header_value;

    while let Some(start) = rest.find('<') {
        let after = &rest[start + 1..];
        let Some(end) = after.find('>') else {
            break;
        };
        if let Some(id) = normalize_message_id(&after[..end]) {
            ids.push(id);
        }
        rest = &after[end + 1..];
    }

    if ids.is_empty() {
        ids = header_value
            .split_whitespace()
            .filter_map(normalize_message_id)
            .collect();
    }

    ids
}

/// Decode one header value, or `None` when the header is absent.
fn header_text(parsed: &ParsedMail, key: &str) -> Option<String> {
    let header = parsed.headers.get_first_header(key)?;
    let raw = header.get_value_raw();
    let text = if raw.is_ascii() {
        header.get_value()
    } else {
        decode_bytes(raw, Some(&parsed.ctype.charset)).replace(['\r', '\n'], " ")
    };
    Some(sanitize_text(&text))
}

static YEAR_REGEX: OnceLock<Regex> = OnceLock::new();

/// Get the compiled regex for a four-digit year (or a longer timestamp)
fn get_year_regex() -> &'static Regex {
    YEAR_REGEX.get_or_init(|| Regex::new(r"\d{4}").expect("Invalid year regex"))
}

/// Parse a free-text date, `None` when it cannot be understood.
///
/// Zone-less input is read as UTC and a missing time of day as midnight, so
/// the result does not depend on the host clock or zone. Free text without a
/// year (`May 27`, a bare time) is unparsable, since the missing fields would
/// come from the current date.
pub fn parse_date(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }
    if let Ok(dt) = DateTime::parse_from_rfc2822(raw) {
        return Some(dt.with_timezone(&Utc));
    }
    if !get_year_regex().is_match(raw) {
        log::debug!("date `{}` has no year", raw);
        return None;
    }
    match dateparser::parse_with(raw, &Utc, NaiveTime::MIN) {
        Ok(dt) => Some(dt),
        Err(source) => {
            log::debug!("unparsable date `{}`: {}", raw, source);
            None
        }
    }
}

/// Parse one raw mbox entry into a message record.
pub fn parse_record(raw: Vec<u8>) -> Result<Message, ParseRecordError> {
    let parsed = parse_mail(&raw).map_err(|e| {
        log::debug!("failed to parse MIME: {}", e);
        ParseRecordError::MimeParse(e)
    })?;

    let message_id = header_text(&parsed, "Message-ID")
        .and_then(|value| extract_message_ids(&value).into_iter().next())
        .ok_or(ParseRecordError::MissingMessageId)?;

    let subject = header_text(&parsed, "Subject")
        .filter(|s| !s.is_empty())
        .unwrap_or_else(|| "(no subject)".to_string());

    let from = header_text(&parsed, "From")
        .filter(|s| !s.is_empty())
        .unwrap_or_else(|| "(unknown sender)".to_string());

    let date_raw = header_text(&parsed, "Date").unwrap_or_default();
    let date = parse_date(&date_raw);
    if date.is_none() {
        log::debug!("message {} has no usable date `{}`", message_id, date_raw);
    }

    let in_reply_to = header_text(&parsed, "In-Reply-To")
        .and_then(|value| extract_message_ids(&value).into_iter().next());

    let references = header_text(&parsed, "References")
        .map(|value| extract_message_ids(&value))
        .unwrap_or_default();

    let recipients = RECIPIENT_HEADERS
        .iter()
        .flat_map(|key| parsed.headers.get_all_values(key))
        .map(|value| sanitize_text(&value))
        .collect();

    log::trace!("parsed: {} - {}", message_id, subject);

    drop(parsed);
    Ok(Message::loaded(
        message_id,
        subject,
        from,
        date_raw,
        date,
        in_reply_to,
        references,
        recipients,
        raw,
    ))
}
