//! Byte → text decoding with a defined fallback.
//!
//! Every piece of message text (header values carrying raw 8-bit bytes and
//! textual MIME leaves) passes through [`decode_bytes`], so the rest of the
//! crate only ever handles `String`s.

use encoding_rs::{Encoding, UTF_8, WINDOWS_1252};

/// Labels that mail clients routinely attach to UTF-8 content.
const ASCII_LABELS: &[&str] = &["us-ascii", "ascii", "ansi_x3.4-1968", "646"];

/// Decode `bytes` using `declared` as the candidate charset.
///
/// Resolution order:
///
/// 1. A declared label known to `encoding_rs` is used, except that an ASCII
///    label on bytes that are valid UTF-8 decodes as UTF-8.
/// 2. Without a usable label, valid UTF-8 decodes as UTF-8.
/// 3. Anything else decodes as windows-1252, which maps every byte.
///
/// Never fails; malformed sequences become U+FFFD.
pub fn decode_bytes(bytes: &[u8], declared: Option<&str>) -> String {
    if let Some(label) = declared.map(str::trim).filter(|l| !l.is_empty()) {
        match Encoding::for_label(label.as_bytes()) {
            Some(encoding) => {
                let is_ascii_label = ASCII_LABELS
                    .iter()
                    .any(|candidate| candidate.eq_ignore_ascii_case(label));
                if is_ascii_label && std::str::from_utf8(bytes).is_ok() {
                    return decode_with(UTF_8, bytes);
                }
                return decode_with(encoding, bytes);
            }
            None => {
                log::debug!("unknown charset `{}`, guessing", label);
            }
        }
    }

    match std::str::from_utf8(bytes) {
        Ok(text) => text.to_string(),
        Err(_) => decode_with(WINDOWS_1252, bytes),
    }
}

fn decode_with(encoding: &'static Encoding, bytes: &[u8]) -> String {
    let (text, had_errors) = encoding.decode_without_bom_handling(bytes);
    if had_errors {
        log::debug!("malformed {} sequence replaced while decoding", encoding.name());
    }
    text.into_owned()
}
