//! Redaction of rendered archive pages
//!
//! A post-pass over an output directory that obscures personal data:
//!
//! - **Phone numbers**: the area code is replaced with `XXX`
//!   (`+1 (919) 555-1234` becomes `+1 (XXX) 555-1234`)
//! - **E-mail addresses**: the last domain label is replaced
//!   (`ann@lists.example.org` becomes `ann@lists.example.[redacted]`)
//!
//! In HTML only text nodes and `mailto:` links are touched, so markup and
//! ordinary hyperlinks survive unchanged.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use regex::{Captures, Regex};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum RedactError {
    #[error("I/O error on `{path}`: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl RedactError {
    fn io(path: &Path, source: io::Error) -> Self {
        RedactError::Io {
            path: path.to_path_buf(),
            source,
        }
    }
}

/// Files rewritten by one [`redact_dir`] run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RedactStats {
    pub pages: usize,
    pub vcards: usize,
}

static PHONE_REGEX: OnceLock<Regex> = OnceLock::new();
static EMAIL_REGEX: OnceLock<Regex> = OnceLock::new();
static MAILTO_REGEX: OnceLock<Regex> = OnceLock::new();

/// Get the compiled phone number regex
///
/// The regex captures:
/// 1. Leading whitespace or start of text (no match inside a word or URL)
/// 2. Country code (optional), e.g. `+1`
/// 3. Separator run
/// 4. Opening parenthesis (optional) with 5. inner spacing
/// 6. Area code, three digits
/// 7. Inner spacing with 8. closing parenthesis (optional)
/// 9. Separator run, 10. next three digits
/// 11. Separator run, 12. final four digits
fn get_phone_regex() -> &'static Regex {
    PHONE_REGEX.get_or_init(|| {
        Regex::new(
            r"(?x)
            (\s+|^)
            (\+\s*\d+)?
            ((?:\s|-|\.|/)*)
            (\()?(\s*)
            (\d{3})
            (\s*)(\))?
            ((?:\s|-|\.|/)*)
            (\d{3})
            ((?:\s|-|\.|/)*)
            (\d{4})",
        )
        .expect("Invalid phone number regex")
    })
}

/// Get the compiled e-mail regex. Group 2 is the last domain label.
fn get_email_regex() -> &'static Regex {
    EMAIL_REGEX.get_or_init(|| {
        Regex::new(r"([a-zA-Z0-9_.+-]+@[a-zA-Z0-9.-]+)(\.[a-zA-Z0-9-]+)")
            .expect("Invalid e-mail regex")
    })
}

/// Get the compiled regex for `href` attributes holding a `mailto:` link.
fn get_mailto_regex() -> &'static Regex {
    MAILTO_REGEX.get_or_init(|| {
        Regex::new(r#"(?i)(\bhref\s*=\s*)("mailto:[^"]*"|'mailto:[^']*')"#)
            .expect("Invalid mailto regex")
    })
}

/// Redact phone area codes and e-mail domains in plain text.
pub fn redact_text(text: &str) -> String {
    let text = get_phone_regex().replace_all(
        text,
        "${1}${2}${3}${4}${5}XXX${7}${8}${9}${10}${11}${12}",
    );
    get_email_regex()
        .replace_all(&text, "${1}.[redacted]")
        .into_owned()
}

/// Redact the text nodes and `mailto:` links of an HTML document.
pub fn redact_html(html: &str) -> String {
    let mut out = String::with_capacity(html.len());
    let mut rest = html;

    while let Some(open) = rest.find('<') {
        out.push_str(&redact_text(&rest[..open]));

        let tag_end = if rest[open..].starts_with("<!--") {
            rest[open..].find("-->").map(|end| open + end + "-->".len())
        } else {
            rest[open..].find('>').map(|end| open + end + 1)
        };
        let Some(tag_end) = tag_end else {
            // Unterminated tag: keep the remainder verbatim
            out.push_str(&rest[open..]);
            return out;
        };

        out.push_str(&redact_tag(&rest[open..tag_end]));
        rest = &rest[tag_end..];
    }

    out.push_str(&redact_text(rest));
    out
}

fn redact_tag(tag: &str) -> String {
    if tag.starts_with("<!--") {
        return tag.to_string();
    }
    get_mailto_regex()
        .replace_all(tag, |caps: &Captures| {
            format!("{}{}", &caps[1], redact_text(&caps[2]))
        })
        .into_owned()
}

/// Redact an output directory in place.
///
/// Every `*.html` file directly in `dir` is rewritten with [`redact_html`],
/// and every `*.vcf` attachment one level below with [`redact_text`].
pub fn redact_dir(dir: &Path) -> Result<RedactStats, RedactError> {
    let mut stats = RedactStats::default();

    for entry in sorted_entries(dir)? {
        if entry.is_file() && has_extension(&entry, "html") {
            rewrite(&entry, redact_html)?;
            stats.pages += 1;
        } else if entry.is_dir() {
            for attachment in sorted_entries(&entry)? {
                if attachment.is_file() && has_extension(&attachment, "vcf") {
                    rewrite(&attachment, redact_text)?;
                    stats.vcards += 1;
                }
            }
        }
    }

    log::info!(
        "redacted {} pages and {} vCards in {}",
        stats.pages,
        stats.vcards,
        dir.display()
    );
    Ok(stats)
}

fn sorted_entries(dir: &Path) -> Result<Vec<PathBuf>, RedactError> {
    let mut entries = fs::read_dir(dir)
        .map_err(|source| RedactError::io(dir, source))?
        .map(|entry| entry.map(|e| e.path()))
        .collect::<Result<Vec<_>, _>>()
        .map_err(|source| RedactError::io(dir, source))?;
    entries.sort();
    Ok(entries)
}

fn has_extension(path: &Path, extension: &str) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case(extension))
}

fn rewrite(path: &Path, redact: fn(&str) -> String) -> Result<(), RedactError> {
    let bytes = fs::read(path).map_err(|source| RedactError::io(path, source))?;
    let text = String::from_utf8_lossy(&bytes);
    let redacted = redact(&text);
    if redacted != text {
        fs::write(path, redacted).map_err(|source| RedactError::io(path, source))?;
        log::debug!("redacted {}", path.display());
    }
    Ok(())
}
