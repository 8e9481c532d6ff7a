use std::env;
use std::fmt;
use std::str::FromStr;

fn env_string(key: &str, default: &str) -> String {
    env::var(key).unwrap_or_else(|_| default.to_string())
}

/// Which representation wins when a message offers alternatives.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BodyPreference {
    /// Prefer the markup representation (`text/html`).
    #[default]
    Html,
    /// Prefer the plain text representation.
    Plain,
}

impl FromStr for BodyPreference {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "html" | "markup" => Ok(BodyPreference::Html),
            "plain" | "text" => Ok(BodyPreference::Plain),
            other => Err(format!(
                "unsupported body preference '{other}'. Use 'html' or 'plain'."
            )),
        }
    }
}

impl fmt::Display for BodyPreference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BodyPreference::Html => f.write_str("html"),
            BodyPreference::Plain => f.write_str("plain"),
        }
    }
}

/// Options applied while loading the mbox.
#[derive(Debug, Clone, Default)]
pub struct LoadOptions {
    /// Only keep messages whose To, Cc or Reply-To header contains this substring.
    pub list_filter: Option<String>,
}

/// Runtime configuration for page generation.
#[derive(Debug, Clone)]
pub struct RenderConfig {
    pub title: String,
    pub prefer: BodyPreference,
    pub attachment_notice: String,
}

impl RenderConfig {
    pub fn from_env() -> Self {
        let prefer = env::var("ARCHIVE_PREFER")
            .ok()
            .and_then(|value| BodyPreference::from_str(&value).ok())
            .unwrap_or_default();

        Self {
            title: env_string("ARCHIVE_TITLE", "Email Archive"),
            prefer,
            attachment_notice: env_string(
                "ARCHIVE_ATTACHMENT_NOTICE",
                "Attachments are provided as-is and have not been scanned. Open them with care.",
            ),
        }
    }
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self::from_env()
    }
}
