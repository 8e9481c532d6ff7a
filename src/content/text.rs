//! Plain text → HTML fragment conversion.

/// Convert plain text into an HTML fragment.
///
/// Text is escaped, lines quoted with `>` are wrapped in (nested)
/// `<blockquote>` elements, and remaining line breaks become `<br>`.
pub fn plain_to_markup(text: &str) -> String {
    let normalized = text.replace("\r\n", "\n").replace('\r', "\n");
    let body = normalized.trim_end_matches('\n');
    if body.is_empty() {
        return String::new();
    }

    let mut out = String::with_capacity(body.len() + body.len() / 4);
    let mut depth = 0usize;
    // No <br> directly after a block boundary
    let mut at_block_start = true;

    for line in body.split('\n') {
        let (level, content) = split_quote_prefix(line);

        while depth < level {
            out.push_str("<blockquote>");
            depth += 1;
            at_block_start = true;
        }
        while depth > level {
            out.push_str("</blockquote>\n");
            depth -= 1;
            at_block_start = true;
        }

        if !at_block_start {
            out.push_str("<br>\n");
        }
        out.push_str(&html_escape::encode_text(content));
        at_block_start = false;
    }

    while depth > 0 {
        out.push_str("</blockquote>\n");
        depth -= 1;
    }

    out
}

/// Split a line into its quote depth and the unquoted remainder.
///
/// `"> > text"` and `">>text"` are both depth 2.
fn split_quote_prefix(line: &str) -> (usize, &str) {
    let mut level = 0;
    let mut rest = line;
    while let Some(stripped) = rest.strip_prefix('>') {
        level += 1;
        rest = stripped;
        if let Some(spaced) = rest.strip_prefix(' ') {
            rest = if spaced.starts_with('>') { spaced } else { rest };
        }
    }
    if level > 0 {
        rest = rest.strip_prefix(' ').unwrap_or(rest);
    }
    (level, rest)
}
