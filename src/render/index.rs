//! Markup for the global index page.

use std::fmt::Write;

use super::html::{escape, escape_attr, format_date, page_href};
use crate::store::MessageStore;
use crate::threading::{ThreadGraph, walk_forest};

/// Render the nested thread list.
///
/// Entries come from a pre-order walk, so depth grows by at most one between
/// consecutive entries; each increase opens a `<ul>` inside the open `<li>`.
pub fn render_index(store: &MessageStore, graph: &ThreadGraph, archive_title: &str) -> String {
    let mut out = String::new();
    out.push_str("<!DOCTYPE html>\n<html>\n<head>\n<meta charset=\"utf-8\">\n");
    let _ = writeln!(out, "<title>{}</title>", escape(archive_title));
    out.push_str("</head>\n<body>\n");
    let _ = writeln!(out, "<h1>{}</h1>", escape(archive_title));
    out.push_str("<ul>\n");

    let mut open_depth: Option<usize> = None;
    for entry in walk_forest(graph) {
        let Some(message) = store.get(&entry.message_id) else {
            continue;
        };

        match open_depth {
            Some(depth) if entry.depth > depth => out.push_str("\n<ul>\n"),
            Some(depth) => {
                out.push_str("</li>\n");
                for _ in entry.depth..depth {
                    out.push_str("</ul>\n</li>\n");
                }
            }
            None => {}
        }

        let _ = write!(
            out,
            "<li>{}: <a href=\"{}\">{}</a>",
            escape(&format_date(message)),
            escape_attr(&page_href(&message.message_id)),
            escape(&message.subject)
        );
        open_depth = Some(entry.depth);
    }

    if let Some(depth) = open_depth {
        out.push_str("</li>\n");
        for _ in 0..depth {
            out.push_str("</ul>\n</li>\n");
        }
    }

    out.push_str("</ul>\n</body>\n</html>\n");
    out
}
