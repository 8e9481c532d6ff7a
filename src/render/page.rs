//! Markup for per-message pages.
//!
//! A page is emitted in chunks so that body parts can be appended one at a
//! time: [`page_header`], one [`body_part`] per body, then [`page_footer`].

use std::fmt::Write;

use super::html::{escape, escape_attr, format_date, page_href};
use super::output::INDEX_FILE;
use crate::store::Message;

/// How the header links to the message's parent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParentLink {
    /// Thread root, nothing to link
    None,
    /// Resolved parent is an archived message
    Archived { message_id: String },
    /// Resolved parent is a placeholder for a missing message
    NotArchived { message_id: String },
}

/// A reply listed in the footer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReplyLink {
    pub message_id: String,
    pub subject: String,
}

/// An attachment listed in the footer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttachmentLink {
    pub file_name: String,
    pub href: String,
}

fn field(out: &mut String, label: &str, value: &str) {
    let _ = writeln!(out, "<p><b>{}</b>: {}</p>", label, escape(value));
}

pub fn page_header(message: &Message, parent: &ParentLink, archive_title: &str) -> String {
    let date = format_date(message);
    let mut out = String::new();

    out.push_str("<!DOCTYPE html>\n<html>\n<head>\n<meta charset=\"utf-8\">\n");
    let _ = writeln!(
        out,
        "<title>{} - {} - {}</title>",
        escape(&message.subject),
        escape(&date),
        escape(archive_title)
    );
    out.push_str("</head>\n<body>\n");
    let _ = writeln!(out, "<p><a href=\"{}\">Index</a></p>", INDEX_FILE);

    field(&mut out, "Subject", &message.subject);
    field(&mut out, "From", &message.from);
    field(&mut out, "Date", &date);

    match parent {
        ParentLink::None => {}
        ParentLink::Archived { message_id } => {
            let _ = writeln!(
                out,
                "<p><a href=\"{}\">Parent</a></p>",
                escape_attr(&page_href(message_id))
            );
        }
        ParentLink::NotArchived { message_id } => {
            let _ = writeln!(
                out,
                "<p class=\"missing-parent\">Parent message not archived: <a href=\"{}\">{}</a></p>",
                escape_attr(&page_href(message_id)),
                escape(message_id)
            );
        }
    }

    out.push_str("<hr>\n");
    out
}

/// One body part followed by its separator. `markup` is already HTML.
pub fn body_part(markup: &str) -> String {
    format!("<div class=\"part\">\n{}\n</div>\n<hr>\n", markup)
}

/// Body of a placeholder page.
pub fn filler_notice(message_id: &str) -> String {
    format!(
        "<p class=\"missing-message\">The message {} is referenced by other messages but is not part of this archive.</p>\n<hr>\n",
        escape(message_id)
    )
}

pub fn page_footer(
    attachments: &[AttachmentLink],
    replies: &[ReplyLink],
    attachment_notice: &str,
) -> String {
    let mut out = String::new();

    if !attachments.is_empty() {
        out.push_str("<p><b>Attachments:</b></p>\n");
        let _ = writeln!(out, "<p class=\"notice\">{}</p>", escape(attachment_notice));
        out.push_str("<ul>\n");
        for attachment in attachments {
            let _ = writeln!(
                out,
                "<li><a href=\"{}\">{}</a></li>",
                escape_attr(&attachment.href),
                escape(&attachment.file_name)
            );
        }
        out.push_str("</ul>\n");
    }

    if !replies.is_empty() {
        out.push_str("<p><b>Replies:</b></p>\n<ul>\n");
        for reply in replies {
            let _ = writeln!(
                out,
                "<li><a href=\"{}\">{}</a> ({})</li>",
                escape_attr(&page_href(&reply.message_id)),
                escape(&reply.subject),
                escape(&reply.message_id)
            );
        }
        out.push_str("</ul>\n");
    }

    out.push_str("</body>\n</html>\n");
    out
}
