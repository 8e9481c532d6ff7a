mod common;

use std::fs;

use mbox_archive::{
    ArchiveError, BodyPreference, LoadOptions, RenderConfig, generate_archive,
};

fn config() -> RenderConfig {
    RenderConfig {
        title: "List Archive".to_string(),
        prefer: BodyPreference::Html,
        attachment_notice: "Attachments have not been scanned.".to_string(),
    }
}

fn list_options() -> LoadOptions {
    LoadOptions {
        list_filter: Some("list@example.com".to_string()),
    }
}

#[test]
fn archive_pages_link_threads_together() {
    let scratch = tempfile::tempdir().unwrap();
    let mbox = common::write_mbox(scratch.path(), common::LIST_MBOX);
    let out = scratch.path().join("out");

    let summary = generate_archive(&mbox, &out, &list_options(), &config()).unwrap();
    assert!(summary.render.is_complete());
    assert_eq!(summary.render.pages, 4);
    assert_eq!(summary.render.placeholders, 1);
    assert_eq!(summary.render.attachments, 1);
    assert!(!out.join("private@example.com.html").exists());

    let root = common::read_page(&out, "root@example.com.html");
    assert!(root.contains("<title>Kickoff - January 01, 2020 - List Archive</title>"));
    assert!(root.contains("<p><b>From</b>: Alice &lt;alice@example.com&gt;</p>"));
    let first = root.find("reply%40example.com.html").unwrap();
    let second = root.find("late%40example.com.html").unwrap();
    assert!(first < second, "replies follow date order");

    let reply = common::read_page(&out, "reply@example.com.html");
    assert!(reply.contains("<p><b>markup version</b></p>"));
    assert!(!reply.contains("plain version"));
    assert!(reply.contains("<a href=\"root%40example.com.html\">Parent</a>"));

    let late = common::read_page(&out, "late@example.com.html");
    assert!(late.contains("<p><b>Date</b>: sometime last week</p>"));
    assert!(late.contains("<blockquote>"));
}

#[test]
fn missing_parent_gets_placeholder_page() {
    let scratch = tempfile::tempdir().unwrap();
    let mbox = common::write_mbox(scratch.path(), common::LIST_MBOX);
    let out = scratch.path().join("out");
    generate_archive(&mbox, &out, &list_options(), &config()).unwrap();

    let placeholder = common::read_page(&out, "missing@example.com.html");
    assert!(placeholder.contains("(message not archived)"));
    assert!(placeholder.contains("orphan%40example.com.html"));

    let orphan = common::read_page(&out, "orphan@example.com.html");
    assert!(orphan.contains("Parent message not archived"));
    assert!(orphan.contains("Report attached."));
    assert!(orphan.contains("<a href=\"orphan%40example.com.files/report.pdf\">report.pdf</a>"));
    assert!(orphan.contains("Attachments have not been scanned."));

    let attachment = fs::read(out.join("orphan@example.com.files").join("report.pdf")).unwrap();
    assert_eq!(attachment, common::REPORT_PDF);

    let index = common::read_page(&out, "index.html");
    assert!(index.contains(
        "(unknown date): <a href=\"missing%40example.com.html\">(message not archived)</a>"
    ));
}

#[test]
fn second_run_is_byte_identical_and_clears_stale_files() {
    let scratch = tempfile::tempdir().unwrap();
    let mbox = common::write_mbox(scratch.path(), common::LIST_MBOX);
    let out = scratch.path().join("out");

    generate_archive(&mbox, &out, &list_options(), &config()).unwrap();
    let first = common::snapshot(&out);

    fs::write(out.join("orphan@example.com.files").join("stale.bin"), b"old").unwrap();
    fs::write(out.join("root@example.com.html"), "stale page").unwrap();

    generate_archive(&mbox, &out, &list_options(), &config()).unwrap();
    let second = common::snapshot(&out);

    assert_eq!(first, second);
}

#[test]
fn plain_preference_selects_text_body() {
    let scratch = tempfile::tempdir().unwrap();
    let mbox = common::write_mbox(scratch.path(), common::LIST_MBOX);
    let out = scratch.path().join("out");
    let config = RenderConfig {
        prefer: BodyPreference::Plain,
        ..config()
    };

    generate_archive(&mbox, &out, &list_options(), &config).unwrap();
    let reply = common::read_page(&out, "reply@example.com.html");
    assert!(reply.contains("plain version"));
    assert!(!reply.contains("markup version"));
}

#[test]
fn failing_page_does_not_stop_the_run() {
    let scratch = tempfile::tempdir().unwrap();
    let mbox = common::write_mbox(scratch.path(), common::LIST_MBOX);
    let out = scratch.path().join("out");

    // A directory where the page file belongs cannot be replaced
    fs::create_dir_all(out.join("late@example.com.html").join("blocker")).unwrap();

    let summary = generate_archive(&mbox, &out, &list_options(), &config()).unwrap();
    assert_eq!(summary.render.failures.len(), 1);
    assert_eq!(summary.render.failures[0].message_id, "late@example.com");
    assert_eq!(summary.render.pages, 3);
    assert!(out.join("index.html").is_file());
    assert!(out.join("reply@example.com.html").is_file());
}

#[test]
fn archive_path_must_be_a_regular_file() {
    let scratch = tempfile::tempdir().unwrap();
    let out = scratch.path().join("out");
    let err = generate_archive(scratch.path(), &out, &list_options(), &config()).unwrap_err();
    assert!(matches!(err, ArchiveError::NotARegularFile(_)));

    let missing = scratch.path().join("absent.mbox");
    let err = generate_archive(&missing, &out, &list_options(), &config()).unwrap_err();
    assert!(matches!(err, ArchiveError::NotARegularFile(_)));
}

#[test]
fn lookalike_ids_get_separate_pages() {
    let scratch = tempfile::tempdir().unwrap();
    let mbox = common::write_mbox(scratch.path(), common::LOOKALIKE_MBOX);
    let out = scratch.path().join("out");

    let summary =
        generate_archive(&mbox, &out, &LoadOptions::default(), &config()).unwrap();
    assert!(summary.render.is_complete());
    assert_eq!(summary.render.pages, 4);
    assert_eq!(summary.render.attachments, 1);

    let files: Vec<String> = common::snapshot(&out).into_keys().collect();
    assert_eq!(files.len(), 6, "{:?}", files);

    let slash = common::read_page(&out, "a_2Fb@x.html");
    let underscore = common::read_page(&out, "a_5Fb@x.html");
    assert!(slash.contains("body one"));
    assert!(underscore.contains("body two"));

    let bare = common::read_page(&out, "foo.html");
    assert!(bare.contains("plain foo"));
    let suffixed = common::read_page(&out, "foo.html.html");
    assert!(suffixed.contains("foo.html.files/report.pdf"));
    let attachment = fs::read(out.join("foo.html.files").join("report.pdf")).unwrap();
    assert_eq!(attachment, common::REPORT_PDF);

    let index = common::read_page(&out, "index.html");
    assert!(index.contains("href=\"a_2Fb%40x.html\""));
    assert!(index.contains("href=\"a_5Fb%40x.html\""));
}
