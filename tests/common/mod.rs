#![allow(dead_code)]

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

/// A small list archive:
///
/// ```text
/// root@example.com            Jan 1
/// ├── reply@example.com       Jan 2 (alternative body)
/// └── late@example.com        unparsable date
/// missing@example.com         never archived
/// └── orphan@example.com      Jan 3 (PDF attachment)
/// private@example.com         not sent to the list
/// ```
pub const LIST_MBOX: &str = concat!(
    "From alice@example.com Wed Jan  1 09:00:00 2020\n",
    "Message-ID: <root@example.com>\n",
    "From: Alice <alice@example.com>\n",
    "To: list@example.com\n",
    "Subject: Kickoff\n",
    "Date: Wed, 1 Jan 2020 09:00:00 +0000\n",
    "Content-Type: text/plain; charset=utf-8\n",
    "\n",
    "Hello all.\n",
    "Call me at 919-555-1234.\n",
    "\n",
    "From dave@example.com Sat Jan  4 09:00:00 2020\n",
    "Message-ID: <late@example.com>\n",
    "From: Dave <dave@example.com>\n",
    "To: list@example.com\n",
    "Subject: Re: Kickoff (late)\n",
    "Date: sometime last week\n",
    "In-Reply-To: <root@example.com>\n",
    "\n",
    "> Hello all.\n",
    "Sorry I am late.\n",
    "\n",
    "From bob@example.com Thu Jan  2 09:00:00 2020\n",
    "Message-ID: <reply@example.com>\n",
    "From: Bob <bob@example.com>\n",
    "To: list@example.com\n",
    "Subject: Re: Kickoff\n",
    "Date: Thu, 2 Jan 2020 09:00:00 +0000\n",
    "In-Reply-To: <root@example.com>\n",
    "References: <root@example.com>\n",
    "MIME-Version: 1.0\n",
    "Content-Type: multipart/alternative; boundary=\"alt\"\n",
    "\n",
    "--alt\n",
    "Content-Type: text/plain; charset=utf-8\n",
    "\n",
    "plain version\n",
    "--alt\n",
    "Content-Type: text/html; charset=utf-8\n",
    "\n",
    "<p><b>markup version</b></p>\n",
    "--alt--\n",
    "\n",
    "From carol@example.com Fri Jan  3 09:00:00 2020\n",
    "Message-ID: <orphan@example.com>\n",
    "From: Carol <carol@example.com>\n",
    "To: list@example.com\n",
    "Subject: Re: Lost thread\n",
    "Date: Fri, 3 Jan 2020 09:00:00 +0000\n",
    "In-Reply-To: <missing@example.com>\n",
    "References: <missing@example.com>\n",
    "MIME-Version: 1.0\n",
    "Content-Type: multipart/mixed; boundary=\"mix\"\n",
    "\n",
    "--mix\n",
    "Content-Type: text/plain; charset=utf-8\n",
    "\n",
    "Report attached.\n",
    "--mix\n",
    "Content-Type: application/pdf\n",
    "Content-Disposition: attachment; filename=\"report.pdf\"\n",
    "Content-Transfer-Encoding: base64\n",
    "\n",
    "JVBERi0xLjQgdGVzdAo=\n",
    "--mix--\n",
    "\n",
    "From eve@example.com Sun Jan  5 09:00:00 2020\n",
    "Message-ID: <private@example.com>\n",
    "From: Eve <eve@example.com>\n",
    "To: alice@example.com\n",
    "Subject: Off list\n",
    "Date: Sun, 5 Jan 2020 09:00:00 +0000\n",
    "\n",
    "Just between us.\n",
);

/// Messages whose ids differ only in characters that are unsafe or
/// significant in file names.
pub const LOOKALIKE_MBOX: &str = concat!(
    "From ann@example.com Wed Jan  1 09:00:00 2020\n",
    "Message-ID: <a/b@x>\n",
    "From: Ann <ann@example.com>\n",
    "Subject: Slash\n",
    "Date: Wed, 1 Jan 2020 09:00:00 +0000\n",
    "\n",
    "body one\n",
    "\n",
    "From ann@example.com Wed Jan  1 10:00:00 2020\n",
    "Message-ID: <a_b@x>\n",
    "From: Ann <ann@example.com>\n",
    "Subject: Underscore\n",
    "Date: Wed, 1 Jan 2020 10:00:00 +0000\n",
    "\n",
    "body two\n",
    "\n",
    "From ann@example.com Wed Jan  1 11:00:00 2020\n",
    "Message-ID: <foo.html>\n",
    "From: Ann <ann@example.com>\n",
    "Subject: Suffixed\n",
    "Date: Wed, 1 Jan 2020 11:00:00 +0000\n",
    "MIME-Version: 1.0\n",
    "Content-Type: multipart/mixed; boundary=\"mix\"\n",
    "\n",
    "--mix\n",
    "Content-Type: text/plain; charset=utf-8\n",
    "\n",
    "see report\n",
    "--mix\n",
    "Content-Type: application/pdf\n",
    "Content-Disposition: attachment; filename=\"report.pdf\"\n",
    "Content-Transfer-Encoding: base64\n",
    "\n",
    "JVBERi0xLjQgdGVzdAo=\n",
    "--mix--\n",
    "\n",
    "From ann@example.com Wed Jan  1 12:00:00 2020\n",
    "Message-ID: <foo>\n",
    "From: Ann <ann@example.com>\n",
    "Subject: Bare\n",
    "Date: Wed, 1 Jan 2020 12:00:00 +0000\n",
    "\n",
    "plain foo\n",
);

/// Bytes of the PDF attachment in [`LIST_MBOX`].
pub const REPORT_PDF: &[u8] = b"%PDF-1.4 test\n";

pub fn write_mbox(dir: &Path, contents: &str) -> std::path::PathBuf {
    let path = dir.join("list.mbox");
    fs::write(&path, contents).expect("write mbox fixture");
    path
}

/// Relative path → contents for every file below `root`.
pub fn snapshot(root: &Path) -> BTreeMap<String, Vec<u8>> {
    let mut files = BTreeMap::new();
    let mut pending = vec![root.to_path_buf()];
    while let Some(dir) = pending.pop() {
        for entry in fs::read_dir(&dir).expect("read output dir") {
            let path = entry.expect("dir entry").path();
            if path.is_dir() {
                pending.push(path);
            } else {
                let relative = path
                    .strip_prefix(root)
                    .expect("path below root")
                    .to_string_lossy()
                    .into_owned();
                files.insert(relative, fs::read(&path).expect("read output file"));
            }
        }
    }
    files
}

pub fn read_page(root: &Path, name: &str) -> String {
    fs::read_to_string(root.join(name)).unwrap_or_else(|err| panic!("read {}: {}", name, err))
}
