//! Output directory layout and file writes.
//!
//! ```text
//! <outdir>/index.html
//! <outdir>/<stem>.html                 one page per message
//! <outdir>/<stem>.files/<attachment>   created on demand
//! ```
//!
//! Pages and attachment directories end in different suffixes, so one
//! message's directory never lands on another message's page.

use std::fs::{self, File, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use super::RenderError;
use super::html::{attachment_dir_name, page_file_name};

pub const INDEX_FILE: &str = "index.html";

/// Handle on the archive output directory.
#[derive(Debug, Clone)]
pub struct OutputDir {
    root: PathBuf,
}

impl OutputDir {
    /// Use `root` as output directory, creating it when missing.
    pub fn create(root: &Path) -> Result<Self, RenderError> {
        fs::create_dir_all(root).map_err(|source| RenderError::io(root, source))?;
        Ok(OutputDir {
            root: root.to_path_buf(),
        })
    }

    pub fn page_path(&self, message_id: &str) -> PathBuf {
        self.root.join(page_file_name(message_id))
    }

    pub fn attachment_dir(&self, message_id: &str) -> PathBuf {
        self.root.join(attachment_dir_name(message_id))
    }

    /// Delete the page and attachment directory left by an earlier run.
    pub fn clear_message(&self, message_id: &str) -> Result<(), RenderError> {
        let page = self.page_path(message_id);
        remove_if_present(&page, fs::remove_file(&page))?;

        let dir = self.attachment_dir(message_id);
        remove_if_present(&dir, fs::remove_dir_all(&dir))
    }

    /// Open a fresh page for appending. [`clear_message`](Self::clear_message)
    /// must have run first.
    pub fn open_page(&self, message_id: &str) -> Result<PageWriter, RenderError> {
        let path = self.page_path(message_id);
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .map_err(|source| RenderError::io(&path, source))?;
        Ok(PageWriter { path, file })
    }

    /// Write one attachment file, creating the message directory if needed.
    pub fn write_attachment(
        &self,
        message_id: &str,
        file_name: &str,
        data: &[u8],
    ) -> Result<PathBuf, RenderError> {
        let dir = self.attachment_dir(message_id);
        fs::create_dir_all(&dir).map_err(|source| RenderError::io(&dir, source))?;

        let path = dir.join(file_name);
        fs::write(&path, data).map_err(|source| RenderError::io(&path, source))?;
        log::debug!("wrote attachment {} ({} bytes)", path.display(), data.len());
        Ok(path)
    }

    pub fn write_index(&self, html: &str) -> Result<PathBuf, RenderError> {
        let path = self.root.join(INDEX_FILE);
        fs::write(&path, html).map_err(|source| RenderError::io(&path, source))?;
        Ok(path)
    }
}

fn remove_if_present(path: &Path, result: io::Result<()>) -> Result<(), RenderError> {
    match result {
        Ok(()) => Ok(()),
        Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(()),
        Err(source) => Err(RenderError::io(path, source)),
    }
}

/// A page file receiving its chunks in order.
#[derive(Debug)]
pub struct PageWriter {
    path: PathBuf,
    file: File,
}

impl PageWriter {
    pub fn append(&mut self, chunk: &str) -> Result<(), RenderError> {
        self.file
            .write_all(chunk.as_bytes())
            .map_err(|source| RenderError::io(&self.path, source))
    }

    pub fn finish(mut self) -> Result<PathBuf, RenderError> {
        self.file
            .flush()
            .map_err(|source| RenderError::io(&self.path, source))?;
        Ok(self.path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_page_is_appended_in_chunks() {
        let dir = tempfile::tempdir().unwrap();
        let out = OutputDir::create(dir.path()).unwrap();

        let mut page = out.open_page("a@x").unwrap();
        page.append("<p>one</p>").unwrap();
        page.append("<p>two</p>").unwrap();
        let path = page.finish().unwrap();

        assert_eq!(fs::read_to_string(path).unwrap(), "<p>one</p><p>two</p>");
    }

    #[test]
    fn test_clear_message_removes_previous_output() {
        let dir = tempfile::tempdir().unwrap();
        let out = OutputDir::create(&dir.path().join("nested")).unwrap();

        let mut page = out.open_page("a@x").unwrap();
        page.append("stale").unwrap();
        page.finish().unwrap();
        out.write_attachment("a@x", "old.bin", b"old").unwrap();

        out.clear_message("a@x").unwrap();
        assert!(!out.page_path("a@x").exists());
        assert!(!out.attachment_dir("a@x").exists());

        // Nothing to clear is not an error
        out.clear_message("a@x").unwrap();
    }

    #[test]
    fn test_paths_use_escaped_stem() {
        let out = OutputDir {
            root: PathBuf::from("/tmp/out"),
        };
        assert_eq!(out.page_path("a/b@x"), PathBuf::from("/tmp/out/a_2Fb@x.html"));
        assert_eq!(out.page_path("a_b@x"), PathBuf::from("/tmp/out/a_5Fb@x.html"));
        assert_eq!(
            out.attachment_dir("index"),
            PathBuf::from("/tmp/out/_69ndex.files")
        );
    }

    #[test]
    fn test_attachment_dir_never_shadows_a_page() {
        let dir = tempfile::tempdir().unwrap();
        let out = OutputDir::create(dir.path()).unwrap();

        out.write_attachment("foo.html", "report.pdf", b"%PDF").unwrap();
        let mut page = out.open_page("foo").unwrap();
        page.append("<p>foo</p>").unwrap();
        page.finish().unwrap();

        out.clear_message("foo.html").unwrap();
        assert!(out.page_path("foo").is_file());
        assert!(!out.attachment_dir("foo.html").exists());
    }
}
