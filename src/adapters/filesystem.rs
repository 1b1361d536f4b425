//! Filesystem adapter
//!
//! Owns the upload folder (raw PDFs keyed by filename) and the summary
//! folder (markdown exports), and extracts text from stored PDFs.

use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::models::Document;
use crate::utils::http::is_valid_pdf;

/// File store errors
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("invalid filename: {0:?}")]
    InvalidFilename(String),
    #[error("file not found: {0}")]
    NotFound(String),
    #[error("not a PDF file: {0}")]
    NotPdf(String),
    #[error("failed to extract PDF text from {name}: {reason}")]
    Extraction { name: String, reason: String },
    #[error("I/O error on {path:?}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
}

fn io_error(path: &Path) -> impl FnOnce(std::io::Error) -> StorageError + '_ {
    move |source| StorageError::Io {
        path: path.to_path_buf(),
        source,
    }
}

/// Upload and summary folders on local disk
#[derive(Debug, Clone)]
pub struct FileStore {
    upload_dir: PathBuf,
    summary_dir: PathBuf,
}

impl FileStore {
    /// Open the store, creating both folders if needed
    pub fn new(
        upload_dir: impl Into<PathBuf>,
        summary_dir: impl Into<PathBuf>,
    ) -> Result<Self, StorageError> {
        let upload_dir = upload_dir.into();
        let summary_dir = summary_dir.into();

        fs::create_dir_all(&upload_dir).map_err(io_error(&upload_dir))?;
        fs::create_dir_all(&summary_dir).map_err(io_error(&summary_dir))?;

        debug!("File store at {:?} (summaries in {:?})", upload_dir, summary_dir);
        Ok(Self {
            upload_dir,
            summary_dir,
        })
    }

    pub fn upload_dir(&self) -> &Path {
        &self.upload_dir
    }

    pub fn summary_dir(&self) -> &Path {
        &self.summary_dir
    }

    /// Full path of an uploaded file
    ///
    /// Names must be a single path component: no separators, no `..`.
    pub fn path_for(&self, filename: &str) -> Result<PathBuf, StorageError> {
        let trimmed = filename.trim();
        let is_plain = !trimmed.is_empty()
            && trimmed != "."
            && trimmed != ".."
            && !trimmed.contains(['/', '\\'])
            && Path::new(trimmed).file_name().map(|n| n == trimmed).unwrap_or(false);

        if !is_plain {
            return Err(StorageError::InvalidFilename(filename.to_string()));
        }
        Ok(self.upload_dir.join(trimmed))
    }

    pub fn exists(&self, filename: &str) -> bool {
        self.path_for(filename).map(|p| p.is_file()).unwrap_or(false)
    }

    /// Save uploaded bytes, replacing any file of the same name
    pub fn save_upload(&self, filename: &str, bytes: &[u8]) -> Result<PathBuf, StorageError> {
        let path = self.path_for(filename)?;
        fs::write(&path, bytes).map_err(io_error(&path))?;
        info!("Saved upload {} ({} bytes)", filename, bytes.len());
        Ok(path)
    }

    /// Names of all regular files in the upload folder, sorted
    pub fn list_files(&self) -> Result<Vec<String>, StorageError> {
        let entries = fs::read_dir(&self.upload_dir).map_err(io_error(&self.upload_dir))?;

        let mut names = Vec::new();
        for entry in entries {
            let entry = entry.map_err(io_error(&self.upload_dir))?;
            let is_file = entry.file_type().map(|t| t.is_file()).unwrap_or(false);
            if !is_file {
                continue;
            }
            if let Some(name) = entry.file_name().to_str() {
                names.push(name.to_string());
            }
        }

        names.sort();
        Ok(names)
    }

    /// Remove an uploaded file; `Ok(false)` when it was already gone
    pub fn delete_file(&self, filename: &str) -> Result<bool, StorageError> {
        let path = self.path_for(filename)?;
        if !path.exists() {
            return Ok(false);
        }
        fs::remove_file(&path).map_err(io_error(&path))?;
        info!("Deleted upload {}", filename);
        Ok(true)
    }

    /// Extract the text of an uploaded PDF
    ///
    /// Runs of blank lines become one paragraph break; pages are
    /// concatenated in order.
    pub fn extract_text(&self, filename: &str) -> Result<String, StorageError> {
        let path = self.path_for(filename)?;
        if !path.is_file() {
            return Err(StorageError::NotFound(filename.to_string()));
        }

        let bytes = fs::read(&path).map_err(io_error(&path))?;
        if !is_valid_pdf(&bytes) {
            return Err(StorageError::NotPdf(filename.to_string()));
        }

        debug!("Extracting text from: {:?}", path);
        let text = pdf_extract::extract_text_from_mem(&bytes).map_err(|e| StorageError::Extraction {
            name: filename.to_string(),
            reason: e.to_string(),
        })?;

        Ok(clean_text(&text))
    }

    /// Write a markdown summary for `document` to `<summary folder>/<stem>.md`
    pub fn save_summary(&self, document: &Document) -> Result<PathBuf, StorageError> {
        let stem = Path::new(&document.filename)
            .file_stem()
            .and_then(|s| s.to_str())
            .filter(|s| !s.is_empty())
            .ok_or_else(|| StorageError::InvalidFilename(document.filename.clone()))?;

        let path = self.summary_dir.join(format!("{}.md", stem));
        fs::write(&path, format_summary_with_frontmatter(document)).map_err(io_error(&path))?;

        info!("Saved summary to {:?}", path);
        Ok(path)
    }
}

/// Collapse runs of blank lines in extracted text to one paragraph break
fn clean_text(text: &str) -> String {
    let mut lines: Vec<&str> = Vec::new();
    for line in text.lines() {
        let blank = line.trim().is_empty();
        if blank && lines.last().map_or(true, |last| last.is_empty()) {
            continue;
        }
        lines.push(if blank { "" } else { line });
    }
    if lines.last() == Some(&"") {
        lines.pop();
    }
    lines.join("\n")
}

/// Markdown with YAML frontmatter describing the document
fn format_summary_with_frontmatter(document: &Document) -> String {
    let summary = document.summary.as_deref().unwrap_or("").trim();
    if summary.is_empty() {
        warn!("Document {} has no summary yet", document.id);
    }

    format!(
        r#"---
title: "{}"
filename: "{}"
uploaded: "{}"
similarity: {}
dates: [{}]
---

{}
"#,
        document.title,
        document.filename,
        document.upload_date.to_rfc3339(),
        document
            .similarity
            .map(|s| format!("{:.2}", s))
            .unwrap_or_else(|| "null".to_string()),
        document
            .date_list()
            .iter()
            .map(|d| format!("\"{}\"", d))
            .collect::<Vec<_>>()
            .join(", "),
        summary
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn store(dir: &Path) -> FileStore {
        FileStore::new(dir.join("uploads"), dir.join("summaries")).unwrap()
    }

    #[test]
    fn test_new_creates_folders() {
        let dir = tempdir().unwrap();
        let files = store(dir.path());
        assert!(files.upload_dir().is_dir());
        assert!(files.summary_dir().is_dir());
    }

    #[test]
    fn test_rejects_path_traversal() {
        let dir = tempdir().unwrap();
        let files = store(dir.path());
        for bad in ["", "..", "../secret.pdf", "a/b.pdf", "a\\b.pdf", "."] {
            assert!(
                matches!(files.path_for(bad), Err(StorageError::InvalidFilename(_))),
                "accepted {:?}",
                bad
            );
        }
        assert!(files.path_for("report.pdf").is_ok());
    }

    #[test]
    fn test_save_list_delete() {
        let dir = tempdir().unwrap();
        let files = store(dir.path());

        files.save_upload("b.pdf", b"%PDF-1.4").unwrap();
        files.save_upload("a.pdf", b"%PDF-1.4").unwrap();
        fs::create_dir(files.upload_dir().join("subdir")).unwrap();

        assert_eq!(files.list_files().unwrap(), vec!["a.pdf", "b.pdf"]);
        assert!(files.exists("a.pdf"));

        assert!(files.delete_file("a.pdf").unwrap());
        assert!(!files.delete_file("a.pdf").unwrap());
        assert_eq!(files.list_files().unwrap(), vec!["b.pdf"]);
    }

    #[test]
    fn test_extract_missing_and_non_pdf() {
        let dir = tempdir().unwrap();
        let files = store(dir.path());

        assert!(matches!(
            files.extract_text("missing.pdf"),
            Err(StorageError::NotFound(_))
        ));

        files.save_upload("notes.pdf", b"plain text, not a pdf").unwrap();
        assert!(matches!(
            files.extract_text("notes.pdf"),
            Err(StorageError::NotPdf(_))
        ));
    }

    #[test]
    fn test_clean_text() {
        assert_eq!(clean_text("\n one\ntwo\n\n  \nthree\n\n"), " one\ntwo\n\nthree");
    }

    #[test]
    fn test_save_summary() {
        let dir = tempdir().unwrap();
        let files = store(dir.path());

        let mut document = Document::new("report.pdf".to_string(), "body".to_string());
        document.summary = Some("Short summary.".to_string());
        document.dates = Some("01-12-2024, 05-03-2025".to_string());

        let path = files.save_summary(&document).unwrap();
        assert_eq!(path, files.summary_dir().join("report.md"));

        let content = fs::read_to_string(path).unwrap();
        assert!(content.contains("title: \"report.pdf\""));
        assert!(content.contains("dates: [\"01-12-2024\", \"05-03-2025\"]"));
        assert!(content.contains("similarity: null"));
        assert!(content.contains("Short summary."));
    }
}
