//! Error types for pdf2jsonl.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for pdf2jsonl operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error types that can occur while converting a PDF to JSONL.
#[derive(Error, Debug)]
pub enum Error {
    /// The input document could not be opened or parsed.
    #[error("Cannot open document {}: {reason}", .path.display())]
    DocumentOpen { path: PathBuf, reason: String },

    /// Text or table extraction failed on a page.
    #[error("Extraction failed on page {page}: {reason}")]
    Extraction { page: u32, reason: String },

    /// The output file could not be created, written, or moved into place.
    #[error("Cannot write {}: {source}", .path.display())]
    FileWrite {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Page index is out of range.
    #[error("Page index {0} is out of range (document has {1} pages)")]
    PageOutOfRange(u32, u32),

    /// The catalog configuration is unreadable or invalid.
    #[error("Catalog configuration error: {0}")]
    Config(String),

    /// A record could not be serialized.
    #[error("Serialization error: {0}")]
    Serialize(String),

    /// I/O error outside of the output file.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

impl Error {
    /// Build a [`Error::DocumentOpen`] for the given path.
    pub fn document_open(path: impl Into<PathBuf>, reason: impl ToString) -> Self {
        Error::DocumentOpen {
            path: path.into(),
            reason: reason.to_string(),
        }
    }

    /// Build a [`Error::FileWrite`] for the given path.
    pub fn file_write(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Error::FileWrite {
            path: path.into(),
            source,
        }
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::Serialize(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = Error::document_open("missing.pdf", "file not found");
        assert_eq!(
            err.to_string(),
            "Cannot open document missing.pdf: file not found"
        );

        let err = Error::PageOutOfRange(10, 5);
        assert_eq!(
            err.to_string(),
            "Page index 10 is out of range (document has 5 pages)"
        );

        let err = Error::Extraction {
            page: 3,
            reason: "bad stream".to_string(),
        };
        assert_eq!(err.to_string(), "Extraction failed on page 3: bad stream");
    }

    #[test]
    fn test_file_write_keeps_source() {
        let io_err = io::Error::new(io::ErrorKind::PermissionDenied, "denied");
        let err = Error::file_write("/root/out.jsonl", io_err);
        assert!(err.to_string().starts_with("Cannot write /root/out.jsonl"));
        assert!(std::error::Error::source(&err).is_some());
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = io::Error::new(io::ErrorKind::NotFound, "file not found");
        let err: Error = io_err.into();
        assert!(matches!(err, Error::Io(_)));
    }
}
