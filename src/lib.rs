//! # pdf2jsonl
//!
//! Per-page PDF text extraction into JSON Lines records.
//!
//! Every page of the input becomes one line of output: the page text wrapped
//! in a fixed set of catalog fields plus positional metadata (page number,
//! source file). Tables detected on the page can optionally ride along.
//!
//! ## Quick Start
//!
//! ```no_run
//! fn main() -> pdf2jsonl::Result<()> {
//!     // One record per page, default catalog fields
//!     let summary = pdf2jsonl::convert("sample-tables.pdf", "output.jsonl")?;
//!     println!("Saved {} records", summary.records);
//!     Ok(())
//! }
//! ```
//!
//! ## Pipeline
//!
//! - [`parser`]: opens the PDF behind the [`PdfBackend`] trait and extracts
//!   the text and tables of each page
//! - [`render`]: maps pages to [`OutputRecord`]s and writes them atomically
//! - [`convert`](mod@convert): ties the two together for a single file

pub mod config;
pub mod convert;
pub mod detect;
pub mod error;
pub mod model;
pub mod parser;
pub mod render;

// Re-export commonly used types
pub use config::CatalogMetadata;
pub use convert::{convert_file, convert_with_backend, ConvertOptions, ConvertSummary};
pub use detect::{pdf_version_from_bytes, sniff_pdf_version};
pub use error::{Error, Result};
pub use model::{OutputRecord, PageContent, RecordMetadata, TableData};
pub use parser::{ErrorMode, ExtractOptions, LopdfBackend, PdfBackend};
pub use render::{write_jsonl_file, JsonlWriter, RecordBuilder};

use std::path::Path;

/// Convert a PDF to a JSONL file with default options.
///
/// # Example
///
/// ```no_run
/// let summary = pdf2jsonl::convert("report.pdf", "report.jsonl").unwrap();
/// assert_eq!(summary.records as u32, summary.pages);
/// ```
pub fn convert<P: AsRef<Path>, Q: AsRef<Path>>(input: P, output: Q) -> Result<ConvertSummary> {
    convert_file(input, output, &ConvertOptions::default())
}

/// Extract the content of every page of a PDF file.
///
/// # Example
///
/// ```no_run
/// use pdf2jsonl::extract_file;
///
/// for page in extract_file("document.pdf").unwrap() {
///     println!("{}: {} chars", page.page_number, page.text.len());
/// }
/// ```
pub fn extract_file<P: AsRef<Path>>(path: P) -> Result<Vec<PageContent>> {
    extract_file_with_options(path, &ExtractOptions::default())
}

/// Extract the content of every page of a PDF file with custom options.
pub fn extract_file_with_options<P: AsRef<Path>>(
    path: P,
    options: &ExtractOptions,
) -> Result<Vec<PageContent>> {
    let backend = LopdfBackend::open(path)?;
    parser::extract_pages(&backend, options)
}

/// Extract the content of every page of an in-memory PDF.
pub fn extract_bytes(data: &[u8], options: &ExtractOptions) -> Result<Vec<PageContent>> {
    let backend = LopdfBackend::load_bytes(data)?;
    parser::extract_pages(&backend, options)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_file_not_found() {
        let result = extract_file("/nonexistent/path/to/file.pdf");
        assert!(matches!(result, Err(Error::DocumentOpen { .. })));
    }

    #[test]
    fn test_extract_bytes_rejects_garbage() {
        let result = extract_bytes(b"definitely not a pdf", &ExtractOptions::default());
        assert!(result.is_err());
    }

    #[test]
    fn test_convert_missing_input_creates_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("output.jsonl");

        assert!(convert(dir.path().join("missing.pdf"), &out).is_err());
        assert!(!out.exists());
    }
}
