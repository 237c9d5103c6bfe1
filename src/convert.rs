//! End-to-end conversion: PDF in, JSONL out.
//!
//! # Example
//!
//! ```no_run
//! use pdf2jsonl::convert::{convert_file, ConvertOptions};
//!
//! fn main() -> pdf2jsonl::Result<()> {
//!     let options = ConvertOptions::new().with_tables(true);
//!     let summary = convert_file("report.pdf", "report.jsonl", &options)?;
//!     println!("{} records", summary.records);
//!     Ok(())
//! }
//! ```

use std::path::{Path, PathBuf};

use crate::config::CatalogMetadata;
use crate::error::Result;
use crate::parser::{extract_pages, ErrorMode, ExtractOptions, LopdfBackend, PdfBackend};
use crate::render::{write_jsonl_file, RecordBuilder};

/// Options for a conversion run.
#[derive(Debug, Clone, Default)]
pub struct ConvertOptions {
    /// Whether a failing page aborts the run
    pub error_mode: ErrorMode,

    /// Fields copied into every record
    pub catalog: CatalogMetadata,

    /// Detect tables and emit them in the `tables` field of each record
    pub include_tables: bool,

    /// Value for `metadata.fileUrl`; the absolute input path when unset
    pub file_url: Option<String>,
}

impl ConvertOptions {
    /// Create new conversion options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the catalog metadata.
    pub fn with_catalog(mut self, catalog: CatalogMetadata) -> Self {
        self.catalog = catalog;
        self
    }

    /// Detect tables and include them in the output records.
    ///
    /// Table detection only runs when this is set.
    pub fn with_tables(mut self, include: bool) -> Self {
        self.include_tables = include;
        self
    }

    /// Skip pages that fail to extract.
    pub fn lenient(mut self) -> Self {
        self.error_mode = ErrorMode::Lenient;
        self
    }

    /// Page extraction options for this run.
    pub fn extract_options(&self) -> ExtractOptions {
        ExtractOptions::new()
            .with_error_mode(self.error_mode)
            .with_tables(self.include_tables)
    }

    /// Override the `fileUrl` written to every record.
    pub fn with_file_url(mut self, url: impl Into<String>) -> Self {
        self.file_url = Some(url.into());
        self
    }
}

/// Outcome of a successful conversion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConvertSummary {
    /// Destination file
    pub output: PathBuf,

    /// Pages in the source document
    pub pages: u32,

    /// Lines written
    pub records: usize,
}

/// Convert the PDF at `input` into a JSONL file at `output`.
///
/// The input is opened and fully extracted before the destination is
/// touched, so an unreadable input never creates or alters `output`.
pub fn convert_file<P, Q>(input: P, output: Q, options: &ConvertOptions) -> Result<ConvertSummary>
where
    P: AsRef<Path>,
    Q: AsRef<Path>,
{
    let input = input.as_ref();
    let backend = LopdfBackend::open(input)?;

    let file_url = match &options.file_url {
        Some(url) => url.clone(),
        None => absolute_path(input)?.to_string_lossy().into_owned(),
    };

    convert_with_backend(&backend, &file_url, output, options)
}

/// Run the conversion over an already opened backend.
pub fn convert_with_backend<B, Q>(
    backend: &B,
    file_url: &str,
    output: Q,
    options: &ConvertOptions,
) -> Result<ConvertSummary>
where
    B: PdfBackend + ?Sized,
    Q: AsRef<Path>,
{
    let output = output.as_ref();
    let pages = extract_pages(backend, &options.extract_options())?;

    let records = RecordBuilder::new(&options.catalog, file_url)
        .with_tables(options.include_tables)
        .build_all(&pages);

    let written = write_jsonl_file(output, &records)?;
    log::info!(
        "Converted {} ({} pages) to {} ({} records)",
        file_url,
        backend.page_count(),
        output.display(),
        written
    );

    Ok(ConvertSummary {
        output: output.to_path_buf(),
        pages: backend.page_count(),
        records: written,
    })
}

/// Anchor a relative path at the working directory without resolving links.
fn absolute_path(path: &Path) -> Result<PathBuf> {
    if path.is_absolute() {
        Ok(path.to_path_buf())
    } else {
        Ok(std::env::current_dir()?.join(path))
    }
}
