//! PDF backend abstraction layer.
//!
//! The extractor only needs three capabilities from a PDF library: how many
//! pages there are, the text of a page, and the tables on a page. Keeping
//! them behind [`PdfBackend`] means the record builder and writer never see
//! a concrete PDF library type.

use std::path::{Path, PathBuf};

use lopdf::{Document as LopdfDocument, ObjectId};

use crate::detect::sniff_pdf_version;
use crate::error::{Error, Result};
use crate::model::TableData;

use super::spans::SpanExtractor;
use super::table_detector::TableDetector;

/// Abstract interface for PDF document access.
///
/// Page indices are zero-based. Results for one page must not depend on
/// which other pages were read before it.
pub trait PdfBackend {
    /// Number of pages in the document.
    fn page_count(&self) -> u32;

    /// Plain text of a page, in the library's default extraction layout.
    fn page_text(&self, index: u32) -> Result<String>;

    /// Tables detected on a page, as cell data.
    fn page_tables(&self, index: u32) -> Result<Vec<TableData>>;
}

impl<B: PdfBackend + ?Sized> PdfBackend for &B {
    fn page_count(&self) -> u32 {
        (**self).page_count()
    }

    fn page_text(&self, index: u32) -> Result<String> {
        (**self).page_text(index)
    }

    fn page_tables(&self, index: u32) -> Result<Vec<TableData>> {
        (**self).page_tables(index)
    }
}

/// Concrete [`PdfBackend`] backed by `lopdf::Document`.
pub struct LopdfBackend {
    doc: LopdfDocument,
    /// Page object ids in document order.
    pages: Vec<ObjectId>,
    detector: TableDetector,
}

impl LopdfBackend {
    /// Load from a file path.
    ///
    /// Fails with [`Error::DocumentOpen`] if the file is missing, does not
    /// start with a PDF header, or cannot be parsed.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let version = sniff_pdf_version(path)?;
        log::debug!("Opening {} (PDF {})", path.display(), version);

        let doc = LopdfDocument::load(path).map_err(|e| Error::document_open(path, e))?;
        Ok(Self::from_document(doc, path))
    }

    /// Load from an in-memory byte slice.
    pub fn load_bytes(data: &[u8]) -> Result<Self> {
        let label = PathBuf::from("<memory>");
        let doc = LopdfDocument::load_mem(data).map_err(|e| Error::document_open(&label, e))?;
        Ok(Self::from_document(doc, &label))
    }

    fn from_document(doc: LopdfDocument, path: &Path) -> Self {
        if doc.is_encrypted() {
            log::warn!(
                "{} is encrypted; text may be missing or garbled",
                path.display()
            );
        }

        let pages = doc.get_pages().into_values().collect();
        Self {
            doc,
            pages,
            detector: TableDetector::new(),
        }
    }

    /// Get PDF version string.
    pub fn version(&self) -> String {
        self.doc.version.to_string()
    }

    fn page_id(&self, index: u32) -> Result<ObjectId> {
        self.pages
            .get(index as usize)
            .copied()
            .ok_or(Error::PageOutOfRange(index, self.page_count()))
    }
}

impl PdfBackend for LopdfBackend {
    fn page_count(&self) -> u32 {
        self.pages.len() as u32
    }

    fn page_text(&self, index: u32) -> Result<String> {
        self.page_id(index)?;
        let page_number = index + 1;
        self.doc
            .extract_text(&[page_number])
            .map_err(|e| Error::Extraction {
                page: page_number,
                reason: e.to_string(),
            })
    }

    fn page_tables(&self, index: u32) -> Result<Vec<TableData>> {
        let page_id = self.page_id(index)?;
        let spans = SpanExtractor::new(&self.doc).extract_page_spans(index + 1, page_id)?;
        let tables = self.detector.extract_tables(&spans);
        log::debug!(
            "Page {}: {} spans, {} tables",
            index + 1,
            spans.len(),
            tables.len()
        );
        Ok(tables)
    }
}
