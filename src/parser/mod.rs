//! PDF access and page extraction.

mod backend;
mod extractor;
mod options;
mod spans;
mod table_detector;

pub use backend::{LopdfBackend, PdfBackend};
pub use extractor::{extract_page, extract_pages};
pub use options::{ErrorMode, ExtractOptions};
pub use spans::{SpanExtractor, TextSpan};
pub use table_detector::{DetectedTable, TableDetector, TableDetectorConfig, TableRowData};
