//! Data types flowing through the pipeline.
//!
//! [`PageContent`] is what the extractor produces for each page,
//! [`OutputRecord`] is what lands on each line of the JSONL file.

mod page;
mod record;
mod table;

pub use page::PageContent;
pub use record::{OutputRecord, RecordMetadata};
pub use table::TableData;
