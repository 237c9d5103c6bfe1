//! Turning extracted pages into JSONL records.

mod jsonl;
mod record;

pub use jsonl::{to_jsonl, write_jsonl_file, JsonlWriter};
pub use record::RecordBuilder;
