//! The serialized JSONL record.

use serde::{Deserialize, Serialize};

use super::TableData;

/// One output line: a page's text wrapped in catalog metadata.
///
/// Field order is the key order of the serialized object.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutputRecord {
    #[serde(rename = "Primary Topic")]
    pub primary_topic: String,

    #[serde(rename = "Sub-Topic")]
    pub sub_topic: String,

    #[serde(rename = "Keywords")]
    pub keywords: String,

    #[serde(rename = "Description")]
    pub description: String,

    #[serde(rename = "rawContent")]
    pub raw_content: String,

    #[serde(rename = "enhancedContext")]
    pub enhanced_context: String,

    #[serde(rename = "presentationContext")]
    pub presentation_context: String,

    pub metadata: RecordMetadata,

    /// Only emitted when table output is enabled.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tables: Option<Vec<TableData>>,
}

/// Positional metadata of a record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecordMetadata {
    /// Always equal to `page_number`.
    pub chunk_id: u32,

    /// Page number (1-indexed)
    pub page_number: u32,

    pub file_url: String,

    pub group_names: Vec<String>,
}
