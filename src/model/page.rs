//! Per-page extraction results.

use serde::{Deserialize, Serialize};

use super::TableData;

/// Text and tables extracted from one page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageContent {
    /// Page text as produced by the backend, unmodified.
    pub text: String,

    /// Tables detected on the page, top to bottom.
    pub tables: Vec<TableData>,

    /// Page number (1-indexed)
    pub page_number: u32,
}

impl PageContent {
    /// Create page content without tables.
    pub fn new(page_number: u32, text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            tables: Vec::new(),
            page_number,
        }
    }

    /// Attach detected tables.
    pub fn with_tables(mut self, tables: Vec<TableData>) -> Self {
        self.tables = tables;
        self
    }

    /// Check if the page has neither text nor tables.
    pub fn is_blank(&self) -> bool {
        self.text.trim().is_empty() && self.tables.is_empty()
    }
}
