//! Table cell data.

use serde::{Deserialize, Serialize};

/// Cell data of one detected table.
///
/// Serialized as a bare array of rows, each row an array of cells, with
/// `null` for cells no text fell into:
///
/// ```json
/// [["Name", "Age"], ["Alice", "30"], ["Bob", null]]
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TableData {
    /// Rows from top to bottom, cells from left to right.
    pub rows: Vec<Vec<Option<String>>>,
}

impl TableData {
    /// Create an empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a table from rows of cells.
    pub fn from_rows(rows: Vec<Vec<Option<String>>>) -> Self {
        Self { rows }
    }

    /// Append a row.
    pub fn add_row(&mut self, row: Vec<Option<String>>) {
        self.rows.push(row);
    }

    /// Get the number of rows.
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Get the number of columns (widest row).
    pub fn column_count(&self) -> usize {
        self.rows.iter().map(Vec::len).max().unwrap_or(0)
    }

    /// Check if the table is empty.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Get a cell's text, if the cell exists and has any.
    pub fn cell(&self, row: usize, column: usize) -> Option<&str> {
        self.rows.get(row)?.get(column)?.as_deref()
    }
}
