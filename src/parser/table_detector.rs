//! Table detection from text positions (stream mode).
//!
//! Tables are found without ruling lines: spans are grouped into rows by
//! baseline, column edges are X positions where text starts on many rows, and
//! runs of consecutive rows that line up with those edges become a table.

use std::cmp::Ordering;
use std::collections::{HashMap, HashSet};

use crate::model::TableData;

use super::spans::TextSpan;

/// Width of the buckets left edges are snapped to, in points.
const EDGE_BUCKET: f32 = 5.0;

/// How far a span's left edge may sit from a column edge and still align.
const ALIGN_TOLERANCE: f32 = 5.0;

/// A detected table region with its content.
#[derive(Debug, Clone)]
pub struct DetectedTable {
    /// Baseline of the first row (PDF coords, larger is higher)
    pub top_y: f32,
    /// Baseline of the last row
    pub bottom_y: f32,
    pub left_x: f32,
    pub right_x: f32,
    /// Column left edges, ascending
    pub columns: Vec<f32>,
    pub rows: Vec<TableRowData>,
}

/// A row of text spans in a table.
#[derive(Debug, Clone)]
pub struct TableRowData {
    /// Average baseline of the row
    pub y: f32,
    /// Indices into the span list the row was built from, sorted by X
    pub span_indices: Vec<usize>,
    /// Spans in this row, sorted by X
    pub spans: Vec<TextSpan>,
}

/// Table detector configuration.
#[derive(Debug, Clone)]
pub struct TableDetectorConfig {
    /// Minimum number of rows to consider as table
    pub min_rows: usize,
    /// Minimum number of columns to consider as table
    pub min_columns: usize,
    /// Maximum number of columns (above this, likely word-level splitting)
    pub max_columns: usize,
    /// Y tolerance for grouping spans into rows (fraction of font size)
    pub y_tolerance_factor: f32,
    /// Minimum column alignment ratio (0.0-1.0)
    pub min_alignment_ratio: f32,
    /// Minimum gap between columns (points)
    pub min_column_gap: f32,
}

impl Default for TableDetectorConfig {
    fn default() -> Self {
        Self {
            min_rows: 2,
            min_columns: 2,
            max_columns: 6,
            y_tolerance_factor: 0.4,
            min_alignment_ratio: 0.3,
            min_column_gap: 15.0,
        }
    }
}

/// Detects tables in a list of text spans.
#[derive(Debug, Clone, Default)]
pub struct TableDetector {
    config: TableDetectorConfig,
}

impl TableDetector {
    /// Create a new table detector with default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a new table detector with custom configuration.
    pub fn with_config(config: TableDetectorConfig) -> Self {
        Self { config }
    }

    /// Detect tables and return their cell data, top to bottom.
    pub fn extract_tables(&self, spans: &[TextSpan]) -> Vec<TableData> {
        self.detect(spans)
            .iter()
            .map(|table| self.to_table_data(table))
            .collect()
    }

    /// Detect table regions in the given spans.
    pub fn detect(&self, spans: &[TextSpan]) -> Vec<DetectedTable> {
        let cfg = &self.config;
        if spans.len() < cfg.min_rows * cfg.min_columns {
            log::debug!("TableDetector: only {} spans, skipping", spans.len());
            return vec![];
        }

        let rows = self.group_into_rows(spans);
        let columns = self.detect_columns(&rows);
        log::debug!(
            "TableDetector: {} rows, page-level columns at {:?}",
            rows.len(),
            columns
        );

        if rows.len() < cfg.min_rows || columns.len() < cfg.min_columns {
            return vec![];
        }

        let mut tables = Vec::new();
        for (start, end) in self.find_table_regions(&rows, &columns) {
            let region = &rows[start..=end];

            // Columns are re-derived per region; page-level edges mix tables.
            let table_columns = self.detect_columns(region);
            if table_columns.len() < cfg.min_columns {
                continue;
            }
            if table_columns.len() > cfg.max_columns {
                log::debug!(
                    "TableDetector: skipping rows {}..={}: {} columns",
                    start,
                    end,
                    table_columns.len()
                );
                continue;
            }
            if self.is_list_pattern(region, &table_columns) {
                log::debug!("TableDetector: skipping rows {}..={}: list pattern", start, end);
                continue;
            }

            let region_spans = || region.iter().flat_map(|r| r.spans.iter());
            let left_x = region_spans().map(|s| s.x).fold(f32::INFINITY, f32::min);
            let right_x = region_spans()
                .map(|s| s.x + s.width)
                .fold(f32::NEG_INFINITY, f32::max);

            tables.push(DetectedTable {
                top_y: region[0].y,
                bottom_y: region[region.len() - 1].y,
                left_x,
                right_x,
                columns: table_columns,
                rows: region.to_vec(),
            });
        }

        tables
    }

    /// Group spans into rows by baseline, top row first.
    fn group_into_rows(&self, spans: &[TextSpan]) -> Vec<TableRowData> {
        let mut order: Vec<usize> = (0..spans.len()).collect();
        order.sort_by(|&a, &b| {
            let (a, b) = (&spans[a], &spans[b]);
            b.y.partial_cmp(&a.y)
                .unwrap_or(Ordering::Equal)
                .then(a.x.partial_cmp(&b.x).unwrap_or(Ordering::Equal))
        });

        let mut groups: Vec<Vec<usize>> = Vec::new();
        let mut anchor_y: Option<f32> = None;

        for idx in order {
            let span = &spans[idx];
            let tolerance = span.font_size * self.config.y_tolerance_factor;
            match (anchor_y, groups.last_mut()) {
                (Some(y), Some(group)) if (span.y - y).abs() <= tolerance => group.push(idx),
                _ => {
                    anchor_y = Some(span.y);
                    groups.push(vec![idx]);
                }
            }
        }

        groups
            .into_iter()
            .map(|mut indices| {
                indices.sort_by(|&a, &b| {
                    spans[a].x.partial_cmp(&spans[b].x).unwrap_or(Ordering::Equal)
                });
                let y = indices.iter().map(|&i| spans[i].y).sum::<f32>() / indices.len() as f32;
                TableRowData {
                    y,
                    spans: indices.iter().map(|&i| spans[i].clone()).collect(),
                    span_indices: indices,
                }
            })
            .collect()
    }

    /// Detect column left edges from text that starts at the same X on many rows.
    ///
    /// Rows holding a single span are mostly prose; when enough rows have two
    /// or more spans only those are counted, once per row and edge.
    fn detect_columns(&self, rows: &[TableRowData]) -> Vec<f32> {
        let multi_span_rows: Vec<&TableRowData> =
            rows.iter().filter(|r| r.spans.len() >= 2).collect();

        let mut edge_counts: HashMap<i32, usize> = HashMap::new();
        let sample_size = if multi_span_rows.len() >= self.config.min_rows {
            for row in &multi_span_rows {
                let buckets: HashSet<i32> = row.spans.iter().map(|s| edge_bucket(s.x)).collect();
                for bucket in buckets {
                    *edge_counts.entry(bucket).or_insert(0) += 1;
                }
            }
            multi_span_rows.len()
        } else {
            for span in rows.iter().flat_map(|r| r.spans.iter()) {
                *edge_counts.entry(edge_bucket(span.x)).or_insert(0) += 1;
            }
            rows.len()
        };

        let min_occurrences =
            ((sample_size as f32 * self.config.min_alignment_ratio) as usize).max(2);

        let mut edges: Vec<f32> = edge_counts
            .into_iter()
            .filter(|&(_, count)| count >= min_occurrences)
            .map(|(bucket, _)| bucket as f32 * EDGE_BUCKET)
            .collect();
        edges.sort_by(|a, b| a.partial_cmp(b).unwrap_or(Ordering::Equal));

        let mut merged: Vec<f32> = Vec::with_capacity(edges.len());
        for edge in edges {
            match merged.last() {
                Some(&last) if edge - last < self.config.min_column_gap => {}
                _ => merged.push(edge),
            }
        }
        merged
    }

    /// Find runs of consecutive aligned rows, as inclusive index ranges.
    fn find_table_regions(&self, rows: &[TableRowData], columns: &[f32]) -> Vec<(usize, usize)> {
        let mut regions = Vec::new();
        let mut start: Option<usize> = None;

        for (i, row) in rows.iter().enumerate() {
            let aligned = self.alignment_score(row, columns) >= self.config.min_alignment_ratio;
            match (aligned, start) {
                (true, None) => start = Some(i),
                (false, Some(s)) => {
                    if i - s >= self.config.min_rows {
                        regions.push((s, i - 1));
                    }
                    start = None;
                }
                _ => {}
            }
        }

        if let Some(s) = start {
            if rows.len() - s >= self.config.min_rows {
                regions.push((s, rows.len() - 1));
            }
        }

        regions
    }

    /// Fraction of a row's spans whose left edge sits on a column edge.
    fn alignment_score(&self, row: &TableRowData, columns: &[f32]) -> f32 {
        if row.spans.is_empty() || columns.is_empty() {
            return 0.0;
        }

        let aligned = row
            .spans
            .iter()
            .filter(|span| columns.iter().any(|col| (span.x - col).abs() <= ALIGN_TOLERANCE))
            .count();

        aligned as f32 / row.spans.len() as f32
    }

    /// Convert a detected region into a cell grid.
    ///
    /// Each span lands in exactly one column; spans sharing a cell are joined
    /// with a space, and cells without spans are `None`.
    pub fn to_table_data(&self, detected: &DetectedTable) -> TableData {
        let columns = &detected.columns;
        let mut table = TableData::new();

        for row in &detected.rows {
            let mut cells: Vec<Vec<&str>> = vec![Vec::new(); columns.len()];
            for span in &row.spans {
                let col = find_column_for_span(span.x, columns, detected.right_x);
                cells[col].push(span.text.trim());
            }

            table.add_row(
                cells
                    .into_iter()
                    .map(|parts| (!parts.is_empty()).then(|| parts.join(" ")))
                    .collect(),
            );
        }

        table
    }

    /// A numbered or bulleted list splits marker and text into two aligned
    /// columns and would otherwise pass as a table.
    fn is_list_pattern(&self, rows: &[TableRowData], columns: &[f32]) -> bool {
        if columns.len() < 2 || rows.is_empty() {
            return false;
        }

        let (mut bullets, mut numbers) = (0usize, 0usize);
        for row in rows {
            // Spans are sorted by X, so the first is the leftmost.
            if let Some(first) = row.spans.first() {
                let text = first.text.trim();
                if is_bullet_marker(text) {
                    bullets += 1;
                } else if is_number_marker(text) {
                    numbers += 1;
                }
            }
        }

        let bullet_ratio = bullets as f32 / rows.len() as f32;
        let marker_ratio = (bullets + numbers) as f32 / rows.len() as f32;

        // Numbered first columns are common in real tables, so numbers only
        // count against two-column regions.
        bullet_ratio >= 0.5 || (columns.len() == 2 && marker_ratio >= 0.5)
    }
}

fn edge_bucket(x: f32) -> i32 {
    (x / EDGE_BUCKET).round() as i32
}

/// Column index for a span starting at `span_x`.
fn find_column_for_span(span_x: f32, columns: &[f32], right_x: f32) -> usize {
    // Spans may start slightly left of their column edge.
    const SLACK: f32 = 10.0;

    for (i, &col_start) in columns.iter().enumerate() {
        let col_end = columns.get(i + 1).copied().unwrap_or(right_x + 100.0);
        if span_x >= col_start - SLACK && span_x < col_end - SLACK {
            return i;
        }
    }

    columns
        .iter()
        .enumerate()
        .min_by(|(_, a), (_, b)| {
            (span_x - **a)
                .abs()
                .partial_cmp(&(span_x - **b).abs())
                .unwrap_or(Ordering::Equal)
        })
        .map(|(i, _)| i)
        .unwrap_or(0)
}

fn is_bullet_marker(text: &str) -> bool {
    matches!(
        text.trim(),
        "-" | "–" | "—" | "•" | "·" | "*" | "○" | "▪" | "◦" | "▸" | "▹" | "►" | "■" | "●" | "※"
            | "□" | "◆" | "◇" | "▶" | "▷" | "☞" | "➤" | "➜"
    )
}

/// "1.", "12)", "3", "a.", "B)" and the like.
fn is_number_marker(text: &str) -> bool {
    let cleaned: String = text.chars().filter(|c| !c.is_whitespace()).collect();
    if cleaned.is_empty() {
        return false;
    }

    let digits = cleaned.chars().take_while(char::is_ascii_digit).count();
    let rest = &cleaned[digits..];
    if digits > 0 && (rest.is_empty() || rest == "." || rest == ")") {
        return true;
    }

    let mut chars = cleaned.chars();
    matches!(
        (chars.next(), chars.next(), chars.next()),
        (Some(letter), Some('.' | ')'), None) if letter.is_alphabetic()
    )
}
