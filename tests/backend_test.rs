//! Pipeline tests over an in-memory backend.

use std::cell::Cell;

use pdf2jsonl::error::Result;
use pdf2jsonl::{
    convert_with_backend, ConvertOptions, Error, OutputRecord, PdfBackend, TableData,
};

/// Mock backend: fixed page texts, optional failing pages.
struct MockBackend {
    pages: Vec<String>,
    failing: Vec<u32>,
    table_calls: Cell<u32>,
}

impl MockBackend {
    fn new(pages: &[&str]) -> Self {
        Self {
            pages: pages.iter().map(|p| p.to_string()).collect(),
            failing: Vec::new(),
            table_calls: Cell::new(0),
        }
    }

    fn failing_on(mut self, index: u32) -> Self {
        self.failing.push(index);
        self
    }
}

impl PdfBackend for MockBackend {
    fn page_count(&self) -> u32 {
        self.pages.len() as u32
    }

    fn page_text(&self, index: u32) -> Result<String> {
        if self.failing.contains(&index) {
            return Err(Error::Extraction {
                page: index + 1,
                reason: "corrupt content stream".to_string(),
            });
        }
        Ok(self.pages[index as usize].clone())
    }

    fn page_tables(&self, _index: u32) -> Result<Vec<TableData>> {
        self.table_calls.set(self.table_calls.get() + 1);
        Ok(Vec::new())
    }
}

fn records(path: &std::path::Path) -> Vec<OutputRecord> {
    std::fs::read_to_string(path)
        .unwrap()
        .lines()
        .map(|line| serde_json::from_str(line).unwrap())
        .collect()
}

#[test]
fn test_text_passes_through_unmodified() {
    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("out.jsonl");
    let texts = ["line one\nline two", "\u{0}\u{7}\ttabbed", "naïve café ✓", ""];
    let backend = MockBackend::new(&texts);

    convert_with_backend(&backend, "/data/doc.pdf", &out, &ConvertOptions::new()).unwrap();

    let content = std::fs::read_to_string(&out).unwrap();
    assert_eq!(content.lines().count(), texts.len());

    let parsed = records(&out);
    for (record, text) in parsed.iter().zip(texts) {
        assert_eq!(record.raw_content, text);
        assert_eq!(record.description, text);
        assert_eq!(record.metadata.file_url, "/data/doc.pdf");
    }
}

#[test]
fn test_strict_mode_aborts_without_output() {
    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("out.jsonl");
    std::fs::write(&out, "old\n").unwrap();
    let backend = MockBackend::new(&["a", "b", "c"]).failing_on(1);

    let err = convert_with_backend(&backend, "doc.pdf", &out, &ConvertOptions::new()).unwrap_err();
    assert!(matches!(err, Error::Extraction { page: 2, .. }));
    assert_eq!(std::fs::read_to_string(&out).unwrap(), "old\n");
}

#[test]
fn test_lenient_mode_skips_failing_page() {
    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("out.jsonl");
    let backend = MockBackend::new(&["a", "b", "c"]).failing_on(1);

    let summary =
        convert_with_backend(&backend, "doc.pdf", &out, &ConvertOptions::new().lenient()).unwrap();
    assert_eq!(summary.pages, 3);
    assert_eq!(summary.records, 2);

    let parsed = records(&out);
    let pages: Vec<u32> = parsed.iter().map(|r| r.metadata.page_number).collect();
    assert_eq!(pages, vec![1, 3]);
    assert_eq!(parsed[1].raw_content, "c");
    assert!(parsed.iter().all(|r| r.metadata.chunk_id == r.metadata.page_number));
}

#[test]
fn test_many_pages_keep_order() {
    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("out.jsonl");
    let texts: Vec<String> = (1..=250).map(|i| format!("page {i}")).collect();
    let refs: Vec<&str> = texts.iter().map(String::as_str).collect();

    convert_with_backend(
        &MockBackend::new(&refs),
        "doc.pdf",
        &out,
        &ConvertOptions::new(),
    )
    .unwrap();

    for (i, record) in records(&out).iter().enumerate() {
        assert_eq!(record.metadata.page_number as usize, i + 1);
        assert_eq!(record.raw_content, format!("page {}", i + 1));
    }
}

#[test]
fn test_tables_key_absent_by_default() {
    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("out.jsonl");

    convert_with_backend(
        &MockBackend::new(&["x"]),
        "doc.pdf",
        &out,
        &ConvertOptions::new(),
    )
    .unwrap();

    let line = std::fs::read_to_string(&out).unwrap();
    assert!(!line.contains("tables"));
    assert!(records(&out)[0].tables.is_none());
}

#[test]
fn test_default_run_skips_table_detection() {
    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("out.jsonl");
    let backend = MockBackend::new(&["a", "b", "c"]);

    convert_with_backend(&backend, "doc.pdf", &out, &ConvertOptions::new()).unwrap();
    assert_eq!(backend.table_calls.get(), 0);

    let options = ConvertOptions::new().with_tables(true);
    convert_with_backend(&backend, "doc.pdf", &out, &options).unwrap();
    assert_eq!(backend.table_calls.get(), 3);
}
