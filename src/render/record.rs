//! Mapping page content to output records.

use crate::config::CatalogMetadata;
use crate::model::{OutputRecord, PageContent, RecordMetadata};

/// Builds one [`OutputRecord`] per page of a single source document.
///
/// Holds everything that is the same for every record of a run: the
/// catalog fields and the source file URL.
#[derive(Debug, Clone)]
pub struct RecordBuilder<'a> {
    catalog: &'a CatalogMetadata,
    file_url: String,
    include_tables: bool,
}

impl<'a> RecordBuilder<'a> {
    /// Create a builder for records of the document at `file_url`.
    pub fn new(catalog: &'a CatalogMetadata, file_url: impl Into<String>) -> Self {
        Self {
            catalog,
            file_url: file_url.into(),
            include_tables: false,
        }
    }

    /// Copy each page's tables into the record's `tables` field.
    pub fn with_tables(mut self, include: bool) -> Self {
        self.include_tables = include;
        self
    }

    /// Build the record for one page. Text is copied verbatim.
    pub fn build(&self, page: &PageContent) -> OutputRecord {
        let catalog = self.catalog;
        OutputRecord {
            primary_topic: catalog.primary_topic.clone(),
            sub_topic: catalog.sub_topic.clone(),
            keywords: catalog.keywords.clone(),
            description: page.text.clone(),
            raw_content: page.text.clone(),
            enhanced_context: catalog.enhanced_context.clone(),
            presentation_context: catalog.presentation_context.clone(),
            metadata: RecordMetadata {
                chunk_id: page.page_number,
                page_number: page.page_number,
                file_url: self.file_url.clone(),
                group_names: catalog.group_names.clone(),
            },
            tables: self.include_tables.then(|| page.tables.clone()),
        }
    }

    /// Build records for pages in the order given.
    pub fn build_all(&self, pages: &[PageContent]) -> Vec<OutputRecord> {
        pages.iter().map(|page| self.build(page)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::TableData;

    #[test]
    fn test_build_uses_default_catalog() {
        let catalog = CatalogMetadata::default();
        let builder = RecordBuilder::new(&catalog, "/docs/sample-tables.pdf");
        let record = builder.build(&PageContent::new(4, "Quarterly figures"));

        assert_eq!(record.primary_topic, "Data Product Catalog");
        assert_eq!(record.sub_topic, "Data");
        assert_eq!(record.keywords, "Data");
        assert_eq!(record.enhanced_context, "Data Product Catalog");
        assert_eq!(record.presentation_context, "Data Product Catalog");
        assert_eq!(record.description, "Quarterly figures");
        assert_eq!(record.raw_content, record.description);
        assert_eq!(record.metadata.chunk_id, 4);
        assert_eq!(record.metadata.page_number, 4);
        assert_eq!(record.metadata.file_url, "/docs/sample-tables.pdf");
        assert_eq!(record.metadata.group_names, vec!["bank", "data product"]);
        assert!(record.tables.is_none());
    }

    #[test]
    fn test_text_passed_through_unmodified() {
        let catalog = CatalogMetadata::default();
        let builder = RecordBuilder::new(&catalog, "/x.pdf");

        for text in ["", "  padded  \n", "tab\there\u{0007}bell", "줄\r\n바꿈"] {
            let record = builder.build(&PageContent::new(1, text));
            assert_eq!(record.raw_content, text);
            assert_eq!(record.description, text);
        }
    }

    #[test]
    fn test_custom_catalog() {
        let catalog = CatalogMetadata::default()
            .with_primary_topic("Risk")
            .with_group_names(["risk", "quarterly"]);
        let record = RecordBuilder::new(&catalog, "/x.pdf").build(&PageContent::new(1, "t"));

        assert_eq!(record.primary_topic, "Risk");
        assert_eq!(record.metadata.group_names, vec!["risk", "quarterly"]);
    }

    #[test]
    fn test_tables_included_on_request() {
        let catalog = CatalogMetadata::default();
        let table = TableData::from_rows(vec![vec![Some("A".into()), Some("B".into())]]);
        let page = PageContent::new(1, "t").with_tables(vec![table.clone()]);

        let without = RecordBuilder::new(&catalog, "/x.pdf").build(&page);
        assert!(without.tables.is_none());

        let with = RecordBuilder::new(&catalog, "/x.pdf")
            .with_tables(true)
            .build(&page);
        assert_eq!(with.tables, Some(vec![table]));
    }

    #[test]
    fn test_build_all_keeps_order() {
        let catalog = CatalogMetadata::default();
        let pages = vec![PageContent::new(1, "a"), PageContent::new(2, "b")];
        let builder = RecordBuilder::new(&catalog, "/x.pdf");

        let numbers: Vec<u32> = builder
            .build_all(&pages)
            .iter()
            .map(|r| r.metadata.page_number)
            .collect();
        assert_eq!(numbers, vec![1, 2]);
    }
}
