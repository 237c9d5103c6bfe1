//! Catalog metadata configuration.
//!
//! Every record carries the same descriptive fields (topic, keywords, context
//! strings, group tags). They default to the values the pipeline has always
//! written and can be overridden from a TOML file:
//!
//! ```toml
//! primary_topic = "Data Product Catalog"
//! sub_topic = "Data"
//! keywords = "Data"
//! enhanced_context = "Data Product Catalog"
//! presentation_context = "Data Product Catalog"
//! group_names = ["bank", "data product"]
//! ```
//!
//! Missing keys fall back to their defaults individually.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Descriptive fields copied into every output record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CatalogMetadata {
    pub primary_topic: String,
    pub sub_topic: String,
    pub keywords: String,
    pub enhanced_context: String,
    pub presentation_context: String,
    pub group_names: Vec<String>,
}

impl Default for CatalogMetadata {
    fn default() -> Self {
        Self {
            primary_topic: "Data Product Catalog".to_string(),
            sub_topic: "Data".to_string(),
            keywords: "Data".to_string(),
            enhanced_context: "Data Product Catalog".to_string(),
            presentation_context: "Data Product Catalog".to_string(),
            group_names: vec!["bank".to_string(), "data product".to_string()],
        }
    }
}

impl CatalogMetadata {
    /// Parse catalog metadata from TOML text.
    pub fn from_toml_str(content: &str) -> Result<Self> {
        toml::from_str(content).map_err(|e| Error::Config(e.to_string()))
    }

    /// Load catalog metadata from a TOML file.
    pub fn from_toml_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .map_err(|e| Error::Config(format!("{}: {}", path.display(), e)))?;
        Self::from_toml_str(&content)
    }

    /// Serialize to TOML, e.g. to seed a config file.
    pub fn to_toml_string(&self) -> Result<String> {
        toml::to_string_pretty(self).map_err(|e| Error::Config(e.to_string()))
    }

    pub fn with_primary_topic(mut self, topic: impl Into<String>) -> Self {
        self.primary_topic = topic.into();
        self
    }

    pub fn with_sub_topic(mut self, topic: impl Into<String>) -> Self {
        self.sub_topic = topic.into();
        self
    }

    pub fn with_keywords(mut self, keywords: impl Into<String>) -> Self {
        self.keywords = keywords.into();
        self
    }

    pub fn with_group_names<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.group_names = names.into_iter().map(Into::into).collect();
        self
    }
}
