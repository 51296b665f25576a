//! Index-ready documents.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Document field holding the human-readable title.
pub const TITLE_FIELD: &str = "title";
/// Document field holding the short flag (`"true"` / `"false"`).
pub const SHORT_FIELD: &str = "short";
/// Category holding the queried resource type.
pub const TYPE_CATEGORY: &str = "type";

/// The unit pushed to the search index.
///
/// Upserts are keyed by `docid`, so pushing the same document twice is safe.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Document {
    pub docid: String,
    pub fields: BTreeMap<String, String>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub categories: BTreeMap<String, String>,
}

impl Document {
    /// Create an empty document with the given identifier.
    pub fn new(docid: impl Into<String>) -> Self {
        Self {
            docid: docid.into(),
            fields: BTreeMap::new(),
            categories: BTreeMap::new(),
        }
    }

    /// Set a text field, builder style.
    pub fn with_field(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.fields.insert(name.into(), value.into());
        self
    }

    /// Set a category label, builder style.
    pub fn with_category(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.categories.insert(name.into(), value.into());
        self
    }

    /// Look up a field by name.
    pub fn field(&self, name: &str) -> Option<&str> {
        self.fields.get(name).map(String::as_str)
    }

    /// UTF-8 byte length of the identifier.
    pub fn docid_bytes(&self) -> usize {
        self.docid.len()
    }

    /// Sum of the UTF-8 byte lengths of all field values.
    pub fn fields_bytes(&self) -> usize {
        self.fields.values().map(String::len).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ABSTRACT_FIELD;

    #[test]
    fn test_fields_bytes_counts_utf8() {
        let doc = Document::new("d")
            .with_field(TITLE_FIELD, "ab")
            .with_field(ABSTRACT_FIELD, "é");

        assert_eq!(doc.fields_bytes(), 4);
        assert_eq!(doc.docid_bytes(), 1);
    }

    #[test]
    fn test_serialize_skips_empty_categories() {
        let doc = Document::new("d").with_field(TITLE_FIELD, "T");
        let json = serde_json::to_value(&doc).unwrap();
        assert!(json.get("categories").is_none());

        let doc = doc.with_category(TYPE_CATEGORY, "dbo:Manga");
        let json = serde_json::to_value(&doc).unwrap();
        assert_eq!(json["categories"]["type"], "dbo:Manga");
    }
}
