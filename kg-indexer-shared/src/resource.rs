//! Resources harvested from the knowledge graph.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Name of the descriptive field carried by resources.
pub const ABSTRACT_FIELD: &str = "abstract";

/// The type of resource queried from the knowledge graph.
///
/// Holds the prefixed type name (e.g. `dbo:Manga`) exactly as it appears in
/// queries. The same value is stamped on every document as its type category.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ResourceCategory(String);

impl ResourceCategory {
    /// Create a category from a prefixed type name.
    pub fn new(prefixed_type: impl Into<String>) -> Self {
        Self(prefixed_type.into())
    }

    /// The `dbo:Manga` category.
    pub fn manga() -> Self {
        Self::new("dbo:Manga")
    }

    /// The `dbo:Anime` category.
    pub fn anime() -> Self {
        Self::new("dbo:Anime")
    }

    /// The prefixed type name.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ResourceCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A raw record fetched from the knowledge graph.
///
/// `docid` is the stable external identifier of the resource (its URI).
/// Every other attribute is an optional string field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Resource {
    /// Stable external identifier.
    pub docid: String,
    /// Additional string attributes, keyed by field name.
    #[serde(flatten)]
    pub fields: BTreeMap<String, String>,
}

impl Resource {
    /// Create a resource with no fields.
    pub fn new(docid: impl Into<String>) -> Self {
        Self {
            docid: docid.into(),
            fields: BTreeMap::new(),
        }
    }

    /// Set a field, builder style.
    pub fn with_field(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.fields.insert(name.into(), value.into());
        self
    }

    /// Set the abstract, builder style.
    pub fn with_abstract(self, text: impl Into<String>) -> Self {
        self.with_field(ABSTRACT_FIELD, text)
    }

    /// Look up a field by name.
    pub fn field(&self, name: &str) -> Option<&str> {
        self.fields.get(name).map(String::as_str)
    }

    /// The descriptive text of the resource, if any.
    pub fn abstract_text(&self) -> Option<&str> {
        self.field(ABSTRACT_FIELD)
    }

    /// Replace the descriptive text in place.
    pub fn set_abstract(&mut self, text: impl Into<String>) {
        self.fields.insert(ABSTRACT_FIELD.to_string(), text.into());
    }
}

/// A resource whose abstract has been checked (and possibly backfilled).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnrichedResource {
    pub resource: Resource,
    /// True when the abstract was backfilled or is still below the minimum length.
    pub short: bool,
}

impl EnrichedResource {
    pub fn new(resource: Resource, short: bool) -> Self {
        Self { resource, short }
    }
}
