//! Record sanitizer implementation.
//!
//! Builds index documents from enriched resources and enforces the byte
//! ceilings on identifiers and fields.

use tracing::{debug, instrument};

use crate::errors::PipelineError;
use kg_indexer_shared::{
    Document, DropReason, EnrichedResource, RecordOutcome, ResourceCategory, ABSTRACT_FIELD,
    MAX_DOCID_BYTES, MAX_FIELDS_BYTES, SHORT_FIELD, TITLE_FIELD, TYPE_CATEGORY,
};
use kg_indexer_source::dbpedia::RESOURCE_PREFIX;

/// Configuration for the record sanitizer.
#[derive(Debug, Clone)]
pub struct SanitizerConfig {
    /// Documents with a longer identifier are dropped.
    pub max_docid_bytes: usize,
    /// Upper bound on the summed byte length of all fields.
    pub max_fields_bytes: usize,
    /// Appended to an abstract that had to be cut.
    pub truncation_marker: String,
    /// Stripped from the identifier to derive the title.
    pub resource_prefix: String,
}

impl Default for SanitizerConfig {
    fn default() -> Self {
        Self {
            max_docid_bytes: MAX_DOCID_BYTES,
            max_fields_bytes: MAX_FIELDS_BYTES,
            truncation_marker: "...".to_string(),
            resource_prefix: RESOURCE_PREFIX.to_string(),
        }
    }
}

impl SanitizerConfig {
    /// Check that any accepted identifier still leaves room for an abstract.
    pub fn validate(&self) -> Result<(), PipelineError> {
        // title <= docid bytes, short <= "false", plus the marker
        let worst_case = self.max_docid_bytes + "false".len() + self.truncation_marker.len();
        if worst_case > self.max_fields_bytes {
            return Err(PipelineError::config(format!(
                "max_fields_bytes ({}) must be at least {} for a max_docid_bytes of {}",
                self.max_fields_bytes, worst_case, self.max_docid_bytes
            )));
        }
        Ok(())
    }
}

/// Sanitizes enriched resources into index documents.
///
/// The produced document carries `title`, `abstract` and `short` fields and
/// a `type` category. Its docid is at most `max_docid_bytes` and its fields
/// sum to at most `max_fields_bytes`.
#[derive(Debug, Clone, Default)]
pub struct RecordSanitizer {
    config: SanitizerConfig,
}

impl RecordSanitizer {
    pub fn new(config: SanitizerConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &SanitizerConfig {
        &self.config
    }

    /// Sanitize one record.
    pub fn sanitize(
        &self,
        record: EnrichedResource,
        category: &ResourceCategory,
    ) -> RecordOutcome<Document> {
        let EnrichedResource { resource, short } = record;

        let docid_bytes = resource.docid.len();
        if docid_bytes > self.config.max_docid_bytes {
            return RecordOutcome::dropped(
                resource.docid,
                DropReason::DocidTooLong {
                    bytes: docid_bytes,
                    max: self.config.max_docid_bytes,
                },
            );
        }

        let title = self.title_for(&resource.docid);
        let abstract_text = resource.abstract_text().unwrap_or_default();

        let document = Document::new(resource.docid.as_str())
            .with_field(TITLE_FIELD, title)
            .with_field(SHORT_FIELD, short.to_string())
            .with_category(TYPE_CATEGORY, category.as_str());

        let used = document.fields_bytes();
        let abstract_text = if used + abstract_text.len() <= self.config.max_fields_bytes {
            abstract_text.to_string()
        } else {
            let budget = self
                .config
                .max_fields_bytes
                .saturating_sub(used + self.config.truncation_marker.len());
            debug!(
                docid = %resource.docid,
                original_bytes = abstract_text.len(),
                budget = budget,
                "Truncating abstract"
            );
            format!(
                "{}{}",
                truncate_to_bytes(abstract_text, budget),
                self.config.truncation_marker
            )
        };

        RecordOutcome::Kept(document.with_field(ABSTRACT_FIELD, abstract_text))
    }

    /// Sanitize every record of a page, preserving order.
    #[instrument(skip(self, records), fields(record_count = records.len(), category = %category))]
    pub fn sanitize_page(
        &self,
        records: Vec<EnrichedResource>,
        category: &ResourceCategory,
    ) -> Vec<RecordOutcome<Document>> {
        records
            .into_iter()
            .map(|record| self.sanitize(record, category))
            .collect()
    }

    /// Human-readable title: the identifier without its prefix, underscores as spaces.
    fn title_for(&self, docid: &str) -> String {
        docid
            .strip_prefix(&self.config.resource_prefix)
            .unwrap_or(docid)
            .replace('_', " ")
    }
}

/// Longest prefix of `text` that fits in `max_bytes` and ends on a char boundary.
fn truncate_to_bytes(text: &str, max_bytes: usize) -> &str {
    if text.len() <= max_bytes {
        return text;
    }
    let mut end = max_bytes;
    while !text.is_char_boundary(end) {
        end -= 1;
    }
    &text[..end]
}
