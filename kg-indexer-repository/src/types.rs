//! Request and response types for search index operations.

use serde::Deserialize;

use crate::errors::SearchIndexError;

/// Metadata describing an existing index.
///
/// Backends fill in what they know; everything but the name is optional.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct IndexMetadata {
    #[serde(default)]
    pub name: String,
    /// Whether the index is started and accepting documents.
    #[serde(default)]
    pub started: Option<bool>,
    /// Number of documents in the index.
    #[serde(default)]
    pub size: Option<u64>,
    /// Creation time, as reported by the backend.
    #[serde(default)]
    pub creation_time: Option<String>,
}

/// Result of a batch operation for a single document.
#[derive(Debug, Clone)]
pub struct BatchOperationResult {
    /// The document identifier.
    pub docid: String,
    /// Whether the operation succeeded.
    pub success: bool,
    /// Error if the operation failed.
    pub error: Option<SearchIndexError>,
}

/// Summary of a batch operation containing aggregate statistics and individual results.
///
/// Allows callers to see which documents of a push were rejected by the backend
/// even when the request as a whole was accepted.
#[derive(Debug, Clone, Default)]
pub struct BatchOperationSummary {
    /// Total number of documents in the batch.
    pub total: usize,
    /// Number of successful operations.
    pub succeeded: usize,
    /// Number of failed operations.
    pub failed: usize,
    /// Individual results for each document.
    pub results: Vec<BatchOperationResult>,
}

impl BatchOperationSummary {
    /// Build a summary from per-document results.
    pub fn from_results(results: Vec<BatchOperationResult>) -> Self {
        let succeeded = results.iter().filter(|r| r.success).count();
        Self {
            total: results.len(),
            succeeded,
            failed: results.len() - succeeded,
            results,
        }
    }

    /// The first per-document failure, if any.
    pub fn first_failure(&self) -> Option<&BatchOperationResult> {
        self.results.iter().find(|r| !r.success)
    }
}
