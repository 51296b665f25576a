//! Search index provider trait definition.
//!
//! This module defines the abstract interface for search index backends
//! (Indexden, OpenSearch, ...).

use async_trait::async_trait;

use crate::errors::SearchIndexError;
use crate::types::{BatchOperationSummary, IndexMetadata};
use kg_indexer_shared::Document;

/// Abstracts the underlying search index implementation.
///
/// Implementations are injected into `SearchIndexClient` to enable dependency
/// injection and easy testing with mock implementations.
#[async_trait]
pub trait SearchIndexProvider: Send + Sync {
    /// Fetch metadata for the named index.
    ///
    /// # Returns
    ///
    /// * `Ok(Some(IndexMetadata))` - If the index exists
    /// * `Ok(None)` - If the index does not exist
    /// * `Err(SearchIndexError)` - If the lookup itself failed
    async fn index_metadata(&self, index_name: &str)
        -> Result<Option<IndexMetadata>, SearchIndexError>;

    /// Create the named index.
    ///
    /// Creating an index that already exists is not an error.
    async fn create_index(&self, index_name: &str) -> Result<(), SearchIndexError>;

    /// Upsert documents in bulk and return a per-document summary.
    ///
    /// # Returns
    ///
    /// * `Ok(BatchOperationSummary)` - Contains aggregate statistics and individual results
    /// * `Err(SearchIndexError)` - If the bulk operation fails entirely
    async fn upsert_documents(
        &self,
        index_name: &str,
        documents: &[Document],
    ) -> Result<BatchOperationSummary, SearchIndexError>;
}
