//! Search engine client trait definition.
//!
//! This module defines the interface the indexing pipeline uses to talk to
//! the search index, allowing mock implementations in tests.

use async_trait::async_trait;

use crate::errors::SearchIndexError;
use kg_indexer_shared::Document;

/// Abstract interface for the two operations the indexing pipeline needs.
///
/// # Thread Safety
///
/// All implementations must be `Send + Sync` to allow use across async tasks.
#[async_trait]
pub trait SearchEngineClient: Send + Sync {
    /// Ensure the named index exists, creating it if needed.
    ///
    /// Must be idempotent: an index that already exists is success.
    ///
    /// # Returns
    ///
    /// * `Ok(())` - If the index exists or was created successfully
    /// * `Err(SearchIndexError)` - If the index could not be checked or created
    async fn ensure_index(&self, index_name: &str) -> Result<(), SearchIndexError>;

    /// Upsert a batch of documents into the named index.
    ///
    /// Documents are keyed by `docid`; pushing a document again replaces it.
    ///
    /// # Returns
    ///
    /// * `Ok(())` - If every document was accepted
    /// * `Err(SearchIndexError)` - If the push failed or any document was rejected
    async fn push_documents(
        &self,
        index_name: &str,
        documents: &[Document],
    ) -> Result<(), SearchIndexError>;
}
