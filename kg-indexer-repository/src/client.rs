//! Search index client implementation.
//!
//! Wraps a `SearchIndexProvider` with get-or-create index semantics and
//! batch validation. The indexing pipeline talks to this through
//! `SearchEngineClient`.

use async_trait::async_trait;
use tracing::{debug, info, instrument, warn};

use crate::config::SearchIndexConfig;
use crate::errors::SearchIndexError;
use crate::interfaces::{SearchEngineClient, SearchIndexProvider};
use kg_indexer_shared::Document;

/// The main client for interacting with the search index.
pub struct SearchIndexClient {
    provider: Box<dyn SearchIndexProvider>,
    config: SearchIndexConfig,
}

impl SearchIndexClient {
    /// Create a new SearchIndexClient with default configuration.
    pub fn new(provider: Box<dyn SearchIndexProvider>) -> Self {
        Self {
            provider,
            config: SearchIndexConfig::default(),
        }
    }

    /// Create a new SearchIndexClient with custom configuration.
    pub fn with_config(provider: Box<dyn SearchIndexProvider>, config: SearchIndexConfig) -> Self {
        Self { provider, config }
    }

    /// Check if batch size exceeds the configured limit.
    fn validate_batch_size(&self, size: usize) -> Result<(), SearchIndexError> {
        if let Some(max) = self.config.max_batch_size {
            if size > max {
                return Err(SearchIndexError::batch_size_exceeded(size, max));
            }
        }
        Ok(())
    }

    fn validate_index_name(index_name: &str) -> Result<(), SearchIndexError> {
        if index_name.trim().is_empty() {
            return Err(SearchIndexError::validation("index name is required"));
        }
        Ok(())
    }
}

#[async_trait]
impl SearchEngineClient for SearchIndexClient {
    #[instrument(skip(self))]
    async fn ensure_index(&self, index_name: &str) -> Result<(), SearchIndexError> {
        Self::validate_index_name(index_name)?;

        match self.provider.index_metadata(index_name).await? {
            Some(metadata) => {
                debug!(size = ?metadata.size, "Index already exists");
                Ok(())
            }
            None => {
                info!("Index not found, creating it");
                self.provider.create_index(index_name).await
            }
        }
    }

    #[instrument(skip(self, documents), fields(count = documents.len()))]
    async fn push_documents(
        &self,
        index_name: &str,
        documents: &[Document],
    ) -> Result<(), SearchIndexError> {
        if documents.is_empty() {
            return Ok(());
        }

        Self::validate_index_name(index_name)?;
        self.validate_batch_size(documents.len())?;

        if documents.iter().any(|doc| doc.docid.is_empty()) {
            return Err(SearchIndexError::validation(
                "All documents must have a docid",
            ));
        }

        let summary = self.provider.upsert_documents(index_name, documents).await?;

        if let Some(failure) = summary.first_failure() {
            let reason = failure
                .error
                .as_ref()
                .map(ToString::to_string)
                .unwrap_or_else(|| "unknown".to_string());
            warn!(
                failed = summary.failed,
                total = summary.total,
                docid = %failure.docid,
                "Index rejected documents"
            );
            return Err(SearchIndexError::bulk_operation(format!(
                "{} of {} documents rejected (first: {}: {})",
                summary.failed, summary.total, failure.docid, reason
            )));
        }

        debug!(succeeded = summary.succeeded, "Documents upserted");
        Ok(())
    }
}
