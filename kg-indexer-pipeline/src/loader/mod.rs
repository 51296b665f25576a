//! Loader module for the indexing pipeline.
//!
//! Pushes each page's documents into the search index.

use std::sync::Arc;
use tracing::{error, info, instrument};

use crate::errors::PipelineError;
use crate::retry::RetryPolicy;
use kg_indexer_repository::{SearchEngineClient, SearchIndexError};
use kg_indexer_shared::Document;

/// Configuration for the batch indexer.
#[derive(Debug, Clone, Default)]
pub struct LoaderConfig {
    /// Retry policy for document pushes.
    pub retry: RetryPolicy,
}

/// Loader that indexes one page of documents at a time.
///
/// Pushes are upserts keyed by docid, so retrying a partially applied push
/// is safe.
pub struct BatchIndexer {
    client: Arc<dyn SearchEngineClient>,
    config: LoaderConfig,
}

impl BatchIndexer {
    /// Create a new batch indexer with the default retry policy.
    pub fn new(client: Arc<dyn SearchEngineClient>) -> Self {
        Self::with_config(client, LoaderConfig::default())
    }

    /// Create a new batch indexer with custom configuration.
    pub fn with_config(client: Arc<dyn SearchEngineClient>, config: LoaderConfig) -> Self {
        Self { client, config }
    }

    /// Ensure the destination index exists.
    ///
    /// Not retried: a failure here aborts the job.
    #[instrument(skip(self))]
    pub async fn ensure_index(&self, index_name: &str) -> Result<(), PipelineError> {
        self.client.ensure_index(index_name).await.map_err(|source| {
            error!(error = %source, "Failed to ensure index");
            PipelineError::IndexSetupError {
                index: index_name.to_string(),
                source,
            }
        })?;

        info!("Index ready");
        Ok(())
    }

    /// Push a batch of documents, retrying once.
    ///
    /// An empty batch succeeds without contacting the index. Errors the
    /// index raised before sending anything (validation, batch size) are
    /// not retried. Returns the number of documents pushed.
    #[instrument(skip(self, documents), fields(doc_count = documents.len()))]
    pub async fn push(
        &self,
        index_name: &str,
        documents: &[Document],
    ) -> Result<usize, SearchIndexError> {
        if documents.is_empty() {
            return Ok(0);
        }

        self.config
            .retry
            .run_if("push documents", SearchIndexError::is_retryable, || {
                self.client.push_documents(index_name, documents)
            })
            .await?;

        Ok(documents.len())
    }
}
