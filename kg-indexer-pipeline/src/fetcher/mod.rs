//! Fetcher module for the indexing pipeline.
//!
//! Retrieves pages of resources from the upstream source, retrying once.

use std::sync::Arc;
use tracing::{debug, error, instrument};

use crate::errors::PipelineError;
use crate::retry::RetryPolicy;
use kg_indexer_shared::{Resource, ResourceCategory};
use kg_indexer_source::ResourceSource;

/// Configuration for the page fetcher.
#[derive(Debug, Clone, Default)]
pub struct FetcherConfig {
    /// Retry policy for count and page requests.
    pub retry: RetryPolicy,
}

/// Fetches pages of resources with one retry per request.
pub struct PageFetcher {
    source: Arc<dyn ResourceSource>,
    config: FetcherConfig,
}

impl PageFetcher {
    /// Create a new page fetcher with the default retry policy.
    pub fn new(source: Arc<dyn ResourceSource>) -> Self {
        Self::with_config(source, FetcherConfig::default())
    }

    /// Create a new page fetcher with custom configuration.
    pub fn with_config(source: Arc<dyn ResourceSource>, config: FetcherConfig) -> Self {
        Self { source, config }
    }

    /// Count the resources of a category.
    ///
    /// Failure here is fatal to the job, so it is reported as `CountError`.
    #[instrument(skip(self), fields(category = %category))]
    pub async fn count(&self, category: &ResourceCategory) -> Result<u64, PipelineError> {
        let total = self
            .config
            .retry
            .run("count resources", || self.source.count_resources(category))
            .await
            .map_err(|source| {
                error!(error = %source, "Failed to count resources");
                PipelineError::CountError {
                    category: category.to_string(),
                    source,
                }
            })?;

        debug!(total = total, "Counted resources");
        Ok(total)
    }

    /// Fetch one page of resources.
    ///
    /// A second consecutive failure for the same page is reported as
    /// `UpstreamUnavailable`.
    #[instrument(skip(self), fields(category = %category))]
    pub async fn fetch(
        &self,
        category: &ResourceCategory,
        page_size: u64,
        offset: u64,
    ) -> Result<Vec<Resource>, PipelineError> {
        let resources = self
            .config
            .retry
            .run("fetch page", || {
                self.source.fetch_page(category, page_size, offset)
            })
            .await
            .map_err(|source| {
                error!(offset = offset, error = %source, "Upstream unavailable");
                PipelineError::UpstreamUnavailable { offset, source }
            })?;

        debug!(offset = offset, fetched = resources.len(), "Fetched page");
        Ok(resources)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{long_resources, MockSource};

    fn fetcher(source: Arc<MockSource>) -> PageFetcher {
        PageFetcher::new(source)
    }

    #[tokio::test(start_paused = true)]
    async fn test_fetch_returns_page_slice() {
        let source = Arc::new(MockSource::with_records(long_resources(100)));

        let page = fetcher(source.clone())
            .fetch(&ResourceCategory::manga(), 42, 84)
            .await
            .unwrap();

        assert_eq!(page.len(), 16);
        assert_eq!(source.fetch_calls(), vec![84]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_fetch_retries_once() {
        let source = Arc::new(MockSource::with_records(long_resources(10)).failing_at(0, 1));

        let page = fetcher(source.clone())
            .fetch(&ResourceCategory::manga(), 5, 0)
            .await
            .unwrap();

        assert_eq!(page.len(), 5);
        assert_eq!(source.fetch_calls(), vec![0, 0]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_fetch_second_failure_is_upstream_unavailable() {
        let source = Arc::new(MockSource::with_records(long_resources(10)).failing_at(5, 2));

        let err = fetcher(source.clone())
            .fetch(&ResourceCategory::anime(), 5, 5)
            .await
            .unwrap_err();

        assert!(matches!(err, PipelineError::UpstreamUnavailable { offset: 5, .. }));
        assert_eq!(source.fetch_calls(), vec![5, 5]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_count_failure_is_count_error() {
        let source = Arc::new(MockSource::default().failing_count());

        let err = fetcher(source)
            .count(&ResourceCategory::manga())
            .await
            .unwrap_err();

        match err {
            PipelineError::CountError { category, .. } => assert_eq!(category, "dbo:Manga"),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_count() {
        let source = Arc::new(MockSource::with_records(long_resources(7)));

        assert_eq!(fetcher(source).count(&ResourceCategory::manga()).await.unwrap(), 7);
    }
}
