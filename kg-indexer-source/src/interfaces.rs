//! Interface definitions for the upstream sources.
//!
//! The pipeline depends only on these traits so tests can substitute mocks.

use async_trait::async_trait;

use crate::errors::SourceError;
use kg_indexer_shared::{Resource, ResourceCategory};

/// A paged collection of resources, grouped by category.
#[async_trait]
pub trait ResourceSource: Send + Sync {
    /// Count the resources of a category. Used once per job to bound the loop.
    async fn count_resources(&self, category: &ResourceCategory) -> Result<u64, SourceError>;

    /// Fetch up to `limit` resources of a category starting at `offset`.
    ///
    /// Returns fewer than `limit` resources only on the final page; an empty
    /// vector is a valid answer past the end of the collection.
    async fn fetch_page(
        &self,
        category: &ResourceCategory,
        limit: u64,
        offset: u64,
    ) -> Result<Vec<Resource>, SourceError>;
}

/// Extracts text from a web page.
#[async_trait]
pub trait PageScraper: Send + Sync {
    /// Scrape the page at `url` and return its extracted text.
    async fn scrape(&self, url: &str) -> Result<String, SourceError>;
}
