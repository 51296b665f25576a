//! Orchestrator module for the indexing pipeline.
//!
//! Walks a category page by page, running each page through the fetcher,
//! enricher, sanitizer and loader, and aborts once too many pages in a row
//! have failed.

mod cursor;
mod report;

pub use cursor::PageCursor;
pub use report::{JobSummary, PageReport};

use std::time::Duration;
use tracing::{error, info, instrument};

use crate::enricher::AbstractEnricher;
use crate::errors::PipelineError;
use crate::fetcher::PageFetcher;
use crate::loader::BatchIndexer;
use crate::processor::RecordSanitizer;
use kg_indexer_shared::{RecordOutcome, ResourceCategory};

/// Index name used when none is configured.
pub const DEFAULT_INDEX_NAME: &str = "manmanga";

/// Configuration for the page loop.
#[derive(Debug, Clone)]
pub struct IndexorConfig {
    /// Destination index.
    pub index_name: String,
    /// Records requested per page.
    pub page_size: u64,
    /// Offset to resume from; rounded down to a page boundary.
    pub start_offset: u64,
    /// Consecutive page failures tolerated before the job aborts.
    pub max_consecutive_failures: u32,
    /// Pause between pages, to stay polite with the upstream.
    pub page_delay: Duration,
}

impl Default for IndexorConfig {
    fn default() -> Self {
        Self {
            index_name: DEFAULT_INDEX_NAME.to_string(),
            page_size: 42,
            start_offset: 0,
            max_consecutive_failures: 3,
            page_delay: Duration::from_millis(1000),
        }
    }
}

impl IndexorConfig {
    pub fn validate(&self) -> Result<(), PipelineError> {
        if self.index_name.trim().is_empty() {
            return Err(PipelineError::config("index_name must not be empty"));
        }
        if self.page_size == 0 {
            return Err(PipelineError::config("page_size must be greater than 0"));
        }
        if self.max_consecutive_failures == 0 {
            return Err(PipelineError::config(
                "max_consecutive_failures must be greater than 0",
            ));
        }
        Ok(())
    }
}

/// Drives the page loop for one category at a time.
///
/// Pages are processed strictly in sequence. A page failure (upstream down
/// after its retry, or index push failed after its retry) is logged and the
/// loop moves on; a successful page resets the failure count. When
/// `max_consecutive_failures` pages fail in a row the job aborts with
/// `TooManyFailures`.
pub struct Indexor {
    fetcher: PageFetcher,
    enricher: AbstractEnricher,
    sanitizer: RecordSanitizer,
    indexer: BatchIndexer,
    config: IndexorConfig,
}

impl Indexor {
    /// Create a new indexor with the default configuration.
    pub fn new(
        fetcher: PageFetcher,
        enricher: AbstractEnricher,
        sanitizer: RecordSanitizer,
        indexer: BatchIndexer,
    ) -> Self {
        Self::with_config(fetcher, enricher, sanitizer, indexer, IndexorConfig::default())
    }

    /// Create a new indexor with custom configuration.
    pub fn with_config(
        fetcher: PageFetcher,
        enricher: AbstractEnricher,
        sanitizer: RecordSanitizer,
        indexer: BatchIndexer,
        config: IndexorConfig,
    ) -> Self {
        Self {
            fetcher,
            enricher,
            sanitizer,
            indexer,
            config,
        }
    }

    pub fn config(&self) -> &IndexorConfig {
        &self.config
    }

    /// Count the resources of `category`, then index all of them.
    #[instrument(skip(self), fields(category = %category, index = %self.config.index_name))]
    pub async fn index_category(
        &self,
        category: &ResourceCategory,
    ) -> Result<JobSummary, PipelineError> {
        self.validate()?;

        let total = self.fetcher.count(category).await?;
        info!(total = total, "Counted resources");

        self.run(category, total).await
    }

    /// Index `total` resources of `category`, starting at the configured offset.
    #[instrument(skip(self), fields(category = %category, index = %self.config.index_name))]
    pub async fn run(
        &self,
        category: &ResourceCategory,
        total: u64,
    ) -> Result<JobSummary, PipelineError> {
        self.validate()?;
        self.indexer.ensure_index(&self.config.index_name).await?;

        let cursor = PageCursor::new(total, self.config.page_size, self.config.start_offset)?;
        info!(
            total = total,
            pages = cursor.remaining_pages(),
            page_size = self.config.page_size,
            start_offset = self.config.start_offset,
            "Starting page loop"
        );

        let mut summary = JobSummary::start(category, &self.config.index_name, total);
        let mut consecutive_failures: u32 = 0;

        let mut pages = cursor.peekable();
        while let Some(offset) = pages.next() {
            match self.process_page(category, offset).await {
                Ok(report) => {
                    consecutive_failures = 0;
                    info!(
                        offset = offset,
                        dropped = report.dropped,
                        "Successfully indexed {} documents from offset {}",
                        report.indexed,
                        offset
                    );
                    summary.record_page(&report);
                }
                Err(e) => {
                    consecutive_failures += 1;
                    summary.record_failure();

                    if consecutive_failures >= self.config.max_consecutive_failures {
                        error!(
                            offset = offset,
                            failures = consecutive_failures,
                            error = %e,
                            "Too many consecutive page failures, aborting"
                        );
                        return Err(PipelineError::TooManyFailures {
                            failures: consecutive_failures,
                            last: Box::new(e),
                        });
                    }

                    error!(
                        offset = offset,
                        failures = consecutive_failures,
                        max_failures = self.config.max_consecutive_failures,
                        error = %e,
                        "Problem indexing page"
                    );
                }
            }

            if pages.peek().is_some() {
                tokio::time::sleep(self.config.page_delay).await;
            }
        }

        summary.finish();
        info!(
            pages = summary.pages,
            failed_pages = summary.failed_pages,
            documents_indexed = summary.documents_indexed,
            dropped = summary.dropped,
            "Done indexing category"
        );

        Ok(summary)
    }

    /// Fetch, enrich, sanitize and push the page at `offset`.
    pub async fn process_page(
        &self,
        category: &ResourceCategory,
        offset: u64,
    ) -> Result<PageReport, PipelineError> {
        let resources = self
            .fetcher
            .fetch(category, self.config.page_size, offset)
            .await?;
        let fetched = resources.len();

        let enriched = self.enricher.enrich_page(resources).await;
        let (records, enrich_dropped) = split_outcomes(enriched);

        let sanitized = self.sanitizer.sanitize_page(records, category);
        let (documents, sanitize_dropped) = split_outcomes(sanitized);

        let indexed = self
            .indexer
            .push(&self.config.index_name, &documents)
            .await
            .map_err(|source| PipelineError::LoaderError { offset, source })?;

        Ok(PageReport {
            offset,
            fetched,
            dropped: enrich_dropped + sanitize_dropped,
            indexed,
        })
    }

    fn validate(&self) -> Result<(), PipelineError> {
        self.config.validate()?;
        self.sanitizer.config().validate()
    }
}

/// Separate kept values from drops, logging each drop.
fn split_outcomes<T>(outcomes: Vec<RecordOutcome<T>>) -> (Vec<T>, usize) {
    let mut kept = Vec::with_capacity(outcomes.len());
    let mut dropped = 0;

    for outcome in outcomes {
        match outcome {
            RecordOutcome::Kept(value) => kept.push(value),
            RecordOutcome::Dropped { docid, reason } => {
                dropped += 1;
                info!(docid = %docid, reason = %reason, "Dropping record");
            }
        }
    }

    (kept, dropped)
}
