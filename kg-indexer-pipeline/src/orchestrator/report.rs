//! Per-page and per-job reports.

use chrono::{DateTime, Utc};
use std::time::Duration;

use kg_indexer_shared::ResourceCategory;

/// What happened to one successfully processed page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageReport {
    pub offset: u64,
    /// Resources returned by the source.
    pub fetched: usize,
    /// Records dropped by the enricher or the sanitizer.
    pub dropped: usize,
    /// Documents accepted by the index.
    pub indexed: usize,
}

/// Outcome of a completed job.
#[derive(Debug, Clone)]
pub struct JobSummary {
    pub category: ResourceCategory,
    pub index_name: String,
    /// Resource count reported by the source at the start of the job.
    pub total: u64,
    /// Pages processed successfully.
    pub pages: u64,
    /// Pages that failed and were skipped.
    pub failed_pages: u64,
    pub documents_indexed: u64,
    pub dropped: u64,
    pub started_at: DateTime<Utc>,
    pub finished_at: Option<DateTime<Utc>>,
}

impl JobSummary {
    pub fn start(category: &ResourceCategory, index_name: &str, total: u64) -> Self {
        Self {
            category: category.clone(),
            index_name: index_name.to_string(),
            total,
            pages: 0,
            failed_pages: 0,
            documents_indexed: 0,
            dropped: 0,
            started_at: Utc::now(),
            finished_at: None,
        }
    }

    pub fn record_page(&mut self, report: &PageReport) {
        self.pages += 1;
        self.documents_indexed += report.indexed as u64;
        self.dropped += report.dropped as u64;
    }

    pub fn record_failure(&mut self) {
        self.failed_pages += 1;
    }

    pub fn finish(&mut self) {
        self.finished_at = Some(Utc::now());
    }

    /// Wall-clock duration of the job, once finished.
    pub fn elapsed(&self) -> Option<Duration> {
        self.finished_at
            .and_then(|end| (end - self.started_at).to_std().ok())
    }
}
