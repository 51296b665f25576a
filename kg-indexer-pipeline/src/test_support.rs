//! In-memory doubles for the pipeline's collaborators.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;
use kg_indexer_repository::{SearchEngineClient, SearchIndexError};
use kg_indexer_shared::{Document, Resource, ResourceCategory};
use kg_indexer_source::{PageScraper, ResourceSource, SourceError};

pub const PREFIX: &str = "http://dbpedia.org/resource/";

/// A resource whose abstract is long enough to need no enrichment.
pub fn long_resource(n: u64) -> Resource {
    Resource::new(format!("{}Item_{}", PREFIX, n)).with_abstract("x".repeat(600))
}

pub fn long_resources(count: u64) -> Vec<Resource> {
    (0..count).map(long_resource).collect()
}

/// Pages through a fixed collection. Offsets listed in `failing` fail the
/// given number of times before succeeding.
#[derive(Default)]
pub struct MockSource {
    records: Vec<Resource>,
    failing: Mutex<HashMap<u64, usize>>,
    count_fails: bool,
    pub fetch_calls: Mutex<Vec<u64>>,
}

impl MockSource {
    pub fn with_records(records: Vec<Resource>) -> Self {
        Self {
            records,
            ..Default::default()
        }
    }

    pub fn failing_at(self, offset: u64, times: usize) -> Self {
        self.failing
            .lock()
            .unwrap()
            .insert(offset, times);
        self
    }

    pub fn failing_count(mut self) -> Self {
        self.count_fails = true;
        self
    }

    pub fn fetch_calls(&self) -> Vec<u64> {
        self.fetch_calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl ResourceSource for MockSource {
    async fn count_resources(&self, _category: &ResourceCategory) -> Result<u64, SourceError> {
        if self.count_fails {
            return Err(SourceError::status(503, "count unavailable"));
        }
        Ok(self.records.len() as u64)
    }

    async fn fetch_page(
        &self,
        _category: &ResourceCategory,
        limit: u64,
        offset: u64,
    ) -> Result<Vec<Resource>, SourceError> {
        self.fetch_calls.lock().unwrap().push(offset);

        if let Some(remaining) = self.failing.lock().unwrap().get_mut(&offset) {
            if *remaining > 0 {
                *remaining -= 1;
                return Err(SourceError::status(503, "upstream unavailable"));
            }
        }

        Ok(self
            .records
            .iter()
            .skip(offset as usize)
            .take(limit as usize)
            .cloned()
            .collect())
    }
}

/// Records every push. The first `push_failures` pushes fail, and batches
/// above `max_batch_size` are always refused.
#[derive(Default)]
pub struct MockIndex {
    ensure_fails: bool,
    push_failures: AtomicUsize,
    max_batch_size: Option<usize>,
    pub ensure_calls: AtomicUsize,
    pub push_calls: AtomicUsize,
    pub pushed: Mutex<Vec<Vec<Document>>>,
}

impl MockIndex {
    pub fn failing_ensure() -> Self {
        Self {
            ensure_fails: true,
            ..Default::default()
        }
    }

    pub fn failing_pushes(times: usize) -> Self {
        Self {
            push_failures: AtomicUsize::new(times),
            ..Default::default()
        }
    }

    pub fn with_max_batch_size(max: usize) -> Self {
        Self {
            max_batch_size: Some(max),
            ..Default::default()
        }
    }

    pub fn pushed(&self) -> Vec<Vec<Document>> {
        self.pushed.lock().unwrap().clone()
    }

    pub fn pushed_docids(&self) -> Vec<String> {
        self.pushed()
            .into_iter()
            .flatten()
            .map(|doc| doc.docid)
            .collect()
    }
}

#[async_trait]
impl SearchEngineClient for MockIndex {
    async fn ensure_index(&self, _index_name: &str) -> Result<(), SearchIndexError> {
        self.ensure_calls.fetch_add(1, Ordering::SeqCst);
        if self.ensure_fails {
            return Err(SearchIndexError::connection("index service unreachable"));
        }
        Ok(())
    }

    async fn push_documents(
        &self,
        _index_name: &str,
        documents: &[Document],
    ) -> Result<(), SearchIndexError> {
        self.push_calls.fetch_add(1, Ordering::SeqCst);

        if let Some(max) = self.max_batch_size {
            if documents.len() > max {
                return Err(SearchIndexError::batch_size_exceeded(documents.len(), max));
            }
        }

        let remaining = self.push_failures.load(Ordering::SeqCst);
        if remaining > 0 {
            self.push_failures.store(remaining - 1, Ordering::SeqCst);
            return Err(SearchIndexError::bulk_operation("index rejected batch"));
        }

        self.pushed.lock().unwrap().push(documents.to_vec());
        Ok(())
    }
}

/// Serves canned page text by URL; unknown URLs fail.
#[derive(Default)]
pub struct MockScraper {
    pages: HashMap<String, String>,
    pub calls: Mutex<Vec<String>>,
}

impl MockScraper {
    pub fn with_page(mut self, url: impl Into<String>, text: impl Into<String>) -> Self {
        self.pages.insert(url.into(), text.into());
        self
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl PageScraper for MockScraper {
    async fn scrape(&self, url: &str) -> Result<String, SourceError> {
        self.calls.lock().unwrap().push(url.to_string());
        self.pages
            .get(url)
            .cloned()
            .ok_or_else(|| SourceError::status(404, "not found"))
    }
}
