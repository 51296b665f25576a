//! # Knowledge-Graph Indexer Pipeline
//!
//! This crate provides the resilient paginated pipeline that walks a remote
//! resource collection and bulk-loads it into the search index.
//!
//! ## Architecture
//!
//! Each page flows through the same stages, strictly one page at a time:
//!
//! 1. **Fetcher**: Retrieves one page of resources (one retry on failure)
//! 2. **Enricher**: Flags short abstracts and backfills them from a companion page
//! 3. **Processor**: Sanitizes resources into size-bounded documents
//! 4. **Loader**: Pushes the page's documents to the index (one retry on failure)
//! 5. **Orchestrator**: The page loop, with its cursor and consecutive-failure budget

pub mod enricher;
pub mod errors;
pub mod fetcher;
pub mod loader;
pub mod orchestrator;
pub mod processor;
pub mod retry;

#[cfg(test)]
mod test_support;

pub use errors::PipelineError;
pub use retry::RetryPolicy;
