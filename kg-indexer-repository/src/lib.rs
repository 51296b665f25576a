//! # Knowledge-Graph Indexer Repository
//!
//! This crate provides traits and implementations for interacting with the
//! hosted search index. It includes definitions for errors, interfaces, a
//! validating client, and concrete backends for Indexden and OpenSearch.

pub mod client;
pub mod config;
pub mod errors;
pub mod indexden;
pub mod interfaces;
pub mod opensearch;
pub mod types;

pub use client::SearchIndexClient;
pub use config::SearchIndexConfig;
pub use errors::SearchIndexError;
pub use indexden::IndexdenClient;
pub use interfaces::{SearchEngineClient, SearchIndexProvider};
pub use opensearch::OpenSearchClient;
pub use types::{BatchOperationResult, BatchOperationSummary, IndexMetadata};
