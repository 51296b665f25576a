//! # Knowledge-Graph Indexer
//!
//! Main library for the knowledge-graph indexer.
//!
//! This crate provides the command line, configuration, logging bootstrap
//! and dependency wiring for running the indexing pipeline over one or more
//! resource categories.

pub mod config;
pub mod jobs;
pub mod logging;

pub use config::{Cli, Dependencies, SearchBackend, Settings};
pub use jobs::run_categories;
pub use logging::{init_logging, LogFormat};

use thiserror::Error;

/// Errors that can occur during indexer initialization or execution.
#[derive(Error, Debug)]
pub enum IndexingError {
    /// Configuration error.
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// Pipeline error.
    #[error("Pipeline error: {0}")]
    PipelineError(#[from] kg_indexer_pipeline::PipelineError),

    /// Search index error.
    #[error("Search index error: {0}")]
    SearchError(#[from] kg_indexer_repository::SearchIndexError),

    /// Upstream source error.
    #[error("Source error: {0}")]
    SourceError(#[from] kg_indexer_source::SourceError),

    /// IO error.
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    /// The run was interrupted before all categories completed.
    #[error("Interrupted")]
    Interrupted,
}

impl IndexingError {
    /// Create a configuration error.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::ConfigError(msg.into())
    }
}
