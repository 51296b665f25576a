//! Error types for the knowledge-graph indexer repository.

mod search_index_error;

pub use search_index_error::SearchIndexError;
