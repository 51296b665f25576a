//! Interface definitions for the search index.
//!
//! `SearchIndexProvider` abstracts a concrete backend; `SearchEngineClient`
//! is the narrower surface the indexing pipeline depends on.

mod search_engine_client;
mod search_index_provider;

pub use search_engine_client::SearchEngineClient;
pub use search_index_provider::SearchIndexProvider;
