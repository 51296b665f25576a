//! Indexden implementation of the search index provider.
//!
//! Talks to the IndexTank-compatible HTTP API exposed by Indexden.

mod client;

pub use client::IndexdenClient;
