//! Processor module for the indexing pipeline.
//!
//! Transforms enriched resources into documents that satisfy the index's
//! size limits.

mod record_sanitizer;

pub use record_sanitizer::{RecordSanitizer, SanitizerConfig};
