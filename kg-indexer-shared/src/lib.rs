//! # Knowledge-Graph Indexer Shared
//!
//! Data model shared by every stage of the indexer: the raw [`Resource`]
//! harvested from the knowledge graph, the [`EnrichedResource`] produced by
//! the abstract enricher, and the size-bounded [`Document`] pushed to the
//! search index.

mod document;
mod outcome;
mod resource;

pub use document::{Document, SHORT_FIELD, TITLE_FIELD, TYPE_CATEGORY};
pub use outcome::{DropReason, RecordOutcome};
pub use resource::{EnrichedResource, Resource, ResourceCategory, ABSTRACT_FIELD};

/// Maximum byte length of a document identifier accepted by the index.
pub const MAX_DOCID_BYTES: usize = 1024;

/// Maximum summed byte length of all fields of one document.
pub const MAX_FIELDS_BYTES: usize = 9500;

/// Abstracts shorter than this (in characters) are considered short.
pub const MIN_ABSTRACT_CHARS: usize = 500;
