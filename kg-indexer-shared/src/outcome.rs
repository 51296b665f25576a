//! Per-record outcomes of the enrich and sanitize stages.

use std::fmt;

/// Why a record was left out of a page's batch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DropReason {
    /// The record has no descriptive text at all.
    MissingAbstract,
    /// The abstract was short and the fallback scrape produced nothing.
    FallbackUnavailable,
    /// The identifier exceeds the index's byte ceiling.
    DocidTooLong { bytes: usize, max: usize },
}

impl fmt::Display for DropReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DropReason::MissingAbstract => f.write_str("no abstract"),
            DropReason::FallbackUnavailable => f.write_str("short abstract and no fallback text"),
            DropReason::DocidTooLong { bytes, max } => {
                write!(f, "docid is {} bytes (max {})", bytes, max)
            }
        }
    }
}

/// Either a record that continues down the pipeline or an explicit drop.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecordOutcome<T> {
    Kept(T),
    Dropped { docid: String, reason: DropReason },
}

impl<T> RecordOutcome<T> {
    /// Build a drop outcome.
    pub fn dropped(docid: impl Into<String>, reason: DropReason) -> Self {
        Self::Dropped {
            docid: docid.into(),
            reason,
        }
    }

    /// The kept value, if any.
    pub fn kept(self) -> Option<T> {
        match self {
            RecordOutcome::Kept(value) => Some(value),
            RecordOutcome::Dropped { .. } => None,
        }
    }

    pub fn is_dropped(&self) -> bool {
        matches!(self, RecordOutcome::Dropped { .. })
    }

    /// The drop reason, if the record was dropped.
    pub fn drop_reason(&self) -> Option<&DropReason> {
        match self {
            RecordOutcome::Kept(_) => None,
            RecordOutcome::Dropped { reason, .. } => Some(reason),
        }
    }
}
