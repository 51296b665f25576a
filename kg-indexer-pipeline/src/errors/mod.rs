//! Error types for the indexing pipeline.

use kg_indexer_repository::SearchIndexError;
use kg_indexer_source::SourceError;
use thiserror::Error;

/// Errors that can occur in the indexing pipeline.
///
/// `UpstreamUnavailable` and `LoaderError` are page-level failures: the page
/// loop counts them against its budget and moves on. The other variants
/// abort the job.
#[derive(Error, Debug)]
pub enum PipelineError {
    /// Invalid job configuration.
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// The total resource count could not be fetched.
    #[error("Failed to count {category} resources: {source}")]
    CountError {
        category: String,
        #[source]
        source: SourceError,
    },

    /// The destination index could not be checked or created.
    #[error("Failed to ensure index {index}: {source}")]
    IndexSetupError {
        index: String,
        #[source]
        source: SearchIndexError,
    },

    /// The upstream failed for a page even after its retry.
    #[error("Upstream unavailable for page at offset {offset}: {source}")]
    UpstreamUnavailable {
        offset: u64,
        #[source]
        source: SourceError,
    },

    /// The page's documents could not be pushed even after the retry.
    #[error("Failed to index page at offset {offset}: {source}")]
    LoaderError {
        offset: u64,
        #[source]
        source: SearchIndexError,
    },

    /// The consecutive-failure budget is exhausted.
    #[error("Aborting after {failures} consecutive page failures; last: {last}")]
    TooManyFailures {
        failures: u32,
        last: Box<PipelineError>,
    },
}

impl PipelineError {
    /// Create a configuration error.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::ConfigError(msg.into())
    }

    /// Whether this error is a page-level failure the loop may absorb.
    pub fn is_page_failure(&self) -> bool {
        matches!(
            self,
            Self::UpstreamUnavailable { .. } | Self::LoaderError { .. }
        )
    }

    /// Whether the upstream was down, directly or as the last cause of an abort.
    pub fn is_upstream_unavailable(&self) -> bool {
        match self {
            Self::UpstreamUnavailable { .. } => true,
            Self::TooManyFailures { last, .. } => last.is_upstream_unavailable(),
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_page_failures_are_not_fatal_kinds() {
        let upstream = PipelineError::UpstreamUnavailable {
            offset: 50,
            source: SourceError::status(503, "down"),
        };
        assert!(upstream.is_page_failure());
        assert!(upstream.is_upstream_unavailable());

        let loader = PipelineError::LoaderError {
            offset: 0,
            source: SearchIndexError::bulk_operation("nope"),
        };
        assert!(loader.is_page_failure());
        assert!(!loader.is_upstream_unavailable());

        assert!(!PipelineError::config("bad").is_page_failure());
    }

    #[test]
    fn test_abort_keeps_upstream_tag() {
        let abort = PipelineError::TooManyFailures {
            failures: 3,
            last: Box::new(PipelineError::UpstreamUnavailable {
                offset: 100,
                source: SourceError::status(502, "bad gateway"),
            }),
        };

        assert!(!abort.is_page_failure());
        assert!(abort.is_upstream_unavailable());
        assert!(abort.to_string().contains("offset 100"));
    }
}
