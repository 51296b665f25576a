//! Error types for the upstream sources.

use thiserror::Error;

/// Errors that can occur while talking to the knowledge graph or scraping pages.
#[derive(Error, Debug)]
pub enum SourceError {
    /// The HTTP request could not be completed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The upstream answered with a non-success status.
    #[error("Upstream returned status {status}: {body}")]
    Status { status: u16, body: String },

    /// The upstream response could not be interpreted.
    #[error("Parse error: {0}")]
    Parse(String),

    /// The page could not be scraped.
    #[error("Scrape error: {0}")]
    Scrape(String),
}

impl SourceError {
    /// Create a status error.
    pub fn status(status: u16, body: impl Into<String>) -> Self {
        Self::Status {
            status,
            body: body.into(),
        }
    }

    /// Create a parse error.
    pub fn parse(msg: impl Into<String>) -> Self {
        Self::Parse(msg.into())
    }

    /// Create a scrape error.
    pub fn scrape(msg: impl Into<String>) -> Self {
        Self::Scrape(msg.into())
    }
}
