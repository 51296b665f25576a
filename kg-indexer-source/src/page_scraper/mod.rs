//! Companion page scraping.
//!
//! Fetches a web page and extracts the text of the elements matching a CSS
//! selector. Requests are spaced by an internal rate limiter so callers never
//! have to throttle themselves.

mod html;
mod rate_limit;

pub use html::{extract_text, HtmlScraper};
pub use rate_limit::RateLimiter;

use std::time::Duration;

/// Configuration for the page scraper.
#[derive(Debug, Clone)]
pub struct ScraperConfig {
    /// Minimum spacing between two requests.
    pub min_interval: Duration,
    /// Per-request timeout.
    pub timeout: Duration,
    /// CSS selector whose matches make up the extracted text.
    pub selector: String,
    pub user_agent: String,
}

impl Default for ScraperConfig {
    fn default() -> Self {
        Self {
            min_interval: Duration::from_millis(1000),
            timeout: Duration::from_secs(30),
            selector: "p".to_string(),
            user_agent: concat!("kg-indexer/", env!("CARGO_PKG_VERSION")).to_string(),
        }
    }
}
