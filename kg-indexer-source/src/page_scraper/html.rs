//! HTML page scraper.

use async_trait::async_trait;
use reqwest::Client;
use scraper::{Html, Selector};
use tracing::{debug, instrument};
use url::Url;

use super::rate_limit::RateLimiter;
use super::ScraperConfig;
use crate::errors::SourceError;
use crate::interfaces::PageScraper;

/// Extract the whitespace-normalised text of every element matching `selector`.
pub fn extract_text(html: &str, selector: &Selector) -> String {
    let document = Html::parse_document(html);
    document
        .select(selector)
        .map(|element| {
            element
                .text()
                .flat_map(str::split_whitespace)
                .collect::<Vec<_>>()
                .join(" ")
        })
        .filter(|text| !text.is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}

/// Scrapes pages over HTTP, one request per rate-limiter slot.
pub struct HtmlScraper {
    http: Client,
    selector: Selector,
    limiter: RateLimiter,
}

impl HtmlScraper {
    pub fn new(config: ScraperConfig) -> Result<Self, SourceError> {
        let selector = Selector::parse(&config.selector)
            .map_err(|e| SourceError::scrape(format!("invalid selector {:?}: {:?}", config.selector, e)))?;
        let http = Client::builder()
            .timeout(config.timeout)
            .user_agent(config.user_agent)
            .build()?;

        Ok(Self {
            http,
            selector,
            limiter: RateLimiter::new(config.min_interval),
        })
    }
}

#[async_trait]
impl PageScraper for HtmlScraper {
    #[instrument(skip(self))]
    async fn scrape(&self, url: &str) -> Result<String, SourceError> {
        // Percent-encodes non-ASCII article names
        let url = Url::parse(url).map_err(|e| SourceError::scrape(e.to_string()))?;

        self.limiter.acquire().await;
        let response = self.http.get(url).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(SourceError::status(status.as_u16(), status.to_string()));
        }

        let html = response.text().await?;
        let text = extract_text(&html, &self.selector);
        debug!(chars = text.chars().count(), "Scraped page");
        Ok(text)
    }
}
