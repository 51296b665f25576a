//! Enricher module for the indexing pipeline.
//!
//! Flags short abstracts and, when a page scraper is configured, backfills
//! them with the text of the resource's companion page.

use std::sync::Arc;

use futures::future::join_all;
use tracing::{debug, info, instrument};

use kg_indexer_shared::{
    DropReason, EnrichedResource, RecordOutcome, Resource, MIN_ABSTRACT_CHARS,
};
use kg_indexer_source::dbpedia::{companion_page_url, RESOURCE_PREFIX, WIKIPEDIA_BASE_URL};
use kg_indexer_source::PageScraper;

/// Configuration for the abstract enricher.
#[derive(Debug, Clone)]
pub struct EnricherConfig {
    /// Abstracts with fewer characters than this are short.
    pub min_abstract_chars: usize,
    /// Prefix stripped from a docid to find its companion page name.
    pub resource_prefix: String,
    /// Base URL the companion page name is appended to.
    pub fallback_base_url: String,
}

impl Default for EnricherConfig {
    fn default() -> Self {
        Self {
            min_abstract_chars: MIN_ABSTRACT_CHARS,
            resource_prefix: RESOURCE_PREFIX.to_string(),
            fallback_base_url: WIKIPEDIA_BASE_URL.to_string(),
        }
    }
}

/// Checks each resource's abstract and backfills short ones.
///
/// Records whose abstract is long enough pass through with `short = false`.
/// Without a fallback scraper, short abstracts are kept as-is with
/// `short = true` and only records with no abstract are dropped. With a
/// fallback scraper, a short record is kept only if the scrape yields text.
pub struct AbstractEnricher {
    config: EnricherConfig,
    fallback: Option<Arc<dyn PageScraper>>,
}

impl AbstractEnricher {
    /// Create an enricher without a fallback scraper.
    pub fn new(config: EnricherConfig) -> Self {
        Self {
            config,
            fallback: None,
        }
    }

    /// Use `scraper` to backfill short abstracts.
    pub fn with_fallback(mut self, scraper: Arc<dyn PageScraper>) -> Self {
        self.fallback = Some(scraper);
        self
    }

    /// Whether a fallback scraper is configured.
    pub fn has_fallback(&self) -> bool {
        self.fallback.is_some()
    }

    /// Enrich one resource.
    pub async fn enrich(&self, mut resource: Resource) -> RecordOutcome<EnrichedResource> {
        let chars = resource
            .abstract_text()
            .filter(|text| !text.trim().is_empty())
            .map(|text| text.chars().count());

        if matches!(chars, Some(n) if n >= self.config.min_abstract_chars) {
            return RecordOutcome::Kept(EnrichedResource::new(resource, false));
        }

        let Some(scraper) = &self.fallback else {
            return match chars {
                Some(_) => RecordOutcome::Kept(EnrichedResource::new(resource, true)),
                None => RecordOutcome::dropped(resource.docid, DropReason::MissingAbstract),
            };
        };

        match self.scrape_fallback(scraper.as_ref(), &resource.docid).await {
            Some(text) => {
                resource.set_abstract(text);
                RecordOutcome::Kept(EnrichedResource::new(resource, true))
            }
            None => RecordOutcome::dropped(resource.docid, DropReason::FallbackUnavailable),
        }
    }

    /// Enrich every resource of a page, preserving order.
    ///
    /// Scrapes run concurrently; the scraper is responsible for pacing.
    #[instrument(skip(self, resources), fields(resource_count = resources.len()))]
    pub async fn enrich_page(&self, resources: Vec<Resource>) -> Vec<RecordOutcome<EnrichedResource>> {
        let outcomes = join_all(resources.into_iter().map(|r| self.enrich(r))).await;

        let short = outcomes
            .iter()
            .filter(|o| matches!(o, RecordOutcome::Kept(e) if e.short))
            .count();
        debug!(short = short, "Enriched page");

        outcomes
    }

    async fn scrape_fallback(&self, scraper: &dyn PageScraper, docid: &str) -> Option<String> {
        let Some(url) = companion_page_url(
            docid,
            &self.config.resource_prefix,
            &self.config.fallback_base_url,
        ) else {
            debug!(docid = %docid, "No companion page for resource");
            return None;
        };

        match scraper.scrape(&url).await {
            Ok(text) if !text.trim().is_empty() => Some(text),
            Ok(_) => {
                info!(url = %url, "Companion page has no text");
                None
            }
            Err(e) => {
                info!(url = %url, error = %e, "Failed to scrape companion page");
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{MockScraper, PREFIX};

    fn docid(name: &str) -> String {
        format!("{}{}", PREFIX, name)
    }

    #[tokio::test]
    async fn test_long_abstract_passes_through() {
        let enricher = AbstractEnricher::new(EnricherConfig::default());
        let resource = Resource::new(docid("Akira")).with_abstract("a".repeat(500));

        let outcome = enricher.enrich(resource.clone()).await;

        assert_eq!(outcome, RecordOutcome::Kept(EnrichedResource::new(resource, false)));
    }

    #[tokio::test]
    async fn test_length_is_counted_in_characters() {
        let enricher = AbstractEnricher::new(EnricherConfig::default());
        // 499 two-byte characters: 998 bytes but still short.
        let resource = Resource::new(docid("Akira")).with_abstract("é".repeat(499));

        let outcome = enricher.enrich(resource).await.kept().unwrap();

        assert!(outcome.short);
    }

    #[tokio::test]
    async fn test_short_abstract_without_fallback_is_kept_and_flagged() {
        let enricher = AbstractEnricher::new(EnricherConfig::default());
        let resource = Resource::new(docid("Nagasarete_Airantō")).with_abstract("Short.");

        let outcome = enricher.enrich(resource).await.kept().unwrap();

        assert!(outcome.short);
        assert_eq!(outcome.resource.abstract_text(), Some("Short."));
    }

    #[tokio::test]
    async fn test_missing_abstract_is_dropped() {
        let enricher = AbstractEnricher::new(EnricherConfig::default());

        let outcome = enricher.enrich(Resource::new(docid("Nothing"))).await;
        assert_eq!(outcome.drop_reason(), Some(&DropReason::MissingAbstract));

        let blank = Resource::new(docid("Blank")).with_abstract("   ");
        let outcome = enricher.enrich(blank).await;
        assert_eq!(outcome.drop_reason(), Some(&DropReason::MissingAbstract));
    }

    #[tokio::test]
    async fn test_short_abstract_is_backfilled_from_companion_page() {
        let scraper = Arc::new(MockScraper::default().with_page(
            "https://en.wikipedia.org/wiki/Nagasarete_Airantō",
            "Nagasarete Airantō is a Japanese manga series.",
        ));
        let enricher =
            AbstractEnricher::new(EnricherConfig::default()).with_fallback(scraper.clone());
        let resource = Resource::new(docid("Nagasarete_Airantō")).with_abstract("Short.");

        let outcome = enricher.enrich(resource).await.kept().unwrap();

        assert!(outcome.short);
        assert_eq!(
            outcome.resource.abstract_text(),
            Some("Nagasarete Airantō is a Japanese manga series.")
        );
        assert_eq!(scraper.calls().len(), 1);
    }

    #[tokio::test]
    async fn test_short_abstract_with_failed_fallback_is_dropped() {
        let scraper = Arc::new(MockScraper::default());
        let enricher = AbstractEnricher::new(EnricherConfig::default()).with_fallback(scraper);
        let resource = Resource::new(docid("Unknown")).with_abstract("Short.");

        let outcome = enricher.enrich(resource).await;

        assert_eq!(outcome.drop_reason(), Some(&DropReason::FallbackUnavailable));
    }

    #[tokio::test]
    async fn test_blank_fallback_text_is_dropped() {
        let scraper = Arc::new(
            MockScraper::default().with_page("https://en.wikipedia.org/wiki/Empty", "\n  "),
        );
        let enricher = AbstractEnricher::new(EnricherConfig::default()).with_fallback(scraper);

        let outcome = enricher.enrich(Resource::new(docid("Empty"))).await;

        assert_eq!(outcome.drop_reason(), Some(&DropReason::FallbackUnavailable));
    }

    #[tokio::test]
    async fn test_foreign_docid_is_not_scraped() {
        let scraper = Arc::new(MockScraper::default());
        let enricher =
            AbstractEnricher::new(EnricherConfig::default()).with_fallback(scraper.clone());
        let resource = Resource::new("urn:other:1").with_abstract("Short.");

        let outcome = enricher.enrich(resource).await;

        assert!(outcome.is_dropped());
        assert!(scraper.calls().is_empty());
    }

    #[tokio::test]
    async fn test_enrich_page_preserves_order() {
        let enricher = AbstractEnricher::new(EnricherConfig::default());
        let resources = vec![
            Resource::new(docid("A")).with_abstract("a".repeat(600)),
            Resource::new(docid("B")),
            Resource::new(docid("C")).with_abstract("short"),
        ];

        let outcomes = enricher.enrich_page(resources).await;

        assert_eq!(outcomes.len(), 3);
        assert!(matches!(&outcomes[0], RecordOutcome::Kept(e) if !e.short));
        assert!(outcomes[1].is_dropped());
        assert!(matches!(&outcomes[2], RecordOutcome::Kept(e) if e.short));
    }
}
