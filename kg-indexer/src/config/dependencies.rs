//! Dependency initialization and wiring for the knowledge-graph indexer.

use std::sync::Arc;
use tracing::info;

use crate::config::{SearchBackend, Settings};
use crate::IndexingError;
use kg_indexer_pipeline::{
    enricher::AbstractEnricher,
    fetcher::PageFetcher,
    loader::BatchIndexer,
    orchestrator::Indexor,
    processor::RecordSanitizer,
};
use kg_indexer_repository::{
    IndexdenClient, OpenSearchClient, SearchEngineClient, SearchIndexClient, SearchIndexProvider,
};
use kg_indexer_source::{DbpediaClient, HtmlScraper};

/// Container for all initialized dependencies.
pub struct Dependencies {
    /// The configured indexor ready to run.
    pub indexor: Indexor,
}

impl Dependencies {
    /// Initialize all dependencies from resolved settings.
    ///
    /// # Returns
    ///
    /// * `Ok(Dependencies)` - Initialized dependencies
    /// * `Err(IndexingError)` - If a client could not be created
    pub async fn new(settings: &Settings) -> Result<Self, IndexingError> {
        info!(
            backend = ?settings.backend,
            sparql_endpoint = %settings.sparql_endpoint,
            scrape_fallback = settings.scrape_fallback,
            "Initializing dependencies"
        );

        let provider: Box<dyn SearchIndexProvider> = match settings.backend {
            SearchBackend::Indexden => {
                let endpoint = settings.indexden_endpoint.as_deref().ok_or_else(|| {
                    IndexingError::config("INDEXDEN_ENDPOINT is required for the indexden backend")
                })?;
                Box::new(IndexdenClient::new(endpoint)?)
            }
            SearchBackend::OpenSearch => {
                Box::new(OpenSearchClient::new(&settings.opensearch_url).await?)
            }
        };
        let search_client: Arc<dyn SearchEngineClient> = Arc::new(SearchIndexClient::with_config(
            provider,
            settings.search_index.clone(),
        ));

        let source = DbpediaClient::new(&settings.sparql_endpoint)?.with_lang(&settings.lang);

        let mut enricher = AbstractEnricher::new(settings.enricher.clone());
        if settings.scrape_fallback {
            let scraper = HtmlScraper::new(settings.scraper.clone())?;
            enricher = enricher.with_fallback(Arc::new(scraper));
            info!("Companion page fallback enabled");
        }

        let indexor = Indexor::with_config(
            PageFetcher::new(Arc::new(source)),
            enricher,
            RecordSanitizer::new(settings.sanitizer.clone()),
            BatchIndexer::new(search_client),
            settings.indexor.clone(),
        );

        Ok(Self { indexor })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Cli;
    use clap::Parser;

    #[tokio::test]
    async fn test_wires_indexden_backend() {
        let cli = Cli::try_parse_from([
            "kg-indexer",
            "--all",
            "--backend",
            "indexden",
            "--indexden-endpoint",
            "http://:secret@example.api.indexden.com",
            "--scrape-fallback",
            "--index",
            "shelf",
        ])
        .unwrap();
        let settings = Settings::from_cli(&cli).unwrap();

        let deps = Dependencies::new(&settings).await.unwrap();

        assert_eq!(deps.indexor.config().index_name, "shelf");
    }

    #[tokio::test]
    async fn test_invalid_sparql_endpoint_is_rejected() {
        let cli = Cli::try_parse_from([
            "kg-indexer",
            "-m",
            "--backend",
            "opensearch",
            "--sparql-endpoint",
            "not a url",
        ])
        .unwrap();
        let settings = Settings::from_cli(&cli).unwrap();

        assert!(matches!(
            Dependencies::new(&settings).await,
            Err(IndexingError::SourceError(_))
        ));
    }
}
