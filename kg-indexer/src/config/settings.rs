//! Resolved runtime settings.

use std::time::Duration;

use clap::ValueEnum;

use crate::config::Cli;
use crate::IndexingError;
use kg_indexer_pipeline::enricher::EnricherConfig;
use kg_indexer_pipeline::orchestrator::IndexorConfig;
use kg_indexer_pipeline::processor::SanitizerConfig;
use kg_indexer_repository::{opensearch, SearchIndexConfig};
use kg_indexer_shared::ResourceCategory;
use kg_indexer_source::ScraperConfig;

/// Which search index implementation to push documents to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum SearchBackend {
    /// Hosted Indexden (IndexTank API).
    Indexden,
    /// Self-hosted OpenSearch cluster.
    #[value(name = "opensearch")]
    OpenSearch,
}

/// Everything needed to wire and run a job.
#[derive(Debug, Clone)]
pub struct Settings {
    pub categories: Vec<ResourceCategory>,
    pub backend: SearchBackend,
    pub indexden_endpoint: Option<String>,
    pub opensearch_url: String,
    pub sparql_endpoint: String,
    pub lang: String,
    pub scrape_fallback: bool,
    pub indexor: IndexorConfig,
    pub search_index: SearchIndexConfig,
    pub enricher: EnricherConfig,
    pub sanitizer: SanitizerConfig,
    pub scraper: ScraperConfig,
}

impl Settings {
    /// Resolve and validate settings from parsed command line arguments.
    pub fn from_cli(cli: &Cli) -> Result<Self, IndexingError> {
        let categories = cli.categories();
        if categories.is_empty() {
            return Err(IndexingError::config(
                "no category selected (use -m, -a or --all)",
            ));
        }

        if cli.backend == SearchBackend::Indexden && cli.indexden_endpoint.is_none() {
            return Err(IndexingError::config(
                "INDEXDEN_ENDPOINT is required for the indexden backend",
            ));
        }

        let indexor = IndexorConfig {
            index_name: cli.index.clone(),
            page_size: cli.page_size,
            start_offset: cli.start_offset,
            max_consecutive_failures: cli.max_failures,
            page_delay: Duration::from_millis(cli.page_delay_ms),
        };
        indexor
            .validate()
            .map_err(|e| IndexingError::config(e.to_string()))?;

        let search_index = SearchIndexConfig::default();
        if let Some(max) = search_index.max_batch_size {
            if cli.page_size > max as u64 {
                return Err(IndexingError::config(format!(
                    "page_size {} exceeds the index batch limit of {}",
                    cli.page_size, max
                )));
            }
        }

        let mut sanitizer = SanitizerConfig::default();
        if cli.backend == SearchBackend::OpenSearch {
            sanitizer.max_docid_bytes = sanitizer.max_docid_bytes.min(opensearch::MAX_ID_BYTES);
        }

        Ok(Self {
            categories,
            backend: cli.backend,
            indexden_endpoint: cli.indexden_endpoint.clone(),
            opensearch_url: cli.opensearch_url.clone(),
            sparql_endpoint: cli.sparql_endpoint.clone(),
            lang: cli.lang.clone(),
            scrape_fallback: cli.scrape_fallback,
            indexor,
            search_index,
            enricher: EnricherConfig::default(),
            sanitizer,
            scraper: ScraperConfig::default(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    fn parse(args: &[&str]) -> Cli {
        let mut argv = vec!["kg-indexer"];
        argv.extend_from_slice(args);
        Cli::try_parse_from(argv).unwrap()
    }

    #[test]
    fn test_settings_from_cli() {
        let cli = parse(&[
            "-m",
            "--backend",
            "opensearch",
            "--index",
            "shelf",
            "--page-delay-ms",
            "250",
            "10",
            "30",
        ]);

        let settings = Settings::from_cli(&cli).unwrap();

        assert_eq!(settings.backend, SearchBackend::OpenSearch);
        assert_eq!(settings.categories, vec![ResourceCategory::manga()]);
        assert_eq!(settings.indexor.index_name, "shelf");
        assert_eq!(settings.indexor.page_size, 10);
        assert_eq!(settings.indexor.start_offset, 30);
        assert_eq!(settings.indexor.max_consecutive_failures, 3);
        assert_eq!(settings.indexor.page_delay, Duration::from_millis(250));
        assert_eq!(settings.sanitizer.max_docid_bytes, 512);
    }

    #[test]
    fn test_category_is_required() {
        let cli = parse(&["--backend", "opensearch"]);

        assert!(matches!(
            Settings::from_cli(&cli),
            Err(IndexingError::ConfigError(_))
        ));
    }

    #[test]
    fn test_indexden_requires_endpoint() {
        let mut cli = parse(&["-a", "--backend", "indexden"]);
        cli.indexden_endpoint = None;

        assert!(matches!(
            Settings::from_cli(&cli),
            Err(IndexingError::ConfigError(_))
        ));

        cli.indexden_endpoint = Some("http://:secret@example.api.indexden.com".to_string());
        let settings = Settings::from_cli(&cli).unwrap();
        assert_eq!(settings.sanitizer.max_docid_bytes, 1024);
    }

    #[test]
    fn test_zero_page_size_is_rejected() {
        let cli = parse(&["-m", "--backend", "opensearch", "0"]);

        assert!(matches!(
            Settings::from_cli(&cli),
            Err(IndexingError::ConfigError(_))
        ));
    }

    #[test]
    fn test_page_size_above_batch_limit_is_rejected() {
        let cli = parse(&["-m", "--backend", "opensearch", "1500"]);

        match Settings::from_cli(&cli) {
            Err(IndexingError::ConfigError(msg)) => assert!(msg.contains("1500")),
            other => panic!("unexpected result: {other:?}"),
        }

        let cli = parse(&["-m", "--backend", "opensearch", "1000"]);
        assert!(Settings::from_cli(&cli).is_ok());
    }

    #[test]
    fn test_zero_failure_budget_is_rejected() {
        let cli = parse(&["-m", "--backend", "opensearch", "42", "0", "0"]);

        assert!(matches!(
            Settings::from_cli(&cli),
            Err(IndexingError::ConfigError(_))
        ));
    }
}
