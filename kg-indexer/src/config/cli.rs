//! Command line interface.

use std::path::PathBuf;

use clap::Parser;

use crate::config::SearchBackend;
use crate::logging::LogFormat;
use kg_indexer_pipeline::orchestrator::DEFAULT_INDEX_NAME;
use kg_indexer_shared::ResourceCategory;
use kg_indexer_source::dbpedia::DEFAULT_SPARQL_ENDPOINT;

/// Default OpenSearch URL.
const DEFAULT_OPENSEARCH_URL: &str = "http://localhost:9200";

#[derive(Parser, Debug)]
#[command(name = "kg-indexer")]
#[command(version, about = "Index knowledge-graph resources into a hosted search index", long_about = None)]
pub struct Cli {
    /// Index manga resources
    #[arg(short = 'm', long)]
    pub manga: bool,

    /// Index anime resources
    #[arg(short = 'a', long)]
    pub anime: bool,

    /// Index every supported category
    #[arg(long)]
    pub all: bool,

    /// Destination index name
    #[arg(long, env = "INDEX_NAME", default_value = DEFAULT_INDEX_NAME)]
    pub index: String,

    /// Search index backend
    #[arg(long, env = "SEARCH_BACKEND", value_enum, default_value_t = SearchBackend::Indexden)]
    pub backend: SearchBackend,

    /// Indexden API endpoint, credentials included (http://:password@host)
    #[arg(long, env = "INDEXDEN_ENDPOINT")]
    pub indexden_endpoint: Option<String>,

    /// OpenSearch server URL
    #[arg(long, env = "OPENSEARCH_URL", default_value = DEFAULT_OPENSEARCH_URL)]
    pub opensearch_url: String,

    /// SPARQL endpoint of the knowledge graph
    #[arg(long, env = "SPARQL_ENDPOINT", default_value = DEFAULT_SPARQL_ENDPOINT)]
    pub sparql_endpoint: String,

    /// Language of the abstracts to fetch
    #[arg(long, env = "SPARQL_LANG", default_value = "en")]
    pub lang: String,

    /// Backfill short abstracts by scraping the companion Wikipedia page
    #[arg(long, env = "SCRAPE_FALLBACK")]
    pub scrape_fallback: bool,

    /// Pause after each page, in milliseconds
    #[arg(long, env = "PAGE_DELAY_MS", default_value_t = 1000)]
    pub page_delay_ms: u64,

    /// Log output format
    #[arg(long, value_enum, default_value_t = LogFormat::Text)]
    pub log_format: LogFormat,

    /// Append logs to this file instead of stderr
    #[arg(long)]
    pub log_file: Option<PathBuf>,

    /// Records requested per page
    #[arg(default_value_t = 42)]
    pub page_size: u64,

    /// Offset to start (or resume) from
    #[arg(default_value_t = 0)]
    pub start_offset: u64,

    /// Consecutive page failures tolerated before aborting
    #[arg(default_value_t = 3)]
    pub max_failures: u32,
}

impl Cli {
    /// Categories selected by the flags, in indexing order.
    pub fn categories(&self) -> Vec<ResourceCategory> {
        let mut categories = Vec::new();
        if self.all || self.manga {
            categories.push(ResourceCategory::manga());
        }
        if self.all || self.anime {
            categories.push(ResourceCategory::anime());
        }
        categories
    }
}
