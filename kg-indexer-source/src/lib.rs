//! # Knowledge-Graph Indexer Source
//!
//! Upstream collaborators of the indexing pipeline:
//!
//! 1. **ResourceSource**: counts and pages through resources of a category
//!    (implemented against the DBpedia SPARQL endpoint)
//! 2. **PageScraper**: extracts text from a companion web page, used to
//!    backfill short abstracts

pub mod dbpedia;
pub mod errors;
pub mod interfaces;
pub mod page_scraper;

pub use dbpedia::DbpediaClient;
pub use errors::SourceError;
pub use interfaces::{PageScraper, ResourceSource};
pub use page_scraper::{HtmlScraper, RateLimiter, ScraperConfig};
