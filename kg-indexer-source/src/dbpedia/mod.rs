//! DBpedia implementation of the resource source.

mod client;
mod queries;

pub use client::DbpediaClient;
pub use queries::{build_count_query, build_page_query};

/// Public SPARQL endpoint of DBpedia.
pub const DEFAULT_SPARQL_ENDPOINT: &str = "https://dbpedia.org/sparql";

/// Prefix of every DBpedia resource URI.
pub const RESOURCE_PREFIX: &str = "http://dbpedia.org/resource/";

/// Base URL of the English Wikipedia article namespace.
pub const WIKIPEDIA_BASE_URL: &str = "https://en.wikipedia.org/wiki/";

/// Map a resource URI to the URL of its companion Wikipedia article.
///
/// Returns `None` when the identifier is not a DBpedia resource URI.
pub fn companion_page_url(docid: &str, resource_prefix: &str, base_url: &str) -> Option<String> {
    docid
        .strip_prefix(resource_prefix)
        .filter(|name| !name.is_empty())
        .map(|name| format!("{}{}", base_url, name))
}
