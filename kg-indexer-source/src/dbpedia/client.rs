//! DBpedia SPARQL client.

use std::collections::HashMap;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use tracing::{debug, error, instrument};
use url::Url;

use super::queries::{build_count_query, build_page_query};
use crate::errors::SourceError;
use crate::interfaces::ResourceSource;
use kg_indexer_shared::{Resource, ResourceCategory};

const REQUEST_TIMEOUT: Duration = Duration::from_secs(60);

/// SPARQL JSON results envelope.
#[derive(Debug, Deserialize)]
struct SparqlResponse {
    results: SparqlResults,
}

#[derive(Debug, Deserialize)]
struct SparqlResults {
    bindings: Vec<HashMap<String, SparqlValue>>,
}

#[derive(Debug, Deserialize)]
struct SparqlValue {
    value: String,
}

/// Client for a DBpedia-compatible SPARQL endpoint.
pub struct DbpediaClient {
    http: Client,
    endpoint: Url,
    lang: String,
}

impl DbpediaClient {
    /// Create a client for `endpoint`, requesting English abstracts.
    pub fn new(endpoint: &str) -> Result<Self, SourceError> {
        let endpoint = Url::parse(endpoint).map_err(|e| SourceError::parse(e.to_string()))?;
        let http = Client::builder().timeout(REQUEST_TIMEOUT).build()?;

        Ok(Self {
            http,
            endpoint,
            lang: "en".to_string(),
        })
    }

    /// Request abstracts in another language.
    pub fn with_lang(mut self, lang: impl Into<String>) -> Self {
        self.lang = lang.into();
        self
    }

    async fn run_query(&self, query: &str) -> Result<SparqlResponse, SourceError> {
        let response = self
            .http
            .get(self.endpoint.clone())
            .query(&[("query", query), ("format", "application/json")])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            error!(status = %status, body = %body, "SPARQL query failed");
            return Err(SourceError::status(status.as_u16(), body));
        }

        let text = response.text().await?;
        serde_json::from_str(&text).map_err(|e| SourceError::parse(e.to_string()))
    }

    fn parse_count(response: SparqlResponse) -> Result<u64, SourceError> {
        let value = response
            .results
            .bindings
            .into_iter()
            .next()
            .and_then(|mut binding| binding.remove("count"))
            .ok_or_else(|| SourceError::parse("count query returned no binding"))?;

        value
            .value
            .parse()
            .map_err(|_| SourceError::parse(format!("invalid count {:?}", value.value)))
    }

    fn parse_resources(response: SparqlResponse) -> Vec<Resource> {
        response
            .results
            .bindings
            .into_iter()
            .filter_map(|mut binding| {
                let subject = binding.remove("s")?;
                let mut resource = Resource::new(subject.value);
                if let Some(text) = binding.remove("a") {
                    resource.set_abstract(text.value);
                }
                Some(resource)
            })
            .collect()
    }
}

#[async_trait]
impl ResourceSource for DbpediaClient {
    #[instrument(skip(self), fields(category = %category))]
    async fn count_resources(&self, category: &ResourceCategory) -> Result<u64, SourceError> {
        let response = self.run_query(&build_count_query(category)).await?;
        let count = Self::parse_count(response)?;
        debug!(count = count, "Counted resources");
        Ok(count)
    }

    #[instrument(skip(self), fields(category = %category))]
    async fn fetch_page(
        &self,
        category: &ResourceCategory,
        limit: u64,
        offset: u64,
    ) -> Result<Vec<Resource>, SourceError> {
        let query = build_page_query(category, limit, offset, &self.lang);
        let response = self.run_query(&query).await?;
        let resources = Self::parse_resources(response);
        debug!(count = resources.len(), "Fetched resources");
        Ok(resources)
    }
}
