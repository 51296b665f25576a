//! OpenSearch client implementation.
//!
//! This module provides the concrete implementation of `SearchIndexProvider`
//! using the OpenSearch Rust client.

use async_trait::async_trait;
use opensearch::{
    http::request::JsonBody,
    http::transport::{SingleNodeConnectionPool, TransportBuilder},
    indices::{IndicesCreateParts, IndicesGetParts},
    BulkParts, OpenSearch,
};
use serde_json::{json, Map, Value};
use tracing::{debug, error, info, instrument};
use url::Url;

use crate::errors::SearchIndexError;
use crate::interfaces::SearchIndexProvider;
use crate::opensearch::index_config::get_index_settings;
use crate::types::{BatchOperationResult, BatchOperationSummary, IndexMetadata};
use kg_indexer_shared::Document;

/// OpenSearch client implementation.
///
/// Documents are written with bulk `index` operations keyed by `docid`, so a
/// repeated push replaces the earlier version.
///
/// # Example
///
/// ```ignore
/// let client = OpenSearchClient::new("http://localhost:9200").await?;
/// client.create_index("manga").await?;
/// ```
pub struct OpenSearchClient {
    client: OpenSearch,
}

impl OpenSearchClient {
    /// Create a new OpenSearch client connected to the specified URL.
    ///
    /// # Arguments
    ///
    /// * `url` - The OpenSearch server URL (e.g., "http://localhost:9200")
    ///
    /// # Returns
    ///
    /// * `Ok(OpenSearchClient)` - A new client instance
    /// * `Err(SearchIndexError)` - If connection setup fails
    pub async fn new(url: &str) -> Result<Self, SearchIndexError> {
        let parsed_url =
            Url::parse(url).map_err(|e| SearchIndexError::connection(e.to_string()))?;

        let conn_pool = SingleNodeConnectionPool::new(parsed_url);
        let transport = TransportBuilder::new(conn_pool)
            .disable_proxy()
            .build()
            .map_err(|e| SearchIndexError::connection(e.to_string()))?;

        let client = OpenSearch::new(transport);

        info!(url = %url, "Created OpenSearch client");

        Ok(Self { client })
    }

    /// Build the `_source` of a document: its fields at the top level plus
    /// a `categories` object.
    fn document_source(document: &Document) -> Value {
        let mut source: Map<String, Value> = document
            .fields
            .iter()
            .map(|(name, value)| (name.clone(), json!(value)))
            .collect();
        if !document.categories.is_empty() {
            source.insert("categories".to_string(), json!(document.categories));
        }
        Value::Object(source)
    }

    /// Build the alternating action/source lines of a bulk request.
    fn bulk_lines(documents: &[Document]) -> Vec<Value> {
        documents
            .iter()
            .flat_map(|doc| {
                [
                    json!({ "index": { "_id": doc.docid } }),
                    Self::document_source(doc),
                ]
            })
            .collect()
    }

    /// Map a bulk response onto the batch that was sent.
    fn parse_bulk_response(
        documents: &[Document],
        body: &Value,
    ) -> Result<BatchOperationSummary, SearchIndexError> {
        let items = body["items"]
            .as_array()
            .ok_or_else(|| SearchIndexError::parse("bulk response has no items"))?;

        if items.len() != documents.len() {
            return Err(SearchIndexError::parse(format!(
                "expected {} bulk items, got {}",
                documents.len(),
                items.len()
            )));
        }

        let results = documents
            .iter()
            .zip(items)
            .map(|(doc, item)| {
                let outcome = &item["index"];
                let failure = outcome.get("error").map(|err| {
                    let reason = err["reason"]
                        .as_str()
                        .map(str::to_string)
                        .unwrap_or_else(|| err.to_string());
                    SearchIndexError::bulk_operation(reason)
                });
                BatchOperationResult {
                    docid: doc.docid.clone(),
                    success: failure.is_none(),
                    error: failure,
                }
            })
            .collect();

        Ok(BatchOperationSummary::from_results(results))
    }
}

#[async_trait]
impl SearchIndexProvider for OpenSearchClient {
    #[instrument(skip(self))]
    async fn index_metadata(
        &self,
        index_name: &str,
    ) -> Result<Option<IndexMetadata>, SearchIndexError> {
        let response = self
            .client
            .indices()
            .get(IndicesGetParts::Index(&[index_name]))
            .send()
            .await
            .map_err(|e| SearchIndexError::connection(e.to_string()))?;

        let status = response.status_code();
        if status.as_u16() == 404 {
            return Ok(None);
        }
        if !status.is_success() {
            let error_body = response.text().await.unwrap_or_default();
            error!(status = %status, body = %error_body, "Index lookup failed");
            return Err(SearchIndexError::connection(format!(
                "Index lookup failed with status {}: {}",
                status, error_body
            )));
        }

        let body: Value = response
            .json()
            .await
            .map_err(|e| SearchIndexError::parse(e.to_string()))?;
        let creation_time = body[index_name]["settings"]["index"]["creation_date"]
            .as_str()
            .map(str::to_string);

        Ok(Some(IndexMetadata {
            name: index_name.to_string(),
            started: Some(true),
            size: None,
            creation_time,
        }))
    }

    #[instrument(skip(self))]
    async fn create_index(&self, index_name: &str) -> Result<(), SearchIndexError> {
        let response = self
            .client
            .indices()
            .create(IndicesCreateParts::Index(index_name))
            .body(get_index_settings())
            .send()
            .await
            .map_err(|e| SearchIndexError::index_creation(e.to_string()))?;

        let status = response.status_code();
        if status.is_success() {
            info!("Index created");
            return Ok(());
        }

        let error_body = response.text().await.unwrap_or_default();
        if error_body.contains("resource_already_exists_exception") {
            debug!("Index already existed");
            return Ok(());
        }

        error!(status = %status, body = %error_body, "Index creation failed");
        Err(SearchIndexError::index_creation(format!(
            "Create failed with status {}: {}",
            status, error_body
        )))
    }

    #[instrument(skip(self, documents), fields(count = documents.len()))]
    async fn upsert_documents(
        &self,
        index_name: &str,
        documents: &[Document],
    ) -> Result<BatchOperationSummary, SearchIndexError> {
        let body: Vec<JsonBody<Value>> = Self::bulk_lines(documents)
            .into_iter()
            .map(JsonBody::new)
            .collect();

        let response = self
            .client
            .bulk(BulkParts::Index(index_name))
            .body(body)
            .send()
            .await
            .map_err(|e| SearchIndexError::connection(e.to_string()))?;

        let status = response.status_code();
        if !status.is_success() {
            let error_body = response.text().await.unwrap_or_default();
            error!(status = %status, body = %error_body, "Bulk request failed");
            return Err(SearchIndexError::bulk_operation(format!(
                "Bulk failed with status {}: {}",
                status, error_body
            )));
        }

        let body: Value = response
            .json()
            .await
            .map_err(|e| SearchIndexError::parse(e.to_string()))?;

        Self::parse_bulk_response(documents, &body)
    }
}
