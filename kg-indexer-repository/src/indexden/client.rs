//! Indexden client implementation.
//!
//! Implements `SearchIndexProvider` over the Indexden REST API:
//!
//! - `GET /v1/indexes/{name}` returns index metadata (404 when missing)
//! - `PUT /v1/indexes/{name}` creates an index (204 when it already exists)
//! - `PUT /v1/indexes/{name}/docs` upserts a JSON array of documents

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, Method, RequestBuilder, StatusCode};
use serde::Deserialize;
use tracing::{debug, error, info, instrument};
use url::Url;

use crate::errors::SearchIndexError;
use crate::interfaces::SearchIndexProvider;
use crate::types::{BatchOperationResult, BatchOperationSummary, IndexMetadata};
use kg_indexer_shared::Document;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Per-document status returned by a batch upsert.
#[derive(Debug, Deserialize)]
struct AddStatus {
    added: bool,
    #[serde(default)]
    error: Option<String>,
}

/// Indexden client.
///
/// The endpoint is the private API URL of the account, which usually embeds
/// credentials (`http://:secret@xyz.api.indexden.com`). Credentials are taken
/// out of the URL and sent as basic auth.
///
/// # Example
///
/// ```ignore
/// let client = IndexdenClient::new("http://:secret@xyz.api.indexden.com")?;
/// client.create_index("manga").await?;
/// ```
pub struct IndexdenClient {
    http: Client,
    base_url: Url,
    username: Option<String>,
    password: Option<String>,
}

impl IndexdenClient {
    /// Create a new client for the given endpoint.
    pub fn new(endpoint: &str) -> Result<Self, SearchIndexError> {
        let mut base_url =
            Url::parse(endpoint).map_err(|e| SearchIndexError::connection(e.to_string()))?;
        if base_url.cannot_be_a_base() {
            return Err(SearchIndexError::connection(format!(
                "endpoint {} is not a base URL",
                endpoint
            )));
        }

        let username = Some(base_url.username().to_string()).filter(|u| !u.is_empty());
        let password = base_url.password().map(str::to_string);
        let has_credentials = username.is_some() || password.is_some();
        base_url
            .set_username("")
            .and_then(|_| base_url.set_password(None))
            .map_err(|_| SearchIndexError::connection("cannot strip credentials from endpoint"))?;

        let http = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| SearchIndexError::connection(e.to_string()))?;

        info!(
            url = %base_url,
            authenticated = has_credentials,
            "Created Indexden client"
        );

        Ok(Self {
            http,
            base_url,
            username,
            password,
        })
    }

    /// Build `{base}/v1/indexes/{name}[/{suffix}]`, percent-encoding the name.
    fn index_url(&self, index_name: &str, suffix: Option<&str>) -> Result<Url, SearchIndexError> {
        let mut url = self.base_url.clone();
        {
            let mut segments = url
                .path_segments_mut()
                .map_err(|_| SearchIndexError::connection("endpoint is not a base URL"))?;
            segments.pop_if_empty().extend(["v1", "indexes", index_name]);
            if let Some(suffix) = suffix {
                segments.push(suffix);
            }
        }
        Ok(url)
    }

    fn request(&self, method: Method, url: Url) -> RequestBuilder {
        let builder = self.http.request(method, url);
        match (&self.username, &self.password) {
            (None, None) => builder,
            (username, password) => builder.basic_auth(
                username.clone().unwrap_or_default(),
                password.clone(),
            ),
        }
    }

    /// Map an upsert response body onto the batch that was sent.
    fn summarize(
        documents: &[Document],
        statuses: Vec<AddStatus>,
    ) -> Result<BatchOperationSummary, SearchIndexError> {
        if statuses.len() != documents.len() {
            return Err(SearchIndexError::parse(format!(
                "expected {} document statuses, got {}",
                documents.len(),
                statuses.len()
            )));
        }

        let results = documents
            .iter()
            .zip(statuses)
            .map(|(doc, status)| BatchOperationResult {
                docid: doc.docid.clone(),
                success: status.added,
                error: (!status.added).then(|| {
                    SearchIndexError::bulk_operation(
                        status.error.unwrap_or_else(|| "not added".to_string()),
                    )
                }),
            })
            .collect();

        Ok(BatchOperationSummary::from_results(results))
    }
}

#[async_trait]
impl SearchIndexProvider for IndexdenClient {
    #[instrument(skip(self))]
    async fn index_metadata(
        &self,
        index_name: &str,
    ) -> Result<Option<IndexMetadata>, SearchIndexError> {
        let url = self.index_url(index_name, None)?;
        let response = self
            .request(Method::GET, url)
            .send()
            .await
            .map_err(|e| SearchIndexError::connection(e.to_string()))?;

        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            error!(status = %status, body = %body, "Index metadata request failed");
            return Err(SearchIndexError::connection(format!(
                "Metadata request failed with status {}: {}",
                status, body
            )));
        }

        let mut metadata: IndexMetadata = response
            .json()
            .await
            .map_err(|e| SearchIndexError::parse(e.to_string()))?;
        metadata.name = index_name.to_string();
        Ok(Some(metadata))
    }

    #[instrument(skip(self))]
    async fn create_index(&self, index_name: &str) -> Result<(), SearchIndexError> {
        let url = self.index_url(index_name, None)?;
        let response = self
            .request(Method::PUT, url)
            .send()
            .await
            .map_err(|e| SearchIndexError::index_creation(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            error!(status = %status, body = %body, "Index creation failed");
            return Err(SearchIndexError::index_creation(format!(
                "Create failed with status {}: {}",
                status, body
            )));
        }

        if status == StatusCode::NO_CONTENT {
            debug!("Index already existed");
        } else {
            info!("Index created");
        }
        Ok(())
    }

    #[instrument(skip(self, documents), fields(count = documents.len()))]
    async fn upsert_documents(
        &self,
        index_name: &str,
        documents: &[Document],
    ) -> Result<BatchOperationSummary, SearchIndexError> {
        let url = self.index_url(index_name, Some("docs"))?;
        let response = self
            .request(Method::PUT, url)
            .json(documents)
            .send()
            .await
            .map_err(|e| SearchIndexError::connection(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            error!(status = %status, body = %body, "Batch upsert failed");
            return Err(SearchIndexError::bulk_operation(format!(
                "Upsert failed with status {}: {}",
                status, body
            )));
        }

        let statuses: Vec<AddStatus> = response
            .json()
            .await
            .map_err(|e| SearchIndexError::parse(e.to_string()))?;

        Self::summarize(documents, statuses)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_credentials_are_taken_out_of_the_url() {
        let client = IndexdenClient::new("http://:s3cret@abc.api.indexden.com").unwrap();

        assert_eq!(client.username, None);
        assert_eq!(client.password.as_deref(), Some("s3cret"));
        assert_eq!(client.base_url.as_str(), "http://abc.api.indexden.com/");
    }

    #[test]
    fn test_username_and_password_are_both_stripped() {
        let client = IndexdenClient::new("https://admin:pw@abc.api.indexden.com/base").unwrap();

        assert_eq!(client.username.as_deref(), Some("admin"));
        assert_eq!(client.password.as_deref(), Some("pw"));
        assert_eq!(client.base_url.username(), "");
        assert_eq!(client.base_url.password(), None);
        assert_eq!(
            client.index_url("manga", None).unwrap().as_str(),
            "https://abc.api.indexden.com/base/v1/indexes/manga"
        );
    }

    #[test]
    fn test_index_url() {
        let client = IndexdenClient::new("http://abc.api.indexden.com").unwrap();

        let url = client.index_url("manga", None).unwrap();
        assert_eq!(url.as_str(), "http://abc.api.indexden.com/v1/indexes/manga");

        let url = client.index_url("manga", Some("docs")).unwrap();
        assert_eq!(url.as_str(), "http://abc.api.indexden.com/v1/indexes/manga/docs");
    }

    #[test]
    fn test_index_url_encodes_name() {
        let client = IndexdenClient::new("http://abc.api.indexden.com/").unwrap();

        let url = client.index_url("my index", None).unwrap();
        assert_eq!(url.as_str(), "http://abc.api.indexden.com/v1/indexes/my%20index");
    }

    #[test]
    fn test_invalid_endpoint() {
        assert!(matches!(
            IndexdenClient::new("not a url"),
            Err(SearchIndexError::ConnectionError(_))
        ));
    }

    #[test]
    fn test_summarize_statuses() {
        let documents = vec![Document::new("a"), Document::new("b")];
        let statuses: Vec<AddStatus> = serde_json::from_str(
            r#"[{"added": true}, {"added": false, "error": "Invalid argument"}]"#,
        )
        .unwrap();

        let summary = IndexdenClient::summarize(&documents, statuses).unwrap();

        assert_eq!(summary.succeeded, 1);
        assert_eq!(summary.failed, 1);
        let failure = summary.first_failure().unwrap();
        assert_eq!(failure.docid, "b");
        assert!(failure
            .error
            .as_ref()
            .unwrap()
            .to_string()
            .contains("Invalid argument"));
    }

    #[test]
    fn test_summarize_length_mismatch() {
        let documents = vec![Document::new("a")];
        let result = IndexdenClient::summarize(&documents, vec![]);
        assert!(matches!(result, Err(SearchIndexError::ParseError(_))));
    }

    #[test]
    fn test_metadata_deserializes() {
        let metadata: IndexMetadata = serde_json::from_str(
            r#"{"started": true, "code": "dsyaj", "creation_time": "2010-08-14T13:01:48", "size": 2107}"#,
        )
        .unwrap();

        assert_eq!(metadata.started, Some(true));
        assert_eq!(metadata.size, Some(2107));
        assert_eq!(metadata.creation_time.as_deref(), Some("2010-08-14T13:01:48"));
    }
}
