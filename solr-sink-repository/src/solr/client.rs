//! Solr client implementation.
//!
//! This module provides the concrete implementation of `IndexClient`
//! using Solr's JSON update API over HTTP.

use async_trait::async_trait;
use reqwest::Client;
use serde::Serialize;
use tokio::sync::Semaphore;
use tracing::{debug, error, info, instrument, warn};
use url::Url;

use crate::config::ClientConfig;
use crate::errors::IndexError;
use crate::interfaces::IndexClient;
use crate::solr::protocol::{self, AddCommand, CommitCommand, ResponseHeader};
use solr_sink_shared::Document;

/// Solr client implementation.
///
/// Documents are posted one at a time to the configured update handler;
/// commits are explicit.
///
/// # Example
///
/// ```ignore
/// let client = SolrClient::new("http://localhost:8983/solr/core1/update", ClientConfig::default())?;
///
/// let mut doc = Document::new();
/// doc.add_field("id", "42");
/// client.submit(&doc).await?;
/// client.commit().await?;
/// ```
pub struct SolrClient {
    client: Client,
    endpoint: String,
    update_url: Url,
    ping_url: Url,
    permits: Semaphore,
}

/// Why an update request failed, before it is tagged as submit or commit.
struct UpdateFailure {
    status: Option<i32>,
    reason: String,
}

impl UpdateFailure {
    fn new(status: Option<i32>, reason: impl Into<String>) -> Self {
        Self {
            status,
            reason: reason.into(),
        }
    }
}

impl SolrClient {
    /// Create a new Solr client for the given update handler URL.
    ///
    /// # Arguments
    ///
    /// * `endpoint` - The update handler URL (e.g., "http://localhost:8983/solr/core1/update")
    /// * `config` - Timeouts and connection limits
    ///
    /// # Returns
    ///
    /// * `Ok(SolrClient)` - A new client instance
    /// * `Err(IndexError::InvalidEndpoint)` - If the URL cannot be parsed
    /// * `Err(IndexError)` - If the configuration is invalid or the HTTP client cannot be built
    pub fn new(endpoint: &str, config: ClientConfig) -> Result<Self, IndexError> {
        config.validate()?;
        let parsed_url = Self::parse_endpoint(endpoint)?;

        let client = Client::builder()
            .connect_timeout(config.connect_timeout)
            .timeout(config.request_timeout)
            .pool_max_idle_per_host(config.max_connections_per_host)
            .no_proxy()
            .build()
            .map_err(|e| IndexError::connection(e.to_string()))?;

        let mut update_url = parsed_url.clone();
        update_url.query_pairs_mut().append_pair("wt", "json");
        let ping_url = Self::ping_url(&parsed_url);

        info!(
            endpoint = %endpoint,
            connect_timeout = ?config.connect_timeout,
            request_timeout = ?config.request_timeout,
            max_connections_per_host = config.max_connections_per_host,
            max_total_connections = config.max_total_connections,
            "Created Solr client"
        );

        Ok(Self {
            client,
            endpoint: endpoint.to_string(),
            update_url,
            ping_url,
            permits: Semaphore::new(config.max_total_connections),
        })
    }

    fn parse_endpoint(endpoint: &str) -> Result<Url, IndexError> {
        let url =
            Url::parse(endpoint).map_err(|e| IndexError::invalid_endpoint(endpoint, e.to_string()))?;

        match url.scheme() {
            "http" | "https" => Ok(url),
            other => Err(IndexError::invalid_endpoint(
                endpoint,
                format!("unsupported scheme {}", other),
            )),
        }
    }

    /// Derive the ping handler from the update handler.
    ///
    /// `.../core1/update` becomes `.../core1/admin/ping`.
    fn ping_url(endpoint: &Url) -> Url {
        let path = endpoint.path().trim_end_matches('/');
        let base = path.strip_suffix("/update").unwrap_or(path);

        let mut url = endpoint.clone();
        url.set_path(&format!("{}/admin/ping", base));
        url.set_query(Some("wt=json"));
        url
    }

    /// Post a command to the update handler and check the acknowledgement.
    async fn send_update<T: Serialize + ?Sized>(
        &self,
        body: &T,
    ) -> Result<ResponseHeader, UpdateFailure> {
        let _permit = self
            .permits
            .acquire()
            .await
            .map_err(|_| UpdateFailure::new(None, "client is closed"))?;

        let response = self
            .client
            .post(self.update_url.clone())
            .json(body)
            .send()
            .await
            .map_err(|e| UpdateFailure::new(None, format!("no response: {}", e)))?;

        let status = response.status();
        let http_status = Some(i32::from(status.as_u16()));
        let text = response.text().await.map_err(|e| {
            UpdateFailure::new(http_status, format!("failed to read response: {}", e))
        })?;

        if !status.is_success() {
            let detail = protocol::error_message(&text).unwrap_or(text);
            error!(status = %status, body = %detail, "Update request failed");
            return Err(UpdateFailure::new(
                http_status,
                format!("HTTP {}: {}", status, detail),
            ));
        }

        let header = protocol::parse_update_response(&text)
            .map_err(|e| UpdateFailure::new(None, format!("malformed response: {}", e)))?;

        if header.status != 0 {
            error!(status = header.status, "Solr rejected update");
            return Err(UpdateFailure::new(
                Some(header.status),
                format!("Solr status {}", header.status),
            ));
        }

        Ok(header)
    }
}

#[async_trait]
impl IndexClient for SolrClient {
    #[instrument(skip(self, document), fields(endpoint = %self.endpoint, fields = document.len()))]
    async fn submit(&self, document: &Document) -> Result<(), IndexError> {
        let header = self
            .send_update(&AddCommand::new(document))
            .await
            .map_err(|f| IndexError::submission(&self.endpoint, f.status, f.reason))?;

        debug!(qtime = ?header.qtime, "Document added");
        Ok(())
    }

    #[instrument(skip(self), fields(endpoint = %self.endpoint))]
    async fn commit(&self) -> Result<(), IndexError> {
        let header = self
            .send_update(&CommitCommand::new())
            .await
            .map_err(|f| IndexError::commit(&self.endpoint, f.status, f.reason))?;

        debug!(qtime = ?header.qtime, "Commit acknowledged");
        Ok(())
    }

    async fn ping(&self) -> Result<bool, IndexError> {
        let _permit = self
            .permits
            .acquire()
            .await
            .map_err(|_| IndexError::connection("client is closed"))?;

        let response = self
            .client
            .get(self.ping_url.clone())
            .send()
            .await
            .map_err(|e| IndexError::connection(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            warn!(status = %status, url = %self.ping_url, "Ping returned non-success status");
            return Ok(false);
        }

        let text = response
            .text()
            .await
            .map_err(|e| IndexError::connection(e.to_string()))?;

        Ok(protocol::ping_ok(&text))
    }

    fn endpoint(&self) -> &str {
        &self.endpoint
    }

    fn close(&self) {
        self.permits.close();
        info!(endpoint = %self.endpoint, "Closed Solr client");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::time::Duration;
    use wiremock::matchers::{body_json, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn ok_body() -> serde_json::Value {
        json!({"responseHeader": {"status": 0, "QTime": 1}})
    }

    fn title_doc(title: &str) -> Document {
        let mut doc = Document::new();
        doc.add_field("doc_title", title);
        doc
    }

    async fn client_for(server: &MockServer) -> SolrClient {
        SolrClient::new(&format!("{}/update", server.uri()), ClientConfig::default()).unwrap()
    }

    #[test]
    fn test_invalid_endpoint() {
        let err = SolrClient::new("not a url", ClientConfig::default()).err().unwrap();
        assert!(matches!(err, IndexError::InvalidEndpoint { ref endpoint, .. } if endpoint == "not a url"));

        let err = SolrClient::new("ftp://idx.example/update", ClientConfig::default())
            .err()
            .unwrap();
        assert!(matches!(err, IndexError::InvalidEndpoint { .. }));
    }

    #[test]
    fn test_invalid_config() {
        let config = ClientConfig::default().with_connection_limits(100, 0);
        let err = SolrClient::new("http://idx.example/update", config).err().unwrap();
        assert!(matches!(err, IndexError::InvalidConfig(_)));
    }

    #[test]
    fn test_sub_millisecond_timeouts_accepted() {
        let config = ClientConfig::default()
            .with_connect_timeout(Duration::from_micros(500))
            .with_request_timeout(Duration::from_micros(750));

        let client = SolrClient::new("http://localhost:8983/solr/core1/update", config).unwrap();

        assert_eq!(client.endpoint(), "http://localhost:8983/solr/core1/update");
    }

    #[test]
    fn test_ping_url() {
        let url = Url::parse("http://localhost:8983/solr/core1/update").unwrap();
        assert_eq!(
            SolrClient::ping_url(&url).as_str(),
            "http://localhost:8983/solr/core1/admin/ping?wt=json"
        );

        let url = Url::parse("http://idx.example/update/").unwrap();
        assert_eq!(
            SolrClient::ping_url(&url).as_str(),
            "http://idx.example/admin/ping?wt=json"
        );
    }

    #[tokio::test]
    async fn test_submit_success() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/update"))
            .and(query_param("wt", "json"))
            .and(body_json(json!({"add": {"doc": {"doc_title": "A"}}})))
            .respond_with(ResponseTemplate::new(200).set_body_json(ok_body()))
            .expect(1)
            .mount(&server)
            .await;

        let client = client_for(&server).await;
        client.submit(&title_doc("A")).await.unwrap();
    }

    #[tokio::test]
    async fn test_submit_nonzero_solr_status() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/update"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!({"responseHeader": {"status": 1, "QTime": 0}})),
            )
            .mount(&server)
            .await;

        let client = client_for(&server).await;
        let err = client.submit(&title_doc("A")).await.unwrap_err();

        assert!(matches!(err, IndexError::Submission { status: Some(1), .. }));
    }

    #[tokio::test]
    async fn test_submit_http_error_carries_message() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/update"))
            .respond_with(ResponseTemplate::new(400).set_body_json(json!({
                "responseHeader": {"status": 400, "QTime": 0},
                "error": {"msg": "unknown field 'doc_title'", "code": 400}
            })))
            .mount(&server)
            .await;

        let client = client_for(&server).await;
        let err = client.submit(&title_doc("A")).await.unwrap_err();

        assert_eq!(err.status(), Some(400));
        assert!(err.to_string().contains("unknown field 'doc_title'"));
        assert!(err.to_string().contains(&server.uri()));
    }

    #[tokio::test]
    async fn test_submit_malformed_response() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/update"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>ok</html>"))
            .mount(&server)
            .await;

        let client = client_for(&server).await;
        let err = client.submit(&title_doc("A")).await.unwrap_err();

        assert!(matches!(err, IndexError::Submission { status: None, .. }));
        assert!(err.to_string().contains("malformed response"));
    }

    #[tokio::test]
    async fn test_submit_without_response() {
        let config = ClientConfig::default()
            .with_connect_timeout(Duration::from_millis(500))
            .with_request_timeout(Duration::from_secs(1));
        let client = SolrClient::new("http://127.0.0.1:1/update", config).unwrap();

        let err = client.submit(&title_doc("A")).await.unwrap_err();

        assert!(matches!(err, IndexError::Submission { status: None, .. }));
    }

    #[tokio::test]
    async fn test_commit_success() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/update"))
            .and(body_json(json!({"commit": {}})))
            .respond_with(ResponseTemplate::new(200).set_body_json(ok_body()))
            .expect(1)
            .mount(&server)
            .await;

        let client = client_for(&server).await;
        client.commit().await.unwrap();
    }

    #[tokio::test]
    async fn test_commit_failure() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/update"))
            .respond_with(ResponseTemplate::new(503).set_body_string("unavailable"))
            .mount(&server)
            .await;

        let client = client_for(&server).await;
        let err = client.commit().await.unwrap_err();

        assert!(matches!(err, IndexError::Commit { status: Some(503), .. }));
    }

    #[tokio::test]
    async fn test_ping() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/admin/ping"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!({"responseHeader": {"status": 0}, "status": "OK"})),
            )
            .mount(&server)
            .await;

        let client = client_for(&server).await;
        assert!(client.ping().await.unwrap());
    }

    #[tokio::test]
    async fn test_closed_client_rejects_submit() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(ok_body()))
            .expect(0)
            .mount(&server)
            .await;

        let client = client_for(&server).await;
        client.close();

        let err = client.submit(&title_doc("A")).await.unwrap_err();
        assert!(matches!(err, IndexError::Submission { .. }));
        assert!(matches!(client.ping().await, Err(IndexError::ConnectionError(_))));
    }
}
