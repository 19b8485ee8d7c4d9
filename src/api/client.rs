//! HTTP implementation of the crawl API
//!
//! This module handles all requests to the crawl service, including:
//! - Building the HTTP client from configuration
//! - Resolving endpoint paths against the configured base address
//! - Classifying transport failures, non-2xx responses and bad payloads

use crate::api::payload::{
    BrokenLinksResponse, CreateRequest, ErrorResponse, IdsRequest, ListResponse,
};
use crate::api::CrawlApi;
use crate::config::ApiConfig;
use crate::model::{BrokenLink, Record, RecordId};
use crate::{ApiError, ApiResult};
use async_trait::async_trait;
use reqwest::header::{ACCEPT, CONTENT_TYPE};
use reqwest::{Client, Method, StatusCode};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::time::Duration;
use url::Url;

/// Longest slice of a response body quoted in error messages
const MAX_ERROR_BODY_CHARS: usize = 200;

/// Builds an HTTP client with proper configuration
///
/// # Arguments
///
/// * `config` - The API connection configuration
///
/// # Returns
///
/// * `Ok(Client)` - Successfully built HTTP client
/// * `Err(reqwest::Error)` - Failed to build client
pub fn build_http_client(config: &ApiConfig) -> Result<Client, reqwest::Error> {
    Client::builder()
        .user_agent(config.user_agent.as_str())
        .timeout(Duration::from_secs(config.timeout_secs))
        .connect_timeout(Duration::from_secs(config.connect_timeout_secs))
        .gzip(true)
        .brotli(true)
        .build()
}

/// Crawl API client over HTTP/JSON
///
/// Constructed once and handed to every view that needs it; there is no
/// process-wide default base address.
#[derive(Debug, Clone)]
pub struct HttpCrawlApi {
    client: Client,
    base_url: Url,
}

impl HttpCrawlApi {
    /// Creates a client from configuration
    pub fn new(config: &ApiConfig) -> ApiResult<Self> {
        let client = build_http_client(config).map_err(|e| ApiError::Transport {
            url: config.base_url.clone(),
            source: e,
        })?;
        Self::with_client(client, &config.base_url)
    }

    /// Creates a client around an existing `reqwest::Client`
    pub fn with_client(client: Client, base_url: &str) -> ApiResult<Self> {
        let base_url = Url::parse(base_url)
            .map_err(|e| ApiError::Endpoint(format!("{}: {}", base_url, e)))?;

        if base_url.cannot_be_a_base() {
            return Err(ApiError::Endpoint(format!(
                "{} cannot be used as a base URL",
                base_url
            )));
        }

        Ok(Self { client, base_url })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Appends path segments to the base URL, percent-encoding each one
    pub fn endpoint(&self, segments: &[&str]) -> ApiResult<Url> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| {
                ApiError::Endpoint(format!("{} cannot be used as a base URL", self.base_url))
            })?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    /// Sends a request and returns the body of a 2xx response
    async fn execute(&self, method: Method, url: Url, body: Option<Vec<u8>>) -> ApiResult<String> {
        tracing::debug!("{} {}", method, url);

        let mut request = self
            .client
            .request(method.clone(), url.clone())
            .header(ACCEPT, "application/json");
        if let Some(body) = body {
            request = request.header(CONTENT_TYPE, "application/json").body(body);
        }

        let response = request
            .send()
            .await
            .map_err(|e| classify_transport_error(e, &url))?;

        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|e| classify_transport_error(e, &url))?;

        tracing::debug!("{} {} -> {}", method, url, status.as_u16());

        if !status.is_success() {
            let message = error_message(status, &text);
            tracing::warn!("{} {} failed with HTTP {}: {}", method, url, status.as_u16(), message);
            return Err(ApiError::Status {
                method: method.to_string(),
                url: url.to_string(),
                status: status.as_u16(),
                message,
            });
        }

        Ok(text)
    }

    async fn get_json<T: DeserializeOwned>(&self, segments: &[&str]) -> ApiResult<T> {
        let url = self.endpoint(segments)?;
        let text = self.execute(Method::GET, url.clone(), None).await?;
        parse_json(&text, &url)
    }

    async fn send_json<B: Serialize + ?Sized>(
        &self,
        method: Method,
        segments: &[&str],
        body: &B,
    ) -> ApiResult<String> {
        let url = self.endpoint(segments)?;
        let payload = serde_json::to_vec(body).map_err(|e| {
            ApiError::InvalidRequest(format!("failed to encode body for {}: {}", url, e))
        })?;
        self.execute(method, url, Some(payload)).await
    }

    async fn send_empty(&self, method: Method, segments: &[&str]) -> ApiResult<()> {
        let url = self.endpoint(segments)?;
        self.execute(method, url, None).await.map(|_| ())
    }
}

#[async_trait]
impl CrawlApi for HttpCrawlApi {
    async fn list_records(&self) -> ApiResult<Vec<Record>> {
        let response: ListResponse = self.get_json(&["urls"]).await?;
        Ok(response.urls)
    }

    async fn get_record(&self, id: &RecordId) -> ApiResult<Record> {
        let id = id.to_string();
        self.get_json(&["urls", &id]).await
    }

    async fn list_broken_links(&self, id: &RecordId) -> ApiResult<Vec<BrokenLink>> {
        let id = id.to_string();
        let response: BrokenLinksResponse = self.get_json(&["urls", &id, "broken"]).await?;
        Ok(response.broken_links)
    }

    async fn create_record(&self, url: &str) -> ApiResult<Option<Record>> {
        let text = self
            .send_json(Method::POST, &["urls"], &CreateRequest { url })
            .await?;

        if text.trim().is_empty() {
            return Ok(None);
        }

        // The body is informational; the list refresh that follows is authoritative.
        match serde_json::from_str::<Record>(&text) {
            Ok(record) => Ok(Some(record)),
            Err(e) => {
                tracing::debug!("Ignoring unrecognised create response: {}", e);
                Ok(None)
            }
        }
    }

    async fn delete_record(&self, id: &RecordId) -> ApiResult<()> {
        let id = id.to_string();
        self.send_empty(Method::DELETE, &["urls", &id]).await
    }

    async fn bulk_delete(&self, ids: &[RecordId]) -> ApiResult<()> {
        self.send_json(Method::POST, &["urls", "bulk-delete"], &IdsRequest { ids })
            .await
            .map(|_| ())
    }

    async fn bulk_rerun(&self, ids: &[RecordId]) -> ApiResult<()> {
        self.send_json(Method::POST, &["urls", "bulk-restart"], &IdsRequest { ids })
            .await
            .map(|_| ())
    }

    async fn start(&self, id: &RecordId) -> ApiResult<()> {
        let id = id.to_string();
        self.send_empty(Method::PUT, &["urls", &id, "start"]).await
    }

    async fn stop(&self, id: &RecordId) -> ApiResult<()> {
        let id = id.to_string();
        self.send_empty(Method::PUT, &["urls", &id, "stop"]).await
    }
}

/// Maps a reqwest failure to the matching `ApiError`
fn classify_transport_error(error: reqwest::Error, url: &Url) -> ApiError {
    if error.is_timeout() {
        ApiError::Timeout {
            url: url.to_string(),
        }
    } else {
        ApiError::Transport {
            url: url.to_string(),
            source: error,
        }
    }
}

/// Parses a JSON body, reporting malformed payloads as `ApiError::Decode`
fn parse_json<T: DeserializeOwned>(text: &str, url: &Url) -> ApiResult<T> {
    serde_json::from_str(text).map_err(|e| {
        tracing::warn!("Malformed response from {}: {}", url, e);
        ApiError::Decode {
            url: url.to_string(),
            detail: e.to_string(),
        }
    })
}

/// Picks a readable message out of an error response
///
/// Prefers the service's `{"error": "..."}` body, then the raw body, then the
/// status reason phrase.
fn error_message(status: StatusCode, body: &str) -> String {
    if let Ok(parsed) = serde_json::from_str::<ErrorResponse>(body) {
        return parsed.error;
    }

    let trimmed = body.trim();
    if !trimmed.is_empty() {
        return trimmed.chars().take(MAX_ERROR_BODY_CHARS).collect();
    }

    status
        .canonical_reason()
        .unwrap_or("unexpected status")
        .to_string()
}
