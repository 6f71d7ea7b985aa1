//! Authenticated HTTP client for the remote movie catalog (TMDB-shaped API).
//!
//! Every request carries the configured API credential as an `api_key` query
//! parameter and targets a fixed base origin. Callers get back the upstream
//! page envelope or a typed error; retry policy is left to them (the caches
//! surface failures per entry instead of retrying).

use std::time::Duration;

use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use thiserror::Error;

use crate::catalog::endpoint::{resolve, EndpointError};
use crate::config::Config;
use crate::model::{Movie, PageEnvelope};

#[derive(Debug, Error)]
pub enum CatalogError {
    /// Network-level error (DNS, connection, TLS, etc.)
    #[error("Request failed: {0}")]
    Network(#[from] reqwest::Error),
    /// HTTP response with non-2xx status code
    #[error("Catalog API error: status {0}")]
    Status(u16),
    /// Request exceeded the configured timeout
    #[error("Request timed out")]
    Timeout,
    /// Response body was not a valid page envelope
    #[error("Malformed response: {0}")]
    Decode(String),
    /// Endpoint descriptor could not be resolved
    #[error(transparent)]
    Endpoint(#[from] EndpointError),
}

/// TMDB video list shape, used only for trailer lookup.
#[derive(Debug, Deserialize)]
struct VideoList {
    #[serde(default)]
    results: Vec<Video>,
}

#[derive(Debug, Deserialize)]
struct Video {
    key: String,
    site: String,
    #[serde(rename = "type")]
    kind: String,
}

#[derive(Clone)]
pub struct CatalogClient {
    http: reqwest::Client,
    base_url: String,
    api_key: Option<SecretString>,
    timeout: Duration,
}

impl CatalogClient {
    /// Build a client from configuration. Fails only if the underlying
    /// reqwest client cannot be constructed.
    pub fn from_config(config: &Config) -> Result<Self, CatalogError> {
        Self::new(
            &config.base_url,
            config.resolved_api_key().map(SecretString::from),
            Duration::from_secs(config.request_timeout_secs),
        )
    }

    pub fn new(
        base_url: &str,
        api_key: Option<SecretString>,
        timeout: Duration,
    ) -> Result<Self, CatalogError> {
        let http = reqwest::Client::builder().build()?;
        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key,
            timeout,
        })
    }

    /// Fetch one page of an already-resolved endpoint.
    pub async fn fetch_page(
        &self,
        path: &str,
        query: &[(String, String)],
        page: u32,
    ) -> Result<PageEnvelope, CatalogError> {
        let mut request = self.http.get(format!("{}{}", self.base_url, path));
        if !query.is_empty() {
            request = request.query(query);
        }
        request = request.query(&[("page", page.to_string())]);
        self.envelope(request).await
    }

    /// Resolve a descriptor and fetch one of its pages.
    pub async fn fetch_page_by_descriptor(
        &self,
        descriptor: &str,
        page: u32,
    ) -> Result<PageEnvelope, CatalogError> {
        let endpoint = resolve(descriptor)?;
        self.fetch_page(&endpoint.path, &endpoint.query, page).await
    }

    /// Free-text catalog search; same envelope shape as endpoint fetches.
    pub async fn search_page(&self, query: &str, page: u32) -> Result<PageEnvelope, CatalogError> {
        let request = self
            .http
            .get(format!("{}/search/movie", self.base_url))
            .query(&[("query", query), ("page", &page.to_string())]);
        self.envelope(request).await
    }

    /// Fetch a single item by id (detail view collaborator).
    pub async fn fetch_movie(&self, id: u64) -> Result<Movie, CatalogError> {
        let request = self.http.get(format!("{}/movie/{}", self.base_url, id));
        let body = self.send(request).await?;
        serde_json::from_slice(&body).map_err(|e| CatalogError::Decode(e.to_string()))
    }

    /// Look up a watchable trailer URL for an item, if the catalog has one.
    pub async fn fetch_trailer_url(&self, id: u64) -> Result<Option<String>, CatalogError> {
        let request = self
            .http
            .get(format!("{}/movie/{}/videos", self.base_url, id));
        let body = self.send(request).await?;
        let videos: VideoList =
            serde_json::from_slice(&body).map_err(|e| CatalogError::Decode(e.to_string()))?;
        Ok(pick_trailer(&videos.results))
    }

    async fn envelope(
        &self,
        request: reqwest::RequestBuilder,
    ) -> Result<PageEnvelope, CatalogError> {
        let body = self.send(request).await?;
        serde_json::from_slice(&body).map_err(|e| CatalogError::Decode(e.to_string()))
    }

    async fn send(&self, mut request: reqwest::RequestBuilder) -> Result<Vec<u8>, CatalogError> {
        if let Some(key) = &self.api_key {
            request = request.query(&[("api_key", key.expose_secret())]);
        }

        let response = tokio::time::timeout(self.timeout, request.send())
            .await
            .map_err(|_| CatalogError::Timeout)?
            .map_err(CatalogError::Network)?;

        if !response.status().is_success() {
            return Err(CatalogError::Status(response.status().as_u16()));
        }

        Ok(response.bytes().await?.to_vec())
    }
}

/// Prefer an official-looking YouTube trailer; the upstream list is in the
/// catalog's own priority order, so the first match wins.
fn pick_trailer(videos: &[Video]) -> Option<String> {
    videos
        .iter()
        .find(|v| v.site == "YouTube" && v.kind == "Trailer")
        .map(|v| format!("https://www.youtube.com/embed/{}", v.key))
}
