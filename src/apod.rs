//! APOD provider client
//!
//! Fetches NASA's "Astronomy Picture of the Day" descriptor and downloads
//! the associated binary content. The descriptor is transient: it lives for
//! one trigger-to-post flow and is never persisted.

use async_trait::async_trait;
use bytes::Bytes;
use serde::{Deserialize, Serialize};
use tracing::debug;

const DEFAULT_BASE_URL: &str = "https://api.nasa.gov";

/// Kind of media the provider served today.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MediaKind {
    Image,
    Video,
}

/// The daily media descriptor returned by the APOD endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MediaOfDay {
    pub media_type: MediaKind,
    pub title: String,
    pub url: String,
    /// High-resolution variant, present for images only
    pub hdurl: Option<String>,
    #[serde(default)]
    pub explanation: Option<String>,
    #[serde(default)]
    pub date: Option<String>,
}

/// APOD client error
#[derive(Debug, thiserror::Error)]
pub enum ApodError {
    #[error("network error: {0}")]
    Network(String),
    #[error("unexpected status {0} from provider")]
    Status(u16),
    #[error("parse error: {0}")]
    Parse(String),
}

/// Media-of-the-day provider seam.
///
/// `Relay` depends on this trait rather than on the concrete client so the
/// workflow can be exercised without network access.
#[async_trait]
pub trait MediaProvider: Send + Sync {
    /// Fetch today's media descriptor.
    async fn media_of_day(&self) -> Result<MediaOfDay, ApodError>;

    /// Download binary content from a descriptor URL.
    async fn download(&self, url: &str) -> Result<Bytes, ApodError>;
}

/// HTTP client for the APOD API.
pub struct ApodClient {
    client: reqwest::Client,
    api_key: String,
    base_url: String,
}

impl ApodClient {
    /// Create a new client around a shared HTTP client.
    pub fn new(client: reqwest::Client, api_key: impl Into<String>) -> Self {
        Self {
            client,
            api_key: api_key.into(),
            base_url: DEFAULT_BASE_URL.to_string(),
        }
    }

    /// Override the API base URL (test seam).
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }
}

#[async_trait]
impl MediaProvider for ApodClient {
    async fn media_of_day(&self) -> Result<MediaOfDay, ApodError> {
        let url = format!("{}/planetary/apod", self.base_url);
        debug!(url = %url, "Fetching APOD descriptor");

        let response = self
            .client
            .get(&url)
            .query(&[("api_key", self.api_key.as_str())])
            .send()
            .await
            .map_err(|e| ApodError::Network(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(ApodError::Status(status.as_u16()));
        }

        response
            .json::<MediaOfDay>()
            .await
            .map_err(|e| ApodError::Parse(e.to_string()))
    }

    async fn download(&self, url: &str) -> Result<Bytes, ApodError> {
        debug!(url = %url, "Downloading media content");

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| ApodError::Network(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(ApodError::Status(status.as_u16()));
        }

        response
            .bytes()
            .await
            .map_err(|e| ApodError::Network(e.to_string()))
    }
}
