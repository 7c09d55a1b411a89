//! Twitter client
//!
//! Posting support via the Twitter API v1.1: signed status updates and the
//! chunked media upload flow (INIT, APPEND, FINALIZE). Requests are signed
//! with OAuth 1.0a (see [`oauth`]).

pub mod oauth;

use std::path::Path;

use async_trait::async_trait;
use reqwest::header::AUTHORIZATION;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use tracing::{debug, info};

const API_BASE: &str = "https://api.twitter.com/1.1";
const UPLOAD_BASE: &str = "https://upload.twitter.com/1.1";

/// Upload segment size. The API caps an APPEND body at 5 MB.
const APPEND_CHUNK_SIZE: usize = 1024 * 1024;

/// OAuth 1.0a credential quadruple.
#[derive(Debug, Clone)]
pub struct TwitterKeys {
    pub consumer_key: String,
    pub consumer_secret: String,
    pub access_token: String,
    pub access_token_secret: String,
}

/// Twitter client error
#[derive(Debug, thiserror::Error)]
pub enum TwitterError {
    #[error("network error: {0}")]
    Network(String),
    #[error("API error: {0}")]
    Api(String),
    #[error("parse error: {0}")]
    Parse(String),
    #[error("media file error: {0}")]
    Io(#[from] std::io::Error),
}

/// A successfully posted status.
#[derive(Debug, Clone, Deserialize)]
pub struct PostedStatus {
    #[serde(rename = "id_str")]
    pub id: String,
    #[serde(default)]
    pub text: Option<String>,
}

#[derive(Debug, Deserialize)]
struct MediaUploadResponse {
    media_id_string: String,
}

/// Social posting seam.
///
/// `Relay` depends on this trait rather than on the concrete client so the
/// posting side can be replaced in tests.
#[async_trait]
pub trait SocialPoster: Send + Sync {
    /// Upload a media file, returning the platform's media id.
    async fn upload_media(&self, path: &Path) -> Result<String, TwitterError>;

    /// Post a status, optionally referencing previously uploaded media.
    async fn post_status(
        &self,
        text: &str,
        media_ids: &[String],
    ) -> Result<PostedStatus, TwitterError>;
}

/// HTTP client for the Twitter v1.1 API.
pub struct TwitterClient {
    client: reqwest::Client,
    keys: TwitterKeys,
    api_base: String,
    upload_base: String,
}

impl TwitterClient {
    /// Create a new client around a shared HTTP client.
    pub fn new(client: reqwest::Client, keys: TwitterKeys) -> Self {
        Self {
            client,
            keys,
            api_base: API_BASE.to_string(),
            upload_base: UPLOAD_BASE.to_string(),
        }
    }

    /// Override the REST API base URL (test seam).
    pub fn with_api_base(mut self, base: impl Into<String>) -> Self {
        self.api_base = base.into();
        self
    }

    /// Override the media upload base URL (test seam).
    pub fn with_upload_base(mut self, base: impl Into<String>) -> Self {
        self.upload_base = base.into();
        self
    }

    /// POST a signed form-encoded request and decode the JSON response.
    async fn signed_form<T: DeserializeOwned>(
        &self,
        url: &str,
        params: &[(&str, &str)],
    ) -> Result<T, TwitterError> {
        let auth = oauth::authorization_header("POST", url, params, &self.keys);

        let response = self
            .client
            .post(url)
            .header(AUTHORIZATION, auth)
            .form(params)
            .send()
            .await
            .map_err(|e| TwitterError::Network(e.to_string()))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| TwitterError::Network(e.to_string()))?;

        if !status.is_success() {
            return Err(TwitterError::Api(api_error_message(status.as_u16(), &body)));
        }

        serde_json::from_str(&body).map_err(|e| TwitterError::Parse(e.to_string()))
    }
}

#[async_trait]
impl SocialPoster for TwitterClient {
    async fn upload_media(&self, path: &Path) -> Result<String, TwitterError> {
        let bytes = tokio::fs::read(path).await?;
        let url = format!("{}/media/upload.json", self.upload_base);
        let total_bytes = bytes.len().to_string();
        let media_type = media_type_for(path);

        let init: MediaUploadResponse = self
            .signed_form(
                &url,
                &[
                    ("command", "INIT"),
                    ("total_bytes", &total_bytes),
                    ("media_type", media_type),
                ],
            )
            .await?;
        let media_id = init.media_id_string;
        debug!(media_id = %media_id, total_bytes, "Media upload initialized");

        // Multipart body parameters are excluded from the OAuth signature.
        for (index, chunk) in bytes.chunks(APPEND_CHUNK_SIZE).enumerate() {
            let auth = oauth::authorization_header("POST", &url, &[], &self.keys);
            let form = reqwest::multipart::Form::new()
                .text("command", "APPEND")
                .text("media_id", media_id.clone())
                .text("segment_index", index.to_string())
                .part("media", reqwest::multipart::Part::bytes(chunk.to_vec()));

            let response = self
                .client
                .post(&url)
                .header(AUTHORIZATION, auth)
                .multipart(form)
                .send()
                .await
                .map_err(|e| TwitterError::Network(e.to_string()))?;

            let status = response.status();
            if !status.is_success() {
                let body = response.text().await.unwrap_or_default();
                return Err(TwitterError::Api(api_error_message(status.as_u16(), &body)));
            }
            debug!(media_id = %media_id, segment = index, "Media segment appended");
        }

        let done: MediaUploadResponse = self
            .signed_form(&url, &[("command", "FINALIZE"), ("media_id", &media_id)])
            .await?;
        info!(media_id = %done.media_id_string, "Media upload finalized");

        Ok(done.media_id_string)
    }

    async fn post_status(
        &self,
        text: &str,
        media_ids: &[String],
    ) -> Result<PostedStatus, TwitterError> {
        let url = format!("{}/statuses/update.json", self.api_base);

        let joined;
        let mut params: Vec<(&str, &str)> = vec![("status", text)];
        if !media_ids.is_empty() {
            joined = media_ids.join(",");
            params.push(("media_ids", &joined));
        }

        let posted: PostedStatus = self.signed_form(&url, &params).await?;
        info!(id = %posted.id, "Status posted");
        Ok(posted)
    }
}

/// Decode the API's `{"errors":[{code,message}]}` envelope, falling back to
/// the raw body when the shape doesn't match.
fn api_error_message(status: u16, body: &str) -> String {
    #[derive(Deserialize)]
    struct ErrorBody {
        errors: Vec<ErrorEntry>,
    }

    #[derive(Deserialize)]
    struct ErrorEntry {
        code: Option<u32>,
        message: String,
    }

    if let Ok(parsed) = serde_json::from_str::<ErrorBody>(body) {
        let detail = parsed
            .errors
            .iter()
            .map(|e| match e.code {
                Some(code) => format!("{} (code {})", e.message, code),
                None => e.message.clone(),
            })
            .collect::<Vec<_>>()
            .join("; ");
        if !detail.is_empty() {
            return format!("HTTP {}: {}", status, detail);
        }
    }

    let snippet: String = body.chars().take(200).collect();
    format!("HTTP {}: {}", status, snippet)
}

/// MIME type for the upload INIT call, from the file extension.
fn media_type_for(path: &Path) -> &'static str {
    match path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase())
        .as_deref()
    {
        Some("png") => "image/png",
        Some("gif") => "image/gif",
        Some("webp") => "image/webp",
        _ => "image/jpeg",
    }
}
