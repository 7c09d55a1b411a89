//! Daily Media Relay
//!
//! The one workflow this service exists for: fetch today's media descriptor,
//! then either post a link status (video) or download the image, upload it as
//! media, and post a captioned status. Each step is awaited in sequence and
//! any failure aborts the flow without retry.

use std::io::Write;
use std::sync::Arc;

use tracing::{debug, info};

use crate::apod::{ApodError, MediaKind, MediaProvider};
use crate::twitter::{SocialPoster, TwitterError};

/// Prefix of the status posted for video days.
pub const VIDEO_STATUS_PREFIX: &str = "Here's a new video from NASA! ";

/// Relay error
#[derive(Debug, thiserror::Error)]
pub enum RelayError {
    #[error("provider error: {0}")]
    Provider(#[from] ApodError),
    #[error("social platform error: {0}")]
    Social(#[from] TwitterError),
    #[error("temp file error: {0}")]
    Io(#[from] std::io::Error),
}

/// Terminal outcome of one relay run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RelayOutcome {
    /// A video day: the link status was posted, no media upload happened.
    VideoStatusPosted { status_id: String },
    /// An image day: media was uploaded, then the captioned status posted.
    ImagePosted { status_id: String, media_id: String },
}

/// The relay service, holding its collaborators as injected trait objects.
pub struct Relay {
    provider: Arc<dyn MediaProvider>,
    poster: Arc<dyn SocialPoster>,
}

impl Relay {
    pub fn new(provider: Arc<dyn MediaProvider>, poster: Arc<dyn SocialPoster>) -> Self {
        Self { provider, poster }
    }

    /// Run the fetch → branch → post sequence end to end.
    pub async fn run(&self) -> Result<RelayOutcome, RelayError> {
        let media = self.provider.media_of_day().await?;
        info!(kind = ?media.media_type, title = %media.title, "Fetched media descriptor");

        match media.media_type {
            MediaKind::Video => {
                let text = video_status(&media.title, &media.url);
                let posted = self.poster.post_status(&text, &[]).await?;
                Ok(RelayOutcome::VideoStatusPosted {
                    status_id: posted.id,
                })
            }
            MediaKind::Image => {
                let bytes = self.provider.download(&media.url).await?;

                // Unique path per invocation; the guard removes the file on
                // drop, error paths included.
                let mut file = tempfile::Builder::new()
                    .prefix("apod-")
                    .suffix(file_suffix(&media.url))
                    .tempfile()?;
                file.write_all(&bytes)?;
                file.flush()?;
                debug!(path = ?file.path(), size = bytes.len(), "Media saved");

                let media_id = self.poster.upload_media(file.path()).await?;
                let posted = self
                    .poster
                    .post_status(&media.title, std::slice::from_ref(&media_id))
                    .await?;

                Ok(RelayOutcome::ImagePosted {
                    status_id: posted.id,
                    media_id,
                })
            }
        }
    }
}

/// Status text for a video day.
pub fn video_status(title: &str, url: &str) -> String {
    format!("{}{}: {}", VIDEO_STATUS_PREFIX, title, url)
}

/// Temp file suffix derived from the content URL, defaulting to `.jpg`.
fn file_suffix(url: &str) -> &'static str {
    let path = url.split(['?', '#']).next().unwrap_or(url);
    let lower = path.to_ascii_lowercase();
    if lower.ends_with(".png") {
        ".png"
    } else if lower.ends_with(".gif") {
        ".gif"
    } else if lower.ends_with(".jpeg") {
        ".jpeg"
    } else {
        ".jpg"
    }
}
