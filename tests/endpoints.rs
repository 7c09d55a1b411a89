//! HTTP endpoint tests
//!
//! Exercises the router with stubbed provider/poster services: liveness
//! text, 204 on a successful relay run, 500 (and no social calls) when the
//! provider is down.

use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use bytes::Bytes;
use tower::util::ServiceExt;

use apod_relay::apod::{ApodError, MediaKind, MediaOfDay, MediaProvider};
use apod_relay::relay::Relay;
use apod_relay::server::{router, AppState, LIVENESS_TEXT};
use apod_relay::twitter::{PostedStatus, SocialPoster, TwitterError};

struct StubProvider {
    media: Option<MediaOfDay>,
}

#[async_trait]
impl MediaProvider for StubProvider {
    async fn media_of_day(&self) -> Result<MediaOfDay, ApodError> {
        self.media
            .clone()
            .ok_or_else(|| ApodError::Status(503))
    }

    async fn download(&self, _url: &str) -> Result<Bytes, ApodError> {
        Ok(Bytes::from_static(b"fake image bytes"))
    }
}

#[derive(Default)]
struct CountingPoster {
    uploads: AtomicUsize,
    statuses: AtomicUsize,
}

#[async_trait]
impl SocialPoster for CountingPoster {
    async fn upload_media(&self, _path: &Path) -> Result<String, TwitterError> {
        self.uploads.fetch_add(1, Ordering::SeqCst);
        Ok("710511363345354753".to_string())
    }

    async fn post_status(
        &self,
        text: &str,
        _media_ids: &[String],
    ) -> Result<PostedStatus, TwitterError> {
        self.statuses.fetch_add(1, Ordering::SeqCst);
        Ok(PostedStatus {
            id: "1050118621198921728".to_string(),
            text: Some(text.to_string()),
        })
    }
}

fn app(media: Option<MediaOfDay>, poster: Arc<CountingPoster>) -> axum::Router {
    let relay = Relay::new(Arc::new(StubProvider { media }), poster);
    router(AppState::new(relay))
}

fn video_descriptor() -> MediaOfDay {
    MediaOfDay {
        media_type: MediaKind::Video,
        title: "Solar Flare Timelapse".to_string(),
        url: "https://youtu.be/abc123".to_string(),
        hdurl: None,
        explanation: None,
        date: None,
    }
}

fn image_descriptor() -> MediaOfDay {
    MediaOfDay {
        media_type: MediaKind::Image,
        title: "A Distant Galaxy".to_string(),
        url: "https://apod.nasa.gov/galaxy.jpg".to_string(),
        hdurl: None,
        explanation: None,
        date: None,
    }
}

#[tokio::test]
async fn liveness_returns_text_regardless_of_downstream() {
    let poster = Arc::new(CountingPoster::default());
    let app = app(None, poster);

    let response = app
        .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    assert_eq!(body, LIVENESS_TEXT.as_bytes());
}

#[tokio::test]
async fn trigger_returns_no_content_on_success() {
    let poster = Arc::new(CountingPoster::default());
    let app = app(Some(video_descriptor()), poster.clone());

    let response = app
        .oneshot(Request::builder().uri("/bot").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NO_CONTENT);
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    assert!(body.is_empty());
    assert_eq!(poster.statuses.load(Ordering::SeqCst), 1);
    assert_eq!(poster.uploads.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn trigger_image_day_uploads_then_posts() {
    let poster = Arc::new(CountingPoster::default());
    let app = app(Some(image_descriptor()), poster.clone());

    let response = app
        .oneshot(Request::builder().uri("/bot").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NO_CONTENT);
    assert_eq!(poster.uploads.load(Ordering::SeqCst), 1);
    assert_eq!(poster.statuses.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn trigger_returns_error_when_provider_down() {
    let poster = Arc::new(CountingPoster::default());
    let app = app(None, poster.clone());

    let response = app
        .oneshot(Request::builder().uri("/bot").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(poster.uploads.load(Ordering::SeqCst), 0);
    assert_eq!(poster.statuses.load(Ordering::SeqCst), 0);
}
