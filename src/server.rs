//! HTTP trigger surface
//!
//! Two routes: `GET /` answers with a liveness line, `GET /bot` runs the
//! relay once. The caller only ever sees 204 or 500; failure detail goes to
//! the log.

use std::net::SocketAddr;
use std::sync::Arc;

use axum::extract::State;
use axum::http::StatusCode;
use axum::routing::get;
use axum::Router;
use tracing::{error, info};

use crate::config::Config;
use crate::relay::Relay;

/// Body of the liveness route.
pub const LIVENESS_TEXT: &str = "Everything is going to be OK ✅";

/// Shared state handed to the handlers.
#[derive(Clone)]
pub struct AppState {
    relay: Arc<Relay>,
}

impl AppState {
    pub fn new(relay: Relay) -> Self {
        Self {
            relay: Arc::new(relay),
        }
    }
}

/// Server error
#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    #[error("invalid bind address: {0}")]
    Addr(String),
    #[error("server error: {0}")]
    Serve(String),
}

/// Build the application router.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(liveness_handler))
        .route("/bot", get(trigger_handler))
        .with_state(state)
}

async fn liveness_handler() -> &'static str {
    LIVENESS_TEXT
}

async fn trigger_handler(State(state): State<AppState>) -> StatusCode {
    match state.relay.run().await {
        Ok(outcome) => {
            info!(outcome = ?outcome, "Relay run complete");
            StatusCode::NO_CONTENT
        }
        Err(err) => {
            error!(error = %err, "Relay run failed");
            StatusCode::INTERNAL_SERVER_ERROR
        }
    }
}

/// Bind and serve until ctrl-c.
pub async fn serve(config: &Config, relay: Relay) -> Result<(), ServerError> {
    let addr: SocketAddr = format!("{}:{}", config.bind, config.port)
        .parse()
        .map_err(|e: std::net::AddrParseError| ServerError::Addr(e.to_string()))?;

    let app = router(AppState::new(relay));

    info!(address = %addr, "The APOD relay is listening");

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .map_err(|e| ServerError::Serve(e.to_string()))?;

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| ServerError::Serve(e.to_string()))
}

async fn shutdown_signal() {
    let _ = tokio::signal::ctrl_c().await;
    info!("Shutdown signal received");
}
