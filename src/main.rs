use std::sync::Arc;
use std::time::Duration;

use tracing_subscriber::EnvFilter;

use apod_relay::apod::ApodClient;
use apod_relay::config::Config;
use apod_relay::relay::Relay;
use apod_relay::server;
use apod_relay::twitter::TwitterClient;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Best-effort .env load; the real environment wins.
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = Config::from_env()?;

    let http = reqwest::Client::builder()
        .timeout(Duration::from_secs(30))
        .user_agent(concat!("apod-relay/", env!("CARGO_PKG_VERSION")))
        .build()?;

    let provider = ApodClient::new(http.clone(), config.nasa_key.clone());
    let poster = TwitterClient::new(http, config.twitter_keys());
    let relay = Relay::new(Arc::new(provider), Arc::new(poster));

    server::serve(&config, relay).await?;

    Ok(())
}
