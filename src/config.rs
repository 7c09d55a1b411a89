//! Environment configuration
//!
//! All runtime configuration comes from the process environment (optionally
//! seeded from a `.env` file at startup). Variable names map 1:1 onto the
//! struct fields, uppercased: `NASA_KEY`, `TWITTER_CONSUMER_KEY`, `PORT`, ...

use serde::Deserialize;

use crate::twitter::TwitterKeys;

fn default_bind() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    3000
}

/// Runtime configuration, deserialized from the environment.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    /// NASA API key for the APOD endpoint
    pub nasa_key: String,
    /// Twitter app consumer key
    pub twitter_consumer_key: String,
    /// Twitter app consumer secret
    pub twitter_consumer_secret: String,
    /// Twitter user access token
    pub twitter_access_token: String,
    /// Twitter user access token secret
    pub twitter_access_token_secret: String,
    /// Bind address for the HTTP server
    #[serde(default = "default_bind")]
    pub bind: String,
    /// Listen port for the HTTP server
    #[serde(default = "default_port")]
    pub port: u16,
}

/// Configuration error
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("environment error: {0}")]
    Env(#[from] envy::Error),
}

impl Config {
    /// Load configuration from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Ok(envy::from_env()?)
    }

    /// The Twitter credential quadruple used for request signing.
    pub fn twitter_keys(&self) -> TwitterKeys {
        TwitterKeys {
            consumer_key: self.twitter_consumer_key.clone(),
            consumer_secret: self.twitter_consumer_secret.clone(),
            access_token: self.twitter_access_token.clone(),
            access_token_secret: self.twitter_access_token_secret.clone(),
        }
    }
}
