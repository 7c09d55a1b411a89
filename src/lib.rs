//! APOD relay
//!
//! A small web-triggered bot: on HTTP request it fetches NASA's Astronomy
//! Picture of the Day and reposts it to Twitter — a link status for video
//! days, a media upload with the title as caption for image days.

pub mod apod;
pub mod config;
pub mod relay;
pub mod server;
pub mod twitter;
