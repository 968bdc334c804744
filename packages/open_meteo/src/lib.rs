#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Open-Meteo integration: the only live data the engine reads.
//!
//! Open-Meteo is free and needs no API key. Two endpoints are used:
//!
//! - **Air quality** (`/air-quality`), fetched per zone. AQI is taken from
//!   `us_aqi` when available and otherwise derived from PM2.5 with the US
//!   EPA breakpoint table in [`aqi`].
//! - **Forecast** (`/forecast`), fetched once at the city's central zone
//!   for current conditions. Weather codes are described via
//!   [`weather_codes`].
//!
//! All requests go through [`retry`]. Endpoint URLs and transport settings
//! come from [`config`].

pub mod aqi;
pub mod client;
pub mod config;
pub mod retry;
pub mod weather_codes;

pub use client::OpenMeteoClient;
pub use config::{ConfigError, OpenMeteoConfig};

use thiserror::Error;

/// Errors that can occur while talking to Open-Meteo.
#[derive(Debug, Error)]
pub enum OpenMeteoError {
    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Response body did not match the expected shape.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Upstream returned an error status or unusable data.
    #[error("Upstream error: {message}")]
    Upstream {
        /// Description of what went wrong.
        message: String,
    },

    /// Service configuration could not be loaded.
    #[error("Config error: {0}")]
    Config(#[from] ConfigError),
}
