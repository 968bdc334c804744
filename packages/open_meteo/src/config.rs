//! Open-Meteo service configuration.
//!
//! Defaults are embedded from `services/open_meteo.toml`. A few values can
//! be overridden from the environment so a deployment can point at a
//! self-hosted mirror or tighten the timeout without rebuilding:
//!
//! | Variable | Field |
//! |---|---|
//! | `OPEN_METEO_AIR_QUALITY_URL` | `air_quality_base_url` |
//! | `OPEN_METEO_FORECAST_URL` | `forecast_base_url` |
//! | `OPEN_METEO_TIMEOUT_SECS` | `request_timeout_secs` |

use std::time::Duration;

use serde::Deserialize;
use thiserror::Error;

const EMBEDDED_CONFIG: &str = include_str!("../services/open_meteo.toml");

/// Errors from loading or overriding the service configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The TOML could not be parsed.
    #[error("Config parse error: {0}")]
    Parse(#[from] toml::de::Error),

    /// An environment override had an unusable value.
    #[error("Invalid value for {name}: {message}")]
    Env {
        /// Variable name.
        name: &'static str,
        /// What was wrong with it.
        message: String,
    },
}

/// Endpoints and transport settings for the Open-Meteo APIs.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct OpenMeteoConfig {
    /// Base URL of the air quality API (no trailing slash).
    pub air_quality_base_url: String,
    /// Base URL of the forecast API (no trailing slash).
    pub forecast_base_url: String,
    /// IANA timezone sent with every request.
    pub timezone: String,
    /// Per-request timeout in seconds.
    pub request_timeout_secs: u64,
    /// Retry attempts after the first failure.
    #[serde(default)]
    pub max_retries: u32,
    /// First backoff delay in milliseconds; doubles per attempt.
    #[serde(default = "default_backoff_base_ms")]
    pub backoff_base_ms: u64,
}

const fn default_backoff_base_ms() -> u64 {
    250
}

impl OpenMeteoConfig {
    /// Returns the embedded default configuration.
    ///
    /// # Panics
    ///
    /// Panics if the embedded TOML is malformed (a build-time guarantee).
    #[must_use]
    pub fn embedded() -> Self {
        Self::from_toml_str(EMBEDDED_CONFIG)
            .unwrap_or_else(|e| panic!("Failed to parse embedded Open-Meteo config: {e}"))
    }

    /// Parses a configuration from TOML.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Parse`] if the TOML is invalid or missing
    /// required fields.
    pub fn from_toml_str(toml_str: &str) -> Result<Self, ConfigError> {
        Ok(toml::de::from_str(toml_str)?)
    }

    /// Embedded defaults with process environment overrides applied.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Env`] if an override is set but unusable.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::embedded().with_overrides(|name| std::env::var(name).ok())
    }

    /// Applies overrides looked up by variable name.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Env`] if a URL override is empty or the
    /// timeout is not a positive integer.
    pub fn with_overrides<F>(mut self, lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(url) = lookup("OPEN_METEO_AIR_QUALITY_URL") {
            self.air_quality_base_url = normalize_url("OPEN_METEO_AIR_QUALITY_URL", &url)?;
        }
        if let Some(url) = lookup("OPEN_METEO_FORECAST_URL") {
            self.forecast_base_url = normalize_url("OPEN_METEO_FORECAST_URL", &url)?;
        }
        if let Some(secs) = lookup("OPEN_METEO_TIMEOUT_SECS") {
            self.request_timeout_secs = match secs.trim().parse::<u64>() {
                Ok(0) | Err(_) => {
                    return Err(ConfigError::Env {
                        name: "OPEN_METEO_TIMEOUT_SECS",
                        message: format!("expected a positive integer, got {secs:?}"),
                    });
                }
                Ok(n) => n,
            };
        }
        Ok(self)
    }

    /// The per-request timeout.
    #[must_use]
    pub const fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    /// The first backoff delay.
    #[must_use]
    pub const fn backoff_base(&self) -> Duration {
        Duration::from_millis(self.backoff_base_ms)
    }

    /// Longest one call can take: every attempt timing out plus every
    /// backoff delay.
    #[must_use]
    pub fn worst_case_latency(&self) -> Duration {
        let attempts = self.max_retries.saturating_add(1);
        let backoff: Duration = (0..self.max_retries)
            .map(|k| {
                self.backoff_base()
                    .saturating_mul(1u32.checked_shl(k).unwrap_or(u32::MAX))
            })
            .fold(Duration::ZERO, Duration::saturating_add);
        self.request_timeout()
            .saturating_mul(attempts)
            .saturating_add(backoff)
    }
}

impl Default for OpenMeteoConfig {
    fn default() -> Self {
        Self::embedded()
    }
}

fn normalize_url(name: &'static str, url: &str) -> Result<String, ConfigError> {
    let trimmed = url.trim().trim_end_matches('/');
    if trimmed.is_empty() {
        return Err(ConfigError::Env {
            name,
            message: "URL is empty".to_string(),
        });
    }
    Ok(trimmed.to_string())
}
