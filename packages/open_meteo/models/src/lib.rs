#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Air quality and weather types for the Open-Meteo integration.
//!
//! The `*Response` types mirror the upstream JSON shapes exactly; the
//! client in `city_ops_open_meteo` converts them into the normalized
//! [`AirQualityReading`] and [`CurrentWeather`] values used everywhere
//! else.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumString};

/// Source label attached to every reading from Open-Meteo.
pub const OPEN_METEO_SOURCE: &str = "Open-Meteo";

/// Pollutant measurements for one zone.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AirQualityReading {
    /// Zone identifier.
    pub zone: String,
    /// US EPA air quality index.
    pub aqi: u32,
    /// Fine particulate matter, µg/m³.
    pub pm25: u32,
    /// Coarse particulate matter, µg/m³.
    pub pm10: u32,
    /// Nitrogen dioxide, µg/m³.
    pub no2: u32,
    /// Sulphur dioxide, µg/m³.
    pub so2: u32,
    /// Carbon monoxide, ppm.
    pub co: u32,
    /// Ozone, µg/m³.
    pub o3: u32,
    /// Observation time.
    pub timestamp: DateTime<Utc>,
    /// Provider label.
    pub source: String,
}

impl AirQualityReading {
    /// Qualitative category of this reading's AQI.
    #[must_use]
    pub const fn category(&self) -> AqiCategory {
        AqiCategory::from_aqi(self.aqi)
    }
}

/// Qualitative AQI band as used on Indian public dashboards.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
pub enum AqiCategory {
    /// 0-50.
    Good,
    /// 51-100.
    Satisfactory,
    /// 101-200.
    Moderate,
    /// 201-300.
    Poor,
    /// 301-400.
    #[serde(rename = "Very Poor")]
    #[strum(serialize = "Very Poor")]
    VeryPoor,
    /// 401 and above.
    Severe,
}

impl AqiCategory {
    /// Returns all variants of this enum.
    #[must_use]
    pub const fn all() -> &'static [Self] {
        &[
            Self::Good,
            Self::Satisfactory,
            Self::Moderate,
            Self::Poor,
            Self::VeryPoor,
            Self::Severe,
        ]
    }

    /// Classifies an AQI value. Values above 500 are [`Self::Severe`].
    #[must_use]
    pub const fn from_aqi(aqi: u32) -> Self {
        match aqi {
            0..=50 => Self::Good,
            51..=100 => Self::Satisfactory,
            101..=200 => Self::Moderate,
            201..=300 => Self::Poor,
            301..=400 => Self::VeryPoor,
            _ => Self::Severe,
        }
    }
}

/// Current conditions at the city's central coordinate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CurrentWeather {
    /// Air temperature at 2 m, °C.
    pub temperature: f64,
    /// Relative humidity at 2 m, percent.
    pub humidity: f64,
    /// Wind speed at 10 m, km/h.
    pub wind_speed: f64,
    /// WMO weather interpretation code.
    pub weather_code: u32,
    /// Human-readable form of `weather_code`.
    pub description: String,
    /// Observation time.
    pub observed_at: DateTime<Utc>,
}

/// Raw `/air-quality` response.
#[derive(Debug, Clone, Deserialize)]
pub struct AirQualityResponse {
    /// Grid latitude the values were taken from.
    pub latitude: f64,
    /// Grid longitude the values were taken from.
    pub longitude: f64,
    /// Offset of the requested timezone; `current.time` is local to it.
    #[serde(default)]
    pub utc_offset_seconds: i32,
    /// Current values.
    pub current: AirQualityCurrent,
}

/// `current` block of an `/air-quality` response.
///
/// Any variable can come back `null` when the model has no value for the
/// grid cell.
#[derive(Debug, Clone, Deserialize)]
pub struct AirQualityCurrent {
    /// Local ISO-8601 time without offset, e.g. `2025-06-01T14:00`.
    pub time: String,
    /// PM2.5, µg/m³.
    pub pm2_5: Option<f64>,
    /// PM10, µg/m³.
    pub pm10: Option<f64>,
    /// NO₂, µg/m³.
    pub nitrogen_dioxide: Option<f64>,
    /// SO₂, µg/m³.
    pub sulphur_dioxide: Option<f64>,
    /// CO, µg/m³.
    pub carbon_monoxide: Option<f64>,
    /// O₃, µg/m³.
    pub ozone: Option<f64>,
    /// European AQI.
    pub european_aqi: Option<f64>,
    /// US AQI.
    pub us_aqi: Option<f64>,
}

/// Raw `/forecast` response restricted to `current` variables.
#[derive(Debug, Clone, Deserialize)]
pub struct ForecastResponse {
    /// Grid latitude.
    pub latitude: f64,
    /// Grid longitude.
    pub longitude: f64,
    /// Offset of the requested timezone.
    #[serde(default)]
    pub utc_offset_seconds: i32,
    /// Current values.
    pub current: ForecastCurrent,
}

/// `current` block of a `/forecast` response.
#[derive(Debug, Clone, Deserialize)]
pub struct ForecastCurrent {
    /// Local ISO-8601 time without offset.
    pub time: String,
    /// °C.
    pub temperature_2m: f64,
    /// Percent.
    pub relative_humidity_2m: f64,
    /// km/h.
    pub wind_speed_10m: f64,
    /// WMO code.
    pub weather_code: u32,
}
