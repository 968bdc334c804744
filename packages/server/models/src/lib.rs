#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! API request and response types for the city operations server.
//!
//! These types are serialized to JSON for the REST API. They are kept
//! apart from the engine's own types so the API contract can evolve on
//! its own.

use chrono::{DateTime, FixedOffset, Utc};
use city_ops_source::{DataSource, SourceKind};
use city_ops_zone::{Zone, ZoneTag};
use serde::{Deserialize, Serialize};

/// Health check response.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiHealth {
    /// Whether the server is healthy.
    pub healthy: bool,
    /// Server version.
    pub version: String,
}

/// Error body returned by every failing endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiError {
    /// Human-readable message.
    pub error: String,
}

impl ApiError {
    /// Creates an error body.
    #[must_use]
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
        }
    }
}

/// A zone as returned by the API.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiZone {
    /// Zone identifier.
    pub id: String,
    /// Display name.
    pub name: String,
    /// Short code.
    pub code: String,
    /// Resident population.
    pub population: u64,
    /// Area in square kilometres.
    pub area_sq_km: f64,
    /// Residents per square kilometre.
    pub density: Option<f64>,
    /// Longitude.
    pub longitude: f64,
    /// Latitude.
    pub latitude: f64,
    /// Scenario selection tags.
    pub tags: Vec<ZoneTag>,
}

impl From<&Zone> for ApiZone {
    fn from(zone: &Zone) -> Self {
        Self {
            id: zone.id.clone(),
            name: zone.name.clone(),
            code: zone.code.clone(),
            population: zone.population,
            area_sq_km: zone.area_sq_km,
            density: zone.density(),
            longitude: zone.longitude,
            latitude: zone.latitude,
            tags: zone.tags.clone(),
        }
    }
}

/// A data source as returned by the API, with its display badge.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiSource {
    /// The source definition.
    #[serde(flatten)]
    pub source: DataSource,
    /// Badge label for the source's kind.
    pub badge: &'static str,
}

impl From<DataSource> for ApiSource {
    fn from(source: DataSource) -> Self {
        let badge = source.badge();
        Self { source, badge }
    }
}

/// Query parameters for the metrics endpoints.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MetricsQueryParams {
    /// RFC 3339 timestamp to generate for instead of now.
    pub at: Option<String>,
}

impl MetricsQueryParams {
    /// Parses [`Self::at`], `Ok(None)` when absent.
    ///
    /// # Errors
    ///
    /// Returns the parse error if `at` is present but not RFC 3339.
    pub fn timestamp(&self) -> Result<Option<DateTime<Utc>>, chrono::ParseError> {
        self.at
            .as_deref()
            .map(|at| DateTime::<FixedOffset>::parse_from_rfc3339(at.trim()))
            .transpose()
            .map(|at| at.map(|at| at.with_timezone(&Utc)))
    }
}

/// Query parameters for the sources endpoint.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SourcesQueryParams {
    /// Only list sources feeding this dashboard module.
    pub module: Option<String>,
    /// Only list sources of this kind (`REAL`, `MODEL` or `HYBRID`).
    pub kind: Option<SourceKind>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use city_ops_zone::ZoneRegistry;

    #[test]
    fn timestamp_parsing() {
        let none = MetricsQueryParams::default();
        assert_eq!(none.timestamp().unwrap(), None);

        let local = MetricsQueryParams {
            at: Some("2025-06-01T14:30:00+05:30".to_string()),
        };
        assert_eq!(
            local.timestamp().unwrap(),
            Some(Utc.with_ymd_and_hms(2025, 6, 1, 9, 0, 0).unwrap())
        );

        let bad = MetricsQueryParams {
            at: Some("yesterday".to_string()),
        };
        assert!(bad.timestamp().is_err());
    }

    #[test]
    fn zone_carries_density() {
        let zones = ZoneRegistry::reference();
        let zone = &zones.zones()[0];
        let api = ApiZone::from(zone);
        assert_eq!(api.id, zone.id);
        assert_eq!(api.density, zone.density());

        let json = serde_json::to_value(&api).unwrap();
        assert!(json.get("areaSqKm").is_some());
    }

    #[test]
    fn source_is_flattened_with_badge() {
        let source = city_ops_source::get_source("power-data").unwrap();
        let json = serde_json::to_value(ApiSource::from(source)).unwrap();
        assert_eq!(json["id"], "power-data");
        assert_eq!(json["kind"], "HYBRID");
        assert_eq!(json["badge"], "Hybrid");
    }
}
