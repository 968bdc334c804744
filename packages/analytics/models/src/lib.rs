#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! City health index and dashboard KPI types.
//!
//! Both are derived views: the scorer and summarizer in
//! `city_ops_analytics` build them from air quality readings, weather and
//! a metrics snapshot.

use chrono::{DateTime, Utc};
use city_ops_metrics::numeric::{clamp_percent, round_half_up};
use serde::{Deserialize, Serialize, Serializer};
use strum_macros::{AsRefStr, Display, EnumString};

/// Component scores of the [`CityHealthIndex`], each 0-100.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthComponents {
    /// Air quality.
    pub environment: f64,
    /// Traffic flow and power stability.
    pub infrastructure: f64,
    /// Crime.
    pub safety: f64,
    /// Bed availability and ambulance response.
    pub health: f64,
    /// Water supply efficiency and outages.
    pub governance: f64,
}

impl HealthComponents {
    /// Weight of the environment component.
    pub const ENVIRONMENT_WEIGHT: f64 = 0.25;
    /// Weight of the infrastructure component.
    pub const INFRASTRUCTURE_WEIGHT: f64 = 0.25;
    /// Weight of the safety component.
    pub const SAFETY_WEIGHT: f64 = 0.15;
    /// Weight of the health component.
    pub const HEALTH_WEIGHT: f64 = 0.20;
    /// Weight of the governance component.
    pub const GOVERNANCE_WEIGHT: f64 = 0.15;

    /// All component weights, in field order.
    pub const WEIGHTS: [f64; 5] = [
        Self::ENVIRONMENT_WEIGHT,
        Self::INFRASTRUCTURE_WEIGHT,
        Self::SAFETY_WEIGHT,
        Self::HEALTH_WEIGHT,
        Self::GOVERNANCE_WEIGHT,
    ];

    /// Component values, in field order.
    #[must_use]
    pub const fn values(&self) -> [f64; 5] {
        [
            self.environment,
            self.infrastructure,
            self.safety,
            self.health,
            self.governance,
        ]
    }

    /// Weighted composite, rounded half-up and clamped to 0-100.
    #[must_use]
    pub fn overall(&self) -> f64 {
        let weighted: f64 = self
            .values()
            .iter()
            .zip(Self::WEIGHTS)
            .map(|(value, weight)| value * weight)
            .sum();
        clamp_percent(round_half_up(weighted))
    }
}

/// Composite city health score.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CityHealthIndex {
    /// Weighted composite, 0-100.
    pub overall: f64,
    /// Per-subsystem scores.
    pub components: HealthComponents,
    /// When the index was computed.
    pub timestamp: DateTime<Utc>,
}

impl CityHealthIndex {
    /// Builds an index whose `overall` is derived from `components`.
    #[must_use]
    pub fn new(components: HealthComponents, timestamp: DateTime<Utc>) -> Self {
        Self {
            overall: components.overall(),
            components,
            timestamp,
        }
    }
}

/// Traffic-light status of a KPI.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum KpiStatus {
    /// Within normal bounds.
    Good,
    /// Needs attention.
    Warning,
    /// Needs immediate action.
    Critical,
}

/// Direction a KPI is moving.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Trend {
    /// Rising.
    Up,
    /// Falling.
    Down,
    /// Flat.
    Stable,
}

/// A KPI value, or the marker for data that could not be obtained.
///
/// Serializes as a JSON number, or as the string `"N/A"` when
/// unavailable.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KpiValue {
    /// A measured integer value.
    Number(i64),
    /// No data.
    Unavailable,
}

impl KpiValue {
    /// Marker text for [`KpiValue::Unavailable`].
    pub const UNAVAILABLE: &'static str = "N/A";

    /// The numeric value, if available.
    #[must_use]
    pub const fn as_number(self) -> Option<i64> {
        match self {
            Self::Number(n) => Some(n),
            Self::Unavailable => None,
        }
    }
}

impl std::fmt::Display for KpiValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Number(n) => write!(f, "{n}"),
            Self::Unavailable => f.write_str(Self::UNAVAILABLE),
        }
    }
}

impl Serialize for KpiValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Number(n) => serializer.serialize_i64(*n),
            Self::Unavailable => serializer.serialize_str(Self::UNAVAILABLE),
        }
    }
}

/// One dashboard KPI card.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Kpi {
    /// Stable identifier (e.g. `"aqi"`).
    pub id: String,
    /// Display label.
    pub label: String,
    /// Current value.
    pub value: KpiValue,
    /// Unit suffix.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub unit: Option<String>,
    /// Traffic-light status.
    pub status: KpiStatus,
    /// Direction of movement, when known.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub trend: Option<Trend>,
    /// When the underlying data was last refreshed.
    pub last_updated: DateTime<Utc>,
    /// Where the value comes from.
    pub source: String,
}
