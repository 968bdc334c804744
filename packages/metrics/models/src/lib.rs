#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Per-zone metric record types for each city domain.
//!
//! One record is produced per zone per generation call. Records are plain
//! values: they are created by the generators in `city_ops_metrics`,
//! consumed by aggregation or serialization, and never mutated.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumString};

/// A city subsystem with its own metric generator.
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
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum Domain {
    /// Road congestion.
    Traffic,
    /// Electricity demand and supply.
    Power,
    /// Water demand and supply.
    Water,
    /// Hospital and ambulance capacity.
    Health,
    /// Crime and policing.
    Safety,
}

impl Domain {
    /// Returns all variants of this enum.
    #[must_use]
    pub const fn all() -> &'static [Self] {
        &[
            Self::Traffic,
            Self::Power,
            Self::Water,
            Self::Health,
            Self::Safety,
        ]
    }
}

/// Qualitative safety risk for a zone.
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
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum RiskLevel {
    /// Crime index 40 or below.
    Low,
    /// Crime index above 40.
    Medium,
    /// Crime index above 55.
    High,
}

impl RiskLevel {
    /// Classifies a crime index.
    #[must_use]
    pub const fn from_crime_index(crime_index: u32) -> Self {
        if crime_index > 55 {
            Self::High
        } else if crime_index > 40 {
            Self::Medium
        } else {
            Self::Low
        }
    }
}

/// Traffic conditions for one zone.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrafficMetrics {
    /// Zone id.
    pub zone: String,
    /// Congestion index, 0-100.
    pub congestion_index: u32,
    /// Average speed in km/h.
    pub avg_speed: u32,
    /// Active incidents.
    pub incidents: u32,
    /// Generation time.
    pub timestamp: DateTime<Utc>,
}

/// Power grid state for one zone. All loads are in MW.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PowerMetrics {
    /// Zone id.
    pub zone: String,
    /// Demand in MW.
    pub demand: u32,
    /// Supply in MW.
    pub supply: u32,
    /// Expected peak load in MW.
    pub peak_load: u32,
    /// Active outages.
    pub outages: u32,
    /// Share of supply from renewables, in percent.
    pub renewable_percent: u32,
    /// Generation time.
    pub timestamp: DateTime<Utc>,
}

impl PowerMetrics {
    /// Demand not covered by supply, in MW.
    #[must_use]
    pub const fn deficit(&self) -> u32 {
        self.demand.saturating_sub(self.supply)
    }
}

/// Water supply state for one zone. Volumes are in MLD.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WaterMetrics {
    /// Zone id.
    pub zone: String,
    /// Supply in million litres per day.
    pub supply: u32,
    /// Demand in million litres per day.
    pub demand: u32,
    /// Reservoir level in percent.
    pub reservoir_level: u32,
    /// Reported leakages.
    pub leakages: u32,
    /// Generation time.
    pub timestamp: DateTime<Utc>,
}

impl WaterMetrics {
    /// Demand not covered by supply, in MLD.
    #[must_use]
    pub const fn deficit(&self) -> u32 {
        self.demand.saturating_sub(self.supply)
    }

    /// Supply as a fraction of demand. A zone with no demand is fully
    /// covered.
    #[must_use]
    pub fn coverage(&self) -> f64 {
        if self.demand == 0 {
            1.0
        } else {
            f64::from(self.supply) / f64::from(self.demand)
        }
    }
}

/// Health infrastructure state for one zone.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthMetrics {
    /// Zone id.
    pub zone: String,
    /// Government hospital beds.
    pub hospital_beds: u32,
    /// Beds currently occupied.
    pub beds_occupied: u32,
    /// Ambulances on duty.
    pub ambulances: u32,
    /// Average ambulance response time in minutes.
    pub avg_response_time: u32,
    /// Emergency calls in the current window.
    pub emergency_calls: u32,
    /// Generation time.
    pub timestamp: DateTime<Utc>,
}

impl HealthMetrics {
    /// Occupied beds as a fraction of capacity, `0.0` for a zone with no
    /// beds.
    #[must_use]
    pub fn occupancy(&self) -> f64 {
        if self.hospital_beds == 0 {
            0.0
        } else {
            f64::from(self.beds_occupied) / f64::from(self.hospital_beds)
        }
    }
}

/// Public safety state for one zone.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SafetyMetrics {
    /// Zone id.
    pub zone: String,
    /// Crime index, 0-100.
    pub crime_index: u32,
    /// Incidents in the current window.
    pub incidents: u32,
    /// Patrol units deployed.
    pub patrol_units: u32,
    /// Average police response time in minutes.
    pub response_time: u32,
    /// Qualitative risk classification.
    pub risk_level: RiskLevel,
    /// Generation time.
    pub timestamp: DateTime<Utc>,
}
