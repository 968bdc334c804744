#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Input and output types for the what-if scenario calculator.
//!
//! [`ScenarioParameters`] describes a hypothetical perturbation of current
//! conditions; [`ScenarioImpact`] is the projected effect on the city and
//! [`ScenarioReport`] is that effect with its risk bands, as served.

use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumString};

/// Nominal dashboard slider range for rainfall increase, percent.
pub const RAINFALL_RANGE: (f64, f64) = (0.0, 100.0);
/// Nominal dashboard slider range for traffic surge, percent.
pub const TRAFFIC_SURGE_RANGE: (f64, f64) = (0.0, 100.0);
/// Nominal dashboard slider range for power demand spike, percent.
pub const POWER_SPIKE_RANGE: (f64, f64) = (0.0, 50.0);
/// Nominal dashboard slider range for temperature change, degrees Celsius.
pub const TEMPERATURE_RANGE: (f64, f64) = (-10.0, 10.0);

/// A city-wide event that adds emergency service load.
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
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
pub enum EventType {
    /// No special event.
    #[default]
    None,
    /// Large public festival.
    Festival,
    /// Declared emergency.
    Emergency,
    /// Transport or general strike.
    Strike,
}

impl EventType {
    /// Returns all variants of this enum.
    #[must_use]
    pub const fn all() -> &'static [Self] {
        &[Self::None, Self::Festival, Self::Emergency, Self::Strike]
    }

    /// Emergency load increase attributed to the event alone, percent.
    #[must_use]
    pub const fn emergency_base(self) -> f64 {
        match self {
            Self::None => 0.0,
            Self::Festival => 30.0,
            Self::Emergency => 80.0,
            Self::Strike => 20.0,
        }
    }
}

/// A what-if perturbation of current conditions.
///
/// Values outside the nominal ranges (see [`RAINFALL_RANGE`] and friends)
/// are accepted and flow through the arithmetic unchanged.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ScenarioParameters {
    /// Rainfall increase, percent.
    pub rainfall_increase: f64,
    /// Traffic volume surge, percent.
    pub traffic_surge: f64,
    /// Power demand spike, percent.
    pub power_demand_spike: f64,
    /// Temperature change, degrees Celsius.
    pub temperature_change: f64,
    /// Special event in effect.
    pub event_type: EventType,
}

/// Projected effect of a [`ScenarioParameters`] on the city.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScenarioImpact {
    /// Flood risk, 0-100.
    pub flood_risk: f64,
    /// Expected traffic delay, percent (0-100).
    pub traffic_delay_percent: f64,
    /// Projected power shortfall, MW (never negative).
    pub power_shortfall: f64,
    /// Water stress index, 0-100.
    pub water_stress_index: f64,
    /// Emergency service load increase, percent (never negative).
    pub emergency_load_increase: f64,
    /// Zone ids affected by the scenario, without duplicates.
    pub affected_zones: Vec<String>,
    /// Recommended actions, in priority order.
    pub recommendations: Vec<String>,
}

impl ScenarioImpact {
    /// Risk band of the flood projection.
    #[must_use]
    pub fn flood_band(&self) -> RiskBand {
        RiskBand::from_score(self.flood_risk)
    }

    /// Risk band of the water stress projection.
    #[must_use]
    pub fn water_stress_band(&self) -> RiskBand {
        RiskBand::from_score(self.water_stress_index)
    }
}

/// A [`ScenarioImpact`] together with the bands of its risk projections.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScenarioReport {
    /// The raw projection.
    #[serde(flatten)]
    pub impact: ScenarioImpact,
    /// Band of [`ScenarioImpact::flood_risk`].
    pub flood_band: RiskBand,
    /// Band of [`ScenarioImpact::water_stress_index`].
    pub water_stress_band: RiskBand,
}

impl From<ScenarioImpact> for ScenarioReport {
    fn from(impact: ScenarioImpact) -> Self {
        Self {
            flood_band: impact.flood_band(),
            water_stress_band: impact.water_stress_band(),
            impact,
        }
    }
}

/// Coarse classification of a 0-100 risk projection.
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
pub enum RiskBand {
    /// Score at or below 40.
    Low,
    /// Score above 40 and at or below 70.
    Elevated,
    /// Score above 70.
    Severe,
}

impl RiskBand {
    /// Classifies a 0-100 score.
    #[must_use]
    pub fn from_score(score: f64) -> Self {
        if score <= 40.0 {
            Self::Low
        } else if score <= 70.0 {
            Self::Elevated
        } else {
            Self::Severe
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_parameters_are_neutral() {
        let params = ScenarioParameters::default();
        assert!(params.rainfall_increase.abs() < f64::EPSILON);
        assert!(params.temperature_change.abs() < f64::EPSILON);
        assert_eq!(params.event_type, EventType::None);
    }

    #[test]
    fn parameters_deserialize_camel_case_with_missing_fields() {
        let params: ScenarioParameters =
            serde_json::from_str(r#"{"rainfallIncrease": 60, "eventType": "festival"}"#).unwrap();
        assert!((params.rainfall_increase - 60.0).abs() < f64::EPSILON);
        assert!(params.traffic_surge.abs() < f64::EPSILON);
        assert_eq!(params.event_type, EventType::Festival);
    }

    #[test]
    fn event_type_parses_lowercase() {
        assert_eq!("strike".parse::<EventType>().unwrap(), EventType::Strike);
        assert_eq!(EventType::Emergency.to_string(), "emergency");
        assert!("riot".parse::<EventType>().is_err());
    }

    #[test]
    fn event_bases() {
        let bases: Vec<f64> = EventType::all().iter().map(|e| e.emergency_base()).collect();
        assert_eq!(bases, vec![0.0, 30.0, 80.0, 20.0]);
    }

    #[test]
    fn risk_band_boundaries() {
        assert_eq!(RiskBand::from_score(0.0), RiskBand::Low);
        assert_eq!(RiskBand::from_score(40.0), RiskBand::Low);
        assert_eq!(RiskBand::from_score(40.5), RiskBand::Elevated);
        assert_eq!(RiskBand::from_score(70.0), RiskBand::Elevated);
        assert_eq!(RiskBand::from_score(71.0), RiskBand::Severe);
    }

    #[test]
    fn report_flattens_impact_and_adds_bands() {
        let impact = ScenarioImpact {
            flood_risk: 80.0,
            traffic_delay_percent: 12.0,
            power_shortfall: 0.0,
            water_stress_index: 55.0,
            emergency_load_increase: 0.0,
            affected_zones: vec!["shahdara".to_string()],
            recommendations: vec![],
        };
        let report = ScenarioReport::from(impact);
        assert_eq!(report.flood_band, RiskBand::Severe);
        assert_eq!(report.water_stress_band, RiskBand::Elevated);

        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["floodRisk"], 80.0);
        assert_eq!(json["floodBand"], "severe");
        assert_eq!(json["waterStressBand"], "elevated");
        assert_eq!(json["affectedZones"][0], "shahdara");
    }
}
