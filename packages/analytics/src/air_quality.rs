//! Citywide roll-up of live air quality readings.

use city_ops_metrics::numeric::{mean, to_count};
use city_ops_open_meteo_models::{AirQualityReading, AqiCategory};
use serde::Serialize;

/// Lowest category at which a zone is reported as critical (AQI above 200).
pub const CRITICAL_AQI_CATEGORY: AqiCategory = AqiCategory::Poor;

/// Citywide air quality figures.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AirQualitySummary {
    /// Rounded mean AQI across reporting zones; `None` when no zone
    /// reported.
    pub avg_aqi: Option<u32>,
    /// Category of [`Self::avg_aqi`].
    pub category: Option<AqiCategory>,
    /// Number of zones with a reading.
    pub zones_reporting: usize,
    /// Zones at or above [`CRITICAL_AQI_CATEGORY`], worst first.
    pub critical_zones: Vec<String>,
}

impl AirQualitySummary {
    /// Summarizes the readings that came back.
    #[must_use]
    pub fn from_readings(readings: &[AirQualityReading]) -> Self {
        let avg_aqi = (!readings.is_empty())
            .then(|| to_count(mean(readings.iter().map(|r| f64::from(r.aqi)))));

        let mut critical: Vec<&AirQualityReading> = readings
            .iter()
            .filter(|r| r.category() >= CRITICAL_AQI_CATEGORY)
            .collect();
        critical.sort_by(|a, b| b.aqi.cmp(&a.aqi));

        Self {
            avg_aqi,
            category: avg_aqi.map(AqiCategory::from_aqi),
            zones_reporting: readings.len(),
            critical_zones: critical.into_iter().map(|r| r.zone.clone()).collect(),
        }
    }
}
