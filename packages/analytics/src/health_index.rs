//! Composite city health score.
//!
//! | Component | Inputs |
//! |---|---|
//! | environment | mean zone AQI (150 when no readings) |
//! | infrastructure | mean congestion, power deficit ratio |
//! | safety | mean crime index |
//! | health | mean bed occupancy, mean ambulance response |
//! | governance | water deficit ratio, power outages |
//!
//! Each component is rounded and clamped to 0-100 before weighting.

use chrono::{DateTime, Utc};
use city_ops_analytics_models::{CityHealthIndex, HealthComponents};
use city_ops_metrics::CitySnapshot;
use city_ops_metrics::numeric::{clamp_percent, mean, ratio_or, round_half_up, total};
use city_ops_metrics_models::{PowerMetrics, WaterMetrics};
use city_ops_open_meteo_models::AirQualityReading;

/// Mean AQI assumed when no zone reading is available.
pub const FALLBACK_AQI: f64 = 150.0;

/// Response time, minutes, at which the response half of the health score
/// reaches zero.
const RESPONSE_TIME_CEILING: f64 = 30.0;

fn score(value: f64) -> f64 {
    clamp_percent(round_half_up(value))
}

/// Air quality component.
#[must_use]
pub fn environment_score(air_quality: &[AirQualityReading]) -> f64 {
    let avg_aqi = if air_quality.is_empty() {
        FALLBACK_AQI
    } else {
        mean(air_quality.iter().map(|r| f64::from(r.aqi)))
    };
    score(100.0 - avg_aqi / 5.0)
}

/// Traffic flow and power stability component.
#[must_use]
pub fn infrastructure_score(snapshot: &CitySnapshot) -> f64 {
    let avg_congestion = mean(snapshot.traffic.iter().map(|t| f64::from(t.congestion_index)));
    let deficit_ratio = ratio_or(
        total(snapshot.power.iter().map(PowerMetrics::deficit)),
        total(snapshot.power.iter().map(|p| p.demand)),
        0.0,
    );
    score((100.0 - avg_congestion).mul_add(0.5, (1.0 - deficit_ratio) * 100.0 * 0.5))
}

/// Crime component.
#[must_use]
pub fn safety_score(snapshot: &CitySnapshot) -> f64 {
    score(100.0 - mean(snapshot.safety.iter().map(|s| f64::from(s.crime_index))))
}

/// Bed availability and ambulance response component.
#[must_use]
pub fn health_score(snapshot: &CitySnapshot) -> f64 {
    let avg_occupancy = mean(snapshot.health.iter().map(city_ops_metrics_models::HealthMetrics::occupancy));
    let avg_response = mean(snapshot.health.iter().map(|h| f64::from(h.avg_response_time)));
    score((1.0 - avg_occupancy).mul_add(50.0, (1.0 - avg_response / RESPONSE_TIME_CEILING) * 50.0))
}

/// Water supply efficiency and outage component.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn governance_score(snapshot: &CitySnapshot) -> f64 {
    let water_deficit_ratio = ratio_or(
        total(snapshot.water.iter().map(WaterMetrics::deficit)),
        total(snapshot.water.iter().map(|w| w.demand)),
        0.0,
    );
    let outages = total(snapshot.power.iter().map(|p| p.outages)) as f64;
    let outage_score = outages.mul_add(-3.0, 100.0).max(0.0);
    score((1.0 - water_deficit_ratio).mul_add(60.0, outage_score * 0.4))
}

/// Computes the index from air quality readings and one snapshot.
#[must_use]
pub fn compute_index(
    air_quality: &[AirQualityReading],
    snapshot: &CitySnapshot,
    timestamp: DateTime<Utc>,
) -> CityHealthIndex {
    let components = HealthComponents {
        environment: environment_score(air_quality),
        infrastructure: infrastructure_score(snapshot),
        safety: safety_score(snapshot),
        health: health_score(snapshot),
        governance: governance_score(snapshot),
    };
    log::debug!("city health components: {components:?}");
    CityHealthIndex::new(components, timestamp)
}
