//! Dashboard KPI cards.
//!
//! Always five cards in a fixed order: air quality, traffic, power, water,
//! then temperature when weather is available or active outages when it
//! is not.

use chrono::{DateTime, Utc};
use city_ops_analytics_models::{Kpi, KpiStatus, KpiValue, Trend};
use city_ops_metrics::CitySnapshot;
use city_ops_metrics::numeric::{mean, ratio_or, round_half_up, total};
use city_ops_open_meteo_models::{AirQualityReading, CurrentWeather, OPEN_METEO_SOURCE};

/// Source label for synthetic values.
pub const MODEL_SOURCE: &str = "Model";

/// Number of cards [`compute_kpis`] returns.
pub const KPI_COUNT: usize = 5;

#[allow(clippy::cast_possible_truncation)]
fn to_number(value: f64) -> KpiValue {
    if value.is_finite() {
        KpiValue::Number(round_half_up(value) as i64)
    } else {
        KpiValue::Unavailable
    }
}

/// Status for a value where lower is better.
fn status_at_most(value: f64, good: f64, warning: f64) -> KpiStatus {
    if value <= good {
        KpiStatus::Good
    } else if value <= warning {
        KpiStatus::Warning
    } else {
        KpiStatus::Critical
    }
}

/// Status for a supply/demand pair where more supply is better.
fn status_coverage(supply: f64, demand: f64, good: f64, warning: f64) -> KpiStatus {
    if supply >= demand * good {
        KpiStatus::Good
    } else if supply >= demand * warning {
        KpiStatus::Warning
    } else {
        KpiStatus::Critical
    }
}

/// Mean zone AQI card. `"N/A"` with a warning when no zone reported.
#[must_use]
pub fn aqi_kpi(air_quality: &[AirQualityReading], now: DateTime<Utc>) -> Kpi {
    let (value, status) = if air_quality.is_empty() {
        (KpiValue::Unavailable, KpiStatus::Warning)
    } else {
        let avg = round_half_up(mean(air_quality.iter().map(|r| f64::from(r.aqi))));
        (to_number(avg), status_at_most(avg, 100.0, 200.0))
    };
    Kpi {
        id: "aqi".to_string(),
        label: "Air Quality Index".to_string(),
        value,
        unit: Some("AQI".to_string()),
        status,
        trend: Some(Trend::Stable),
        last_updated: now,
        source: OPEN_METEO_SOURCE.to_string(),
    }
}

/// Mean congestion card.
#[must_use]
pub fn traffic_kpi(snapshot: &CitySnapshot, now: DateTime<Utc>) -> Kpi {
    let avg = round_half_up(mean(snapshot.traffic.iter().map(|t| f64::from(t.congestion_index))));
    Kpi {
        id: "traffic".to_string(),
        label: "Traffic Congestion".to_string(),
        value: to_number(avg),
        unit: Some("%".to_string()),
        status: status_at_most(avg, 40.0, 60.0),
        trend: Some(if avg > 50.0 { Trend::Up } else { Trend::Down }),
        last_updated: now,
        source: MODEL_SOURCE.to_string(),
    }
}

/// Supply as a percentage of demand, power grid.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn power_kpi(snapshot: &CitySnapshot, now: DateTime<Utc>) -> Kpi {
    let demand = total(snapshot.power.iter().map(|p| p.demand));
    let supply = total(snapshot.power.iter().map(|p| p.supply));
    Kpi {
        id: "power".to_string(),
        label: "Power Availability".to_string(),
        value: to_number(ratio_or(supply, demand, 1.0) * 100.0),
        unit: Some("%".to_string()),
        status: status_coverage(supply as f64, demand as f64, 0.98, 0.95),
        trend: None,
        last_updated: now,
        source: MODEL_SOURCE.to_string(),
    }
}

/// Supply as a percentage of demand, water network.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn water_kpi(snapshot: &CitySnapshot, now: DateTime<Utc>) -> Kpi {
    let demand = total(snapshot.water.iter().map(|w| w.demand));
    let supply = total(snapshot.water.iter().map(|w| w.supply));
    Kpi {
        id: "water".to_string(),
        label: "Water Supply Ratio".to_string(),
        value: to_number(ratio_or(supply, demand, 1.0) * 100.0),
        unit: Some("%".to_string()),
        status: status_coverage(supply as f64, demand as f64, 0.85, 0.70),
        trend: None,
        last_updated: now,
        source: MODEL_SOURCE.to_string(),
    }
}

/// Current temperature card, stamped with the observation time.
#[must_use]
pub fn temperature_kpi(weather: &CurrentWeather) -> Kpi {
    Kpi {
        id: "temperature".to_string(),
        label: "Temperature".to_string(),
        value: to_number(weather.temperature),
        unit: Some("°C".to_string()),
        status: status_at_most(weather.temperature, 35.0, 42.0),
        trend: None,
        last_updated: weather.observed_at,
        source: OPEN_METEO_SOURCE.to_string(),
    }
}

/// Total active power outages card.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn outages_kpi(snapshot: &CitySnapshot, now: DateTime<Utc>) -> Kpi {
    let outages = total(snapshot.power.iter().map(|p| p.outages)) as f64;
    Kpi {
        id: "outages".to_string(),
        label: "Active Outages".to_string(),
        value: to_number(outages),
        unit: Some("incidents".to_string()),
        status: status_at_most(outages, 5.0, 15.0),
        trend: None,
        last_updated: now,
        source: MODEL_SOURCE.to_string(),
    }
}

/// Builds the five dashboard cards.
#[must_use]
pub fn compute_kpis(
    air_quality: &[AirQualityReading],
    weather: Option<&CurrentWeather>,
    snapshot: &CitySnapshot,
    now: DateTime<Utc>,
) -> Vec<Kpi> {
    let fifth = weather.map_or_else(|| outages_kpi(snapshot, now), temperature_kpi);
    vec![
        aqi_kpi(air_quality, now),
        traffic_kpi(snapshot, now),
        power_kpi(snapshot, now),
        water_kpi(snapshot, now),
        fifth,
    ]
}
