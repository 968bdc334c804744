#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! City-level roll-ups: the composite health index, dashboard KPIs and
//! the operations façade that wires live environmental data to the
//! synthetic metric generators.
//!
//! [`health_index::compute_index`] and [`kpi::compute_kpis`] are pure.
//! [`CityOperations`] performs the fetches (each bounded by a timeout and
//! degraded on failure), generates a fresh [`CitySnapshot`], and calls
//! them.

pub mod air_quality;
pub mod environment;
pub mod health_index;
pub mod kpi;

use std::sync::Arc;
use std::time::Duration;

use city_ops_analytics_models::{CityHealthIndex, Kpi};
use city_ops_metrics::{CitySnapshot, MetricsGenerator, RandomSource, TimeContext};
use city_ops_open_meteo_models::{AirQualityReading, CurrentWeather};
use city_ops_scenario_models::{ScenarioImpact, ScenarioParameters};
use city_ops_zone::ZoneRegistry;
use thiserror::Error;

pub use air_quality::AirQualitySummary;
pub use environment::EnvironmentSource;

/// Environment variable holding the fetch timeout in seconds.
pub const FETCH_TIMEOUT_ENV: &str = "CITY_OPS_FETCH_TIMEOUT_SECS";

/// Fetch timeout when [`FETCH_TIMEOUT_ENV`] is unset.
pub const DEFAULT_FETCH_TIMEOUT: Duration = Duration::from_secs(10);

/// Errors from configuring the analytics layer.
#[derive(Debug, Error)]
pub enum AnalyticsError {
    /// A configuration value was unusable.
    #[error("Invalid value for {name}: {message}")]
    Config {
        /// Setting name.
        name: &'static str,
        /// What was wrong with it.
        message: String,
    },
}

/// Reads the fetch timeout from [`FETCH_TIMEOUT_ENV`].
///
/// # Errors
///
/// Returns [`AnalyticsError::Config`] if the variable is set but is not a
/// positive integer.
pub fn fetch_timeout_from_env() -> Result<Duration, AnalyticsError> {
    parse_fetch_timeout(std::env::var(FETCH_TIMEOUT_ENV).ok().as_deref())
}

fn parse_fetch_timeout(value: Option<&str>) -> Result<Duration, AnalyticsError> {
    let Some(value) = value else {
        return Ok(DEFAULT_FETCH_TIMEOUT);
    };
    match value.trim().parse::<u64>() {
        Ok(secs) if secs > 0 => Ok(Duration::from_secs(secs)),
        _ => Err(AnalyticsError::Config {
            name: FETCH_TIMEOUT_ENV,
            message: format!("expected a positive integer, got {value:?}"),
        }),
    }
}

/// Request-scoped entry points used by the server and CLI.
///
/// Holds only shared, read-only state, so one instance can serve any
/// number of concurrent requests.
#[derive(Clone)]
pub struct CityOperations {
    generator: MetricsGenerator,
    environment: Arc<dyn EnvironmentSource>,
    fetch_timeout: Duration,
}

impl std::fmt::Debug for CityOperations {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CityOperations")
            .field("generator", &self.generator)
            .field("environment", &self.environment.name())
            .field("fetch_timeout", &self.fetch_timeout)
            .finish()
    }
}

impl CityOperations {
    /// Creates a façade over `zones` using the default random source and
    /// [`DEFAULT_FETCH_TIMEOUT`].
    #[must_use]
    pub fn new(zones: Arc<ZoneRegistry>, environment: Arc<dyn EnvironmentSource>) -> Self {
        Self {
            generator: MetricsGenerator::new(zones),
            environment,
            fetch_timeout: DEFAULT_FETCH_TIMEOUT,
        }
    }

    /// Replaces the random source used for synthetic metrics.
    #[must_use]
    pub fn with_random(self, random: Arc<dyn RandomSource>) -> Self {
        Self {
            generator: MetricsGenerator::with_random(self.generator.shared_zones(), random),
            ..self
        }
    }

    /// Sets the per-fetch timeout.
    #[must_use]
    pub const fn with_fetch_timeout(mut self, fetch_timeout: Duration) -> Self {
        self.fetch_timeout = fetch_timeout;
        self
    }

    /// The zone registry.
    #[must_use]
    pub fn zones(&self) -> &ZoneRegistry {
        self.generator.zones()
    }

    /// The metric generator.
    #[must_use]
    pub const fn generator(&self) -> &MetricsGenerator {
        &self.generator
    }

    /// Time context for the current wall-clock time.
    #[must_use]
    pub fn now(&self) -> TimeContext {
        self.generator.now()
    }

    /// Awaits `fetch` for at most the fetch timeout, logging and returning
    /// `fallback` when it runs out.
    async fn bounded<F: Future>(&self, fetch: F, fallback: F::Output, what: &str) -> F::Output {
        if let Ok(value) = tokio::time::timeout(self.fetch_timeout, fetch).await {
            value
        } else {
            log::warn!(
                "{what} from {} timed out after {:?}",
                self.environment.name(),
                self.fetch_timeout
            );
            fallback
        }
    }

    /// Air quality for every zone that answered in time, in registry
    /// order. Zones are fetched concurrently and each is bounded on its
    /// own, so a slow zone is dropped like a failed one.
    pub async fn air_quality(&self) -> Vec<AirQualityReading> {
        let fetches = self.zones().zones().iter().map(|zone| async move {
            let what = format!("Air quality for zone {}", zone.id);
            self.bounded(self.environment.zone_air_quality(zone), None, &what)
                .await
        });
        futures::future::join_all(fetches)
            .await
            .into_iter()
            .flatten()
            .collect()
    }

    /// Citywide air quality roll-up.
    pub async fn air_quality_summary(&self) -> AirQualitySummary {
        AirQualitySummary::from_readings(&self.air_quality().await)
    }

    /// Current weather, or `None` on failure or timeout.
    pub async fn current_weather(&self) -> Option<CurrentWeather> {
        self.bounded(
            self.environment.current_weather(self.zones()),
            None,
            "Weather",
        )
        .await
    }

    /// All five domains for `ctx`.
    #[must_use]
    pub fn snapshot(&self, ctx: &TimeContext) -> CitySnapshot {
        self.generator.snapshot(ctx)
    }

    /// Projects `params` against a fresh snapshot for `ctx`.
    #[must_use]
    pub fn simulate_at(&self, params: &ScenarioParameters, ctx: &TimeContext) -> ScenarioImpact {
        let generator = &self.generator;
        city_ops_scenario::simulate(
            params,
            generator.zones(),
            &generator.traffic(ctx),
            &generator.power(ctx),
            &generator.water(ctx),
        )
    }

    /// Projects `params` against a fresh snapshot for now.
    #[must_use]
    pub fn simulate(&self, params: &ScenarioParameters) -> ScenarioImpact {
        self.simulate_at(params, &self.now())
    }

    /// Computes the city health index for `ctx` with live air quality.
    pub async fn city_health_index_at(&self, ctx: &TimeContext) -> CityHealthIndex {
        let air_quality = self.air_quality().await;
        health_index::compute_index(&air_quality, &self.snapshot(ctx), ctx.timestamp())
    }

    /// Computes the city health index for now.
    pub async fn city_health_index(&self) -> CityHealthIndex {
        self.city_health_index_at(&self.now()).await
    }

    /// Builds the dashboard KPIs for `ctx`, fetching air quality and
    /// weather concurrently.
    pub async fn dashboard_kpis_at(&self, ctx: &TimeContext) -> Vec<Kpi> {
        let (air_quality, weather) = tokio::join!(self.air_quality(), self.current_weather());
        kpi::compute_kpis(
            &air_quality,
            weather.as_ref(),
            &self.snapshot(ctx),
            ctx.timestamp(),
        )
    }

    /// Builds the dashboard KPIs for now.
    pub async fn dashboard_kpis(&self) -> Vec<Kpi> {
        self.dashboard_kpis_at(&self.now()).await
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use std::time::Duration;

    use async_trait::async_trait;
    use chrono::DateTime;
    use city_ops_metrics::CitySnapshot;
    use city_ops_metrics_models::{
        HealthMetrics, PowerMetrics, RiskLevel, SafetyMetrics, TrafficMetrics, WaterMetrics,
    };
    use city_ops_open_meteo_models::{AirQualityReading, CurrentWeather, OPEN_METEO_SOURCE};
    use city_ops_zone::{Zone, ZoneRegistry};

    use crate::EnvironmentSource;

    pub fn air(zone: &str, aqi: u32) -> AirQualityReading {
        AirQualityReading {
            zone: zone.to_string(),
            aqi,
            pm25: 0,
            pm10: 0,
            no2: 0,
            so2: 0,
            co: 0,
            o3: 0,
            timestamp: DateTime::from_timestamp(1_750_000_000, 0).unwrap(),
            source: OPEN_METEO_SOURCE.to_string(),
        }
    }

    pub fn weather(temperature: f64) -> CurrentWeather {
        CurrentWeather {
            temperature,
            humidity: 30.0,
            wind_speed: 10.0,
            weather_code: 0,
            description: "Clear sky".to_string(),
            observed_at: DateTime::from_timestamp(1_749_999_100, 0).unwrap(),
        }
    }

    /// Two zones with round numbers.
    pub fn snapshot() -> CitySnapshot {
        let ts = DateTime::from_timestamp(1_750_000_000, 0).unwrap();
        let traffic = |zone: &str, congestion_index| TrafficMetrics {
            zone: zone.to_string(),
            congestion_index,
            avg_speed: 40,
            incidents: 1,
            timestamp: ts,
        };
        let power = |zone: &str, demand, supply, outages| PowerMetrics {
            zone: zone.to_string(),
            demand,
            supply,
            peak_load: demand,
            outages,
            renewable_percent: 10,
            timestamp: ts,
        };
        let water = |zone: &str, demand, supply| WaterMetrics {
            zone: zone.to_string(),
            supply,
            demand,
            reservoir_level: 70,
            leakages: 1,
            timestamp: ts,
        };
        let health = |zone: &str, hospital_beds, beds_occupied, avg_response_time| HealthMetrics {
            zone: zone.to_string(),
            hospital_beds,
            beds_occupied,
            ambulances: 30,
            avg_response_time,
            emergency_calls: 100,
            timestamp: ts,
        };
        let safety = |zone: &str, crime_index| SafetyMetrics {
            zone: zone.to_string(),
            crime_index,
            incidents: 2,
            patrol_units: 20,
            response_time: 10,
            risk_level: RiskLevel::from_crime_index(crime_index),
            timestamp: ts,
        };

        CitySnapshot {
            traffic: vec![traffic("a", 30), traffic("b", 50)],
            power: vec![power("a", 600, 500, 2), power("b", 400, 450, 4)],
            water: vec![water("a", 120, 100), water("b", 80, 90)],
            health: vec![health("a", 100, 80, 10), health("b", 200, 160, 20)],
            safety: vec![safety("a", 40), safety("b", 50)],
        }
    }

    /// Returns canned data, optionally after a delay.
    pub struct StubEnvironment {
        pub readings: Vec<AirQualityReading>,
        pub weather: Option<CurrentWeather>,
        pub delay: Duration,
        /// Zones that wait for `delay`; empty means every call waits.
        pub slow_zones: Vec<&'static str>,
    }

    impl StubEnvironment {
        pub fn instant(readings: Vec<AirQualityReading>, weather: Option<CurrentWeather>) -> Self {
            Self {
                readings,
                weather,
                delay: Duration::ZERO,
                slow_zones: vec![],
            }
        }

        fn waits_for(&self, zone: &str) -> bool {
            self.slow_zones.is_empty() || self.slow_zones.iter().any(|z| *z == zone)
        }
    }

    #[async_trait]
    impl EnvironmentSource for StubEnvironment {
        fn name(&self) -> &'static str {
            "stub"
        }

        async fn zone_air_quality(&self, zone: &Zone) -> Option<AirQualityReading> {
            if self.waits_for(&zone.id) {
                tokio::time::sleep(self.delay).await;
            }
            self.readings.iter().find(|r| r.zone == zone.id).cloned()
        }

        async fn current_weather(&self, _zones: &ZoneRegistry) -> Option<CurrentWeather> {
            if self.slow_zones.is_empty() {
                tokio::time::sleep(self.delay).await;
            }
            self.weather.clone()
        }
    }
}
