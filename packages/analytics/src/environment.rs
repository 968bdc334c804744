//! Live environmental data seam.
//!
//! The scorer and KPI summarizer need air quality and weather but must not
//! care where they come from. Production uses [`OpenMeteoClient`]; tests
//! substitute a stub.

use async_trait::async_trait;
use city_ops_open_meteo::OpenMeteoClient;
use city_ops_open_meteo_models::{AirQualityReading, CurrentWeather};
use city_ops_zone::{Zone, ZoneRegistry};

/// Supplier of live air quality and weather.
///
/// Implementations degrade instead of failing: a zone that cannot be read
/// is `None`, and unavailable weather is `None`. Callers fan out over
/// zones and bound each call, so one slow zone cannot hold back the rest.
#[async_trait]
pub trait EnvironmentSource: Send + Sync {
    /// Returns a short label for logs (e.g. `"open-meteo"`).
    fn name(&self) -> &str;

    /// Current air quality at one zone, if it could be read.
    async fn zone_air_quality(&self, zone: &Zone) -> Option<AirQualityReading>;

    /// Current weather at the city's central zone, if available.
    async fn current_weather(&self, zones: &ZoneRegistry) -> Option<CurrentWeather>;
}

#[async_trait]
impl EnvironmentSource for OpenMeteoClient {
    fn name(&self) -> &'static str {
        "open-meteo"
    }

    async fn zone_air_quality(&self, zone: &Zone) -> Option<AirQualityReading> {
        match Self::zone_air_quality(self, zone).await {
            Ok(reading) => Some(reading),
            Err(e) => {
                log::warn!("Air quality fetch failed for zone {}: {e}", zone.id);
                None
            }
        }
    }

    async fn current_weather(&self, zones: &ZoneRegistry) -> Option<CurrentWeather> {
        Self::current_weather(self, zones).await
    }
}
