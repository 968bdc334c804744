//! Open-Meteo air quality and forecast client.
//!
//! See <https://open-meteo.com/en/docs/air-quality-api> and
//! <https://open-meteo.com/en/docs>.

use chrono::{DateTime, FixedOffset, NaiveDateTime, TimeZone, Utc};
use city_ops_open_meteo_models::{
    AirQualityReading, AirQualityResponse, CurrentWeather, ForecastResponse, OPEN_METEO_SOURCE,
};
use city_ops_zone::{Coordinate, Zone, ZoneRegistry};

use crate::OpenMeteoError;
use crate::aqi::calculate_aqi;
use crate::config::OpenMeteoConfig;
use crate::retry::{self, RetryPolicy};
use crate::weather_codes;

/// `current` variables requested from the air quality API.
const AIR_QUALITY_VARIABLES: &str = "pm2_5,pm10,nitrogen_dioxide,sulphur_dioxide,carbon_monoxide,ozone,european_aqi,us_aqi";

/// `current` variables requested from the forecast API.
const WEATHER_VARIABLES: &str = "temperature_2m,relative_humidity_2m,wind_speed_10m,weather_code";

/// Client for the two Open-Meteo endpoints the engine reads.
#[derive(Debug, Clone)]
pub struct OpenMeteoClient {
    http: reqwest::Client,
    config: OpenMeteoConfig,
}

impl OpenMeteoClient {
    /// Builds a client with its own connection pool and the configured
    /// per-request timeout.
    ///
    /// # Errors
    ///
    /// Returns [`OpenMeteoError::Http`] if the TLS backend cannot be
    /// initialised.
    pub fn new(config: OpenMeteoConfig) -> Result<Self, OpenMeteoError> {
        let http = reqwest::Client::builder()
            .timeout(config.request_timeout())
            .build()?;
        Ok(Self::with_client(http, config))
    }

    /// Builds a client from the embedded config with environment
    /// overrides applied (see [`OpenMeteoConfig::from_env`]).
    ///
    /// # Errors
    ///
    /// Returns [`OpenMeteoError::Config`] for a bad override, or
    /// [`OpenMeteoError::Http`] if the HTTP client cannot be built.
    pub fn from_env() -> Result<Self, OpenMeteoError> {
        Self::new(OpenMeteoConfig::from_env()?)
    }

    /// Wraps an existing [`reqwest::Client`].
    #[must_use]
    pub const fn with_client(http: reqwest::Client, config: OpenMeteoConfig) -> Self {
        Self { http, config }
    }

    /// The active configuration.
    #[must_use]
    pub const fn config(&self) -> &OpenMeteoConfig {
        &self.config
    }

    const fn policy(&self) -> RetryPolicy {
        RetryPolicy {
            max_retries: self.config.max_retries,
            backoff_base: self.config.backoff_base(),
        }
    }

    /// Fetches current air quality at one zone's coordinate.
    ///
    /// # Errors
    ///
    /// Returns [`OpenMeteoError`] if the request fails after retries or the
    /// response has no usable AQI.
    pub async fn zone_air_quality(&self, zone: &Zone) -> Result<AirQualityReading, OpenMeteoError> {
        let url = format!("{}/air-quality", self.config.air_quality_base_url);
        let latitude = zone.latitude.to_string();
        let longitude = zone.longitude.to_string();
        let params = [
            ("latitude", latitude.as_str()),
            ("longitude", longitude.as_str()),
            ("current", AIR_QUALITY_VARIABLES),
            ("timezone", self.config.timezone.as_str()),
        ];

        let body: AirQualityResponse =
            retry::send_json(|| self.http.get(&url).query(&params), &self.policy()).await?;
        air_quality_from_response(&zone.id, &body)
    }

    /// Fetches current weather at a coordinate.
    ///
    /// # Errors
    ///
    /// Returns [`OpenMeteoError`] if the request fails after retries or the
    /// observation time cannot be parsed.
    pub async fn weather_at(&self, coordinate: Coordinate) -> Result<CurrentWeather, OpenMeteoError> {
        let url = format!("{}/forecast", self.config.forecast_base_url);
        let latitude = coordinate.latitude.to_string();
        let longitude = coordinate.longitude.to_string();
        let params = [
            ("latitude", latitude.as_str()),
            ("longitude", longitude.as_str()),
            ("current", WEATHER_VARIABLES),
            ("timezone", self.config.timezone.as_str()),
        ];

        let body: ForecastResponse =
            retry::send_json(|| self.http.get(&url).query(&params), &self.policy()).await?;
        weather_from_response(&body)
    }

    /// Fetches current weather at the city's central zone, or `None` if
    /// the request fails.
    pub async fn current_weather(&self, zones: &ZoneRegistry) -> Option<CurrentWeather> {
        match self.weather_at(zones.center().coordinate()).await {
            Ok(weather) => Some(weather),
            Err(e) => {
                log::warn!("Weather fetch failed: {e}");
                None
            }
        }
    }
}

/// Converts a raw air quality response into a reading for `zone`.
///
/// The AQI is the upstream `us_aqi` when present and non-zero, otherwise
/// it is derived from PM2.5. Carbon monoxide is converted from µg/m³ to
/// ppm by dividing by 1000.
///
/// # Errors
///
/// Returns [`OpenMeteoError::Upstream`] if neither `us_aqi` nor `pm2_5` is
/// present, or the observation time cannot be parsed.
pub fn air_quality_from_response(
    zone: &str,
    response: &AirQualityResponse,
) -> Result<AirQualityReading, OpenMeteoError> {
    let current = &response.current;
    let aqi = match (current.us_aqi, current.pm2_5) {
        (Some(us_aqi), _) if us_aqi > 0.0 => to_u32(us_aqi),
        (_, Some(pm25)) => calculate_aqi(pm25),
        (_, None) => {
            return Err(OpenMeteoError::Upstream {
                message: format!("no us_aqi or pm2_5 for zone {zone}"),
            });
        }
    };

    Ok(AirQualityReading {
        zone: zone.to_string(),
        aqi,
        pm25: to_u32(current.pm2_5.unwrap_or_default()),
        pm10: to_u32(current.pm10.unwrap_or_default()),
        no2: to_u32(current.nitrogen_dioxide.unwrap_or_default()),
        so2: to_u32(current.sulphur_dioxide.unwrap_or_default()),
        co: to_u32(current.carbon_monoxide.unwrap_or_default() / 1000.0),
        o3: to_u32(current.ozone.unwrap_or_default()),
        timestamp: parse_local_time(&current.time, response.utc_offset_seconds)?,
        source: OPEN_METEO_SOURCE.to_string(),
    })
}

/// Converts a raw forecast response into current weather.
///
/// # Errors
///
/// Returns [`OpenMeteoError::Upstream`] if the observation time cannot be
/// parsed.
pub fn weather_from_response(response: &ForecastResponse) -> Result<CurrentWeather, OpenMeteoError> {
    let current = &response.current;
    Ok(CurrentWeather {
        temperature: current.temperature_2m,
        humidity: current.relative_humidity_2m,
        wind_speed: current.wind_speed_10m,
        weather_code: current.weather_code,
        description: weather_codes::describe(current.weather_code).to_string(),
        observed_at: parse_local_time(&current.time, response.utc_offset_seconds)?,
    })
}

/// Parses Open-Meteo's offset-less local `time` into UTC.
///
/// # Errors
///
/// Returns [`OpenMeteoError::Upstream`] for an unparseable time or an
/// out-of-range offset.
pub fn parse_local_time(time: &str, utc_offset_seconds: i32) -> Result<DateTime<Utc>, OpenMeteoError> {
    let naive = NaiveDateTime::parse_from_str(time, "%Y-%m-%dT%H:%M")
        .or_else(|_| NaiveDateTime::parse_from_str(time, "%Y-%m-%dT%H:%M:%S"))
        .map_err(|e| OpenMeteoError::Upstream {
            message: format!("invalid time {time:?}: {e}"),
        })?;
    let offset = FixedOffset::east_opt(utc_offset_seconds).ok_or_else(|| OpenMeteoError::Upstream {
        message: format!("invalid utc_offset_seconds {utc_offset_seconds}"),
    })?;
    offset
        .from_local_datetime(&naive)
        .single()
        .map(|dt| dt.with_timezone(&Utc))
        .ok_or_else(|| OpenMeteoError::Upstream {
            message: format!("ambiguous local time {time:?}"),
        })
}

/// Rounds a non-negative measurement to the nearest integer.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn to_u32(value: f64) -> u32 {
    if value.is_nan() {
        return 0;
    }
    value.round().clamp(0.0, f64::from(u32::MAX)) as u32
}

#[cfg(test)]
mod tests {
    use super::*;

    fn air_quality_body(us_aqi: serde_json::Value, pm2_5: serde_json::Value) -> AirQualityResponse {
        serde_json::from_value(serde_json::json!({
            "latitude": 28.625,
            "longitude": 77.25,
            "generationtime_ms": 0.2,
            "utc_offset_seconds": 19800,
            "timezone": "Asia/Kolkata",
            "current": {
                "time": "2025-06-01T14:00",
                "interval": 3600,
                "pm2_5": pm2_5,
                "pm10": 120.6,
                "nitrogen_dioxide": 31.2,
                "sulphur_dioxide": 9.5,
                "carbon_monoxide": 1450.0,
                "ozone": 70.4,
                "european_aqi": 75,
                "us_aqi": us_aqi
            }
        }))
        .unwrap()
    }

    #[test]
    fn uses_upstream_us_aqi() {
        let reading =
            air_quality_from_response("east", &air_quality_body(serde_json::json!(163), serde_json::json!(78.2)))
                .unwrap();
        assert_eq!(reading.zone, "east");
        assert_eq!(reading.aqi, 163);
        assert_eq!(reading.pm25, 78);
        assert_eq!(reading.pm10, 121);
        assert_eq!(reading.co, 1);
        assert_eq!(reading.source, "Open-Meteo");
        // 14:00 IST
        assert_eq!(reading.timestamp.to_rfc3339(), "2025-06-01T08:30:00+00:00");
    }

    #[test]
    fn zero_or_missing_us_aqi_falls_back_to_pm25() {
        let zero =
            air_quality_from_response("east", &air_quality_body(serde_json::json!(0), serde_json::json!(12.1)))
                .unwrap();
        assert_eq!(zero.aqi, 51);
        let missing = air_quality_from_response(
            "east",
            &air_quality_body(serde_json::Value::Null, serde_json::json!(12.0)),
        )
        .unwrap();
        assert_eq!(missing.aqi, 50);
    }

    #[test]
    fn no_aqi_inputs_is_an_error() {
        let result = air_quality_from_response(
            "east",
            &air_quality_body(serde_json::Value::Null, serde_json::Value::Null),
        );
        assert!(matches!(result, Err(OpenMeteoError::Upstream { .. })));
    }

    #[test]
    fn parses_forecast() {
        let body: ForecastResponse = serde_json::from_value(serde_json::json!({
            "latitude": 28.625,
            "longitude": 77.25,
            "utc_offset_seconds": 19800,
            "current": {
                "time": "2025-06-01T14:15",
                "interval": 900,
                "temperature_2m": 41.3,
                "relative_humidity_2m": 22.0,
                "wind_speed_10m": 14.8,
                "weather_code": 2
            }
        }))
        .unwrap();
        let weather = weather_from_response(&body).unwrap();
        assert!((weather.temperature - 41.3).abs() < f64::EPSILON);
        assert_eq!(weather.weather_code, 2);
        assert_eq!(weather.description, "Partly cloudy");
        assert_eq!(weather.observed_at.to_rfc3339(), "2025-06-01T08:45:00+00:00");
    }

    #[test]
    fn rejects_bad_time() {
        assert!(parse_local_time("yesterday", 0).is_err());
        assert!(parse_local_time("2025-06-01T14:00", 200_000).is_err());
        assert_eq!(
            parse_local_time("2025-06-01T14:00:30", 0).unwrap().to_rfc3339(),
            "2025-06-01T14:00:30+00:00"
        );
    }

    #[test]
    fn rounds_measurements() {
        assert_eq!(to_u32(2.5), 3);
        assert_eq!(to_u32(-4.0), 0);
        assert_eq!(to_u32(f64::NAN), 0);
    }

    #[tokio::test]
    async fn unreachable_upstream_degrades_to_empty() {
        let config = OpenMeteoConfig {
            air_quality_base_url: "http://127.0.0.1:9".to_string(),
            forecast_base_url: "http://127.0.0.1:9".to_string(),
            timezone: "UTC".to_string(),
            request_timeout_secs: 2,
            max_retries: 0,
            backoff_base_ms: 1,
        };
        let client = OpenMeteoClient::new(config).unwrap();
        let zones = ZoneRegistry::reference();
        assert!(client.zone_air_quality(zones.center()).await.is_err());
        assert!(client.current_weather(&zones).await.is_none());
    }
}
