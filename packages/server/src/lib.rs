#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Actix-Web API server for the city operations engine.
//!
//! Serves zone metadata, generated per-domain metrics, scenario
//! projections, the city health index and dashboard KPIs as JSON under
//! `/api`. Live air quality and weather come from Open-Meteo; every fetch
//! is bounded by the analytics layer's timeout, so a slow upstream
//! degrades a response instead of stalling it.

mod handlers;

use std::sync::Arc;

use actix_cors::Cors;
use actix_web::{App, HttpServer, middleware, web};
use city_ops_analytics::{AnalyticsError, CityOperations, fetch_timeout_from_env};
use city_ops_open_meteo::{OpenMeteoClient, OpenMeteoError};
use city_ops_zone::ZoneRegistry;
use thiserror::Error;

/// Shared application state.
pub struct AppState {
    /// Entry points for every computed endpoint.
    pub operations: CityOperations,
}

/// Errors from starting the server.
#[derive(Debug, Error)]
pub enum ServerError {
    /// The Open-Meteo client could not be configured.
    #[error(transparent)]
    OpenMeteo(#[from] OpenMeteoError),
    /// The analytics layer could not be configured.
    #[error(transparent)]
    Analytics(#[from] AnalyticsError),
    /// The HTTP server failed to bind or run.
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Address the server listens on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    /// Interface to bind.
    pub bind_addr: String,
    /// TCP port.
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: "127.0.0.1".to_string(),
            port: 8080,
        }
    }
}

impl ServerConfig {
    /// Reads `BIND_ADDR` and `PORT`, falling back to the defaults for
    /// unset or unparsable values.
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        Self {
            bind_addr: lookup("BIND_ADDR").unwrap_or(defaults.bind_addr),
            port: lookup("PORT")
                .and_then(|p| p.trim().parse().ok())
                .unwrap_or(defaults.port),
        }
    }
}

/// Builds the application state for the reference city, configured from
/// the environment.
///
/// # Errors
///
/// Returns [`ServerError`] if the Open-Meteo client or the fetch timeout
/// is misconfigured.
pub fn state_from_env() -> Result<AppState, ServerError> {
    let zones = Arc::new(ZoneRegistry::reference());
    log::info!("Loaded {} zones for {}", zones.len(), zones.city());

    let client = OpenMeteoClient::from_env()?;
    let fetch_timeout = fetch_timeout_from_env()?;
    let worst_case = client.config().worst_case_latency();
    if worst_case >= fetch_timeout {
        log::warn!(
            "Open-Meteo retries can take {worst_case:?}, longer than the {fetch_timeout:?} fetch timeout"
        );
    }
    let operations =
        CityOperations::new(zones, Arc::new(client)).with_fetch_timeout(fetch_timeout);

    Ok(AppState { operations })
}

/// Registers every `/api` route.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api")
            .route("/health", web::get().to(handlers::health))
            .route("/zones", web::get().to(handlers::zones))
            .route("/metrics/{domain}", web::get().to(handlers::metrics))
            .route(
                "/summary/air-quality",
                web::get().to(handlers::air_quality_summary),
            )
            .route("/summary/{domain}", web::get().to(handlers::summary))
            .route("/air-quality", web::get().to(handlers::air_quality))
            .route("/weather", web::get().to(handlers::weather))
            .route("/scenario", web::post().to(handlers::scenario))
            .route("/city-health", web::get().to(handlers::city_health))
            .route("/kpis", web::get().to(handlers::kpis))
            .route("/sources", web::get().to(handlers::sources)),
    );
}

/// Starts the city operations API server.
///
/// Builds the state from the environment and serves until shut down. The
/// caller provides the Actix runtime (e.g. via `#[actix_web::main]`) and
/// initialises logging.
///
/// # Errors
///
/// Returns [`ServerError`] if configuration fails or the HTTP server
/// fails to bind or encounters a runtime error.
#[allow(clippy::future_not_send)]
pub async fn run_server() -> Result<(), ServerError> {
    let state = web::Data::new(state_from_env()?);
    let ServerConfig { bind_addr, port } = ServerConfig::from_env();

    log::info!("Starting server on {bind_addr}:{port}");

    HttpServer::new(move || {
        let cors = Cors::permissive();

        App::new()
            .wrap(cors)
            .wrap(middleware::Logger::default())
            .app_data(state.clone())
            .configure(configure)
    })
    .bind((bind_addr, port))?
    .run()
    .await?;

    Ok(())
}
