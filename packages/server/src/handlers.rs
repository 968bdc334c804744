//! HTTP handler functions for the city operations API.

use actix_web::{HttpResponse, web};
use city_ops_metrics::TimeContext;
use city_ops_metrics::summary::{
    HealthSummary, PowerSummary, SafetySummary, TrafficSummary, WaterSummary,
};
use city_ops_metrics_models::Domain;
use city_ops_scenario_models::{ScenarioParameters, ScenarioReport};
use city_ops_server_models::{
    ApiError, ApiHealth, ApiSource, ApiZone, MetricsQueryParams, SourcesQueryParams,
};

use crate::AppState;

/// `GET /api/health`
pub async fn health() -> HttpResponse {
    HttpResponse::Ok().json(ApiHealth {
        healthy: true,
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

/// `GET /api/zones`
pub async fn zones(state: web::Data<AppState>) -> HttpResponse {
    let zones: Vec<ApiZone> = state
        .operations
        .zones()
        .zones()
        .iter()
        .map(ApiZone::from)
        .collect();
    HttpResponse::Ok().json(zones)
}

/// `GET /api/metrics/{domain}`
///
/// Generates one record per zone for the domain, for now or for the
/// window containing `at`.
pub async fn metrics(
    state: web::Data<AppState>,
    domain: web::Path<String>,
    params: web::Query<MetricsQueryParams>,
) -> HttpResponse {
    let Ok(domain) = domain.parse::<Domain>() else {
        return unknown_domain(&domain);
    };
    let ctx = match context(&state, &params) {
        Ok(ctx) => ctx,
        Err(response) => return response,
    };

    let generator = state.operations.generator();
    match domain {
        Domain::Traffic => HttpResponse::Ok().json(generator.traffic(&ctx)),
        Domain::Power => HttpResponse::Ok().json(generator.power(&ctx)),
        Domain::Water => HttpResponse::Ok().json(generator.water(&ctx)),
        Domain::Health => HttpResponse::Ok().json(generator.health(&ctx)),
        Domain::Safety => HttpResponse::Ok().json(generator.safety(&ctx)),
    }
}

/// `GET /api/summary/{domain}`
///
/// Citywide roll-up of one generated domain.
pub async fn summary(
    state: web::Data<AppState>,
    domain: web::Path<String>,
    params: web::Query<MetricsQueryParams>,
) -> HttpResponse {
    let Ok(domain) = domain.parse::<Domain>() else {
        return unknown_domain(&domain);
    };
    let ctx = match context(&state, &params) {
        Ok(ctx) => ctx,
        Err(response) => return response,
    };

    let generator = state.operations.generator();
    match domain {
        Domain::Traffic => {
            HttpResponse::Ok().json(TrafficSummary::from_records(&generator.traffic(&ctx)))
        }
        Domain::Power => HttpResponse::Ok().json(PowerSummary::from_records(&generator.power(&ctx))),
        Domain::Water => HttpResponse::Ok().json(WaterSummary::from_records(&generator.water(&ctx))),
        Domain::Health => {
            HttpResponse::Ok().json(HealthSummary::from_records(&generator.health(&ctx)))
        }
        Domain::Safety => {
            HttpResponse::Ok().json(SafetySummary::from_records(&generator.safety(&ctx)))
        }
    }
}

/// `GET /api/summary/air-quality`
///
/// Citywide roll-up of the live readings; the average is `null` when no
/// zone answered.
pub async fn air_quality_summary(state: web::Data<AppState>) -> HttpResponse {
    HttpResponse::Ok().json(state.operations.air_quality_summary().await)
}

/// `GET /api/air-quality`
///
/// Live readings for every zone that answered; may be empty.
pub async fn air_quality(state: web::Data<AppState>) -> HttpResponse {
    HttpResponse::Ok().json(state.operations.air_quality().await)
}

/// `GET /api/weather`
pub async fn weather(state: web::Data<AppState>) -> HttpResponse {
    match state.operations.current_weather().await {
        Some(weather) => HttpResponse::Ok().json(weather),
        None => HttpResponse::ServiceUnavailable().json(ApiError::new("Weather is unavailable")),
    }
}

/// `POST /api/scenario`
///
/// Projects the posted parameters against current conditions. Missing
/// fields default to zero and event `none`.
pub async fn scenario(
    state: web::Data<AppState>,
    params: web::Json<ScenarioParameters>,
) -> HttpResponse {
    let report = ScenarioReport::from(state.operations.simulate(&params));
    log::debug!(
        "Scenario {:?}: flood {} ({}) delay {} shortfall {}",
        params.event_type,
        report.impact.flood_risk,
        report.flood_band,
        report.impact.traffic_delay_percent,
        report.impact.power_shortfall
    );
    HttpResponse::Ok().json(report)
}

/// `GET /api/city-health`
pub async fn city_health(state: web::Data<AppState>) -> HttpResponse {
    HttpResponse::Ok().json(state.operations.city_health_index().await)
}

/// `GET /api/kpis`
pub async fn kpis(state: web::Data<AppState>) -> HttpResponse {
    HttpResponse::Ok().json(state.operations.dashboard_kpis().await)
}

/// `GET /api/sources`
///
/// Lists data sources, optionally only those feeding `module` and of
/// `kind`.
pub async fn sources(params: web::Query<SourcesQueryParams>) -> HttpResponse {
    let sources: Vec<ApiSource> =
        city_ops_source::query_sources(params.module.as_deref(), params.kind)
            .into_iter()
            .map(ApiSource::from)
            .collect();
    HttpResponse::Ok().json(sources)
}

/// Resolves the time context for a request, or a `400` response.
fn context(state: &AppState, params: &MetricsQueryParams) -> Result<TimeContext, HttpResponse> {
    match params.timestamp() {
        Ok(Some(at)) => Ok(state.operations.generator().at(at)),
        Ok(None) => Ok(state.operations.now()),
        Err(e) => {
            log::error!("Invalid timestamp {:?}: {e}", params.at);
            Err(HttpResponse::BadRequest().json(ApiError::new(format!("Invalid timestamp: {e}"))))
        }
    }
}

fn unknown_domain(domain: &str) -> HttpResponse {
    HttpResponse::NotFound().json(ApiError::new(format!("Unknown domain: {domain}")))
}
