#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Command-line interface for the city operations engine.
//!
//! ```text
//! city_ops_cli zones
//! city_ops_cli generate <domain> [--at <rfc3339>] [--summary]
//! city_ops_cli simulate [--rainfall 60] [--traffic-surge 20] [--power-spike 10]
//!                       [--temperature -4] [--event festival]
//! city_ops_cli air-quality [--summary]
//! city_ops_cli health-index
//! city_ops_cli kpis
//! city_ops_cli sources [--module dashboard] [--kind real]
//! city_ops_cli serve
//! ```
//!
//! Data commands print pretty JSON; listings print tables.

use std::sync::Arc;

use chrono::{DateTime, FixedOffset, Utc};
use city_ops_analytics::{CityOperations, fetch_timeout_from_env};
use city_ops_metrics::summary::{
    HealthSummary, PowerSummary, SafetySummary, TrafficSummary, WaterSummary,
};
use city_ops_metrics_models::Domain;
use city_ops_open_meteo::OpenMeteoClient;
use city_ops_scenario_models::{EventType, ScenarioParameters, ScenarioReport};
use city_ops_source::SourceKind;
use city_ops_zone::ZoneRegistry;
use clap::{Parser, Subcommand};
use serde::Serialize;

#[derive(Parser)]
#[command(
    name = "city_ops_cli",
    about = "Query the city operations engine or start its API server"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List the city's zones
    Zones,
    /// Generate one domain's metrics for every zone
    Generate {
        /// traffic, power, water, health or safety
        domain: Domain,
        /// Generate for this RFC 3339 timestamp instead of now
        #[arg(long)]
        at: Option<DateTime<FixedOffset>>,
        /// Print the citywide roll-up instead of per-zone records
        #[arg(long)]
        summary: bool,
    },
    /// Project a what-if scenario against current conditions
    Simulate {
        /// Rainfall increase, percent
        #[arg(long, default_value_t = 0.0)]
        rainfall: f64,
        /// Traffic volume surge, percent
        #[arg(long, default_value_t = 0.0)]
        traffic_surge: f64,
        /// Power demand spike, percent
        #[arg(long, default_value_t = 0.0)]
        power_spike: f64,
        /// Temperature change, degrees Celsius
        #[arg(long, default_value_t = 0.0, allow_hyphen_values = true)]
        temperature: f64,
        /// none, festival, emergency or strike
        #[arg(long, default_value_t = EventType::None)]
        event: EventType,
    },
    /// Fetch live air quality for every zone
    AirQuality {
        /// Print the citywide roll-up instead of per-zone readings
        #[arg(long)]
        summary: bool,
    },
    /// Compute the composite city health index
    HealthIndex,
    /// Build the dashboard KPI cards
    Kpis,
    /// List data sources and how their values are obtained
    Sources {
        /// Only sources feeding this dashboard module
        #[arg(long)]
        module: Option<String>,
        /// Only sources of this kind: real, model or hybrid
        #[arg(long)]
        kind: Option<SourceKind>,
    },
    /// Start the API server
    Serve,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    pretty_env_logger::init_custom_env("RUST_LOG");
    let cli = Cli::parse();

    match cli.command {
        Commands::Zones => {
            let zones = ZoneRegistry::reference();

            println!("{:<12} {:<6} {:>12} {:>10} NAME", "ID", "CODE", "POPULATION", "AREA_KM2");
            println!("{}", "-".repeat(70));

            for zone in zones.zones() {
                println!(
                    "{:<12} {:<6} {:>12} {:>10.1} {}",
                    zone.id, zone.code, zone.population, zone.area_sq_km, zone.name
                );
            }

            println!("\n{} zone(s) in {}", zones.len(), zones.city());
        }
        Commands::Generate {
            domain,
            at,
            summary,
        } => {
            let ops = operations()?;
            let generator = ops.generator();
            let ctx = at.map_or_else(
                || generator.now(),
                |at| generator.at(at.with_timezone(&Utc)),
            );

            match domain {
                Domain::Traffic if summary => {
                    print_json(&TrafficSummary::from_records(&generator.traffic(&ctx)))?;
                }
                Domain::Power if summary => {
                    print_json(&PowerSummary::from_records(&generator.power(&ctx)))?;
                }
                Domain::Water if summary => {
                    print_json(&WaterSummary::from_records(&generator.water(&ctx)))?;
                }
                Domain::Health if summary => {
                    print_json(&HealthSummary::from_records(&generator.health(&ctx)))?;
                }
                Domain::Safety if summary => {
                    print_json(&SafetySummary::from_records(&generator.safety(&ctx)))?;
                }
                Domain::Traffic => print_json(&generator.traffic(&ctx))?,
                Domain::Power => print_json(&generator.power(&ctx))?,
                Domain::Water => print_json(&generator.water(&ctx))?,
                Domain::Health => print_json(&generator.health(&ctx))?,
                Domain::Safety => print_json(&generator.safety(&ctx))?,
            }
        }
        Commands::Simulate {
            rainfall,
            traffic_surge,
            power_spike,
            temperature,
            event,
        } => {
            let params = ScenarioParameters {
                rainfall_increase: rainfall,
                traffic_surge,
                power_demand_spike: power_spike,
                temperature_change: temperature,
                event_type: event,
            };
            print_json(&ScenarioReport::from(operations()?.simulate(&params)))?;
        }
        Commands::AirQuality { summary } => {
            let ops = operations()?;
            if summary {
                print_json(&ops.air_quality_summary().await)?;
            } else {
                print_json(&ops.air_quality().await)?;
            }
        }
        Commands::HealthIndex => {
            print_json(&operations()?.city_health_index().await)?;
        }
        Commands::Kpis => {
            print_json(&operations()?.dashboard_kpis().await)?;
        }
        Commands::Sources { module, kind } => {
            let sources = city_ops_source::query_sources(module.as_deref(), kind);

            if sources.is_empty() {
                println!("No sources found.");
                return Ok(());
            }

            println!("{:<20} {:<7} {:<14} NAME", "ID", "KIND", "BADGE");
            println!("{}", "-".repeat(80));

            for source in &sources {
                println!(
                    "{:<20} {:<7} {:<14} {}",
                    source.id,
                    source.kind.as_ref(),
                    source.badge(),
                    source.name
                );
            }

            println!("\n{} source(s)", sources.len());
        }
        Commands::Serve => {
            // The server uses actix-web's runtime, so it runs on a blocking
            // thread to avoid nesting runtimes.
            tokio::task::spawn_blocking(|| {
                actix_web::rt::System::new().block_on(city_ops_server::run_server())
            })
            .await??;
        }
    }

    Ok(())
}

/// Builds the façade for the reference city, configured from the
/// environment.
fn operations() -> Result<CityOperations, Box<dyn std::error::Error>> {
    let client = OpenMeteoClient::from_env()?;
    Ok(
        CityOperations::new(Arc::new(ZoneRegistry::reference()), Arc::new(client))
            .with_fetch_timeout(fetch_timeout_from_env()?),
    )
}

fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<(), serde_json::Error> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_generate() {
        let cli = Cli::try_parse_from([
            "city_ops_cli",
            "generate",
            "power",
            "--at",
            "2025-06-01T14:30:00+05:30",
        ])
        .unwrap();
        let Commands::Generate {
            domain,
            at,
            summary,
        } = cli.command
        else {
            panic!("expected generate");
        };
        assert_eq!(domain, Domain::Power);
        assert_eq!(at.unwrap().to_rfc3339(), "2025-06-01T14:30:00+05:30");
        assert!(!summary);
    }

    #[test]
    fn parses_simulate_with_negative_temperature() {
        let cli = Cli::try_parse_from([
            "city_ops_cli",
            "simulate",
            "--rainfall",
            "60",
            "--temperature",
            "-4",
            "--event",
            "strike",
        ])
        .unwrap();
        let Commands::Simulate {
            rainfall,
            temperature,
            event,
            traffic_surge,
            ..
        } = cli.command
        else {
            panic!("expected simulate");
        };
        assert!((rainfall - 60.0).abs() < f64::EPSILON);
        assert!((temperature + 4.0).abs() < f64::EPSILON);
        assert!(traffic_surge.abs() < f64::EPSILON);
        assert_eq!(event, EventType::Strike);
    }

    #[test]
    fn parses_summary_flags() {
        let cli =
            Cli::try_parse_from(["city_ops_cli", "generate", "health", "--summary"]).unwrap();
        assert!(matches!(
            cli.command,
            Commands::Generate {
                domain: Domain::Health,
                summary: true,
                ..
            }
        ));

        let cli = Cli::try_parse_from(["city_ops_cli", "air-quality", "--summary"]).unwrap();
        assert!(matches!(cli.command, Commands::AirQuality { summary: true }));
    }

    #[test]
    fn parses_sources_kind() {
        let cli = Cli::try_parse_from([
            "city_ops_cli",
            "sources",
            "--module",
            "dashboard",
            "--kind",
            "real",
        ])
        .unwrap();
        let Commands::Sources { module, kind } = cli.command else {
            panic!("expected sources");
        };
        assert_eq!(module.as_deref(), Some("dashboard"));
        assert_eq!(kind, Some(SourceKind::Real));
        assert!(Cli::try_parse_from(["city_ops_cli", "sources", "--kind", "guess"]).is_err());
    }

    #[test]
    fn rejects_unknown_domain() {
        assert!(Cli::try_parse_from(["city_ops_cli", "generate", "transit"]).is_err());
    }
}
