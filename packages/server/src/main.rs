#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Actix-Web API server for the city operations engine.
//!
//! Configured from `BIND_ADDR`, `PORT`, `CITY_OPS_FETCH_TIMEOUT_SECS` and
//! the `OPEN_METEO_*` overrides.

#[actix_web::main]
async fn main() -> Result<(), city_ops_server::ServerError> {
    pretty_env_logger::init_custom_env("RUST_LOG");

    city_ops_server::run_server().await
}
