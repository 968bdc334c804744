#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Deterministic synthetic metric generators for the city operations
//! engine.
//!
//! Live traffic, power, water, health and safety telemetry is not
//! available, so each domain is modelled from a per-zone baseline table,
//! time-of-day multipliers and bounded noise. The noise comes from a
//! [`RandomSource`] keyed by the current 10-minute window (see
//! [`TimeContext::seed`]), so every caller inside one window sees the same
//! figures.
//!
//! Generators are free functions per domain ([`traffic::generate`] and
//! friends). [`MetricsGenerator`] bundles a zone registry with a random
//! source and produces all five domains at once as a [`CitySnapshot`].

pub mod baseline;
pub mod health;
pub mod numeric;
pub mod power;
pub mod random;
pub mod safety;
pub mod summary;
pub mod time_context;
pub mod traffic;
pub mod water;

use std::sync::Arc;

use city_ops_metrics_models::{
    HealthMetrics, PowerMetrics, SafetyMetrics, TrafficMetrics, WaterMetrics,
};
use city_ops_zone::ZoneRegistry;
use serde::Serialize;

pub use random::{RandomSource, TrigHash, seeded_random};
pub use time_context::TimeContext;

/// One generation of every domain from a single [`TimeContext`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CitySnapshot {
    /// Traffic records, one per zone.
    pub traffic: Vec<TrafficMetrics>,
    /// Power records, one per zone.
    pub power: Vec<PowerMetrics>,
    /// Water records, one per zone.
    pub water: Vec<WaterMetrics>,
    /// Health records, one per zone.
    pub health: Vec<HealthMetrics>,
    /// Safety records, one per zone.
    pub safety: Vec<SafetyMetrics>,
}

/// Runs the domain generators against a fixed zone registry.
#[derive(Clone)]
pub struct MetricsGenerator {
    zones: Arc<ZoneRegistry>,
    random: Arc<dyn RandomSource>,
}

impl std::fmt::Debug for MetricsGenerator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MetricsGenerator")
            .field("city", &self.zones.city())
            .field("zones", &self.zones.len())
            .finish_non_exhaustive()
    }
}

impl MetricsGenerator {
    /// Creates a generator using the default [`TrigHash`] source.
    #[must_use]
    pub fn new(zones: Arc<ZoneRegistry>) -> Self {
        Self::with_random(zones, Arc::new(TrigHash))
    }

    /// Creates a generator with a custom random source.
    #[must_use]
    pub fn with_random(zones: Arc<ZoneRegistry>, random: Arc<dyn RandomSource>) -> Self {
        Self { zones, random }
    }

    /// The zone registry records are generated for.
    #[must_use]
    pub fn zones(&self) -> &ZoneRegistry {
        &self.zones
    }

    /// A shared handle to the zone registry.
    #[must_use]
    pub fn shared_zones(&self) -> Arc<ZoneRegistry> {
        Arc::clone(&self.zones)
    }

    /// Resolves the time context for the current wall-clock time in the
    /// city's local offset.
    #[must_use]
    pub fn now(&self) -> TimeContext {
        TimeContext::now(self.zones.utc_offset())
    }

    /// Resolves the time context for `at` in the city's local offset.
    #[must_use]
    pub fn at(&self, at: chrono::DateTime<chrono::Utc>) -> TimeContext {
        TimeContext::at_offset(at, self.zones.utc_offset())
    }

    /// Traffic records for `ctx`.
    #[must_use]
    pub fn traffic(&self, ctx: &TimeContext) -> Vec<TrafficMetrics> {
        traffic::generate(&self.zones, ctx, self.random.as_ref())
    }

    /// Power records for `ctx`.
    #[must_use]
    pub fn power(&self, ctx: &TimeContext) -> Vec<PowerMetrics> {
        power::generate(&self.zones, ctx, self.random.as_ref())
    }

    /// Water records for `ctx`.
    #[must_use]
    pub fn water(&self, ctx: &TimeContext) -> Vec<WaterMetrics> {
        water::generate(&self.zones, ctx, self.random.as_ref())
    }

    /// Health records for `ctx`.
    #[must_use]
    pub fn health(&self, ctx: &TimeContext) -> Vec<HealthMetrics> {
        health::generate(&self.zones, ctx, self.random.as_ref())
    }

    /// Safety records for `ctx`.
    #[must_use]
    pub fn safety(&self, ctx: &TimeContext) -> Vec<SafetyMetrics> {
        safety::generate(&self.zones, ctx, self.random.as_ref())
    }

    /// All five domains for `ctx`.
    #[must_use]
    pub fn snapshot(&self, ctx: &TimeContext) -> CitySnapshot {
        log::debug!(
            "Generating {} snapshot for seed {} ({} zones)",
            self.zones.city(),
            ctx.seed(),
            self.zones.len()
        );
        CitySnapshot {
            traffic: self.traffic(ctx),
            power: self.power(ctx),
            water: self.water(ctx),
            health: self.health(ctx),
            safety: self.safety(ctx),
        }
    }
}
