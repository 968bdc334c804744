//! Public safety model.
//!
//! Crime index is a zone baseline from district crime statistics, raised
//! 30% overnight and lowered 20% during the day, with ±10% noise.

use city_ops_metrics_models::{RiskLevel, SafetyMetrics};
use city_ops_zone::ZoneRegistry;

use crate::baseline::{BaselineTable, lookup, seed_for};
use crate::numeric::{floor_count, to_count};
use crate::random::RandomSource;
use crate::time_context::TimeContext;

/// Base crime index by zone.
pub const ZONE_CRIME_BASE: BaselineTable = &[
    ("central", 45.0),
    ("newdelhi", 35.0),
    ("south", 40.0),
    ("east", 50.0),
    ("west", 42.0),
    ("north", 55.0),
    ("northeast", 60.0),
    ("northwest", 48.0),
    ("southeast", 38.0),
    ("southwest", 35.0),
    ("shahdara", 52.0),
];

/// Base crime index for zones missing from [`ZONE_CRIME_BASE`].
pub const DEFAULT_CRIME_BASE: f64 = 45.0;

const INCIDENT_SEED_OFFSET: i64 = 50;
const PATROL_SEED_OFFSET: i64 = 100;
const RESPONSE_SEED_OFFSET: i64 = 150;

/// Crime multiplier for the time of day.
#[must_use]
pub const fn risk_multiplier(ctx: &TimeContext) -> f64 {
    if ctx.is_high_risk_hour() { 1.3 } else { 0.8 }
}

/// Generates one safety record per zone, in registry order.
#[must_use]
pub fn generate<R: RandomSource + ?Sized>(
    zones: &ZoneRegistry,
    ctx: &TimeContext,
    random: &R,
) -> Vec<SafetyMetrics> {
    let time_seed = ctx.seed();
    let multiplier = risk_multiplier(ctx);

    zones
        .zones()
        .iter()
        .enumerate()
        .map(|(idx, zone)| {
            let base = lookup(ZONE_CRIME_BASE, &zone.id, DEFAULT_CRIME_BASE);
            let noise = random.sample(seed_for(time_seed, idx, 0)).mul_add(0.2, 0.9);
            let raw_index = to_count(base * multiplier * noise);

            SafetyMetrics {
                zone: zone.id.clone(),
                crime_index: raw_index.min(100),
                incidents: floor_count(
                    random.sample(seed_for(time_seed, idx, INCIDENT_SEED_OFFSET)) * 10.0,
                ),
                patrol_units: to_count(
                    random
                        .sample(seed_for(time_seed, idx, PATROL_SEED_OFFSET))
                        .mul_add(20.0, 10.0),
                ),
                response_time: to_count(
                    random
                        .sample(seed_for(time_seed, idx, RESPONSE_SEED_OFFSET))
                        .mul_add(10.0, 5.0),
                ),
                risk_level: RiskLevel::from_crime_index(raw_index),
                timestamp: ctx.timestamp(),
            }
        })
        .collect()
}
