//! Traffic congestion model.
//!
//! Congestion is a zone baseline (road density and commercial activity)
//! scaled by a time-of-day multiplier, plus up to ±7.5 points of noise.
//! Average speed falls linearly with congestion.

use city_ops_metrics_models::TrafficMetrics;
use city_ops_zone::ZoneRegistry;

use crate::baseline::{BaselineTable, lookup, seed_for};
use crate::numeric::{floor_count, round_half_up, to_count};
use crate::random::RandomSource;
use crate::time_context::TimeContext;

/// Base congestion by zone.
pub const ZONE_TRAFFIC_BASE: BaselineTable = &[
    ("central", 75.0),
    ("newdelhi", 70.0),
    ("south", 65.0),
    ("east", 60.0),
    ("west", 55.0),
    ("north", 50.0),
    ("northeast", 55.0),
    ("northwest", 45.0),
    ("southeast", 50.0),
    ("southwest", 45.0),
    ("shahdara", 60.0),
];

/// Base congestion for zones missing from [`ZONE_TRAFFIC_BASE`].
pub const DEFAULT_TRAFFIC_BASE: f64 = 50.0;

/// Free-flow speed in km/h at zero congestion.
const FREE_FLOW_SPEED: f64 = 60.0;

/// Width of the congestion noise band.
const VARIANCE_SPREAD: f64 = 15.0;

const INCIDENT_SEED_OFFSET: i64 = 100;

/// Congestion multiplier for the time of day.
#[must_use]
pub const fn peak_multiplier(ctx: &TimeContext) -> f64 {
    if ctx.is_traffic_night() {
        0.3
    } else if ctx.is_traffic_peak() {
        1.4
    } else {
        0.7
    }
}

/// Average speed for a congestion index: `round(60 - 0.5 * c)`.
#[must_use]
pub fn avg_speed(congestion_index: u32) -> u32 {
    to_count(FREE_FLOW_SPEED - f64::from(congestion_index) * 0.5)
}

/// Generates one traffic record per zone, in registry order.
#[must_use]
pub fn generate<R: RandomSource + ?Sized>(
    zones: &ZoneRegistry,
    ctx: &TimeContext,
    random: &R,
) -> Vec<TrafficMetrics> {
    let time_seed = ctx.seed();
    let multiplier = peak_multiplier(ctx);

    zones
        .zones()
        .iter()
        .enumerate()
        .map(|(idx, zone)| {
            let base = lookup(ZONE_TRAFFIC_BASE, &zone.id, DEFAULT_TRAFFIC_BASE);
            let variance = random
                .sample(seed_for(time_seed, idx, 0))
                .mul_add(VARIANCE_SPREAD, -VARIANCE_SPREAD / 2.0);
            let congestion_index =
                to_count(round_half_up(base.mul_add(multiplier, variance)).clamp(0.0, 100.0));

            TrafficMetrics {
                zone: zone.id.clone(),
                congestion_index,
                avg_speed: avg_speed(congestion_index),
                incidents: floor_count(
                    random.sample(seed_for(time_seed, idx, INCIDENT_SEED_OFFSET)) * 5.0,
                ),
                timestamp: ctx.timestamp(),
            }
        })
        .collect()
}
