//! Water supply model.
//!
//! The city draws roughly 900 MLD against 1,200 MLD of nominal demand.
//! Both are split across zones by service-area share with independent
//! ±10% noise, so zones can land in surplus or deficit.

use city_ops_metrics_models::WaterMetrics;
use city_ops_zone::ZoneRegistry;

use crate::baseline::{BaselineTable, lookup, seed_for};
use crate::numeric::{floor_count, to_count};
use crate::random::RandomSource;
use crate::time_context::TimeContext;

/// Share of citywide water by zone.
pub const ZONE_WATER_SHARE: BaselineTable = &[
    ("central", 0.06),
    ("newdelhi", 0.04),
    ("south", 0.14),
    ("east", 0.10),
    ("west", 0.12),
    ("north", 0.08),
    ("northeast", 0.11),
    ("northwest", 0.15),
    ("southeast", 0.08),
    ("southwest", 0.10),
    ("shahdara", 0.07),
];

/// Water share for zones missing from [`ZONE_WATER_SHARE`].
pub const DEFAULT_WATER_SHARE: f64 = 0.08;

/// Citywide supply in MLD.
pub const BASE_SUPPLY: f64 = 900.0;

/// Citywide nominal demand in MLD before the usage factor.
pub const BASE_DEMAND: f64 = 1_200.0;

const DEMAND_SEED_OFFSET: i64 = 50;
const RESERVOIR_SEED_OFFSET: i64 = 100;
const LEAKAGE_SEED_OFFSET: i64 = 150;

/// Demand multiplier for the time of day.
#[must_use]
pub const fn usage_factor(ctx: &TimeContext) -> f64 {
    if ctx.is_water_peak_usage() { 1.2 } else { 0.9 }
}

/// Generates one water record per zone, in registry order.
#[must_use]
pub fn generate<R: RandomSource + ?Sized>(
    zones: &ZoneRegistry,
    ctx: &TimeContext,
    random: &R,
) -> Vec<WaterMetrics> {
    let time_seed = ctx.seed();
    let citywide_demand = BASE_DEMAND * usage_factor(ctx);

    zones
        .zones()
        .iter()
        .enumerate()
        .map(|(idx, zone)| {
            let share = lookup(ZONE_WATER_SHARE, &zone.id, DEFAULT_WATER_SHARE);
            let supply_factor = random.sample(seed_for(time_seed, idx, 0)).mul_add(0.2, 0.9);
            let demand_factor = random
                .sample(seed_for(time_seed, idx, DEMAND_SEED_OFFSET))
                .mul_add(0.2, 0.9);

            WaterMetrics {
                zone: zone.id.clone(),
                supply: to_count(BASE_SUPPLY * share * supply_factor),
                demand: to_count(citywide_demand * share * demand_factor),
                reservoir_level: to_count(
                    random
                        .sample(seed_for(time_seed, idx, RESERVOIR_SEED_OFFSET))
                        .mul_add(30.0, 55.0),
                ),
                leakages: floor_count(
                    random.sample(seed_for(time_seed, idx, LEAKAGE_SEED_OFFSET)) * 8.0,
                ),
                timestamp: ctx.timestamp(),
            }
        })
        .collect()
}
