//! Power grid model.
//!
//! Citywide demand starts at a 5,500 MW base load, scaled for time of day
//! and season, then split across zones by population and commercial
//! share. Supply tracks demand within ±2%.

use city_ops_metrics_models::PowerMetrics;
use city_ops_zone::ZoneRegistry;

use crate::baseline::{BaselineTable, lookup, seed_for};
use crate::numeric::{floor_count, to_count};
use crate::random::RandomSource;
use crate::time_context::TimeContext;

/// Share of citywide demand by zone.
pub const ZONE_DEMAND_SHARE: BaselineTable = &[
    ("central", 0.12),
    ("newdelhi", 0.08),
    ("south", 0.15),
    ("east", 0.10),
    ("west", 0.12),
    ("north", 0.08),
    ("northeast", 0.10),
    ("northwest", 0.12),
    ("southeast", 0.06),
    ("southwest", 0.05),
    ("shahdara", 0.07),
];

/// Demand share for zones missing from [`ZONE_DEMAND_SHARE`].
pub const DEFAULT_DEMAND_SHARE: f64 = 0.08;

/// Citywide base load in MW.
pub const BASE_DEMAND_MW: f64 = 5_500.0;

const SUPPLY_SEED_OFFSET: i64 = 50;
const OUTAGE_SEED_OFFSET: i64 = 200;
const RENEWABLE_SEED_OFFSET: i64 = 300;

/// Citywide demand in MW for the given time context.
#[must_use]
pub const fn total_demand(ctx: &TimeContext) -> f64 {
    let load_factor = if ctx.is_power_peak_load() { 1.3 } else { 0.9 };
    let seasonal_factor = if ctx.is_summer() { 1.3 } else { 0.9 };
    BASE_DEMAND_MW * load_factor * seasonal_factor
}

/// Generates one power record per zone, in registry order.
#[must_use]
pub fn generate<R: RandomSource + ?Sized>(
    zones: &ZoneRegistry,
    ctx: &TimeContext,
    random: &R,
) -> Vec<PowerMetrics> {
    let time_seed = ctx.seed();
    let total = total_demand(ctx);
    log::trace!("power: citywide demand {total:.0} MW at seed {time_seed}");

    zones
        .zones()
        .iter()
        .enumerate()
        .map(|(idx, zone)| {
            let share = lookup(ZONE_DEMAND_SHARE, &zone.id, DEFAULT_DEMAND_SHARE);
            let demand_factor = random.sample(seed_for(time_seed, idx, 0)).mul_add(0.2, 0.9);
            let demand = to_count(total * share * demand_factor);
            let supply_ratio = random
                .sample(seed_for(time_seed, idx, SUPPLY_SEED_OFFSET))
                .mul_add(0.04, 0.98);

            PowerMetrics {
                zone: zone.id.clone(),
                demand,
                supply: to_count(f64::from(demand) * supply_ratio),
                peak_load: to_count(f64::from(demand) * 1.2),
                outages: floor_count(
                    random.sample(seed_for(time_seed, idx, OUTAGE_SEED_OFFSET)) * 3.0,
                ),
                renewable_percent: to_count(
                    random
                        .sample(seed_for(time_seed, idx, RENEWABLE_SEED_OFFSET))
                        .mul_add(7.0, 8.0),
                ),
                timestamp: ctx.timestamp(),
            }
        })
        .collect()
}
