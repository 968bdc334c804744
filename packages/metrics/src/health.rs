//! Health infrastructure model.
//!
//! The city has about 50,000 government hospital beds, distributed by the
//! location of major hospitals. Occupancy runs between 70% and 90%, and
//! emergency calls rise 40% in the late evening.

use city_ops_metrics_models::HealthMetrics;
use city_ops_zone::ZoneRegistry;

use crate::baseline::{BaselineTable, lookup, seed_for};
use crate::numeric::to_count;
use crate::random::RandomSource;
use crate::time_context::TimeContext;

/// Share of citywide hospital beds by zone.
pub const ZONE_BED_SHARE: BaselineTable = &[
    ("central", 0.15),
    ("newdelhi", 0.12),
    ("south", 0.12),
    ("east", 0.10),
    ("west", 0.10),
    ("north", 0.08),
    ("northeast", 0.08),
    ("northwest", 0.10),
    ("southeast", 0.06),
    ("southwest", 0.05),
    ("shahdara", 0.06),
];

/// Bed share for zones missing from [`ZONE_BED_SHARE`].
pub const DEFAULT_BED_SHARE: f64 = 0.08;

/// Citywide government hospital beds.
pub const TOTAL_BEDS: f64 = 50_000.0;

const AMBULANCE_SEED_OFFSET: i64 = 50;
const RESPONSE_SEED_OFFSET: i64 = 100;
const CALLS_SEED_OFFSET: i64 = 150;

/// Emergency call multiplier for the time of day.
#[must_use]
pub const fn call_multiplier(ctx: &TimeContext) -> f64 {
    if ctx.is_high_call_hour() { 1.4 } else { 1.0 }
}

/// Generates one health record per zone, in registry order.
#[must_use]
pub fn generate<R: RandomSource + ?Sized>(
    zones: &ZoneRegistry,
    ctx: &TimeContext,
    random: &R,
) -> Vec<HealthMetrics> {
    let time_seed = ctx.seed();
    let multiplier = call_multiplier(ctx);

    zones
        .zones()
        .iter()
        .enumerate()
        .map(|(idx, zone)| {
            let share = lookup(ZONE_BED_SHARE, &zone.id, DEFAULT_BED_SHARE);
            let beds = to_count(TOTAL_BEDS * share);
            let occupancy = random.sample(seed_for(time_seed, idx, 0)).mul_add(0.2, 0.7);
            let calls = random
                .sample(seed_for(time_seed, idx, CALLS_SEED_OFFSET))
                .mul_add(100.0, 50.0);

            HealthMetrics {
                zone: zone.id.clone(),
                hospital_beds: beds,
                beds_occupied: to_count(f64::from(beds) * occupancy),
                ambulances: to_count(
                    random
                        .sample(seed_for(time_seed, idx, AMBULANCE_SEED_OFFSET))
                        .mul_add(30.0, 20.0),
                ),
                avg_response_time: to_count(
                    random
                        .sample(seed_for(time_seed, idx, RESPONSE_SEED_OFFSET))
                        .mul_add(12.0, 8.0),
                ),
                emergency_calls: to_count(calls * multiplier),
                timestamp: ctx.timestamp(),
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::random::TrigHash;
    use crate::test_support::{Fixed, context};

    #[test]
    fn ranges_hold_for_every_hour() {
        let zones = ZoneRegistry::reference();
        for hour in 0..24 {
            for record in generate(&zones, &context(2025, 2, hour, 5), &TrigHash) {
                assert!(record.beds_occupied <= record.hospital_beds);
                let occupancy = f64::from(record.beds_occupied) / f64::from(record.hospital_beds);
                assert!((0.69..=0.91).contains(&occupancy), "{record:?}");
                assert!((20..=50).contains(&record.ambulances));
                assert!((8..=20).contains(&record.avg_response_time));
                assert!((50..=210).contains(&record.emergency_calls));
            }
        }
    }

    #[test]
    fn beds_are_fixed_by_share() {
        let zones = ZoneRegistry::reference();
        let records = generate(&zones, &context(2025, 2, 12, 0), &TrigHash);
        let beds: u32 = records.iter().map(|r| r.hospital_beds).sum();
        assert_eq!(beds, 51_000);
        assert_eq!(records[0].zone, "north");
        assert_eq!(records[0].hospital_beds, 4_000);
    }

    #[test]
    fn late_evening_raises_calls() {
        let zones = ZoneRegistry::reference();
        let day = generate(&zones, &context(2025, 2, 12, 0), &Fixed(0.5));
        let night = generate(&zones, &context(2025, 2, 22, 0), &Fixed(0.5));
        assert_eq!(day[0].emergency_calls, 100);
        assert_eq!(night[0].emergency_calls, 140);
        assert_eq!(day[0].beds_occupied, 3_200);
        assert_eq!(day[0].ambulances, 35);
        assert_eq!(day[0].avg_response_time, 14);
    }
}
