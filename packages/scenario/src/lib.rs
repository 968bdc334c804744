#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! What-if scenario impact calculator.
//!
//! [`simulate`] projects flood risk, traffic delay, power shortfall, water
//! stress and emergency load from a set of [`ScenarioParameters`] applied
//! to a traffic, power and water snapshot. The calculation is pure: the
//! caller supplies the snapshot and the zone registry, so the same inputs
//! always give the same impact.

use city_ops_metrics::CitySnapshot;
use city_ops_metrics::numeric::{clamp_percent, mean, round_half_up, total};
use city_ops_metrics_models::{PowerMetrics, TrafficMetrics, WaterMetrics};
use city_ops_scenario_models::{ScenarioImpact, ScenarioParameters};
use city_ops_zone::{ZoneRegistry, ZoneTag};

/// Flood risk with no additional rainfall.
pub const BASE_FLOOD_RISK: f64 = 15.0;

/// Extra flood risk once rainfall increase passes [`HEAVY_RAIN_THRESHOLD`].
const HEAVY_RAIN_FLOOD_BONUS: f64 = 20.0;

/// Extra emergency load once rainfall increase passes
/// [`HEAVY_RAIN_THRESHOLD`].
const HEAVY_RAIN_EMERGENCY_BONUS: f64 = 40.0;

/// Rainfall increase, percent, above which heavy-rain effects apply.
pub const HEAVY_RAIN_THRESHOLD: f64 = 50.0;

/// Water stress offset applied on top of the deficit ratio.
const BASE_WATER_STRESS: f64 = 25.0;

/// Air-conditioning load per degree of warming, MW.
const COOLING_LOAD_MW_PER_DEGREE: f64 = 50.0;

/// Extra water demand per degree of warming, MLD.
const WATER_DEMAND_PER_DEGREE: f64 = 20.0;

const FLOOD_AFFECTED_THRESHOLD: f64 = 50.0;
const POWER_AFFECTED_THRESHOLD: f64 = 500.0;
const WATER_AFFECTED_THRESHOLD: f64 = 60.0;

const FLOOD_ACTION_THRESHOLD: f64 = 40.0;
const TRAFFIC_ACTION_THRESHOLD: f64 = 60.0;
const POWER_ACTION_THRESHOLD: f64 = 300.0;
const WATER_ACTION_THRESHOLD: f64 = 50.0;
const EMERGENCY_ACTION_THRESHOLD: f64 = 50.0;

const FLOOD_ACTIONS: [&str; 2] = [
    "Activate flood control measures in low-lying areas",
    "Pre-position NDRF teams in East and Northeast Delhi",
];
const TRAFFIC_ACTIONS: [&str; 2] = [
    "Implement odd-even traffic restrictions",
    "Deploy additional traffic police at major junctions",
];
const POWER_ACTIONS: [&str; 2] = [
    "Initiate load shedding protocol in non-essential areas",
    "Request additional power from Northern Grid",
];
const WATER_ACTIONS: [&str; 2] = [
    "Implement water rationing in affected zones",
    "Deploy water tankers to high-stress areas",
];
const EMERGENCY_ACTIONS: [&str; 2] = [
    "Activate all available ambulances",
    "Set up temporary medical camps",
];

/// Flood risk before rounding, clamped to 0-100.
#[must_use]
pub fn flood_risk(rainfall_increase: f64) -> f64 {
    let mut risk = (rainfall_increase / 20.0).mul_add(15.0, BASE_FLOOD_RISK);
    if rainfall_increase > HEAVY_RAIN_THRESHOLD {
        risk += HEAVY_RAIN_FLOOD_BONUS;
    }
    clamp_percent(risk)
}

/// Traffic delay before rounding, clamped to 0-100.
#[must_use]
pub fn traffic_delay(params: &ScenarioParameters, traffic: &[TrafficMetrics]) -> f64 {
    let base_delay = mean(traffic.iter().map(|t| f64::from(t.congestion_index)));
    clamp_percent(params.rainfall_increase.mul_add(0.3, base_delay + params.traffic_surge))
}

/// Power shortfall before rounding, MW, never negative.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn power_shortfall(params: &ScenarioParameters, power: &[PowerMetrics]) -> f64 {
    let demand = total(power.iter().map(|p| p.demand)) as f64;
    let supply = total(power.iter().map(|p| p.supply)) as f64;
    let additional = demand * (params.power_demand_spike / 100.0);
    let cooling = params.temperature_change.max(0.0) * COOLING_LOAD_MW_PER_DEGREE;
    (demand + additional + cooling - supply).max(0.0)
}

/// Water stress before rounding, clamped to 0-100.
///
/// With no water demand at all the deficit ratio term is taken as zero.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn water_stress(params: &ScenarioParameters, water: &[WaterMetrics]) -> f64 {
    let demand = total(water.iter().map(|w| w.demand)) as f64;
    let supply = total(water.iter().map(|w| w.supply)) as f64;
    let ratio = if demand > 0.0 {
        let extra = params.temperature_change.max(0.0) * WATER_DEMAND_PER_DEGREE;
        (demand + extra - supply) / demand
    } else {
        0.0
    };
    clamp_percent(ratio.mul_add(100.0, BASE_WATER_STRESS))
}

/// Emergency load increase before rounding, percent, never negative.
#[must_use]
pub fn emergency_load(params: &ScenarioParameters) -> f64 {
    let mut load = params.event_type.emergency_base();
    if params.rainfall_increase > HEAVY_RAIN_THRESHOLD {
        load += HEAVY_RAIN_EMERGENCY_BONUS;
    }
    load.max(0.0)
}

/// Projects the impact of `params` on the given snapshot.
#[must_use]
pub fn simulate(
    params: &ScenarioParameters,
    zones: &ZoneRegistry,
    traffic: &[TrafficMetrics],
    power: &[PowerMetrics],
    water: &[WaterMetrics],
) -> ScenarioImpact {
    let flood = flood_risk(params.rainfall_increase);
    let delay = traffic_delay(params, traffic);
    let shortfall = power_shortfall(params, power);
    let stress = water_stress(params, water);
    let emergency = emergency_load(params);

    let mut affected_zones: Vec<String> = Vec::new();
    let mut mark = |tag: ZoneTag| {
        for zone in zones.with_tag(tag) {
            if !affected_zones.iter().any(|id| id == &zone.id) {
                affected_zones.push(zone.id.clone());
            }
        }
    };
    if flood > FLOOD_AFFECTED_THRESHOLD {
        mark(ZoneTag::LowLying);
    }
    if shortfall > POWER_AFFECTED_THRESHOLD {
        mark(ZoneTag::PowerCritical);
    }
    if stress > WATER_AFFECTED_THRESHOLD {
        mark(ZoneTag::WaterStressed);
    }

    let mut recommendations = Vec::new();
    for (triggered, actions) in [
        (flood > FLOOD_ACTION_THRESHOLD, FLOOD_ACTIONS),
        (delay > TRAFFIC_ACTION_THRESHOLD, TRAFFIC_ACTIONS),
        (shortfall > POWER_ACTION_THRESHOLD, POWER_ACTIONS),
        (stress > WATER_ACTION_THRESHOLD, WATER_ACTIONS),
        (emergency > EMERGENCY_ACTION_THRESHOLD, EMERGENCY_ACTIONS),
    ] {
        if triggered {
            recommendations.extend(actions.iter().map(ToString::to_string));
        }
    }

    log::debug!(
        "scenario: flood={flood:.1} delay={delay:.1} shortfall={shortfall:.1} \
         stress={stress:.1} emergency={emergency:.1} affected={}",
        affected_zones.len()
    );

    ScenarioImpact {
        flood_risk: round_half_up(flood),
        traffic_delay_percent: round_half_up(delay),
        power_shortfall: round_half_up(shortfall),
        water_stress_index: round_half_up(stress),
        emergency_load_increase: round_half_up(emergency),
        affected_zones,
        recommendations,
    }
}

/// Projects the impact of `params` on a full [`CitySnapshot`].
#[must_use]
pub fn simulate_snapshot(
    params: &ScenarioParameters,
    zones: &ZoneRegistry,
    snapshot: &CitySnapshot,
) -> ScenarioImpact {
    simulate(params, zones, &snapshot.traffic, &snapshot.power, &snapshot.water)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{DateTime, Utc};
    use city_ops_scenario_models::EventType;

    fn ts() -> DateTime<Utc> {
        DateTime::from_timestamp(1_750_000_000, 0).unwrap()
    }

    fn traffic(congestion_index: u32) -> Vec<TrafficMetrics> {
        vec![TrafficMetrics {
            zone: "central".to_string(),
            congestion_index,
            avg_speed: 35,
            incidents: 1,
            timestamp: ts(),
        }]
    }

    fn power(demand: u32, supply: u32) -> Vec<PowerMetrics> {
        vec![PowerMetrics {
            zone: "central".to_string(),
            demand,
            supply,
            peak_load: demand,
            outages: 0,
            renewable_percent: 10,
            timestamp: ts(),
        }]
    }

    fn water(demand: u32, supply: u32) -> Vec<WaterMetrics> {
        vec![WaterMetrics {
            zone: "central".to_string(),
            supply,
            demand,
            reservoir_level: 70,
            leakages: 0,
            timestamp: ts(),
        }]
    }

    fn run(params: &ScenarioParameters) -> ScenarioImpact {
        simulate(
            params,
            &ZoneRegistry::reference(),
            &traffic(50),
            &power(1_000, 1_000),
            &water(100, 100),
        )
    }

    #[test]
    fn zero_rain_gives_base_flood_risk() {
        let impact = run(&ScenarioParameters::default());
        assert!((impact.flood_risk - 15.0).abs() < f64::EPSILON);
        assert!((impact.traffic_delay_percent - 50.0).abs() < f64::EPSILON);
        assert!(impact.power_shortfall.abs() < f64::EPSILON);
        assert!((impact.water_stress_index - 25.0).abs() < f64::EPSILON);
        assert!(impact.emergency_load_increase.abs() < f64::EPSILON);
        assert!(impact.affected_zones.is_empty());
        assert!(impact.recommendations.is_empty());
    }

    #[test]
    fn heavy_rain_floods_low_lying_zones() {
        let impact = run(&ScenarioParameters {
            rainfall_increase: 60.0,
            ..ScenarioParameters::default()
        });
        assert!((impact.flood_risk - 80.0).abs() < f64::EPSILON);
        assert_eq!(
            impact.affected_zones,
            vec!["east", "northeast", "northwest", "shahdara"]
        );
        // 50 + 0 + 60 * 0.3
        assert!((impact.traffic_delay_percent - 68.0).abs() < f64::EPSILON);
        assert!((impact.emergency_load_increase - 40.0).abs() < f64::EPSILON);
        assert_eq!(
            impact.recommendations,
            [FLOOD_ACTIONS, TRAFFIC_ACTIONS].concat()
        );
    }

    #[test]
    fn flood_risk_is_clamped() {
        assert!((flood_risk(200.0) - 100.0).abs() < f64::EPSILON);
        assert!(flood_risk(-100.0).abs() < f64::EPSILON);
        // 15 + 2.5 * 15 = 52.5 with no heavy-rain bonus
        assert!((flood_risk(50.0) - 52.5).abs() < 1e-9);
    }

    #[test]
    fn combined_stress_marks_every_tag_once() {
        let impact = run(&ScenarioParameters {
            rainfall_increase: 60.0,
            traffic_surge: 0.0,
            power_demand_spike: 50.0,
            temperature_change: 4.0,
            event_type: EventType::Emergency,
        });
        // 1000 + 500 + 200 - 1000
        assert!((impact.power_shortfall - 700.0).abs() < f64::EPSILON);
        // (100 + 80 - 100) / 100 * 100 + 25 = 105, clamped
        assert!((impact.water_stress_index - 100.0).abs() < f64::EPSILON);
        assert!((impact.emergency_load_increase - 120.0).abs() < f64::EPSILON);
        assert_eq!(
            impact.affected_zones,
            vec![
                "east",
                "northeast",
                "northwest",
                "shahdara",
                "south",
                "west",
                "central",
                "southwest",
            ]
        );
        assert_eq!(
            impact.recommendations,
            [
                FLOOD_ACTIONS,
                TRAFFIC_ACTIONS,
                POWER_ACTIONS,
                WATER_ACTIONS,
                EMERGENCY_ACTIONS,
            ]
            .concat()
        );
    }

    #[test]
    fn cooling_ignores_negative_temperature() {
        let params = ScenarioParameters {
            temperature_change: -8.0,
            ..ScenarioParameters::default()
        };
        assert!((power_shortfall(&params, &power(1_000, 990)) - 10.0).abs() < 1e-9);
        assert!((water_stress(&params, &water(100, 90)) - 35.0).abs() < 1e-9);
    }

    #[test]
    fn empty_snapshot_has_no_error_path() {
        let impact = simulate(
            &ScenarioParameters {
                temperature_change: 5.0,
                ..ScenarioParameters::default()
            },
            &ZoneRegistry::reference(),
            &[],
            &[],
            &[],
        );
        assert!((impact.traffic_delay_percent).abs() < f64::EPSILON);
        assert!((impact.power_shortfall - 250.0).abs() < f64::EPSILON);
        assert!((impact.water_stress_index - 25.0).abs() < f64::EPSILON);
    }

    #[test]
    fn surplus_supply_lowers_water_stress_to_zero() {
        let stress = water_stress(&ScenarioParameters::default(), &water(100, 200));
        assert!(stress.abs() < f64::EPSILON);
    }

    #[test]
    fn event_load_without_rain() {
        let festival = emergency_load(&ScenarioParameters {
            event_type: EventType::Festival,
            ..ScenarioParameters::default()
        });
        assert!((festival - 30.0).abs() < f64::EPSILON);
    }
}
