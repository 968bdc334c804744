//! Citywide roll-ups of one domain's records, as shown on the per-domain
//! dashboard pages.

use city_ops_metrics_models::{
    HealthMetrics, PowerMetrics, RiskLevel, SafetyMetrics, TrafficMetrics, WaterMetrics,
};
use serde::Serialize;

use crate::numeric::{mean, ratio_or, round_half_up, total};

/// Coverage below which a water zone is reported as in deficit.
pub const WATER_DEFICIT_COVERAGE: f64 = 0.7;

/// Bed occupancy above which a health zone is reported as critical.
pub const HEALTH_CRITICAL_OCCUPANCY: f64 = 0.85;

/// Citywide traffic figures.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TrafficSummary {
    /// Mean congestion index across zones.
    pub avg_congestion: f64,
    /// Mean of zone average speeds, km/h.
    pub avg_speed: f64,
    /// Total incidents.
    pub total_incidents: u64,
}

impl TrafficSummary {
    /// Summarizes a traffic snapshot.
    #[must_use]
    pub fn from_records(records: &[TrafficMetrics]) -> Self {
        Self {
            avg_congestion: mean(records.iter().map(|r| f64::from(r.congestion_index))),
            avg_speed: mean(records.iter().map(|r| f64::from(r.avg_speed))),
            total_incidents: total(records.iter().map(|r| r.incidents)),
        }
    }
}

/// Citywide power figures.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PowerSummary {
    /// Total demand, MW.
    pub total_demand: u64,
    /// Total supply, MW.
    pub total_supply: u64,
    /// Sum of per-zone shortfalls, MW.
    pub total_deficit: u64,
    /// Total active outages.
    pub total_outages: u64,
    /// Mean renewable share, percent.
    pub avg_renewable_percent: f64,
    /// Supply as a rounded percentage of demand; 100 when there is no
    /// demand.
    pub supply_ratio_percent: f64,
    /// Zones where supply is below demand, highest demand first.
    pub deficit_zones: Vec<String>,
}

impl PowerSummary {
    /// Summarizes a power snapshot.
    #[must_use]
    pub fn from_records(records: &[PowerMetrics]) -> Self {
        let total_demand = total(records.iter().map(|r| r.demand));
        let total_supply = total(records.iter().map(|r| r.supply));

        let mut deficit: Vec<&PowerMetrics> =
            records.iter().filter(|r| r.supply < r.demand).collect();
        deficit.sort_by(|a, b| b.demand.cmp(&a.demand));

        Self {
            total_demand,
            total_supply,
            total_deficit: total(records.iter().map(PowerMetrics::deficit)),
            total_outages: total(records.iter().map(|r| r.outages)),
            avg_renewable_percent: mean(records.iter().map(|r| f64::from(r.renewable_percent))),
            supply_ratio_percent: round_half_up(ratio_or(total_supply, total_demand, 1.0) * 100.0),
            deficit_zones: deficit.into_iter().map(|r| r.zone.clone()).collect(),
        }
    }
}

/// Citywide water figures.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WaterSummary {
    /// Total supply, MLD.
    pub total_supply: u64,
    /// Total demand, MLD.
    pub total_demand: u64,
    /// Sum of per-zone shortfalls, MLD.
    pub total_deficit: u64,
    /// Total reported leakages.
    pub total_leakages: u64,
    /// Mean reservoir level, percent.
    pub avg_reservoir_level: f64,
    /// Supply as a rounded percentage of demand; 100 when there is no
    /// demand.
    pub coverage_percent: f64,
    /// Zones with coverage below [`WATER_DEFICIT_COVERAGE`], highest
    /// demand first.
    pub deficit_zones: Vec<String>,
}

impl WaterSummary {
    /// Summarizes a water snapshot.
    #[must_use]
    pub fn from_records(records: &[WaterMetrics]) -> Self {
        let total_supply = total(records.iter().map(|r| r.supply));
        let total_demand = total(records.iter().map(|r| r.demand));

        let mut deficit: Vec<&WaterMetrics> = records
            .iter()
            .filter(|r| r.demand > 0 && r.coverage() < WATER_DEFICIT_COVERAGE)
            .collect();
        deficit.sort_by(|a, b| b.demand.cmp(&a.demand));

        Self {
            total_supply,
            total_demand,
            total_deficit: total(records.iter().map(WaterMetrics::deficit)),
            total_leakages: total(records.iter().map(|r| r.leakages)),
            avg_reservoir_level: mean(records.iter().map(|r| f64::from(r.reservoir_level))),
            coverage_percent: round_half_up(ratio_or(total_supply, total_demand, 1.0) * 100.0),
            deficit_zones: deficit.into_iter().map(|r| r.zone.clone()).collect(),
        }
    }
}

/// Citywide health infrastructure figures.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthSummary {
    /// Total hospital beds.
    pub total_beds: u64,
    /// Total occupied beds.
    pub total_occupied: u64,
    /// Total ambulances on duty.
    pub total_ambulances: u64,
    /// Rounded mean ambulance response time, minutes.
    pub avg_response_time: f64,
    /// Total emergency calls.
    pub total_emergency_calls: u64,
    /// Occupied beds as a rounded percentage of capacity; 0 with no beds.
    pub occupancy_percent: f64,
    /// Zones with occupancy above [`HEALTH_CRITICAL_OCCUPANCY`].
    pub critical_zones: Vec<String>,
}

impl HealthSummary {
    /// Summarizes a health snapshot.
    #[must_use]
    pub fn from_records(records: &[HealthMetrics]) -> Self {
        let total_beds = total(records.iter().map(|r| r.hospital_beds));
        let total_occupied = total(records.iter().map(|r| r.beds_occupied));

        Self {
            total_beds,
            total_occupied,
            total_ambulances: total(records.iter().map(|r| r.ambulances)),
            avg_response_time: round_half_up(mean(
                records.iter().map(|r| f64::from(r.avg_response_time)),
            )),
            total_emergency_calls: total(records.iter().map(|r| r.emergency_calls)),
            occupancy_percent: round_half_up(ratio_or(total_occupied, total_beds, 0.0) * 100.0),
            critical_zones: records
                .iter()
                .filter(|r| r.occupancy() > HEALTH_CRITICAL_OCCUPANCY)
                .map(|r| r.zone.clone())
                .collect(),
        }
    }
}

/// Citywide public safety figures.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SafetySummary {
    /// Rounded mean crime index.
    pub avg_crime_index: f64,
    /// Total incidents.
    pub total_incidents: u64,
    /// Total patrol units deployed.
    pub total_patrol_units: u64,
    /// Rounded mean police response time, minutes.
    pub avg_response_time: f64,
    /// Zones classified [`RiskLevel::High`].
    pub high_risk_zones: Vec<String>,
}

impl SafetySummary {
    /// Summarizes a safety snapshot.
    #[must_use]
    pub fn from_records(records: &[SafetyMetrics]) -> Self {
        Self {
            avg_crime_index: round_half_up(mean(records.iter().map(|r| f64::from(r.crime_index)))),
            total_incidents: total(records.iter().map(|r| r.incidents)),
            total_patrol_units: total(records.iter().map(|r| r.patrol_units)),
            avg_response_time: round_half_up(mean(
                records.iter().map(|r| f64::from(r.response_time)),
            )),
            high_risk_zones: records
                .iter()
                .filter(|r| r.risk_level == RiskLevel::High)
                .map(|r| r.zone.clone())
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{DateTime, Utc};

    fn ts() -> DateTime<Utc> {
        DateTime::from_timestamp(1_700_000_000, 0).unwrap()
    }

    fn power(zone: &str, demand: u32, supply: u32, outages: u32) -> PowerMetrics {
        PowerMetrics {
            zone: zone.to_string(),
            demand,
            supply,
            peak_load: demand,
            outages,
            renewable_percent: 10,
            timestamp: ts(),
        }
    }

    fn water(zone: &str, demand: u32, supply: u32) -> WaterMetrics {
        WaterMetrics {
            zone: zone.to_string(),
            supply,
            demand,
            reservoir_level: 60,
            leakages: 2,
            timestamp: ts(),
        }
    }

    fn health(zone: &str, beds: u32, occupied: u32, response: u32) -> HealthMetrics {
        HealthMetrics {
            zone: zone.to_string(),
            hospital_beds: beds,
            beds_occupied: occupied,
            ambulances: 12,
            avg_response_time: response,
            emergency_calls: 40,
            timestamp: ts(),
        }
    }

    fn safety(zone: &str, crime_index: u32, response: u32) -> SafetyMetrics {
        SafetyMetrics {
            zone: zone.to_string(),
            crime_index,
            incidents: 3,
            patrol_units: 15,
            response_time: response,
            risk_level: RiskLevel::from_crime_index(crime_index),
            timestamp: ts(),
        }
    }

    #[test]
    fn health_critical_zones_exceed_eighty_five_percent() {
        let summary = HealthSummary::from_records(&[
            health("a", 100, 85, 10),
            health("b", 100, 86, 13),
            health("c", 0, 0, 14),
        ]);
        assert_eq!(summary.total_beds, 200);
        assert_eq!(summary.total_occupied, 171);
        assert_eq!(summary.total_ambulances, 36);
        assert_eq!(summary.total_emergency_calls, 120);
        assert_eq!(summary.critical_zones, vec!["b"]);
        // 171 / 200 = 85.5%
        assert!((summary.occupancy_percent - 86.0).abs() < f64::EPSILON);
        // (10 + 13 + 14) / 3 = 12.33
        assert!((summary.avg_response_time - 12.0).abs() < f64::EPSILON);
    }

    #[test]
    fn safety_lists_high_risk_zones() {
        let summary = SafetySummary::from_records(&[
            safety("a", 20, 8),
            safety("b", 61, 9),
            safety("c", 90, 12),
        ]);
        // (20 + 61 + 90) / 3 = 57
        assert!((summary.avg_crime_index - 57.0).abs() < f64::EPSILON);
        // (8 + 9 + 12) / 3 = 9.67
        assert!((summary.avg_response_time - 10.0).abs() < f64::EPSILON);
        assert_eq!(summary.total_incidents, 9);
        assert_eq!(summary.total_patrol_units, 45);
        assert_eq!(summary.high_risk_zones, vec!["b", "c"]);
    }

    #[test]
    fn power_deficit_zones_sorted_by_demand() {
        let summary = PowerSummary::from_records(&[
            power("a", 100, 90, 1),
            power("b", 300, 310, 0),
            power("c", 200, 150, 2),
        ]);
        assert_eq!(summary.total_demand, 600);
        assert_eq!(summary.total_supply, 550);
        assert_eq!(summary.total_deficit, 60);
        assert_eq!(summary.total_outages, 3);
        assert_eq!(summary.deficit_zones, vec!["c", "a"]);
        assert!((summary.supply_ratio_percent - 92.0).abs() < f64::EPSILON);
    }

    #[test]
    fn water_deficit_uses_seventy_percent_coverage() {
        let summary = WaterSummary::from_records(&[
            water("a", 100, 69),
            water("b", 100, 70),
            water("c", 0, 0),
        ]);
        assert_eq!(summary.deficit_zones, vec!["a"]);
        assert_eq!(summary.total_deficit, 61);
        assert_eq!(summary.total_leakages, 6);
    }

    #[test]
    fn empty_snapshots_report_full_coverage() {
        let power = PowerSummary::from_records(&[]);
        assert!((power.supply_ratio_percent - 100.0).abs() < f64::EPSILON);
        let water = WaterSummary::from_records(&[]);
        assert!((water.coverage_percent - 100.0).abs() < f64::EPSILON);
        assert!(water.avg_reservoir_level.abs() < f64::EPSILON);
        let traffic = TrafficSummary::from_records(&[]);
        assert_eq!(traffic.total_incidents, 0);
        let health = HealthSummary::from_records(&[]);
        assert!(health.occupancy_percent.abs() < f64::EPSILON);
        assert!(health.critical_zones.is_empty());
        let safety = SafetySummary::from_records(&[]);
        assert!(safety.avg_crime_index.abs() < f64::EPSILON);
    }
}
