#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Zone reference list for the city operations engine.
//!
//! Every domain record produced by the engine is keyed by a zone id from
//! a single, immutable [`ZoneRegistry`]. The reference deployment's zones
//! are defined in `zones/delhi.toml`, which is embedded at compile time
//! and exposed through [`ZoneRegistry::reference`]. Other deployments can
//! build a registry from their own TOML via [`ZoneRegistry::from_toml_str`].

use std::collections::BTreeSet;

use chrono::FixedOffset;
use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumString};
use thiserror::Error;

/// Embedded reference zone list.
const REFERENCE_ZONES_TOML: &str = include_str!("../zones/delhi.toml");

/// Errors raised while loading a zone list.
#[derive(Debug, Error)]
pub enum ZoneError {
    /// The TOML document could not be parsed.
    #[error("Failed to parse zone list: {0}")]
    Parse(#[from] toml::de::Error),

    /// The zone list parsed but violates a registry invariant.
    #[error("Invalid zone list: {message}")]
    Invalid {
        /// Description of the violated invariant.
        message: String,
    },
}

/// A named property of a zone used to select affected areas in scenario
/// projections.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum ZoneTag {
    /// Flood-prone, flagged when flood risk is high.
    LowLying,
    /// Carries a large share of grid load, flagged on power shortfall.
    PowerCritical,
    /// Supply-constrained, flagged on high water stress.
    WaterStressed,
}

/// A WGS84 point.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Coordinate {
    /// Longitude in degrees.
    pub longitude: f64,
    /// Latitude in degrees.
    pub latitude: f64,
}

/// An administrative zone of the city.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Zone {
    /// Stable identifier used as the join key across domain records.
    pub id: String,
    /// Display name (e.g. "North East Delhi").
    pub name: String,
    /// Short code (e.g. "NED"). Not required to be unique.
    pub code: String,
    /// Resident population.
    pub population: u64,
    /// Area in square kilometres.
    pub area_sq_km: f64,
    /// Representative longitude.
    pub longitude: f64,
    /// Representative latitude.
    pub latitude: f64,
    /// Scenario selection tags.
    #[serde(default)]
    pub tags: Vec<ZoneTag>,
}

impl Zone {
    /// Returns the zone's representative point.
    #[must_use]
    pub const fn coordinate(&self) -> Coordinate {
        Coordinate {
            longitude: self.longitude,
            latitude: self.latitude,
        }
    }

    /// Whether the zone carries the given tag.
    #[must_use]
    pub fn has_tag(&self, tag: ZoneTag) -> bool {
        self.tags.contains(&tag)
    }

    /// Residents per square kilometre, or `None` for a zero area.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn density(&self) -> Option<f64> {
        (self.area_sq_km > 0.0).then(|| self.population as f64 / self.area_sq_km)
    }
}

/// Raw shape of a zone list TOML file.
#[derive(Debug, Deserialize)]
struct ZoneList {
    city: String,
    utc_offset_minutes: i32,
    center: String,
    zones: Vec<ZoneEntry>,
}

/// Raw shape of one `[[zones]]` table. TOML keys are snake_case while the
/// API shape of [`Zone`] is camelCase.
#[derive(Debug, Deserialize)]
struct ZoneEntry {
    id: String,
    name: String,
    code: String,
    population: u64,
    area_sq_km: f64,
    longitude: f64,
    latitude: f64,
    #[serde(default)]
    tags: Vec<ZoneTag>,
}

impl From<ZoneEntry> for Zone {
    fn from(entry: ZoneEntry) -> Self {
        Self {
            id: entry.id,
            name: entry.name,
            code: entry.code,
            population: entry.population,
            area_sq_km: entry.area_sq_km,
            longitude: entry.longitude,
            latitude: entry.latitude,
            tags: entry.tags,
        }
    }
}

/// The immutable zone reference list for one city.
///
/// Loaded once and shared read-only (typically behind an `Arc`) for the
/// life of the process.
#[derive(Debug, Clone)]
pub struct ZoneRegistry {
    city: String,
    utc_offset: FixedOffset,
    center: usize,
    zones: Vec<Zone>,
}

impl ZoneRegistry {
    /// Returns the embedded reference deployment (the 11 zones of Delhi).
    ///
    /// # Panics
    ///
    /// Panics if the embedded TOML is malformed (this is a compile-time
    /// guarantee since the file is embedded).
    #[must_use]
    pub fn reference() -> Self {
        Self::from_toml_str(REFERENCE_ZONES_TOML)
            .unwrap_or_else(|e| panic!("Failed to load embedded zone list: {e}"))
    }

    /// Parses and validates a zone list.
    ///
    /// The list must be non-empty, zone ids must be unique and non-empty,
    /// the `center` zone must exist and the UTC offset must be within a
    /// day.
    ///
    /// # Errors
    ///
    /// Returns [`ZoneError`] if the TOML cannot be parsed or an invariant
    /// does not hold.
    pub fn from_toml_str(toml_str: &str) -> Result<Self, ZoneError> {
        let list: ZoneList = toml::de::from_str(toml_str)?;
        let zones: Vec<Zone> = list.zones.into_iter().map(Zone::from).collect();

        if zones.is_empty() {
            return Err(ZoneError::Invalid {
                message: "zone list is empty".to_string(),
            });
        }

        let mut seen = BTreeSet::new();
        for zone in &zones {
            if zone.id.is_empty() {
                return Err(ZoneError::Invalid {
                    message: format!("zone '{}' has an empty id", zone.name),
                });
            }
            if !seen.insert(zone.id.as_str()) {
                return Err(ZoneError::Invalid {
                    message: format!("duplicate zone id '{}'", zone.id),
                });
            }
        }

        let center = zones
            .iter()
            .position(|z| z.id == list.center)
            .ok_or_else(|| ZoneError::Invalid {
                message: format!("center zone '{}' is not in the list", list.center),
            })?;

        let utc_offset = FixedOffset::east_opt(list.utc_offset_minutes * 60).ok_or_else(|| {
            ZoneError::Invalid {
                message: format!("UTC offset {} minutes is out of range", list.utc_offset_minutes),
            }
        })?;

        log::debug!(
            "Loaded {} zones for {} (UTC offset {utc_offset})",
            zones.len(),
            list.city
        );

        Ok(Self {
            city: list.city,
            utc_offset,
            center,
            zones,
        })
    }

    /// City name.
    #[must_use]
    pub fn city(&self) -> &str {
        &self.city
    }

    /// The city's local offset from UTC, used to resolve wall-clock hours.
    #[must_use]
    pub const fn utc_offset(&self) -> FixedOffset {
        self.utc_offset
    }

    /// The zone used for single-point queries such as current weather.
    #[must_use]
    pub fn center(&self) -> &Zone {
        &self.zones[self.center]
    }

    /// All zones in reference order.
    #[must_use]
    pub fn zones(&self) -> &[Zone] {
        &self.zones
    }

    /// Number of zones.
    #[must_use]
    pub fn len(&self) -> usize {
        self.zones.len()
    }

    /// Always `false` for a validated registry.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.zones.is_empty()
    }

    /// Looks up a zone by id.
    #[must_use]
    pub fn get(&self, id: &str) -> Option<&Zone> {
        self.zones.iter().find(|z| z.id == id)
    }

    /// Zone ids in reference order.
    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.zones.iter().map(|z| z.id.as_str())
    }

    /// Zones carrying `tag`, in reference order.
    pub fn with_tag(&self, tag: ZoneTag) -> impl Iterator<Item = &Zone> {
        self.zones.iter().filter(move |z| z.has_tag(tag))
    }
}

impl Default for ZoneRegistry {
    fn default() -> Self {
        Self::reference()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MINIMAL: &str = r#"
        city = "Testville"
        utc_offset_minutes = 0
        center = "a"

        [[zones]]
        id = "a"
        name = "Zone A"
        code = "A"
        population = 1000
        area_sq_km = 10.0
        longitude = 1.0
        latitude = 2.0
    "#;

    #[test]
    fn reference_has_eleven_zones() {
        let registry = ZoneRegistry::reference();
        assert_eq!(registry.len(), 11);
        assert_eq!(registry.city(), "Delhi");
        assert_eq!(registry.center().id, "central");
        assert_eq!(registry.utc_offset().local_minus_utc(), 330 * 60);
    }

    #[test]
    fn reference_loads_snake_case_toml() {
        let registry = ZoneRegistry::reference();
        let north = registry.get("north").unwrap();
        assert!((north.area_sq_km - 59.57).abs() < f64::EPSILON);
        assert_eq!(north.population, 887_978);

        let minimal = ZoneRegistry::from_toml_str(MINIMAL).unwrap();
        assert!((minimal.zones()[0].area_sq_km - 10.0).abs() < f64::EPSILON);
    }

    #[test]
    fn zone_json_round_trips_camel_case() {
        let zone = ZoneRegistry::reference().zones()[0].clone();
        let json = serde_json::to_string(&zone).unwrap();
        assert!(json.contains("\"areaSqKm\""));
        assert_eq!(serde_json::from_str::<Zone>(&json).unwrap(), zone);
    }

    #[test]
    fn reference_ids_are_unique() {
        let registry = ZoneRegistry::reference();
        let mut seen = BTreeSet::new();
        for id in registry.ids() {
            assert!(seen.insert(id), "Duplicate zone id: {id}");
        }
    }

    #[test]
    fn reference_tags_match_named_zone_sets() {
        let registry = ZoneRegistry::reference();
        let low: Vec<&str> = registry
            .with_tag(ZoneTag::LowLying)
            .map(|z| z.id.as_str())
            .collect();
        assert_eq!(low, vec!["east", "northeast", "northwest", "shahdara"]);

        let power: Vec<&str> = registry
            .with_tag(ZoneTag::PowerCritical)
            .map(|z| z.id.as_str())
            .collect();
        assert_eq!(power, vec!["south", "west", "central"]);

        let water: Vec<&str> = registry
            .with_tag(ZoneTag::WaterStressed)
            .map(|z| z.id.as_str())
            .collect();
        assert_eq!(water, vec!["northwest", "southwest"]);
    }

    #[test]
    fn tags_default_to_empty() {
        let registry = ZoneRegistry::from_toml_str(MINIMAL).unwrap();
        assert!(registry.zones()[0].tags.is_empty());
        assert_eq!(
            registry.zones()[0].coordinate(),
            Coordinate {
                longitude: 1.0,
                latitude: 2.0
            }
        );
    }

    #[test]
    fn rejects_duplicate_ids() {
        let doubled = format!(
            "{MINIMAL}\n[[zones]]\nid = \"a\"\nname = \"Again\"\ncode = \"A2\"\n\
             population = 1\narea_sq_km = 1.0\nlongitude = 0.0\nlatitude = 0.0\n"
        );
        let err = ZoneRegistry::from_toml_str(&doubled).unwrap_err();
        assert!(matches!(err, ZoneError::Invalid { .. }), "{err}");
    }

    #[test]
    fn rejects_unknown_center() {
        let toml_str = MINIMAL.replace("center = \"a\"", "center = \"zz\"");
        assert!(ZoneRegistry::from_toml_str(&toml_str).is_err());
    }

    #[test]
    fn rejects_empty_list() {
        let toml_str = "city = \"X\"\nutc_offset_minutes = 0\ncenter = \"a\"\nzones = []\n";
        assert!(ZoneRegistry::from_toml_str(toml_str).is_err());
    }

    #[test]
    fn rejects_unknown_tag() {
        let toml_str = MINIMAL.replace("latitude = 2.0", "latitude = 2.0\ntags = [\"volcanic\"]");
        assert!(matches!(
            ZoneRegistry::from_toml_str(&toml_str),
            Err(ZoneError::Parse(_))
        ));
    }

    #[test]
    fn density_handles_zero_area() {
        let mut zone = ZoneRegistry::from_toml_str(MINIMAL).unwrap().zones()[0].clone();
        assert_eq!(zone.density(), Some(100.0));
        zone.area_sq_km = 0.0;
        assert_eq!(zone.density(), None);
    }

    #[test]
    fn zone_serializes_camel_case() {
        let registry = ZoneRegistry::reference();
        let zone = &registry.zones()[0];
        let json = serde_json::to_value(zone).unwrap();
        assert_eq!(json["areaSqKm"], 59.57);
        assert_eq!(json["id"], "north");
    }
}
