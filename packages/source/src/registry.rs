//! Source registry: loads all source definitions from embedded TOML.
//!
//! Each `.toml` file in `packages/source/sources/` is baked into the binary
//! at compile time via [`include_str!`]. Adding a source means adding a
//! TOML file and listing it below.

use crate::{DataSource, SourceKind};

/// TOML configs embedded at compile time, in display order.
const SOURCE_TOMLS: &[(&str, &str)] = &[
    // ── Live ─────────────────────────────────────────────────────────
    ("open_meteo_aq", include_str!("../sources/open_meteo_aq.toml")),
    (
        "open_meteo_weather",
        include_str!("../sources/open_meteo_weather.toml"),
    ),
    // ── Modelled ─────────────────────────────────────────────────────
    ("traffic_model", include_str!("../sources/traffic_model.toml")),
    ("power_data", include_str!("../sources/power_data.toml")),
    ("water_data", include_str!("../sources/water_data.toml")),
    ("health_data", include_str!("../sources/health_data.toml")),
    ("safety_data", include_str!("../sources/safety_data.toml")),
    // ── Maps ─────────────────────────────────────────────────────────
    ("osm", include_str!("../sources/osm.toml")),
];

#[cfg(test)]
const EXPECTED_SOURCE_COUNT: usize = 8;

/// Returns every registered source, in display order.
///
/// # Panics
///
/// Panics if any embedded TOML config is malformed (a build-time
/// guarantee since the configs are embedded).
#[must_use]
pub fn all_sources() -> Vec<DataSource> {
    SOURCE_TOMLS
        .iter()
        .map(|(name, toml_str)| {
            toml::de::from_str(toml_str)
                .unwrap_or_else(|e| panic!("Failed to parse data source '{name}': {e}"))
        })
        .collect()
}

/// Looks up a source by id.
#[must_use]
pub fn get_source(id: &str) -> Option<DataSource> {
    all_sources().into_iter().find(|s| s.id == id)
}

/// Returns the sources that feed a dashboard module (case-insensitive).
#[must_use]
pub fn sources_for_module(module: &str) -> Vec<DataSource> {
    all_sources().into_iter().filter(|s| s.feeds(module)).collect()
}

/// Returns the sources of one kind.
#[must_use]
pub fn sources_of_kind(kind: SourceKind) -> Vec<DataSource> {
    all_sources().into_iter().filter(|s| s.kind == kind).collect()
}

/// Returns the sources matching every given filter, in display order.
/// With no filters this is [`all_sources`].
#[must_use]
pub fn query_sources(module: Option<&str>, kind: Option<SourceKind>) -> Vec<DataSource> {
    let sources = match (module, kind) {
        (Some(module), _) => sources_for_module(module),
        (None, Some(kind)) => sources_of_kind(kind),
        (None, None) => all_sources(),
    };
    sources
        .into_iter()
        .filter(|s| kind.is_none_or(|kind| s.kind == kind))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeSet;

    #[test]
    fn loads_all_sources() {
        assert_eq!(all_sources().len(), EXPECTED_SOURCE_COUNT);
    }

    #[test]
    fn source_ids_are_unique() {
        let mut seen = BTreeSet::new();
        for source in &all_sources() {
            assert!(seen.insert(source.id.clone()), "Duplicate source ID: {}", source.id);
        }
    }

    #[test]
    fn all_sources_have_required_fields() {
        for source in &all_sources() {
            assert!(!source.id.is_empty(), "Source has empty id");
            assert!(!source.name.is_empty(), "Source {} has empty name", source.id);
            assert!(!source.modules.is_empty(), "Source {} feeds no module", source.id);
            assert!(!source.requires_key, "Source {} requires a key", source.id);
            if source.kind == SourceKind::Real {
                assert!(source.url.is_some(), "Live source {} has no url", source.id);
            }
        }
    }

    #[test]
    fn dashboard_sources() {
        let ids: Vec<String> = sources_for_module("dashboard")
            .into_iter()
            .map(|s| s.id)
            .collect();
        assert_eq!(
            ids,
            vec![
                "open-meteo-aq",
                "open-meteo-weather",
                "traffic-model",
                "power-data",
                "water-data",
            ]
        );
        assert!(sources_for_module("Billing").is_empty());
    }

    #[test]
    fn query_combines_module_and_kind() {
        assert_eq!(query_sources(None, None), all_sources());
        assert_eq!(
            query_sources(None, Some(SourceKind::Hybrid)),
            sources_of_kind(SourceKind::Hybrid)
        );
        assert_eq!(query_sources(Some("dashboard"), None).len(), 5);

        let live_dashboard: Vec<String> = query_sources(Some("dashboard"), Some(SourceKind::Real))
            .into_iter()
            .map(|s| s.id)
            .collect();
        assert!(live_dashboard.contains(&"open-meteo-aq".to_string()));
        assert!(
            query_sources(Some("dashboard"), Some(SourceKind::Real))
                .iter()
                .all(|s| s.kind == SourceKind::Real && s.feeds("dashboard"))
        );
        assert!(query_sources(Some("billing"), Some(SourceKind::Real)).is_empty());
    }

    #[test]
    fn kinds_partition_the_registry() {
        let counts: Vec<usize> = SourceKind::all()
            .iter()
            .map(|kind| sources_of_kind(*kind).len())
            .collect();
        assert_eq!(counts, vec![3, 3, 2]);
    }

    #[test]
    fn lookup_by_id() {
        let osm = get_source("osm").unwrap();
        assert_eq!(osm.kind, SourceKind::Real);
        assert_eq!(osm.badge(), "Live Data");
        assert!(get_source("missing").is_none());
    }
}
