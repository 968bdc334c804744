#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Data source transparency registry.
//!
//! Every figure the engine reports is either read from a live public API
//! or computed by a model. Each source is described by a TOML file under
//! `sources/` and classified as [`SourceKind::Real`], [`SourceKind::Model`]
//! or [`SourceKind::Hybrid`] so clients can label values honestly.

pub mod registry;

use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumString};

pub use registry::{all_sources, get_source, query_sources, sources_for_module, sources_of_kind};

/// How a source's values are obtained.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
#[serde(rename_all = "UPPERCASE")]
#[strum(serialize_all = "UPPERCASE", ascii_case_insensitive)]
pub enum SourceKind {
    /// Read from a public API or dataset.
    Real,
    /// Computed from a model.
    Model,
    /// Public base figures distributed by a model.
    Hybrid,
}

impl SourceKind {
    /// Returns all variants of this enum.
    #[must_use]
    pub const fn all() -> &'static [Self] {
        &[Self::Real, Self::Model, Self::Hybrid]
    }

    /// Badge label shown next to values from this kind of source.
    #[must_use]
    pub const fn badge(self) -> &'static str {
        match self {
            Self::Real => "Live Data",
            Self::Model => "Model-Derived",
            Self::Hybrid => "Hybrid",
        }
    }
}

/// One data source.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DataSource {
    /// Unique identifier (e.g. `"open-meteo-aq"`).
    pub id: String,
    /// Human-readable name.
    pub name: String,
    /// How values are obtained.
    #[serde(alias = "type")]
    pub kind: SourceKind,
    /// What the source provides.
    pub description: String,
    /// Documentation or provider URL.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    /// How often values change.
    #[serde(alias = "update_frequency")]
    pub update_frequency: String,
    /// Methodology and caveats.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    /// Dashboard modules fed by this source.
    pub modules: Vec<String>,
    /// Whether an API key is needed.
    #[serde(default, alias = "requires_key")]
    pub requires_key: bool,
}

impl DataSource {
    /// Badge label for this source's kind.
    #[must_use]
    pub const fn badge(&self) -> &'static str {
        self.kind.badge()
    }

    /// Whether the source feeds `module` (case-insensitive).
    #[must_use]
    pub fn feeds(&self, module: &str) -> bool {
        self.modules.iter().any(|m| m.eq_ignore_ascii_case(module))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn badges() {
        assert_eq!(SourceKind::Real.badge(), "Live Data");
        assert_eq!(SourceKind::Model.badge(), "Model-Derived");
        assert_eq!(SourceKind::Hybrid.badge(), "Hybrid");
    }

    #[test]
    fn kind_round_trips_uppercase() {
        assert_eq!("HYBRID".parse::<SourceKind>().unwrap(), SourceKind::Hybrid);
        assert_eq!("real".parse::<SourceKind>().unwrap(), SourceKind::Real);
        assert_eq!(SourceKind::Model.to_string(), "MODEL");
        assert_eq!(
            serde_json::to_value(SourceKind::Real).unwrap(),
            serde_json::json!("REAL")
        );
    }

    #[test]
    fn serializes_camel_case() {
        let source = get_source("traffic-model").unwrap();
        let json = serde_json::to_value(&source).unwrap();
        assert_eq!(json["kind"], "MODEL");
        assert_eq!(json["updateFrequency"], "Real-time calculation");
        assert_eq!(json["requiresKey"], false);
        assert!(json.get("url").is_none());
    }
}
