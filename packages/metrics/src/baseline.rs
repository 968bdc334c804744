//! Per-zone baseline tables.
//!
//! Each domain carries a fixed mapping from zone id to a share or base
//! magnitude, hand-tuned for the reference deployment. Zones missing from
//! a table fall back to the domain default.

/// A fixed zone-id to baseline mapping.
pub type BaselineTable = &'static [(&'static str, f64)];

/// Looks up `zone` in `table`, returning `default` for unknown zones.
#[must_use]
pub fn lookup(table: BaselineTable, zone: &str, default: f64) -> f64 {
    table
        .iter()
        .find(|(id, _)| *id == zone)
        .map_or(default, |(_, value)| *value)
}

/// Seed for the zone at `index`, offset by a per-field constant so that
/// fields of one record draw independent values.
#[must_use]
#[allow(clippy::cast_possible_wrap)]
pub const fn seed_for(time_seed: i64, index: usize, offset: i64) -> i64 {
    time_seed + index as i64 + offset
}
