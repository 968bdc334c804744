//! Deterministic pseudo-random values for synthetic metrics.
//!
//! Generators never draw entropy. Every "random" term is looked up by an
//! integer seed derived from the time window, the zone's position and a
//! per-field offset, so the same window always produces the same data.
//! This is presentation-grade noise and must not be used for anything
//! security sensitive.

/// A reproducible mapping from an integer seed to a value in `[0, 1)`.
pub trait RandomSource: Send + Sync {
    /// Returns the value for `seed`. Must be a pure function of `seed`.
    fn sample(&self, seed: i64) -> f64;
}

/// The default source: `fract(sin(seed) * 10000)`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TrigHash;

impl RandomSource for TrigHash {
    fn sample(&self, seed: i64) -> f64 {
        seeded_random(seed)
    }
}

/// Trigonometric hash of `seed` into `[0, 1)`.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn seeded_random(seed: i64) -> f64 {
    let x = (seed as f64).sin() * 10_000.0;
    let frac = x - x.floor();
    // A tiny negative `x` makes `x - floor(x)` round up to exactly 1.0.
    if frac >= 1.0 { 0.0 } else { frac }
}
