//! Rounding and aggregation helpers shared by the generators and the
//! downstream scorers.

/// Rounds to the nearest integer with halves going towards positive
/// infinity (`2.5 -> 3`, `-2.5 -> -2`).
#[must_use]
pub fn round_half_up(value: f64) -> f64 {
    let floor = value.floor();
    if value - floor >= 0.5 {
        floor + 1.0
    } else {
        floor
    }
}

/// Rounds half-up and converts to a non-negative count.
///
/// Negative and NaN inputs become `0`; values beyond `u32::MAX` saturate.
#[must_use]
#[allow(
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    clippy::cast_precision_loss
)]
pub fn to_count(value: f64) -> u32 {
    let rounded = round_half_up(value);
    if rounded.is_nan() || rounded <= 0.0 {
        0
    } else if rounded >= u32::MAX as f64 {
        u32::MAX
    } else {
        rounded as u32
    }
}

/// Truncates towards negative infinity and converts to a count.
#[must_use]
#[allow(
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    clippy::cast_precision_loss
)]
pub fn floor_count(value: f64) -> u32 {
    let floored = value.floor();
    if floored.is_nan() || floored <= 0.0 {
        0
    } else if floored >= u32::MAX as f64 {
        u32::MAX
    } else {
        floored as u32
    }
}

/// Arithmetic mean, `0.0` for an empty input.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn mean<I>(values: I) -> f64
where
    I: IntoIterator<Item = f64>,
{
    let (sum, n) = values
        .into_iter()
        .fold((0.0, 0usize), |(sum, n), v| (sum + v, n + 1));
    if n == 0 { 0.0 } else { sum / n as f64 }
}

/// Sums a `u32` field without overflow.
#[must_use]
pub fn total<I>(values: I) -> u64
where
    I: IntoIterator<Item = u32>,
{
    values.into_iter().map(u64::from).sum()
}

/// `numerator / denominator`, or `fallback` when the denominator is zero.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn ratio_or(numerator: u64, denominator: u64, fallback: f64) -> f64 {
    if denominator == 0 {
        fallback
    } else {
        numerator as f64 / denominator as f64
    }
}

/// Clamps a score into `[0, 100]`, mapping NaN to `0`.
#[must_use]
pub fn clamp_percent(value: f64) -> f64 {
    if value.is_nan() {
        0.0
    } else {
        value.clamp(0.0, 100.0)
    }
}
