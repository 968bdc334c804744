//! US EPA PM2.5 to AQI conversion.
//!
//! Used when Open-Meteo does not return a `us_aqi` value for a grid cell.
//! See <https://www.airnow.gov/sites/default/files/2020-05/aqi-technical-assistance-document-sept2018.pdf>

/// `(concentration low, concentration high, index low, index high)`.
const PM25_BREAKPOINTS: [(f64, f64, f64, f64); 7] = [
    (0.0, 12.0, 0.0, 50.0),
    (12.1, 35.4, 51.0, 100.0),
    (35.5, 55.4, 101.0, 150.0),
    (55.5, 150.4, 151.0, 200.0),
    (150.5, 250.4, 201.0, 300.0),
    (250.5, 350.4, 301.0, 400.0),
    (350.5, 500.4, 401.0, 500.0),
];

/// Highest index the breakpoint table produces.
pub const MAX_AQI: u32 = 500;

/// Converts a PM2.5 concentration in µg/m³ to an AQI.
///
/// The concentration is truncated to one decimal before the lookup, as the
/// EPA method requires, so values between two bands (e.g. 12.05) fall into
/// the lower one. Concentrations above the table saturate at [`MAX_AQI`];
/// negative or non-finite input gives 0.
#[must_use]
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub fn calculate_aqi(pm25: f64) -> u32 {
    if !pm25.is_finite() || pm25 < 0.0 {
        return 0;
    }
    let truncated = (pm25.mul_add(10.0, 1e-9)).floor() / 10.0;

    for (bp_lo, bp_hi, aqi_lo, aqi_hi) in PM25_BREAKPOINTS {
        if truncated >= bp_lo && truncated <= bp_hi {
            let aqi = ((aqi_hi - aqi_lo) / (bp_hi - bp_lo)).mul_add(truncated - bp_lo, aqi_lo);
            return aqi.round() as u32;
        }
    }

    MAX_AQI
}
