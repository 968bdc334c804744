//! Time-of-day context shared by all domain generators.
//!
//! A [`TimeContext`] is resolved once per request from a timestamp in the
//! city's local time. Every generator reads the same context, so all five
//! domains agree on which 10-minute window and which peak periods apply.

use chrono::{DateTime, Datelike, FixedOffset, TimeZone, Timelike, Utc};

/// Wall-clock facts derived from a single timestamp.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeContext {
    timestamp: DateTime<Utc>,
    hour: u32,
    minute: u32,
    month: u32,
}

impl TimeContext {
    /// Resolves the context for `at`, reading hour, minute and month in
    /// `at`'s own time zone.
    #[must_use]
    pub fn at<Tz: TimeZone>(at: &DateTime<Tz>) -> Self {
        Self {
            timestamp: at.with_timezone(&Utc),
            hour: at.hour(),
            minute: at.minute(),
            month: at.month(),
        }
    }

    /// Resolves the context for a UTC instant viewed at `offset`.
    #[must_use]
    pub fn at_offset(at: DateTime<Utc>, offset: FixedOffset) -> Self {
        Self::at(&at.with_timezone(&offset))
    }

    /// Resolves the context for the current wall-clock time at `offset`.
    #[must_use]
    pub fn now(offset: FixedOffset) -> Self {
        Self::at_offset(Utc::now(), offset)
    }

    /// The instant this context was resolved from.
    #[must_use]
    pub const fn timestamp(&self) -> DateTime<Utc> {
        self.timestamp
    }

    /// Local hour, 0-23.
    #[must_use]
    pub const fn hour(&self) -> u32 {
        self.hour
    }

    /// Local minute, 0-59.
    #[must_use]
    pub const fn minute(&self) -> u32 {
        self.minute
    }

    /// Local month, 1-12.
    #[must_use]
    pub const fn month(&self) -> u32 {
        self.month
    }

    /// `hour * 100 + minute / 10`: constant within a 10-minute window.
    #[must_use]
    pub fn seed(&self) -> i64 {
        i64::from(self.hour * 100 + self.minute / 10)
    }

    /// Traffic rush hours, 08:00-10:59 and 17:00-20:59.
    #[must_use]
    pub const fn is_traffic_peak(&self) -> bool {
        matches!(self.hour, 8..=10 | 17..=20)
    }

    /// Low traffic overnight, 23:00-05:59.
    #[must_use]
    pub const fn is_traffic_night(&self) -> bool {
        self.hour >= 23 || self.hour <= 5
    }

    /// Daytime grid load window, 10:00-22:59.
    #[must_use]
    pub const fn is_power_peak_load(&self) -> bool {
        matches!(self.hour, 10..=22)
    }

    /// April through September.
    #[must_use]
    pub const fn is_summer(&self) -> bool {
        matches!(self.month, 4..=9)
    }

    /// Household water peaks, 06:00-09:59 and 18:00-21:59.
    #[must_use]
    pub const fn is_water_peak_usage(&self) -> bool {
        matches!(self.hour, 6..=9 | 18..=21)
    }

    /// Elevated emergency call volume, 20:00-02:59.
    #[must_use]
    pub const fn is_high_call_hour(&self) -> bool {
        self.hour >= 20 || self.hour <= 2
    }

    /// Elevated crime risk, 20:00-04:59.
    #[must_use]
    pub const fn is_high_risk_hour(&self) -> bool {
        self.hour >= 20 || self.hour <= 4
    }
}
