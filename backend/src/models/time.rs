use chrono::{DateTime, Datelike, NaiveDate, Utc};
use serde::*;

/// Julian Date of the Unix epoch (1970-01-01 00:00:00 UTC).
const UNIX_EPOCH_JD: f64 = 2_440_587.5;

/// Julian Date of 0001-01-01 00:00:00 UTC minus one day, so that
/// `RD + RATA_DIE_JD_OFFSET` is the Julian Date at midnight of that day.
const RATA_DIE_JD_OFFSET: f64 = 1_721_424.5;

/// Julian Date of the J2000.0 epoch (2000-01-01 12:00 TT, treated as UTC).
pub const J2000: f64 = 2_451_545.0;

/// Julian Date representation.
/// JD 0 = -4712-01-01 12:00:00 (proleptic Julian calendar)
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize, Deserialize)]
pub struct JulianDay(qtty::Days);

impl JulianDay {
    /// Create a new JD value.
    pub fn new<V: Into<qtty::Days>>(v: V) -> Self {
        Self(v.into())
    }

    /// Raw JD value as f64.
    pub fn value(&self) -> f64 {
        self.0.value()
    }

    /// Julian Date at 00:00 UTC of a civil date.
    pub fn at_midnight(date: NaiveDate) -> Self {
        Self::new(date.num_days_from_ce() as f64 + RATA_DIE_JD_OFFSET)
    }

    /// Days elapsed since J2000.0.
    pub fn since_j2000(&self) -> f64 {
        self.value() - J2000
    }

    /// Convert to Unix timestamp (seconds since 1970-01-01 00:00:00 UTC).
    pub fn to_unix_timestamp(&self) -> f64 {
        (self.value() - UNIX_EPOCH_JD) * 86400.0
    }

    /// Create from Unix timestamp (seconds since 1970-01-01 00:00:00 UTC).
    pub fn from_unix_timestamp(timestamp: f64) -> Self {
        Self::new(timestamp / 86400.0 + UNIX_EPOCH_JD)
    }

    /// Convert to chrono DateTime<Utc>, rounded to the nearest second.
    ///
    /// Returns `None` when the value is not representable.
    pub fn to_datetime(&self) -> Option<DateTime<Utc>> {
        let secs = self.to_unix_timestamp();
        if !secs.is_finite() {
            return None;
        }
        DateTime::from_timestamp(secs.round() as i64, 0)
    }

    /// Create from chrono DateTime<Utc>.
    pub fn from_datetime(dt: DateTime<Utc>) -> Self {
        Self::from_unix_timestamp(dt.timestamp() as f64 + dt.timestamp_subsec_nanos() as f64 / 1e9)
    }
}

impl From<f64> for JulianDay {
    fn from(v: f64) -> Self {
        JulianDay::new(v)
    }
}
