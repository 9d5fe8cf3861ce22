//! Calendar day oracle.
//!
//! The resolver only talks to the calendar through [`CalendarOracle`], which
//! classifies one Gregorian date and computes the evening times for one
//! location. [`HebrewCalendar`] is the built-in implementation: arithmetic
//! Hebrew calendar, festival table for Israel and diaspora customs, and
//! sunrise-equation solar times.

pub mod error;
pub mod hebrew_date;
pub mod holidays;
pub mod solar;

pub use error::{CalendarError, CalendarResult};
pub use hebrew_date::HebrewDate;

use chrono::{DateTime, Datelike, NaiveDate, Utc};
use qtty::{Day, Degrees, Minutes};
use serde::{Deserialize, Serialize};

use crate::api::CalendarDay;
use crate::models::JulianDay;

/// Default minutes after sunset for the fixed-minutes havdalah.
pub const DEFAULT_TZEIS_MINUTES: u32 = 42;

/// Observer parameters for a zmanim computation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ZmanimLocation {
    pub latitude: f64,
    pub longitude: f64,
    /// Minutes before sunset for candle lighting
    pub candle_offset_minutes: u32,
    /// Minutes after sunset for the fixed-minutes havdalah
    pub tzeis_minutes: u32,
}

impl ZmanimLocation {
    pub fn new(latitude: f64, longitude: f64, candle_offset_minutes: u32) -> Self {
        Self {
            latitude,
            longitude,
            candle_offset_minutes,
            tzeis_minutes: DEFAULT_TZEIS_MINUTES,
        }
    }

    pub fn with_tzeis_minutes(mut self, minutes: u32) -> Self {
        self.tzeis_minutes = minutes;
        self
    }

    fn validate(&self) -> CalendarResult<()> {
        let lat_ok = self.latitude.is_finite() && (-90.0..=90.0).contains(&self.latitude);
        let lon_ok = self.longitude.is_finite() && (-180.0..=180.0).contains(&self.longitude);
        if lat_ok && lon_ok {
            Ok(())
        } else {
            Err(CalendarError::InvalidLocation {
                latitude: self.latitude,
                longitude: self.longitude,
            })
        }
    }
}

/// Evening times of one date at one location.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct DayZmanim {
    pub sunset: Option<DateTime<Utc>>,
    pub candle_time: Option<DateTime<Utc>>,
    pub havdalah_stars_time: Option<DateTime<Utc>>,
    pub havdalah_fixed_minutes_time: Option<DateTime<Utc>>,
}

impl DayZmanim {
    /// Havdalah time, stars-visible first, fixed minutes otherwise.
    pub fn havdalah_time(&self) -> Option<DateTime<Utc>> {
        self.havdalah_stars_time
            .or(self.havdalah_fixed_minutes_time)
    }
}

/// Source of per-date calendar facts.
pub trait CalendarOracle: Send + Sync {
    /// Classify one Gregorian date.
    fn classify(&self, date: NaiveDate, diaspora: bool) -> CalendarResult<CalendarDay>;

    /// Evening times of `date` at `location`.
    fn zmanim(
        &self,
        date: NaiveDate,
        diaspora: bool,
        location: &ZmanimLocation,
    ) -> CalendarResult<DayZmanim>;
}

/// Built-in calendar: arithmetic Hebrew calendar plus solar times.
#[derive(Debug, Clone, Copy, Default)]
pub struct HebrewCalendar;

impl HebrewCalendar {
    pub fn new() -> Self {
        Self
    }
}

fn shift(jd: JulianDay, minutes: f64) -> JulianDay {
    JulianDay::new(jd.value() + Minutes::new(minutes).to::<Day>().value())
}

impl CalendarOracle for HebrewCalendar {
    fn classify(&self, date: NaiveDate, diaspora: bool) -> CalendarResult<CalendarDay> {
        holidays::classify(date, diaspora)
    }

    fn zmanim(
        &self,
        date: NaiveDate,
        _diaspora: bool,
        location: &ZmanimLocation,
    ) -> CalendarResult<DayZmanim> {
        if !(1..=9999).contains(&date.year()) {
            return Err(CalendarError::DateOutOfRange(date));
        }
        location.validate()?;

        let lat = Degrees::new(location.latitude);
        let lon = Degrees::new(location.longitude);
        let sunset = solar::sunset(date, lat, lon);
        let stars = solar::stars_visible(date, lat, lon);

        let candle = sunset.map(|jd| shift(jd, -(location.candle_offset_minutes as f64)));
        let fixed = sunset.map(|jd| shift(jd, location.tzeis_minutes as f64));

        Ok(DayZmanim {
            sunset: sunset.and_then(|jd| jd.to_datetime()),
            candle_time: candle.and_then(|jd| jd.to_datetime()),
            havdalah_stars_time: stars.and_then(|jd| jd.to_datetime()),
            havdalah_fixed_minutes_time: fixed.and_then(|jd| jd.to_datetime()),
        })
    }
}
