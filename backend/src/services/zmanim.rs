//! Per-location candle-lighting and havdalah times.
//!
//! Candle lighting comes from the first day of a sequence and havdalah from
//! the last, so a festival running into Shabbat lights once and concludes
//! once. Oracle results are cached per `(date, diaspora, lat, lon, offset)`;
//! coordinates are keyed by their bit pattern.

use std::sync::Arc;

use chrono::NaiveDate;

use super::cache::{BoundedCache, CacheStats};
use crate::api::LocationZmanim;
use crate::calendar::{
    CalendarOracle, CalendarResult, DayZmanim, ZmanimLocation, DEFAULT_TZEIS_MINUTES,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
struct ZmanimKey {
    date: NaiveDate,
    diaspora: bool,
    latitude: u64,
    longitude: u64,
    candle_offset_minutes: u32,
}

pub struct ZmanimCalculator {
    oracle: Arc<dyn CalendarOracle>,
    entries: BoundedCache<ZmanimKey, DayZmanim>,
    tzeis_minutes: u32,
}

impl ZmanimCalculator {
    pub fn new(oracle: Arc<dyn CalendarOracle>, capacity: usize) -> Self {
        Self {
            oracle,
            entries: BoundedCache::new(capacity),
            tzeis_minutes: DEFAULT_TZEIS_MINUTES,
        }
    }

    /// Minutes after sunset used for the fixed havdalah fallback.
    pub fn with_tzeis_minutes(mut self, minutes: u32) -> Self {
        self.tzeis_minutes = minutes;
        self
    }

    /// Evening times of one date, cached.
    pub fn day_zmanim(
        &self,
        date: NaiveDate,
        diaspora: bool,
        latitude: f64,
        longitude: f64,
        candle_offset_minutes: u32,
    ) -> CalendarResult<DayZmanim> {
        let key = ZmanimKey {
            date,
            diaspora,
            latitude: latitude.to_bits(),
            longitude: longitude.to_bits(),
            candle_offset_minutes,
        };
        self.entries.get_or_try_insert_with(key, || {
            let location = ZmanimLocation::new(latitude, longitude, candle_offset_minutes)
                .with_tzeis_minutes(self.tzeis_minutes);
            self.oracle.zmanim(date, diaspora, &location)
        })
    }

    /// Candle time on `start`, havdalah on `end`.
    ///
    /// Havdalah uses the stars-visible time when the oracle provides one and
    /// falls back to the fixed minutes after sunset.
    pub fn compute(
        &self,
        latitude: f64,
        longitude: f64,
        start: NaiveDate,
        end: NaiveDate,
        diaspora: bool,
        candle_offset_minutes: u32,
    ) -> CalendarResult<LocationZmanim> {
        let first = self.day_zmanim(start, diaspora, latitude, longitude, candle_offset_minutes)?;
        let last = if end == start {
            first
        } else {
            self.day_zmanim(end, diaspora, latitude, longitude, candle_offset_minutes)?
        };

        Ok(LocationZmanim {
            candle_time: first.candle_time,
            havdalah_time: last.havdalah_time(),
        })
    }

    pub fn clear(&self) {
        self.entries.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn stats(&self) -> CacheStats {
        self.entries.stats()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calendar::HebrewCalendar;
    use crate::services::testing::CountingOracle;
    use proptest::prelude::*;

    const JERUSALEM: (f64, f64) = (31.779737, 35.209554);

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_candle_from_start_havdalah_from_end() {
        let calc = ZmanimCalculator::new(Arc::new(HebrewCalendar), 16);
        let (lat, lon) = JERUSALEM;
        let z = calc
            .compute(lat, lon, date(2024, 10, 2), date(2024, 10, 5), false, 40)
            .unwrap();

        let start = calc.day_zmanim(date(2024, 10, 2), false, lat, lon, 40).unwrap();
        let end = calc.day_zmanim(date(2024, 10, 5), false, lat, lon, 40).unwrap();
        assert_eq!(z.candle_time, start.candle_time);
        assert_eq!(z.havdalah_time, end.havdalah_stars_time);
        assert!(z.candle_time.unwrap() < z.havdalah_time.unwrap());
    }

    #[test]
    fn test_results_cached_on_primitive_fields() {
        let oracle = Arc::new(CountingOracle::new(HebrewCalendar));
        let calc = ZmanimCalculator::new(oracle.clone(), 16);
        let (lat, lon) = JERUSALEM;

        calc.compute(lat, lon, date(2025, 1, 24), date(2025, 1, 25), false, 40)
            .unwrap();
        calc.compute(lat, lon, date(2025, 1, 24), date(2025, 1, 25), false, 40)
            .unwrap();
        assert_eq!(oracle.zmanim_calls(), 2);

        // A different offset is a different key
        calc.compute(lat, lon, date(2025, 1, 24), date(2025, 1, 25), false, 20)
            .unwrap();
        assert_eq!(oracle.zmanim_calls(), 4);

        calc.clear();
        assert!(calc.is_empty());
    }

    #[test]
    fn test_single_day_sequence_queries_once() {
        let oracle = Arc::new(CountingOracle::new(HebrewCalendar));
        let calc = ZmanimCalculator::new(oracle.clone(), 16);
        let d = date(2025, 1, 24);
        calc.compute(JERUSALEM.0, JERUSALEM.1, d, d, false, 40).unwrap();
        assert_eq!(oracle.zmanim_calls(), 1);
    }

    #[test]
    fn test_fixed_minutes_fallback() {
        // No stars-visible time at Stockholm midsummer
        let calc = ZmanimCalculator::new(Arc::new(HebrewCalendar), 16);
        let z = calc
            .compute(59.33, 18.07, date(2025, 6, 20), date(2025, 6, 21), false, 18)
            .unwrap();
        let end = calc.day_zmanim(date(2025, 6, 21), false, 59.33, 18.07, 18).unwrap();
        assert!(end.havdalah_stars_time.is_none());
        assert_eq!(z.havdalah_time, end.havdalah_fixed_minutes_time);
    }

    #[test]
    fn test_invalid_location_propagates() {
        let calc = ZmanimCalculator::new(Arc::new(HebrewCalendar), 16);
        let d = date(2025, 1, 24);
        assert!(calc.compute(100.0, 0.0, d, d, false, 20).is_err());
    }

    proptest! {
        #[test]
        fn prop_larger_offset_never_lights_later(
            day in 0i64..730,
            lat in -60.0f64..60.0,
            lon in -179.0f64..179.0,
            a in 0u32..90,
            b in 0u32..90,
        ) {
            let calc = ZmanimCalculator::new(Arc::new(HebrewCalendar), 8);
            let d = date(2024, 1, 1) + chrono::Duration::days(day);
            let (small, large) = if a <= b { (a, b) } else { (b, a) };
            let early = calc.compute(lat, lon, d, d, false, large).unwrap();
            let late = calc.compute(lat, lon, d, d, false, small).unwrap();
            prop_assert!(early.candle_time.unwrap() <= late.candle_time.unwrap());
        }
    }
}
