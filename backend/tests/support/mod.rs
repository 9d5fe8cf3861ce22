#![allow(dead_code)]

use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use chrono::{Datelike, NaiveDate, NaiveDateTime, TimeZone, Utc, Weekday};

use shabbat_times::api::{Action, CalendarDay, City};
use shabbat_times::calendar::{CalendarOracle, CalendarResult, DayZmanim, ZmanimLocation};

static ENV_LOCK: Mutex<()> = Mutex::new(());

/// Runs `f` with environment variables temporarily modified.
///
/// Restores the previous values on unwind and serializes access to the
/// process environment, since tests run in parallel.
///
/// `changes` is a list of `(key, value)` pairs:
/// - `Some(v)` sets the variable to `v`
/// - `None` removes the variable
pub fn with_scoped_env<F, R>(changes: &[(&str, Option<&str>)], f: F) -> R
where
    F: FnOnce() -> R,
{
    let _lock = ENV_LOCK.lock().unwrap_or_else(|e| e.into_inner());
    let _guard = ScopedEnv::new(changes);
    f()
}

struct ScopedEnv {
    snapshot: Vec<(String, Option<String>)>,
}

impl ScopedEnv {
    fn new(changes: &[(&str, Option<&str>)]) -> Self {
        let keys: HashSet<&str> = changes.iter().map(|(k, _)| *k).collect();
        let snapshot = keys
            .into_iter()
            .map(|k| (k.to_string(), std::env::var(k).ok()))
            .collect::<Vec<_>>();

        for (k, v) in changes {
            match v {
                Some(val) => std::env::set_var(k, val),
                None => std::env::remove_var(k),
            }
        }

        Self { snapshot }
    }
}

impl Drop for ScopedEnv {
    fn drop(&mut self) {
        for (k, v) in self.snapshot.drain(..) {
            match v {
                Some(val) => std::env::set_var(&k, val),
                None => std::env::remove_var(&k),
            }
        }
    }
}

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

pub fn at(d: NaiveDate, hour: u32) -> NaiveDateTime {
    d.and_hms_opt(hour, 0, 0).unwrap()
}

pub fn jerusalem() -> City {
    City::new("ירושלים", 31.779737, 35.209554, 40).unwrap()
}

pub fn tel_aviv() -> City {
    City::new("תל אביב -יפו", 32.079112, 34.777326, 20).unwrap()
}

/// Oracle answering from a fixed table of days.
///
/// Dates missing from the table are plain weekdays, or Erev Shabbos /
/// Shabbos without actions on Fridays and Saturdays when `weekly_names` is
/// set. Every evening has sunset at 16:00 UTC.
#[derive(Default)]
pub struct ScriptedOracle {
    days: HashMap<NaiveDate, CalendarDay>,
    weekly_names: bool,
    classify_calls: AtomicUsize,
}

impl ScriptedOracle {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_weekly_names(mut self) -> Self {
        self.weekly_names = true;
        self
    }

    pub fn day(
        mut self,
        date: NaiveDate,
        action: Action,
        shabbos_name: Option<&str>,
        yomtov_name: Option<&str>,
    ) -> Self {
        self.days.insert(
            date,
            CalendarDay {
                date,
                action,
                shabbos_name: shabbos_name.map(str::to_string),
                yomtov_name: yomtov_name.map(str::to_string),
            },
        );
        self
    }

    pub fn classify_calls(&self) -> usize {
        self.classify_calls.load(Ordering::SeqCst)
    }
}

impl CalendarOracle for ScriptedOracle {
    fn classify(&self, date: NaiveDate, _diaspora: bool) -> CalendarResult<CalendarDay> {
        self.classify_calls.fetch_add(1, Ordering::SeqCst);
        if let Some(day) = self.days.get(&date) {
            return Ok(day.clone());
        }
        let mut day = CalendarDay::plain(date);
        if self.weekly_names {
            day.shabbos_name = match date.weekday() {
                Weekday::Fri => Some("Erev Shabbos".to_string()),
                Weekday::Sat => Some("Shabbos".to_string()),
                _ => None,
            };
        }
        Ok(day)
    }

    fn zmanim(
        &self,
        date: NaiveDate,
        _diaspora: bool,
        location: &ZmanimLocation,
    ) -> CalendarResult<DayZmanim> {
        let sunset = Utc
            .with_ymd_and_hms(date.year(), date.month(), date.day(), 16, 0, 0)
            .single();
        let shift = |minutes: i64| sunset.map(|s| s + chrono::Duration::minutes(minutes));
        Ok(DayZmanim {
            sunset,
            candle_time: shift(-(location.candle_offset_minutes as i64)),
            havdalah_stars_time: shift(35),
            havdalah_fixed_minutes_time: shift(location.tzeis_minutes as i64),
        })
    }
}
