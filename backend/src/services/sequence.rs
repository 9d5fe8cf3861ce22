//! Observance-sequence boundaries.
//!
//! A sequence is a run of consecutive days opened by candle lighting and
//! closed by havdalah. Festivals adjoining Shabbat form a single sequence.

use std::sync::Arc;

use chrono::{Datelike, Days, NaiveDate, NaiveDateTime, Timelike, Weekday};

use super::day_cache::DayCache;
use crate::api::{Action, CalendarDay, EventSequence, EventType};
use crate::calendar::{CalendarError, CalendarResult};

/// Days scanned ahead for a qualifying date before falling back to Friday.
pub const SEARCH_HORIZON_DAYS: u64 = 14;

/// Hour of the local day from which a Friday counts as already under way.
pub const FRIDAY_ROLLOVER_HOUR: u32 = 12;

fn add_days(date: NaiveDate, days: u64) -> CalendarResult<NaiveDate> {
    date.checked_add_days(Days::new(days))
        .ok_or(CalendarError::DateOutOfRange(date))
}

/// The coming Friday, or `date` itself when it is a Friday before noon of
/// `now`; from noon on, the following Friday.
pub fn next_friday(date: NaiveDate, now: NaiveDateTime) -> CalendarResult<NaiveDate> {
    let today = date.weekday().num_days_from_monday();
    let friday = Weekday::Fri.num_days_from_monday();
    let mut ahead = (friday + 7 - today) % 7;
    if ahead == 0 && now.hour() >= FRIDAY_ROLLOVER_HOUR {
        ahead = 7;
    }
    add_days(date, u64::from(ahead))
}

pub struct SequenceResolver {
    days: Arc<DayCache>,
    diaspora: bool,
}

impl SequenceResolver {
    pub fn new(days: Arc<DayCache>, diaspora: bool) -> Self {
        Self { days, diaspora }
    }

    pub fn diaspora(&self) -> bool {
        self.diaspora
    }

    fn day(&self, date: NaiveDate) -> CalendarResult<CalendarDay> {
        self.days.get(date, self.diaspora)
    }

    /// Full sequence around `trigger`, a date carrying Candles or Havdalah.
    ///
    /// Walks back over preceding Candles days, then forward until a day with
    /// Havdalah or a day followed by one without a qualifying action. Each
    /// day with an event replaces the recorded event, Yom Tov taking
    /// precedence over Shabbos on the same day.
    pub fn extend_sequence(&self, trigger: NaiveDate) -> CalendarResult<EventSequence> {
        let mut start = trigger;
        loop {
            let prev = start
                .pred_opt()
                .ok_or(CalendarError::DateOutOfRange(start))?;
            let day = self.day(prev)?;
            if !day.is_qualifying() || day.action == Action::Havdalah {
                break;
            }
            start = prev;
        }

        let mut end = trigger;
        let mut event_type = EventType::None;
        let mut event_name = None;
        let mut current = trigger;
        loop {
            let day = self.day(current)?;
            if !day.has_events() {
                break;
            }
            if let Some((kind, name)) = day.event() {
                event_type = kind;
                event_name = Some(name.to_string());
            }
            end = current;

            if day.action == Action::Havdalah {
                break;
            }
            let next = add_days(current, 1)?;
            if !self.day(next)?.is_qualifying() {
                break;
            }
            current = next;
        }

        log::debug!(
            "Sequence {}..{} ({}, {:?}) from trigger {}",
            start,
            end,
            event_type,
            event_name,
            trigger
        );

        Ok(EventSequence {
            start_date: start,
            end_date: end,
            event_type,
            event_name,
        })
    }

    /// First sequence at or after `start`.
    ///
    /// `now` is the caller's local time; it only matters for the Friday
    /// fallback when no qualifying date lies within the search horizon.
    pub fn find_next_sequence(
        &self,
        start: NaiveDate,
        now: NaiveDateTime,
    ) -> CalendarResult<EventSequence> {
        for offset in 0..SEARCH_HORIZON_DAYS {
            let date = add_days(start, offset)?;
            if self.day(date)?.is_qualifying() {
                return self.extend_sequence(date);
            }
        }

        let friday = next_friday(start, now)?;
        log::warn!(
            "No candle lighting or havdalah within {} days of {}, falling back to {}",
            SEARCH_HORIZON_DAYS,
            start,
            friday
        );
        self.extend_sequence(friday)
    }
}
