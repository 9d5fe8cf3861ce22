//! Oracle doubles for unit tests.

use std::sync::atomic::{AtomicUsize, Ordering};

use chrono::NaiveDate;

use crate::api::CalendarDay;
use crate::calendar::{CalendarOracle, CalendarResult, DayZmanim, ZmanimLocation};

/// Wraps an oracle and counts calls.
pub struct CountingOracle<O> {
    inner: O,
    classify: AtomicUsize,
    zmanim: AtomicUsize,
}

impl<O: CalendarOracle> CountingOracle<O> {
    pub fn new(inner: O) -> Self {
        Self {
            inner,
            classify: AtomicUsize::new(0),
            zmanim: AtomicUsize::new(0),
        }
    }

    pub fn classify_calls(&self) -> usize {
        self.classify.load(Ordering::SeqCst)
    }

    pub fn zmanim_calls(&self) -> usize {
        self.zmanim.load(Ordering::SeqCst)
    }
}

impl<O: CalendarOracle> CalendarOracle for CountingOracle<O> {
    fn classify(&self, date: NaiveDate, diaspora: bool) -> CalendarResult<CalendarDay> {
        self.classify.fetch_add(1, Ordering::SeqCst);
        self.inner.classify(date, diaspora)
    }

    fn zmanim(
        &self,
        date: NaiveDate,
        diaspora: bool,
        location: &ZmanimLocation,
    ) -> CalendarResult<DayZmanim> {
        self.zmanim.fetch_add(1, Ordering::SeqCst);
        self.inner.zmanim(date, diaspora, location)
    }
}

/// A calendar without any events.
pub struct EmptyOracle;

impl CalendarOracle for EmptyOracle {
    fn classify(&self, date: NaiveDate, _diaspora: bool) -> CalendarResult<CalendarDay> {
        Ok(CalendarDay::plain(date))
    }

    fn zmanim(
        &self,
        _date: NaiveDate,
        _diaspora: bool,
        _location: &ZmanimLocation,
    ) -> CalendarResult<DayZmanim> {
        Ok(DayZmanim::default())
    }
}
