//! Memoized calendar-day classification.

use std::sync::Arc;

use chrono::NaiveDate;

use super::cache::{BoundedCache, CacheStats};
use crate::api::CalendarDay;
use crate::calendar::{CalendarOracle, CalendarResult};

/// Classification of days keyed by `(date, diaspora)`.
///
/// Within one cache lifetime the oracle is consulted at most once per key
/// (single-threaded use). Oracle failures are propagated and not stored.
pub struct DayCache {
    oracle: Arc<dyn CalendarOracle>,
    entries: BoundedCache<(NaiveDate, bool), CalendarDay>,
}

impl DayCache {
    pub fn new(oracle: Arc<dyn CalendarOracle>, capacity: usize) -> Self {
        Self {
            oracle,
            entries: BoundedCache::new(capacity),
        }
    }

    pub fn get(&self, date: NaiveDate, diaspora: bool) -> CalendarResult<CalendarDay> {
        self.entries.get_or_try_insert_with((date, diaspora), || {
            log::trace!("Classifying {} (diaspora={})", date, diaspora);
            self.oracle.classify(date, diaspora)
        })
    }

    pub fn oracle(&self) -> &Arc<dyn CalendarOracle> {
        &self.oracle
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
