//! Weekly Torah-portion resolution.
//!
//! 1. Days of Simchat Tora, Hoshana Rabba or Chol HaMoed read Vezot
//!    Haberakhah without consulting the source.
//! 2. Otherwise the Saturday of the week is looked up in the source's
//!    entries for that year: exact date first, then the closest earlier
//!    entry.
//!
//! Source failures never surface: they are logged, remembered for the year
//! and yield no parsha.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::{Datelike, Days, NaiveDate, Weekday};
use parking_lot::RwLock;

use super::day_cache::DayCache;
use crate::api::{ParshaAssignment, ParshaOrigin};
use crate::calendar::{CalendarError, CalendarResult};
use crate::portions::{PortionEntry, PortionSource};
use crate::translations::translate_parsha;

/// Festival name fragments that read Vezot Haberakhah.
pub const VEZOT_HABERAKHAH_DAYS: &[&str] =
    &["Simchat Tora", "Simchas Tora", "Hoshana Rabba", "Chol HaMoed"];

pub const VEZOT_HABERAKHAH_TITLE: &str = "Vezot Haberakhah";
pub const VEZOT_HABERAKHAH_DISPLAY: &str = "פרשת וזאת הברכה";

/// Saturday of the week containing `date`; a Saturday maps to itself.
pub fn saturday_for_date(date: NaiveDate) -> CalendarResult<NaiveDate> {
    let today = date.weekday().num_days_from_monday();
    let saturday = Weekday::Sat.num_days_from_monday();
    let ahead = (saturday + 7 - today) % 7;
    date.checked_add_days(Days::new(u64::from(ahead)))
        .ok_or(CalendarError::DateOutOfRange(date))
}

/// Whether a festival name reads Vezot Haberakhah.
pub fn reads_vezot_haberakhah(yomtov_name: &str) -> bool {
    VEZOT_HABERAKHAH_DAYS
        .iter()
        .any(|fragment| yomtov_name.contains(fragment))
}

/// Source entries per Gregorian year.
///
/// Failed fetches are remembered as `None` so a year is fetched at most
/// once per cache lifetime.
#[derive(Debug, Default)]
pub struct YearPortionCache {
    years: RwLock<HashMap<i32, Option<Arc<Vec<PortionEntry>>>>>,
}

impl YearPortionCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Entries for `year`, fetching from `source` on first use.
    pub fn get_or_fetch(
        &self,
        year: i32,
        source: &dyn PortionSource,
    ) -> Option<Arc<Vec<PortionEntry>>> {
        if let Some(cached) = self.years.read().get(&year) {
            return cached.clone();
        }

        let fetched = match source.fetch_year(year) {
            Ok(entries) => {
                log::debug!("Loaded {} portion entries for {}", entries.len(), year);
                Some(Arc::new(entries))
            }
            Err(e) if e.is_retryable() => {
                log::warn!(
                    "Transient failure fetching portion data for {}, not retried until cleared: {}",
                    year,
                    e
                );
                None
            }
            Err(e) => {
                log::warn!("Could not fetch portion data for year {}: {}", year, e);
                None
            }
        };

        self.years
            .write()
            .entry(year)
            .or_insert(fetched)
            .clone()
    }

    pub fn contains(&self, year: i32) -> bool {
        self.years.read().contains_key(&year)
    }

    pub fn clear(&self) {
        self.years.write().clear();
    }

    pub fn len(&self) -> usize {
        self.years.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.years.read().is_empty()
    }
}

/// Weekly portion entry for `saturday`: exact date, else the latest entry
/// before it.
pub fn select_entry(
    entries: &[PortionEntry],
    saturday: NaiveDate,
) -> Option<(&PortionEntry, ParshaOrigin)> {
    let weekly = || entries.iter().filter(|e| e.is_parashat());

    if let Some(exact) = weekly().find(|e| e.date == saturday) {
        return Some((exact, ParshaOrigin::Exact));
    }
    weekly()
        .filter(|e| e.date <= saturday)
        .max_by_key(|e| e.date)
        .map(|e| (e, ParshaOrigin::NearestPrior))
}

pub struct ParshaResolver {
    days: Arc<DayCache>,
    source: Arc<dyn PortionSource>,
    years: YearPortionCache,
    diaspora: bool,
}

impl ParshaResolver {
    pub fn new(days: Arc<DayCache>, source: Arc<dyn PortionSource>, diaspora: bool) -> Self {
        Self {
            days,
            source,
            years: YearPortionCache::new(),
            diaspora,
        }
    }

    /// Portion read in the week of `date`.
    ///
    /// Only calendar failures are errors; a missing or failing source
    /// yields `Ok(None)`.
    pub fn resolve(&self, date: NaiveDate) -> CalendarResult<Option<ParshaAssignment>> {
        let saturday = saturday_for_date(date)?;

        let day = self.days.get(date, self.diaspora)?;
        if day.yomtov_name.as_deref().is_some_and(reads_vezot_haberakhah) {
            return Ok(Some(ParshaAssignment {
                saturday,
                title: Some(VEZOT_HABERAKHAH_TITLE.to_string()),
                display: VEZOT_HABERAKHAH_DISPLAY.to_string(),
                origin: ParshaOrigin::Festival,
            }));
        }

        let Some(entries) = self.years.get_or_fetch(saturday.year(), self.source.as_ref()) else {
            return Ok(None);
        };

        let assignment = select_entry(&entries, saturday).map(|(entry, origin)| {
            if origin == ParshaOrigin::NearestPrior {
                log::debug!(
                    "No portion dated {}, using {} from {}",
                    saturday,
                    entry.title,
                    entry.date
                );
            }
            ParshaAssignment {
                saturday,
                title: Some(entry.title.clone()),
                display: translate_parsha(&entry.title),
                origin,
            }
        });

        if assignment.is_none() {
            log::debug!("No portion on or before {}", saturday);
        }
        Ok(assignment)
    }

    /// Hebrew display string (`פרשת ...`) for the week of `date`.
    pub fn display(&self, date: NaiveDate) -> CalendarResult<Option<String>> {
        Ok(self.resolve(date)?.map(|a| a.display))
    }

    pub fn years(&self) -> &YearPortionCache {
        &self.years
    }

    pub fn clear(&self) {
        self.years.clear();
    }
}

impl std::fmt::Debug for ParshaResolver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ParshaResolver")
            .field("years", &self.years)
            .field("diaspora", &self.diaspora)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calendar::HebrewCalendar;
    use crate::portions::LocalPortionSource;
    use crate::translations::PARSHA_PREFIX;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn resolver(source: Arc<LocalPortionSource>) -> ParshaResolver {
        let days = Arc::new(DayCache::new(Arc::new(HebrewCalendar), 64));
        ParshaResolver::new(days, source, false)
    }

    fn winter_2025() -> Arc<LocalPortionSource> {
        Arc::new(LocalPortionSource::with_entries(vec![
            PortionEntry::parashat(date(2025, 1, 18), "Parashat Shemot"),
            PortionEntry::parashat(date(2025, 1, 25), "Parashat Vaera"),
            PortionEntry::new(date(2025, 1, 24), "candles", "Candle lighting: 16:23"),
            PortionEntry::parashat(date(2025, 2, 8), "Parashat Beshalach"),
        ]))
    }

    #[test]
    fn test_saturday_for_date() {
        assert_eq!(saturday_for_date(date(2025, 1, 25)).unwrap(), date(2025, 1, 25));
        assert_eq!(saturday_for_date(date(2025, 1, 24)).unwrap(), date(2025, 1, 25));
        assert_eq!(saturday_for_date(date(2025, 1, 26)).unwrap(), date(2025, 2, 1));
        assert_eq!(saturday_for_date(date(2025, 1, 20)).unwrap(), date(2025, 1, 25));
    }

    #[test]
    fn test_exact_match() {
        let source = winter_2025();
        let parsha = resolver(source.clone())
            .resolve(date(2025, 1, 24))
            .unwrap()
            .unwrap();
        assert_eq!(parsha.saturday, date(2025, 1, 25));
        assert_eq!(parsha.display, "פרשת וארא");
        assert_eq!(parsha.title.as_deref(), Some("Parashat Vaera"));
        assert_eq!(parsha.origin, ParshaOrigin::Exact);
    }

    #[test]
    fn test_nearest_prior_entry() {
        let parsha = resolver(winter_2025())
            .resolve(date(2025, 2, 1))
            .unwrap()
            .unwrap();
        assert_eq!(parsha.display, "פרשת וארא");
        assert_eq!(parsha.origin, ParshaOrigin::NearestPrior);
    }

    #[test]
    fn test_no_entry_before_saturday() {
        let parsha = resolver(winter_2025()).resolve(date(2025, 1, 6)).unwrap();
        assert!(parsha.is_none());
    }

    #[test]
    fn test_year_fetched_once() {
        let source = winter_2025();
        let resolver = resolver(source.clone());
        resolver.resolve(date(2025, 1, 24)).unwrap();
        resolver.resolve(date(2025, 2, 5)).unwrap();
        assert_eq!(source.fetch_count(), 1);
        assert!(resolver.years().contains(2025));

        resolver.clear();
        resolver.resolve(date(2025, 1, 24)).unwrap();
        assert_eq!(source.fetch_count(), 2);
    }

    #[test]
    fn test_failure_is_cached() {
        let source = Arc::new(LocalPortionSource::new());
        source.fail_year(2025);
        let resolver = resolver(source.clone());

        assert_eq!(resolver.resolve(date(2025, 1, 24)).unwrap(), None);
        assert_eq!(resolver.resolve(date(2025, 1, 31)).unwrap(), None);
        assert_eq!(source.fetch_count(), 1);
    }

    #[test]
    fn test_transient_and_permanent_failures_are_cached() {
        let source = LocalPortionSource::new();
        source.fail_year(2025);
        let years = YearPortionCache::new();

        // Timeout: retryable
        assert!(source.fetch_year(2025).unwrap_err().is_retryable());
        assert!(years.get_or_fetch(2025, &source).is_none());
        // Missing year: not retryable
        assert!(!source.fetch_year(2026).unwrap_err().is_retryable());
        assert!(years.get_or_fetch(2026, &source).is_none());

        assert!(years.contains(2025) && years.contains(2026));
        assert!(years.get_or_fetch(2025, &source).is_none());
        assert!(years.get_or_fetch(2026, &source).is_none());
        assert_eq!(source.fetch_count(), 4);
    }

    #[test]
    fn test_festival_reading_skips_source() {
        let source = Arc::new(LocalPortionSource::new());
        let resolver = resolver(source.clone());

        // Hoshana Rabba, Shmini Atzeret / Simchat Tora and Chol HaMoed 5785
        for d in [date(2024, 10, 23), date(2024, 10, 24), date(2024, 10, 20)] {
            let parsha = resolver.resolve(d).unwrap().unwrap();
            assert_eq!(parsha.display, VEZOT_HABERAKHAH_DISPLAY);
            assert_eq!(parsha.origin, ParshaOrigin::Festival);
        }
        assert_eq!(source.fetch_count(), 0);
    }

    #[test]
    fn test_reads_vezot_haberakhah() {
        assert!(reads_vezot_haberakhah("Shmini Atzeret / Simchat Tora"));
        assert!(reads_vezot_haberakhah("Simchas Torah"));
        assert!(reads_vezot_haberakhah("Chol HaMoed 2 (Pesach 4)"));
        assert!(!reads_vezot_haberakhah("Shmini Atzeret"));
        assert!(!reads_vezot_haberakhah("Pesach 7"));
    }

    #[test]
    fn test_display_prefix() {
        assert!(VEZOT_HABERAKHAH_DISPLAY.starts_with(PARSHA_PREFIX));
    }
}
