//! Week resolution: one sequence, one shared descriptor, one row per city.

use std::sync::Arc;

use chrono::{NaiveDate, NaiveDateTime};

use super::cache::CacheStats;
use super::day_cache::DayCache;
use super::parsha::ParshaResolver;
use super::sequence::SequenceResolver;
use super::zmanim::ZmanimCalculator;
use crate::api::{
    City, EventSequence, EventType, LocationResult, LocationRow, ParshaAssignment, ResolvedWeek,
};
use crate::calendar::{CalendarOracle, CalendarResult};
use crate::config::ResolverConfig;
use crate::portions::PortionSource;

/// Festival names that name a sequence from its last day.
const END_DAY_EVENTS: &[&str] = &["Simchat Tora", "Shmini Atzeret"];

/// Entry point of the resolver.
///
/// Owns the day, zmanim and portion caches; they live as long as the
/// resolver and are emptied by [`WeekResolver::clear_caches`]. The resolver
/// is `Send + Sync` and can be shared behind an `Arc`.
pub struct WeekResolver {
    days: Arc<DayCache>,
    sequences: SequenceResolver,
    zmanim: ZmanimCalculator,
    parsha: ParshaResolver,
    diaspora: bool,
    reference_location: City,
}

impl WeekResolver {
    pub fn new(
        oracle: Arc<dyn CalendarOracle>,
        source: Arc<dyn PortionSource>,
        config: &ResolverConfig,
    ) -> Self {
        let days = Arc::new(DayCache::new(oracle.clone(), config.cache.day_capacity));
        Self {
            sequences: SequenceResolver::new(days.clone(), config.diaspora),
            zmanim: ZmanimCalculator::new(oracle, config.cache.zmanim_capacity)
                .with_tzeis_minutes(config.tzeis_minutes),
            parsha: ParshaResolver::new(days.clone(), source, config.diaspora),
            days,
            diaspora: config.diaspora,
            reference_location: config.reference_location.clone(),
        }
    }

    /// Resolver with the default configuration.
    pub fn with_defaults(oracle: Arc<dyn CalendarOracle>, source: Arc<dyn PortionSource>) -> Self {
        Self::new(oracle, source, &ResolverConfig::default())
    }

    pub fn diaspora(&self) -> bool {
        self.diaspora
    }

    pub fn reference_location(&self) -> &City {
        &self.reference_location
    }

    /// Next sequence starting the search at `reference`.
    pub fn resolve_sequence(
        &self,
        reference: NaiveDate,
        now: NaiveDateTime,
    ) -> CalendarResult<EventSequence> {
        self.sequences.find_next_sequence(reference, now)
    }

    /// Event descriptor of a sequence.
    ///
    /// The first day's event names the sequence, except when the last day
    /// is Shmini Atzeret or Simchat Tora.
    fn descriptor(
        &self,
        start: NaiveDate,
        end: NaiveDate,
    ) -> CalendarResult<(EventType, Option<String>)> {
        let first = self.days.get(start, self.diaspora)?;
        let last = self.days.get(end, self.diaspora)?;

        if let Some((kind, name)) = last.event() {
            if END_DAY_EVENTS.iter().any(|e| name.contains(e)) {
                return Ok((kind, Some(name.to_string())));
            }
        }
        Ok(match first.event() {
            Some((kind, name)) => (kind, Some(name.to_string())),
            None => (EventType::None, None),
        })
    }

    /// Portion for a sequence that is a Shabbat or includes a Saturday,
    /// looked up from its first day.
    fn sequence_parsha(
        &self,
        start: NaiveDate,
        end: NaiveDate,
        event_type: EventType,
    ) -> CalendarResult<Option<ParshaAssignment>> {
        let range = EventSequence {
            start_date: start,
            end_date: end,
            event_type,
            event_name: None,
        };
        if event_type == EventType::Shabbos || range.contains_saturday() {
            self.parsha.resolve(start)
        } else {
            Ok(None)
        }
    }

    /// Times and shared descriptor for one location.
    pub fn compute_location_result(
        &self,
        latitude: f64,
        longitude: f64,
        start: NaiveDate,
        end: NaiveDate,
        candle_offset_minutes: u32,
    ) -> CalendarResult<LocationResult> {
        let times = self.zmanim.compute(
            latitude,
            longitude,
            start,
            end,
            self.diaspora,
            candle_offset_minutes,
        )?;
        let (event_type, event_name) = self.descriptor(start, end)?;
        let parsha = self.sequence_parsha(start, end, event_type)?;

        Ok(LocationResult {
            parsha: parsha.map(|p| p.display),
            event_name,
            event_type,
            candle_time: times.candle_time,
            havdalah_time: times.havdalah_time,
        })
    }

    /// Everything needed to render the week of `reference` for `cities`.
    ///
    /// The descriptor and parsha are computed once, from the first city or
    /// from the reference location when `cities` is empty.
    pub fn resolve_week(
        &self,
        reference: NaiveDate,
        now: NaiveDateTime,
        cities: &[City],
    ) -> CalendarResult<ResolvedWeek> {
        let sequence = self.resolve_sequence(reference, now)?;
        let (start, end) = (sequence.start_date, sequence.end_date);

        let anchor = cities.first().unwrap_or(&self.reference_location);
        let shared = self.compute_location_result(
            anchor.latitude,
            anchor.longitude,
            start,
            end,
            anchor.candle_offset_minutes,
        )?;

        let rows = cities
            .iter()
            .map(|city| {
                let times = self.zmanim.compute(
                    city.latitude,
                    city.longitude,
                    start,
                    end,
                    self.diaspora,
                    city.candle_offset_minutes,
                )?;
                Ok(LocationRow {
                    location_id: city.name.clone(),
                    candle_time: times.candle_time,
                    havdalah_time: times.havdalah_time,
                })
            })
            .collect::<CalendarResult<Vec<_>>>()?;

        log::info!(
            "Resolved week of {}: {}..{} {:?} for {} locations",
            reference,
            start,
            end,
            shared.event_name,
            rows.len()
        );

        Ok(ResolvedWeek {
            sequence,
            parsha: shared.parsha,
            event_name: shared.event_name,
            event_type: shared.event_type,
            rows,
        })
    }

    pub(crate) fn sequences(&self) -> &SequenceResolver {
        &self.sequences
    }

    pub fn parsha(&self) -> &ParshaResolver {
        &self.parsha
    }

    /// Empty the day, zmanim and portion caches.
    pub fn clear_caches(&self) {
        self.days.clear();
        self.zmanim.clear();
        self.parsha.clear();
    }

    pub fn day_cache_stats(&self) -> CacheStats {
        self.days.stats()
    }

    pub fn zmanim_cache_stats(&self) -> CacheStats {
        self.zmanim.stats()
    }
}
