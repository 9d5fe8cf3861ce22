//! Listing of upcoming sequences with Hebrew display names.

use chrono::{Datelike, Days, NaiveDate, NaiveDateTime, Weekday};
use serde::{Deserialize, Serialize};

use super::week::WeekResolver;
use crate::api::{EventSequence, EventType};
use crate::calendar::{CalendarError, CalendarResult};
use crate::translations::translate_yomtov;

pub const SHABBAT_DISPLAY: &str = "שבת";
pub const SHABBAT_CHOL_HAMOED_DISPLAY: &str = "שבת חול המועד";

/// One entry of the upcoming-events listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpcomingEvent {
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub event_type: EventType,
    pub event_name: Option<String>,
    pub display_name: String,
    pub parsha: Option<String>,
    /// `d/m`, or `d/m - d/m` for multi-day sequences
    pub date_str: String,
    pub is_next: bool,
}

/// `d/m - d/m` range label.
pub fn date_range_label(start: NaiveDate, end: NaiveDate) -> String {
    let mut label = format!("{}/{}", start.day(), start.month());
    if start != end {
        label.push_str(&format!(" - {}/{}", end.day(), end.month()));
    }
    label
}

fn display_name(sequence: &EventSequence, parsha: Option<&str>) -> String {
    let name = sequence.event_name.as_deref().unwrap_or_default();
    match sequence.event_type {
        EventType::Shabbos => parsha.unwrap_or(SHABBAT_DISPLAY).to_string(),
        _ if name.contains("Chol HaMoed") && sequence.end_date.weekday() == Weekday::Sat => {
            SHABBAT_CHOL_HAMOED_DISPLAY.to_string()
        }
        _ => translate_yomtov(name),
    }
}

impl WeekResolver {
    /// Consecutive sequences found from `from` until `until` (exclusive).
    pub fn upcoming_events(
        &self,
        from: NaiveDate,
        until: NaiveDate,
        now: NaiveDateTime,
    ) -> CalendarResult<Vec<UpcomingEvent>> {
        let mut events = Vec::new();
        let mut current = from;

        while current < until {
            let sequence = self.sequences().find_next_sequence(current, now)?;

            let parsha = if sequence.event_type == EventType::Shabbos
                || sequence.end_date.weekday() == Weekday::Sat
            {
                self.parsha().display(sequence.end_date)?
            } else {
                None
            };

            events.push(UpcomingEvent {
                start_date: sequence.start_date,
                end_date: sequence.end_date,
                event_type: sequence.event_type,
                event_name: sequence.event_name.clone(),
                display_name: display_name(&sequence, parsha.as_deref()),
                parsha,
                date_str: date_range_label(sequence.start_date, sequence.end_date),
                is_next: events.is_empty(),
            });

            current = sequence
                .end_date
                .checked_add_days(Days::new(1))
                .ok_or(CalendarError::DateOutOfRange(sequence.end_date))?;
        }

        log::debug!("{} upcoming events between {} and {}", events.len(), from, until);
        Ok(events)
    }
}
