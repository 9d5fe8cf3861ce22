//! Public API surface of the calendar sequence resolver.
//!
//! This file consolidates the value types handed to the (external) renderer
//! and API layers. All types derive Serialize/Deserialize for JSON output.

pub use crate::calendar::{DayZmanim, ZmanimLocation};
pub use crate::services::upcoming::UpcomingEvent;

use chrono::{DateTime, Datelike, NaiveDate, Utc, Weekday};
use serde::{Deserialize, Serialize};

/// Rite attached to the evening that closes a calendar day.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum Action {
    /// Nothing to light or conclude.
    #[default]
    None,
    /// Candles are lit before sunset; the next day is a rest day.
    Candles,
    /// The rest day concludes at nightfall.
    Havdalah,
}

impl Action {
    /// Whether this action takes part in an observance sequence.
    pub fn is_qualifying(self) -> bool {
        matches!(self, Action::Candles | Action::Havdalah)
    }
}

/// Kind of the event that names a sequence.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum EventType {
    Shabbos,
    #[serde(rename = "yomtov")]
    YomTov,
    #[default]
    None,
}

impl EventType {
    pub fn as_str(&self) -> &'static str {
        match self {
            EventType::Shabbos => "shabbos",
            EventType::YomTov => "yomtov",
            EventType::None => "none",
        }
    }
}

impl std::fmt::Display for EventType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Classification of a single Gregorian date.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CalendarDay {
    pub date: NaiveDate,
    pub action: Action,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub shabbos_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub yomtov_name: Option<String>,
}

impl CalendarDay {
    /// A day with no events at all.
    pub fn plain(date: NaiveDate) -> Self {
        Self {
            date,
            action: Action::None,
            shabbos_name: None,
            yomtov_name: None,
        }
    }

    pub fn has_events(&self) -> bool {
        self.shabbos_name.is_some() || self.yomtov_name.is_some() || self.action != Action::None
    }

    /// Whether the day carries Candles or Havdalah.
    pub fn is_qualifying(&self) -> bool {
        self.action.is_qualifying()
    }

    /// The event naming this day. Yom Tov wins over Shabbos.
    pub fn event(&self) -> Option<(EventType, &str)> {
        if let Some(name) = self.yomtov_name.as_deref() {
            return Some((EventType::YomTov, name));
        }
        self.shabbos_name
            .as_deref()
            .map(|name| (EventType::Shabbos, name))
    }
}

/// A contiguous run of days bounded by candle lighting and havdalah.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventSequence {
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub event_type: EventType,
    pub event_name: Option<String>,
}

impl EventSequence {
    /// Number of days in the closed range.
    pub fn len_days(&self) -> i64 {
        (self.end_date - self.start_date).num_days() + 1
    }

    /// Iterate over every date in the closed range.
    pub fn days(&self) -> impl Iterator<Item = NaiveDate> + '_ {
        self.start_date
            .iter_days()
            .take_while(move |d| *d <= self.end_date)
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start_date <= date && date <= self.end_date
    }

    /// Whether any day of the sequence is a Saturday.
    pub fn contains_saturday(&self) -> bool {
        self.days().any(|d| d.weekday() == Weekday::Sat)
    }
}

/// A place for which times are computed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct City {
    /// Display name, also used as the location id in result rows
    pub name: String,
    /// Latitude in decimal degrees (-90 to 90)
    #[serde(alias = "lat")]
    pub latitude: f64,
    /// Longitude in decimal degrees (-180 to 180)
    #[serde(alias = "lon")]
    pub longitude: f64,
    /// Minutes before sunset for candle lighting
    #[serde(alias = "candle_offset")]
    pub candle_offset_minutes: u32,
}

impl City {
    pub fn new(
        name: impl Into<String>,
        latitude: f64,
        longitude: f64,
        candle_offset_minutes: u32,
    ) -> Result<Self, String> {
        if !latitude.is_finite() || !(-90.0..=90.0).contains(&latitude) {
            return Err("Latitude must be between -90 and 90 degrees".to_string());
        }
        if !longitude.is_finite() || !(-180.0..=180.0).contains(&longitude) {
            return Err("Longitude must be between -180 and 180 degrees".to_string());
        }
        Ok(Self {
            name: name.into(),
            latitude,
            longitude,
            candle_offset_minutes,
        })
    }
}

/// Candle-lighting and concluding time for one location and sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct LocationZmanim {
    pub candle_time: Option<DateTime<Utc>>,
    pub havdalah_time: Option<DateTime<Utc>>,
}

/// Where a parsha assignment came from.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ParshaOrigin {
    /// Fixed festival reading, no source lookup.
    Festival,
    /// Source entry dated exactly on the Saturday.
    Exact,
    /// Closest source entry before the Saturday.
    NearestPrior,
}

/// Weekly Torah reading bound to a Saturday.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParshaAssignment {
    pub saturday: NaiveDate,
    /// Title as delivered by the source, if any
    pub title: Option<String>,
    /// Hebrew display string
    pub display: String,
    pub origin: ParshaOrigin,
}

/// Per-location result with the shared event descriptor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LocationResult {
    pub parsha: Option<String>,
    pub event_name: Option<String>,
    pub event_type: EventType,
    pub candle_time: Option<DateTime<Utc>>,
    pub havdalah_time: Option<DateTime<Utc>>,
}

/// One row of the per-location table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LocationRow {
    pub location_id: String,
    pub candle_time: Option<DateTime<Utc>>,
    pub havdalah_time: Option<DateTime<Utc>>,
}

/// Everything a renderer needs for one week.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResolvedWeek {
    pub sequence: EventSequence,
    pub parsha: Option<String>,
    pub event_name: Option<String>,
    pub event_type: EventType,
    pub rows: Vec<LocationRow>,
}

/// Format a timestamp as `HH:MM` in the display timezone.
///
/// Absent timestamps format as an empty string.
pub fn format_hhmm(time: Option<DateTime<Utc>>, tz: chrono_tz::Tz) -> String {
    time.map(|t| t.with_timezone(&tz).format("%H:%M").to_string())
        .unwrap_or_default()
}
