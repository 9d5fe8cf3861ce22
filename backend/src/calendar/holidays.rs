//! Festival and Sabbath classification of a single date.

use chrono::{Datelike, NaiveDate, Weekday};

use super::error::{CalendarError, CalendarResult};
use super::hebrew_date::{HebrewDate, ELUL, NISAN, SIVAN, TISHREI};
use crate::api::{Action, CalendarDay};

pub const EREV_SHABBOS: &str = "Erev Shabbos";
pub const SHABBOS: &str = "Shabbos";

/// Festival name of a Hebrew date, if it has one.
///
/// Outside Israel (`diaspora`), Sukkot, Shmini Atzeret, Pesach and Shavuot
/// carry an extra day and Chol HaMoed starts one day later.
pub fn festival_name(h: &HebrewDate, diaspora: bool) -> Option<String> {
    let name = match (h.month, h.day) {
        (ELUL, 29) => "Erev Rosh Hashana".to_string(),
        (TISHREI, 1) => "Rosh Hashana 1".to_string(),
        (TISHREI, 2) => "Rosh Hashana 2".to_string(),
        (TISHREI, 9) => "Erev Yom Kippur".to_string(),
        (TISHREI, 10) => "Yom Kippur".to_string(),
        (TISHREI, 14) => "Erev Sukkot".to_string(),
        (TISHREI, 15) => "Sukkot 1".to_string(),
        (TISHREI, 16) if diaspora => "Sukkot 2".to_string(),
        (TISHREI, d @ 16..=20) => chol_hamoed("Sukkot", d, diaspora),
        (TISHREI, 21) => "Hoshana Rabba".to_string(),
        (TISHREI, 22) if diaspora => "Shmini Atzeret".to_string(),
        (TISHREI, 22) => "Shmini Atzeret / Simchat Tora".to_string(),
        (TISHREI, 23) if diaspora => "Simchat Tora".to_string(),
        (NISAN, 14) => "Erev Pesach".to_string(),
        (NISAN, 15) => "Pesach 1".to_string(),
        (NISAN, 16) if diaspora => "Pesach 2".to_string(),
        (NISAN, d @ 16..=20) => chol_hamoed("Pesach", d, diaspora),
        (NISAN, 21) => "Pesach 7".to_string(),
        (NISAN, 22) if diaspora => "Pesach 8".to_string(),
        (SIVAN, 5) => "Erev Shavuot".to_string(),
        (SIVAN, 6) => "Shavuot 1".to_string(),
        (SIVAN, 7) if diaspora => "Shavuot 2".to_string(),
        _ => return None,
    };
    Some(name)
}

/// `Chol HaMoed <n> (<festival> <day of festival>)`.
fn chol_hamoed(festival: &str, day: u8, diaspora: bool) -> String {
    let first = if diaspora { 17 } else { 16 };
    format!(
        "Chol HaMoed {} ({} {})",
        day + 1 - first,
        festival,
        day - 14
    )
}

/// Whether the Hebrew date is a Yom Tov with Sabbath-like restrictions.
pub fn is_yom_tov(h: &HebrewDate, diaspora: bool) -> bool {
    match (h.month, h.day) {
        (TISHREI, 1 | 2 | 10 | 15 | 22) => true,
        (TISHREI, 16 | 23) => diaspora,
        (NISAN, 15 | 21) => true,
        (NISAN, 16 | 22) => diaspora,
        (SIVAN, 6) => true,
        (SIVAN, 7) => diaspora,
        _ => false,
    }
}

/// Shabbat or Yom Tov.
pub fn is_rest_day(date: NaiveDate, diaspora: bool) -> bool {
    date.weekday() == Weekday::Sat || is_yom_tov(&HebrewDate::from_gregorian(date), diaspora)
}

/// Classify a Gregorian date.
///
/// A day carries `Candles` when the following day is a rest day, otherwise
/// `Havdalah` when it is itself a rest day.
pub fn classify(date: NaiveDate, diaspora: bool) -> CalendarResult<CalendarDay> {
    if !(1..=9999).contains(&date.year()) {
        return Err(CalendarError::DateOutOfRange(date));
    }
    let next = date
        .succ_opt()
        .ok_or(CalendarError::DateOutOfRange(date))?;

    let action = if is_rest_day(next, diaspora) {
        Action::Candles
    } else if is_rest_day(date, diaspora) {
        Action::Havdalah
    } else {
        Action::None
    };

    let shabbos_name = match date.weekday() {
        Weekday::Fri => Some(EREV_SHABBOS.to_string()),
        Weekday::Sat => Some(SHABBOS.to_string()),
        _ => None,
    };

    Ok(CalendarDay {
        date,
        action,
        shabbos_name,
        yomtov_name: festival_name(&HebrewDate::from_gregorian(date), diaspora),
    })
}
