//! Arithmetic Hebrew calendar.
//!
//! Dates are converted through fixed day numbers (RD, day 1 = 0001-01-01
//! Gregorian), which is what `chrono::Datelike::num_days_from_ce` returns.
//! Months are numbered from Nisan (1) to Adar (12) or Adar II (13); the
//! year starts at Tishrei (7).

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

pub const NISAN: u8 = 1;
pub const SIVAN: u8 = 3;
pub const ELUL: u8 = 6;
pub const TISHREI: u8 = 7;
pub const ADAR: u8 = 12;
pub const ADAR_II: u8 = 13;

/// RD of 1 Tishrei AM 1.
const HEBREW_EPOCH: i64 = -1_373_427;

/// Parts (1/1080 hour) in a day.
const PARTS_PER_DAY: i64 = 25_920;

/// A date in the Hebrew calendar.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct HebrewDate {
    pub year: i32,
    pub month: u8,
    pub day: u8,
}

impl HebrewDate {
    /// Convert a Gregorian date.
    pub fn from_gregorian(date: NaiveDate) -> Self {
        from_fixed(date.num_days_from_ce() as i64)
    }

    /// Convert back to a Gregorian date.
    pub fn to_gregorian(&self) -> Option<NaiveDate> {
        let fixed = to_fixed(self.year as i64, self.month, self.day);
        NaiveDate::from_num_days_from_ce_opt(i32::try_from(fixed).ok()?)
    }

    pub fn is_leap_year(&self) -> bool {
        is_leap_year(self.year as i64)
    }

    /// English month name as used by most transliterations.
    pub fn month_name(&self) -> &'static str {
        match self.month {
            1 => "Nisan",
            2 => "Iyar",
            3 => "Sivan",
            4 => "Tammuz",
            5 => "Av",
            6 => "Elul",
            7 => "Tishrei",
            8 => "Cheshvan",
            9 => "Kislev",
            10 => "Tevet",
            11 => "Shevat",
            12 if self.is_leap_year() => "Adar I",
            12 => "Adar",
            _ => "Adar II",
        }
    }
}

impl std::fmt::Display for HebrewDate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {} {}", self.day, self.month_name(), self.year)
    }
}

pub fn is_leap_year(year: i64) -> bool {
    (7 * year + 1).rem_euclid(19) < 7
}

fn last_month_of_year(year: i64) -> u8 {
    if is_leap_year(year) {
        ADAR_II
    } else {
        ADAR
    }
}

/// Days from the epoch to the molad of Tishrei, with the weekday postponement.
fn elapsed_days(year: i64) -> i64 {
    let months_elapsed = (235 * year - 234).div_euclid(19);
    let parts_elapsed = 12_084 + 13_753 * months_elapsed;
    let days = 29 * months_elapsed + parts_elapsed.div_euclid(PARTS_PER_DAY);
    if (3 * (days + 1)).rem_euclid(7) < 3 {
        days + 1
    } else {
        days
    }
}

/// Postponement keeping year lengths within 353..=355 and 383..=385.
fn year_length_correction(year: i64) -> i64 {
    let ny0 = elapsed_days(year - 1);
    let ny1 = elapsed_days(year);
    let ny2 = elapsed_days(year + 1);
    if ny2 - ny1 == 356 {
        2
    } else if ny1 - ny0 == 382 {
        1
    } else {
        0
    }
}

/// RD of 1 Tishrei of `year`.
pub fn new_year(year: i64) -> i64 {
    HEBREW_EPOCH + elapsed_days(year) + year_length_correction(year)
}

pub fn days_in_year(year: i64) -> i64 {
    new_year(year + 1) - new_year(year)
}

pub fn days_in_month(year: i64, month: u8) -> u8 {
    let length = days_in_year(year);
    match month {
        2 | 4 | 6 | 10 | 13 => 29,
        12 if !is_leap_year(year) => 29,
        8 if !matches!(length, 355 | 385) => 29,
        9 if matches!(length, 353 | 383) => 29,
        _ => 30,
    }
}

fn to_fixed(year: i64, month: u8, day: u8) -> i64 {
    let mut fixed = new_year(year) + day as i64 - 1;
    if month < TISHREI {
        for m in TISHREI..=last_month_of_year(year) {
            fixed += days_in_month(year, m) as i64;
        }
        for m in NISAN..month {
            fixed += days_in_month(year, m) as i64;
        }
    } else {
        for m in TISHREI..month {
            fixed += days_in_month(year, m) as i64;
        }
    }
    fixed
}

fn from_fixed(fixed: i64) -> HebrewDate {
    let approx = ((fixed - HEBREW_EPOCH) as f64 / (35_975_351.0 / 98_496.0)).floor() as i64 + 1;
    let mut year = approx - 1;
    while new_year(year + 1) <= fixed {
        year += 1;
    }

    let mut month = if fixed < to_fixed(year, NISAN, 1) {
        TISHREI
    } else {
        NISAN
    };
    while fixed > to_fixed(year, month, days_in_month(year, month)) {
        month += 1;
    }

    let day = fixed - to_fixed(year, month, 1) + 1;
    HebrewDate {
        year: year as i32,
        month,
        day: day as u8,
    }
}
