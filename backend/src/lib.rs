//! # Shabbat Times
//!
//! Resolves Jewish-calendar observance sequences (Shabbat and festivals),
//! their candle-lighting and havdalah times per location, and the weekly
//! Torah portion.
//!
//! ## Architecture
//!
//! - [`calendar`]: day classification and solar times behind the
//!   [`calendar::CalendarOracle`] trait, with a built-in Hebrew calendar
//! - [`services`]: day and zmanim caches, sequence search, parsha
//!   resolution and the [`services::WeekResolver`] entry point
//! - [`portions`]: Torah-portion sources (hebcal.com, in-memory)
//! - [`translations`]: Hebrew display names and dates
//! - [`config`]: TOML and environment configuration
//! - [`api`]: value types handed to renderers
//!
//! ## Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use chrono::NaiveDate;
//! use shabbat_times::calendar::HebrewCalendar;
//! use shabbat_times::portions::LocalPortionSource;
//! use shabbat_times::services::WeekResolver;
//!
//! let resolver = WeekResolver::with_defaults(
//!     Arc::new(HebrewCalendar),
//!     Arc::new(LocalPortionSource::new()),
//! );
//! let today = NaiveDate::from_ymd_opt(2025, 1, 20).unwrap();
//! let now = today.and_hms_opt(9, 0, 0).unwrap();
//! let sequence = resolver.resolve_sequence(today, now).unwrap();
//! assert_eq!(sequence.start_date, NaiveDate::from_ymd_opt(2025, 1, 24).unwrap());
//! ```

pub mod api;
pub mod calendar;
pub mod config;
pub mod models;
pub mod portions;
pub mod services;
pub mod translations;

pub use api::{format_hhmm, City, EventSequence, EventType, ResolvedWeek};
pub use calendar::{CalendarError, CalendarOracle, HebrewCalendar};
pub use config::{ConfigError, ResolverConfig};
pub use services::WeekResolver;
