//! Resolve-week command line entry point.
//!
//! Prints the next observance sequence, its descriptor and the candle and
//! havdalah times of every configured city as JSON.
//!
//! # Usage
//!
//! ```bash
//! # Week of today
//! cargo run --bin resolve-week
//!
//! # Week of a given date, diaspora customs
//! DIASPORA=true cargo run --bin resolve-week -- 2024-10-14
//! ```
//!
//! # Environment Variables
//!
//! - `RUST_LOG`: Log level (default: info)
//! - Any `ResolverConfig` override (`DIASPORA`, `TZID`, `HEBCAL_API_URL`, ...)

use std::env;
use std::sync::Arc;

use anyhow::Context;
use chrono::{NaiveDate, Utc};
use serde_json::json;
use tracing::{info, warn, Level};
use tracing_subscriber::FmtSubscriber;

use shabbat_times::calendar::HebrewCalendar;
use shabbat_times::config::{ConfigError, ResolverConfig};
use shabbat_times::portions::HebcalClient;
use shabbat_times::translations::hebrew_date_label;
use shabbat_times::{format_hhmm, WeekResolver};

fn load_config() -> anyhow::Result<ResolverConfig> {
    match ResolverConfig::from_default_location() {
        Ok(config) => Ok(config.with_env_overrides()?),
        Err(ConfigError::NotFound(name)) => {
            info!("No {} found, using defaults", name);
            Ok(ResolverConfig::from_env()?)
        }
        Err(e) => Err(e.into()),
    }
}

fn main() -> anyhow::Result<()> {
    FmtSubscriber::builder()
        .with_max_level(
            env::var("RUST_LOG")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(Level::INFO),
        )
        .with_target(true)
        .with_thread_ids(true)
        .init();

    let config = load_config().context("loading configuration")?;
    let tz = config.tz()?;

    let now = Utc::now().with_timezone(&tz).naive_local();
    let reference = match env::args().nth(1) {
        Some(arg) => NaiveDate::parse_from_str(&arg, "%Y-%m-%d")
            .with_context(|| format!("invalid date '{}', expected YYYY-MM-DD", arg))?,
        None => now.date(),
    };
    if config.cities.is_empty() {
        warn!("No cities configured, printing the shared descriptor only");
    }

    let client = HebcalClient::new(&config.hebcal, config.timezone.clone(), config.diaspora)?;
    let resolver = WeekResolver::new(Arc::new(HebrewCalendar), Arc::new(client), &config);

    let week = resolver.resolve_week(reference, now, &config.cities)?;
    info!(
        "Resolved {} .. {} ({})",
        week.sequence.start_date, week.sequence.end_date, week.event_type
    );

    let rows: Vec<_> = week
        .rows
        .iter()
        .map(|row| {
            json!({
                "city": row.location_id,
                "candle_time": format_hhmm(row.candle_time, tz),
                "havdalah_time": format_hhmm(row.havdalah_time, tz),
            })
        })
        .collect();

    let output = json!({
        "start_date": week.sequence.start_date,
        "end_date": week.sequence.end_date,
        "hebrew_date": hebrew_date_label(week.sequence.start_date),
        "event_type": week.event_type,
        "event_name": week.event_name,
        "parsha": week.parsha,
        "diaspora": resolver.diaspora(),
        "rows": rows,
    });
    println!("{}", serde_json::to_string_pretty(&output)?);

    Ok(())
}
