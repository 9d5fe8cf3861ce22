//! Portion source backed by the hebcal.com calendar API.

use std::time::Duration;

use chrono::NaiveDate;
use serde::Deserialize;

use super::{ErrorContext, PortionEntry, PortionError, PortionResult, PortionSource};
use crate::config::HebcalSettings;

#[derive(Debug, Deserialize)]
struct HebcalResponse {
    #[serde(default)]
    items: Vec<HebcalItem>,
}

#[derive(Debug, Deserialize)]
struct HebcalItem {
    #[serde(default)]
    title: String,
    #[serde(default)]
    date: String,
    #[serde(default)]
    category: String,
}

/// Blocking client for the hebcal.com JSON calendar.
///
/// One request returns every event of a Gregorian year, including the
/// weekly portions (`category = "parashat"`).
#[derive(Debug, Clone)]
pub struct HebcalClient {
    client: reqwest::blocking::Client,
    base_url: reqwest::Url,
    latitude: f64,
    longitude: f64,
    tzid: String,
    diaspora: bool,
}

impl HebcalClient {
    /// Client for the configured endpoint.
    ///
    /// `diaspora` selects the weekly-reading schedule outside Israel.
    pub fn new(
        settings: &HebcalSettings,
        tzid: impl Into<String>,
        diaspora: bool,
    ) -> PortionResult<Self> {
        let raw_url = settings.base_url.trim().trim_end_matches('/');
        let base_url = reqwest::Url::parse(raw_url).map_err(|e| {
            PortionError::transport(
                format!("Invalid hebcal URL: {}", e),
                ErrorContext::new("build_client").with_url(raw_url),
            )
        })?;

        let client = reqwest::blocking::Client::builder()
            .timeout(Duration::from_secs(settings.timeout_secs))
            .build()
            .map_err(|e| {
                PortionError::transport(
                    format!("Failed to build HTTP client: {}", e),
                    ErrorContext::new("build_client"),
                )
            })?;

        Ok(Self {
            client,
            base_url,
            latitude: settings.latitude,
            longitude: settings.longitude,
            tzid: tzid.into(),
            diaspora,
        })
    }

    /// Request URL for one Gregorian year.
    ///
    /// Parameters are appended to any query already present in the base URL.
    pub fn year_url(&self, year: i32) -> reqwest::Url {
        let year = year.to_string();
        let latitude = self.latitude.to_string();
        let longitude = self.longitude.to_string();
        let israel = if self.diaspora { "off" } else { "on" };

        let mut url = self.base_url.clone();
        url.query_pairs_mut().extend_pairs([
            ("v", "1"),
            ("cfg", "json"),
            ("maj", "on"),
            ("min", "on"),
            ("mod", "on"),
            ("nx", "on"),
            ("year", year.as_str()),
            ("month", "x"),
            ("ss", "on"),
            ("mf", "on"),
            ("c", "on"),
            ("geo", "pos"),
            ("latitude", latitude.as_str()),
            ("longitude", longitude.as_str()),
            ("tzid", self.tzid.as_str()),
            ("i", israel),
            ("s", "on"),
        ]);
        url
    }
}

impl PortionSource for HebcalClient {
    fn fetch_year(&self, year: i32) -> PortionResult<Vec<PortionEntry>> {
        let url = self.year_url(year);
        let context = ErrorContext::new("fetch_year")
            .with_year(year)
            .with_url(url.as_str());

        log::debug!("Fetching hebcal calendar for {}", year);
        let response = self.client.get(url).send().map_err(|e| {
            if e.is_timeout() {
                PortionError::timeout(e.to_string(), context.clone())
            } else {
                PortionError::transport(e.to_string(), context.clone().retryable())
            }
        })?;

        let status = response.status();
        let body = response.text().map_err(|e| {
            if e.is_timeout() {
                PortionError::timeout(e.to_string(), context.clone())
            } else {
                PortionError::transport(e.to_string(), context.clone())
            }
        })?;

        if !status.is_success() {
            return Err(PortionError::transport(
                format!("hebcal request failed ({})", status),
                context.with_details(format!("status={}", status.as_u16())),
            ));
        }

        parse_items(&body).map_err(|e| PortionError::decode(e, context))
    }
}

/// Decode a hebcal JSON payload.
///
/// Dates may be plain (`2025-01-25`) or timestamps; only the date part is
/// kept. Items with an unparsable date are skipped.
pub fn parse_items(body: &str) -> Result<Vec<PortionEntry>, String> {
    let response: HebcalResponse = serde_json::from_str(body)
        .map_err(|e| format!("Failed to parse hebcal response: {}", e))?;

    Ok(response
        .items
        .into_iter()
        .filter_map(|item| {
            let day = item.date.get(..10)?;
            let date = NaiveDate::parse_from_str(day, "%Y-%m-%d").ok()?;
            Some(PortionEntry::new(date, item.category, item.title))
        })
        .collect())
}
