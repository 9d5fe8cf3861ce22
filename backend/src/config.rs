//! Resolver configuration.
//!
//! Values come from built-in defaults, an optional TOML file and
//! environment variables, in that order of precedence (lowest first).

use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::api::City;
use crate::calendar::DEFAULT_TZEIS_MINUTES;
use crate::services::cache::DEFAULT_CAPACITY;

/// File name searched by [`ResolverConfig::from_default_location`].
pub const CONFIG_FILE_NAME: &str = "shabbat-times.toml";

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path}: {message}")]
    Io { path: PathBuf, message: String },

    #[error("Failed to parse config file: {0}")]
    Parse(String),

    #[error("Invalid value for {key}: {value:?}")]
    InvalidValue { key: String, value: String },

    #[error("Invalid configuration: {0}")]
    Validation(String),

    #[error("No {0} found in standard locations")]
    NotFound(String),
}

/// hebcal.com request settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HebcalSettings {
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Observer position sent with portion requests
    #[serde(default = "default_hebcal_latitude")]
    pub latitude: f64,
    #[serde(default = "default_hebcal_longitude")]
    pub longitude: f64,
    /// Request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for HebcalSettings {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            latitude: default_hebcal_latitude(),
            longitude: default_hebcal_longitude(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CacheSettings {
    #[serde(default = "default_capacity")]
    pub day_capacity: usize,
    #[serde(default = "default_capacity")]
    pub zmanim_capacity: usize,
}

impl Default for CacheSettings {
    fn default() -> Self {
        Self {
            day_capacity: DEFAULT_CAPACITY,
            zmanim_capacity: DEFAULT_CAPACITY,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResolverConfig {
    /// Use diaspora festival days
    #[serde(default)]
    pub diaspora: bool,
    /// IANA zone used for display times and the hebcal query
    #[serde(default = "default_timezone")]
    pub timezone: String,
    /// Minutes after sunset for the fixed havdalah fallback
    #[serde(default = "default_tzeis_minutes")]
    pub tzeis_minutes: u32,
    #[serde(default)]
    pub hebcal: HebcalSettings,
    #[serde(default)]
    pub cache: CacheSettings,
    #[serde(default = "default_cities")]
    pub cities: Vec<City>,
    /// Location used for the shared descriptor when no city is requested
    #[serde(default = "default_reference_location")]
    pub reference_location: City,
}

fn default_base_url() -> String {
    "https://www.hebcal.com/hebcal".to_string()
}

fn default_hebcal_latitude() -> f64 {
    31.778117828230577
}

fn default_hebcal_longitude() -> f64 {
    35.23599222120022
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_capacity() -> usize {
    DEFAULT_CAPACITY
}

fn default_timezone() -> String {
    "Asia/Jerusalem".to_string()
}

fn default_tzeis_minutes() -> u32 {
    DEFAULT_TZEIS_MINUTES
}

fn city(name: &str, latitude: f64, longitude: f64, candle_offset_minutes: u32) -> City {
    City {
        name: name.to_string(),
        latitude,
        longitude,
        candle_offset_minutes,
    }
}

fn default_cities() -> Vec<City> {
    vec![
        city("ירושלים", 31.779737, 35.209554, 40),
        city("תל אביב -יפו", 32.079112, 34.777326, 20),
        city("חיפה", 32.801771, 35.000609, 20),
        city("באר שבע", 31.256689, 34.786409, 20),
    ]
}

fn default_reference_location() -> City {
    city("ירושלים", 31.779737, 35.209554, 40)
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            diaspora: false,
            timezone: default_timezone(),
            tzeis_minutes: default_tzeis_minutes(),
            hebcal: HebcalSettings::default(),
            cache: CacheSettings::default(),
            cities: default_cities(),
            reference_location: default_reference_location(),
        }
    }
}

fn parse_env<T: std::str::FromStr>(key: &str) -> Result<Option<T>, ConfigError> {
    match env::var(key) {
        Ok(value) => value
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| ConfigError::InvalidValue {
                key: key.to_string(),
                value,
            }),
        Err(_) => Ok(None),
    }
}

fn parse_bool(key: &str, value: &str) -> Result<bool, ConfigError> {
    match value.trim().to_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" | "" => Ok(false),
        _ => Err(ConfigError::InvalidValue {
            key: key.to_string(),
            value: value.to_string(),
        }),
    }
}

fn check_coordinates(what: &str, latitude: f64, longitude: f64) -> Result<(), ConfigError> {
    if !latitude.is_finite() || !(-90.0..=90.0).contains(&latitude) {
        return Err(ConfigError::Validation(format!(
            "{}: latitude {} out of range",
            what, latitude
        )));
    }
    if !longitude.is_finite() || !(-180.0..=180.0).contains(&longitude) {
        return Err(ConfigError::Validation(format!(
            "{}: longitude {} out of range",
            what, longitude
        )));
    }
    Ok(())
}

impl ResolverConfig {
    /// Defaults overridden by environment variables.
    ///
    /// # Environment Variables
    /// - `DIASPORA`: `true`/`false`
    /// - `TZID`: IANA timezone (default `Asia/Jerusalem`)
    /// - `HEBCAL_API_URL`, `HEBCAL_DEFAULT_LAT`, `HEBCAL_DEFAULT_LON`
    /// - `API_TIMEOUT`: hebcal timeout in seconds (default 30)
    /// - `TZEIS_MINUTES`: fixed havdalah minutes (default 42)
    /// - `DAY_CACHE_SIZE`, `ZMANIM_CACHE_SIZE` (default 128)
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::default().with_env_overrides()
    }

    /// Apply environment variables on top of this configuration.
    pub fn with_env_overrides(mut self) -> Result<Self, ConfigError> {
        if let Ok(value) = env::var("DIASPORA") {
            self.diaspora = parse_bool("DIASPORA", &value)?;
        }
        if let Ok(value) = env::var("TZID") {
            self.timezone = value.trim().to_string();
        }
        if let Ok(value) = env::var("HEBCAL_API_URL") {
            self.hebcal.base_url = value.trim().to_string();
        }
        if let Some(lat) = parse_env("HEBCAL_DEFAULT_LAT")? {
            self.hebcal.latitude = lat;
        }
        if let Some(lon) = parse_env("HEBCAL_DEFAULT_LON")? {
            self.hebcal.longitude = lon;
        }
        if let Some(timeout) = parse_env("API_TIMEOUT")? {
            self.hebcal.timeout_secs = timeout;
        }
        if let Some(minutes) = parse_env("TZEIS_MINUTES")? {
            self.tzeis_minutes = minutes;
        }
        if let Some(size) = parse_env("DAY_CACHE_SIZE")? {
            self.cache.day_capacity = size;
        }
        if let Some(size) = parse_env("ZMANIM_CACHE_SIZE")? {
            self.cache.zmanim_capacity = size;
        }
        self.validate()?;
        Ok(self)
    }

    /// Load and validate a TOML configuration file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;

        let config: ResolverConfig =
            toml::from_str(&content).map_err(|e| ConfigError::Parse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Load `shabbat-times.toml` from the first standard location holding one.
    ///
    /// Searches, in order:
    /// 1. Current directory
    /// 2. `backend/` directory
    /// 3. Parent directory
    pub fn from_default_location() -> Result<Self, ConfigError> {
        let search_paths = [
            PathBuf::from(CONFIG_FILE_NAME),
            PathBuf::from("backend").join(CONFIG_FILE_NAME),
            PathBuf::from("..").join(CONFIG_FILE_NAME),
        ];

        for path in search_paths {
            if path.exists() {
                log::info!("Loading configuration from {}", path.display());
                return Self::from_file(&path);
            }
        }

        Err(ConfigError::NotFound(CONFIG_FILE_NAME.to_string()))
    }

    /// Display timezone.
    pub fn tz(&self) -> Result<chrono_tz::Tz, ConfigError> {
        self.timezone
            .parse::<chrono_tz::Tz>()
            .map_err(|_| ConfigError::InvalidValue {
                key: "timezone".to_string(),
                value: self.timezone.clone(),
            })
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.tz()?;

        if self.hebcal.base_url.trim().is_empty() {
            return Err(ConfigError::Validation("hebcal.base_url is empty".to_string()));
        }
        if self.hebcal.timeout_secs == 0 {
            return Err(ConfigError::Validation(
                "hebcal.timeout_secs must be positive".to_string(),
            ));
        }
        check_coordinates("hebcal", self.hebcal.latitude, self.hebcal.longitude)?;

        if self.cache.day_capacity == 0 || self.cache.zmanim_capacity == 0 {
            return Err(ConfigError::Validation(
                "cache capacities must be positive".to_string(),
            ));
        }

        let reference = &self.reference_location;
        check_coordinates(&reference.name, reference.latitude, reference.longitude)?;
        for city in &self.cities {
            check_coordinates(&city.name, city.latitude, city.longitude)?;
        }
        Ok(())
    }
}
