mod support;

use std::io::Write;

use shabbat_times::config::{ConfigError, ResolverConfig};

const ENV_KEYS: &[&str] = &[
    "DIASPORA",
    "TZID",
    "HEBCAL_API_URL",
    "HEBCAL_DEFAULT_LAT",
    "HEBCAL_DEFAULT_LON",
    "API_TIMEOUT",
    "TZEIS_MINUTES",
    "DAY_CACHE_SIZE",
    "ZMANIM_CACHE_SIZE",
];

/// Clears every config variable, then applies `changes`.
fn env_with<'a>(changes: &[(&'a str, Option<&'a str>)]) -> Vec<(&'a str, Option<&'a str>)> {
    let mut all: Vec<(&str, Option<&str>)> = ENV_KEYS
        .iter()
        .copied()
        .filter(|k| !changes.iter().any(|(c, _)| c == k))
        .map(|k| (k, None))
        .collect();
    all.extend_from_slice(changes);
    all
}

fn write_config(content: &str) -> tempfile::NamedTempFile {
    let mut file = tempfile::Builder::new()
        .suffix(".toml")
        .tempfile()
        .unwrap();
    file.write_all(content.as_bytes()).unwrap();
    file.flush().unwrap();
    file
}

#[test]
fn test_from_env_without_variables_is_default() {
    support::with_scoped_env(&env_with(&[]), || {
        let config = ResolverConfig::from_env().unwrap();
        assert_eq!(config, ResolverConfig::default());
    });
}

#[test]
fn test_from_env_overrides() {
    let changes = env_with(&[
        ("DIASPORA", Some("true")),
        ("TZID", Some("America/New_York")),
        ("HEBCAL_API_URL", Some("http://localhost:9000/hebcal")),
        ("API_TIMEOUT", Some("5")),
        ("TZEIS_MINUTES", Some("72")),
        ("DAY_CACHE_SIZE", Some("16")),
    ]);
    support::with_scoped_env(&changes, || {
        let config = ResolverConfig::from_env().unwrap();
        assert!(config.diaspora);
        assert_eq!(config.timezone, "America/New_York");
        assert_eq!(config.hebcal.base_url, "http://localhost:9000/hebcal");
        assert_eq!(config.hebcal.timeout_secs, 5);
        assert_eq!(config.tzeis_minutes, 72);
        assert_eq!(config.cache.day_capacity, 16);
        assert_eq!(config.cache.zmanim_capacity, 128);
        assert_eq!(config.tz().unwrap(), chrono_tz::America::New_York);
    });
}

#[test]
fn test_from_env_rejects_bad_values() {
    support::with_scoped_env(&env_with(&[("API_TIMEOUT", Some("soon"))]), || {
        let err = ResolverConfig::from_env().unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue { ref key, .. } if key == "API_TIMEOUT"));
    });

    support::with_scoped_env(&env_with(&[("HEBCAL_DEFAULT_LAT", Some("91"))]), || {
        let err = ResolverConfig::from_env().unwrap_err();
        assert!(matches!(err, ConfigError::Validation(_)));
    });

    support::with_scoped_env(&env_with(&[("TZID", Some("Nowhere/Special"))]), || {
        assert!(ResolverConfig::from_env().is_err());
    });
}

#[test]
fn test_from_file() {
    let file = write_config(
        r#"
diaspora = true
timezone = "Europe/London"
tzeis_minutes = 50

[cache]
day_capacity = 64

[[cities]]
name = "London"
latitude = 51.5074
longitude = -0.1278
candle_offset_minutes = 18

[[cities]]
name = "Manchester"
lat = 53.4808
lon = -2.2426
candle_offset = 18
"#,
    );

    let config = ResolverConfig::from_file(file.path()).unwrap();
    assert!(config.diaspora);
    assert_eq!(config.tz().unwrap(), chrono_tz::Europe::London);
    assert_eq!(config.tzeis_minutes, 50);
    assert_eq!(config.cache.day_capacity, 64);
    assert_eq!(config.cache.zmanim_capacity, 128);
    assert_eq!(config.cities.len(), 2);
    assert_eq!(config.cities[1].name, "Manchester");
    assert_eq!(config.reference_location.candle_offset_minutes, 40);
}

#[test]
fn test_file_then_env() {
    let file = write_config("timezone = \"Europe/Paris\"\n");
    support::with_scoped_env(&env_with(&[("DIASPORA", Some("yes"))]), || {
        let config = ResolverConfig::from_file(file.path())
            .unwrap()
            .with_env_overrides()
            .unwrap();
        assert!(config.diaspora);
        assert_eq!(config.timezone, "Europe/Paris");
    });
}

#[test]
fn test_from_file_errors() {
    let missing = ResolverConfig::from_file("/definitely/not/here/shabbat-times.toml");
    assert!(matches!(missing, Err(ConfigError::Io { .. })));

    let broken = write_config("diaspora = [not toml");
    assert!(matches!(
        ResolverConfig::from_file(broken.path()),
        Err(ConfigError::Parse(_))
    ));

    let invalid = write_config("[hebcal]\ntimeout_secs = 0\n");
    assert!(matches!(
        ResolverConfig::from_file(invalid.path()),
        Err(ConfigError::Validation(_))
    ));
}
