//! Evening solar events (sunset, nightfall) for a date and observer.
//!
//! Uses the sunrise equation with the usual low-precision solar
//! coordinates; results are good to about a minute for latitudes where the
//! event exists.

use chrono::NaiveDate;
use qtty::Degrees;

use crate::models::{JulianDay, J2000};

/// Apparent altitude of the Sun's upper limb at sunset, refraction included.
pub const SUNSET_ALTITUDE: f64 = -0.833;

/// Sun altitude at which three medium stars are visible.
pub const STARS_VISIBLE_ALTITUDE: f64 = -8.5;

/// Obliquity of the ecliptic.
const OBLIQUITY: f64 = 23.4397;

/// Time, as a Julian Date, at which the Sun descends through `altitude` on
/// the evening of `date` at the given observer position.
///
/// Returns `None` when the Sun never reaches that altitude (polar day or
/// night).
pub fn evening_crossing(
    date: NaiveDate,
    latitude: Degrees,
    longitude: Degrees,
    altitude: Degrees,
) -> Option<JulianDay> {
    // Whole days from J2000.0 to noon UTC of the date.
    let day_number = JulianDay::at_midnight(date).since_j2000() + 0.5;
    let mean_noon = day_number - longitude.value() / 360.0;

    let mean_anomaly = Degrees::new((357.5291 + 0.985_600_28 * mean_noon).rem_euclid(360.0));
    let center = 1.9148 * mean_anomaly.sin()
        + 0.0200 * Degrees::new(2.0 * mean_anomaly.value()).sin()
        + 0.0003 * Degrees::new(3.0 * mean_anomaly.value()).sin();
    let ecliptic_longitude =
        Degrees::new((mean_anomaly.value() + center + 180.0 + 102.9372).rem_euclid(360.0));

    let transit = J2000 + mean_noon + 0.0053 * mean_anomaly.sin()
        - 0.0069 * Degrees::new(2.0 * ecliptic_longitude.value()).sin();

    let sin_declination = ecliptic_longitude.sin() * Degrees::new(OBLIQUITY).sin();
    let cos_declination = (1.0 - sin_declination * sin_declination).sqrt();

    let cos_hour_angle = (altitude.sin() - latitude.sin() * sin_declination)
        / (latitude.cos() * cos_declination);
    if !cos_hour_angle.is_finite() || !(-1.0..=1.0).contains(&cos_hour_angle) {
        return None;
    }

    let hour_angle = cos_hour_angle.acos().to_degrees();
    Some(JulianDay::new(transit + hour_angle / 360.0))
}

/// Sunset on `date`.
pub fn sunset(date: NaiveDate, latitude: Degrees, longitude: Degrees) -> Option<JulianDay> {
    evening_crossing(date, latitude, longitude, Degrees::new(SUNSET_ALTITUDE))
}

/// Nightfall (stars visible) on `date`.
pub fn stars_visible(date: NaiveDate, latitude: Degrees, longitude: Degrees) -> Option<JulianDay> {
    evening_crossing(date, latitude, longitude, Degrees::new(STARS_VISIBLE_ALTITUDE))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_jerusalem_winter_sunset() {
        // Published sunset for Jerusalem on 2025-01-24 is about 17:05 IST (15:05 UTC).
        let jd = sunset(date(2025, 1, 24), Degrees::new(31.7797), Degrees::new(35.2096)).unwrap();
        let dt = jd.to_datetime().unwrap();
        let expected = Utc.with_ymd_and_hms(2025, 1, 24, 15, 5, 0).unwrap();
        let diff = (dt - expected).num_minutes().abs();
        assert!(diff <= 5, "sunset {} too far from {}", dt, expected);
    }

    #[test]
    fn test_stars_after_sunset() {
        let lat = Degrees::new(31.7797);
        let lon = Degrees::new(35.2096);
        let d = date(2025, 6, 20);
        let set = sunset(d, lat, lon).unwrap();
        let stars = stars_visible(d, lat, lon).unwrap();
        assert!(stars.value() > set.value());
        // Between 20 and 60 minutes at this latitude
        let minutes = (stars.value() - set.value()) * 1440.0;
        assert!((20.0..60.0).contains(&minutes), "gap {} min", minutes);
    }

    #[test]
    fn test_sunset_falls_on_the_local_date() {
        // Western longitudes: sunset of the local date may be after 00:00 UTC
        let jd = sunset(date(2025, 1, 24), Degrees::new(40.71), Degrees::new(-74.0)).unwrap();
        let dt = jd.to_datetime().unwrap();
        let expected = Utc.with_ymd_and_hms(2025, 1, 24, 22, 10, 0).unwrap();
        assert!((dt - expected).num_minutes().abs() <= 10, "got {}", dt);
    }

    #[test]
    fn test_polar_summer_has_no_nightfall() {
        let d = date(2025, 6, 21);
        let lat = Degrees::new(69.65);
        let lon = Degrees::new(18.96);
        assert!(sunset(d, lat, lon).is_none());
        assert!(stars_visible(d, lat, lon).is_none());
    }

    #[test]
    fn test_mid_latitude_summer_has_no_stars_but_sunset() {
        // Stockholm at midsummer: the sun dips only about 7° below the horizon
        let d = date(2025, 6, 21);
        let lat = Degrees::new(59.33);
        let lon = Degrees::new(18.07);
        assert!(sunset(d, lat, lon).is_some());
        assert!(stars_visible(d, lat, lon).is_none());
    }
}
