//! Low-precision astronomical ephemeris provider.
//!
//! Self-contained sun/moon model good to a few arc-minutes, which is plenty
//! for planning photographs. Formulas are the classic low-order series in
//! days since J2000 (mean elements plus the leading periodic corrections).
//!
//! ## Provider conventions
//!
//! Angles at this layer are **radians**, and azimuth is measured **from
//! south**, positive westward. The [`crate::position`] adapter is the only
//! consumer and normalizes everything to north-based degrees; nothing else in
//! the crate should call into here directly.

pub mod moon;
pub mod sun;

use chrono::{DateTime, Utc};

pub(crate) const DAY_MS: f64 = 86_400_000.0;
const J1970: f64 = 2_440_588.0;
pub(crate) const J2000: f64 = 2_451_545.0;

/// Obliquity of the ecliptic, degrees.
const OBLIQUITY_DEG: f64 = 23.4397;

/// Equatorial coordinates of a body, radians.
#[derive(Debug, Clone, Copy)]
pub(crate) struct EquatorialCoords {
    pub right_ascension: f64,
    pub declination: f64,
}

/// Horizontal position of a body in provider conventions: radians, azimuth
/// from south.
#[derive(Debug, Clone, Copy)]
pub struct RawPosition {
    pub azimuth: f64,
    pub altitude: f64,
}

pub(crate) fn to_julian(at: DateTime<Utc>) -> f64 {
    at.timestamp_millis() as f64 / DAY_MS - 0.5 + J1970
}

pub(crate) fn from_julian(julian: f64) -> Option<DateTime<Utc>> {
    let ms = (julian + 0.5 - J1970) * DAY_MS;
    if !ms.is_finite() {
        return None;
    }
    DateTime::<Utc>::from_timestamp_millis(ms.round() as i64)
}

pub(crate) fn days_since_j2000(at: DateTime<Utc>) -> f64 {
    to_julian(at) - J2000
}

pub(crate) fn right_ascension(ecl_lon: f64, ecl_lat: f64) -> f64 {
    let e = OBLIQUITY_DEG.to_radians();
    (ecl_lon.sin() * e.cos() - ecl_lat.tan() * e.sin()).atan2(ecl_lon.cos())
}

pub(crate) fn declination(ecl_lon: f64, ecl_lat: f64) -> f64 {
    let e = OBLIQUITY_DEG.to_radians();
    (ecl_lat.sin() * e.cos() + ecl_lat.cos() * e.sin() * ecl_lon.sin()).asin()
}

/// Azimuth from south, positive westward.
pub(crate) fn azimuth(hour_angle: f64, observer_lat: f64, dec: f64) -> f64 {
    hour_angle
        .sin()
        .atan2(hour_angle.cos() * observer_lat.sin() - dec.tan() * observer_lat.cos())
}

pub(crate) fn altitude(hour_angle: f64, observer_lat: f64, dec: f64) -> f64 {
    (observer_lat.sin() * dec.sin() + observer_lat.cos() * dec.cos() * hour_angle.cos()).asin()
}

/// Local apparent sidereal time, radians, for west longitude `lw`.
pub(crate) fn sidereal_time(d: f64, lw: f64) -> f64 {
    (280.16 + 360.985_623_5 * d).to_radians() - lw
}

/// Atmospheric refraction correction for an apparent altitude, radians.
/// Only meaningful near and above the horizon; negative altitudes are
/// treated as zero before evaluating the formula.
pub(crate) fn astro_refraction(altitude: f64) -> f64 {
    let h = altitude.max(0.0);
    0.000_296_7 / (h + 0.003_125_36 / (h + 0.089_011_79)).tan()
}
