//! Solar position and event-time calculations.
//!
//! Positions come from the sun's mean anomaly and ecliptic longitude with the
//! equation-of-center correction. Event times invert the altitude formula for
//! a set of standard sun angles (horizon, civil/nautical/astronomical
//! twilight, golden hour) around the solar transit of the requested day.

use std::f64::consts::PI;

use chrono::{DateTime, Utc};

use super::{
    EquatorialCoords, J2000, RawPosition, altitude, azimuth, days_since_j2000, declination,
    from_julian, right_ascension, sidereal_time,
};

const J0: f64 = 0.0009;

/// Sun angle (degrees) defining sunrise and sunset, accounting for the solar
/// disc radius and standard refraction.
const SUNRISE_ANGLE_DEG: f64 = -0.833;
/// Civil twilight boundary.
const CIVIL_ANGLE_DEG: f64 = -6.0;
/// Nautical twilight boundary.
const NAUTICAL_ANGLE_DEG: f64 = -12.0;
/// Astronomical night boundary.
const NIGHT_ANGLE_DEG: f64 = -18.0;
/// Upper edge of the golden-hour band.
const GOLDEN_HOUR_ANGLE_DEG: f64 = 6.0;

pub(crate) fn solar_mean_anomaly(d: f64) -> f64 {
    (357.5291 + 0.985_600_28 * d).to_radians()
}

pub(crate) fn ecliptic_longitude(mean_anomaly: f64) -> f64 {
    let m = mean_anomaly;
    // Equation of center
    let c = (1.9148 * m.sin() + 0.02 * (2.0 * m).sin() + 0.0003 * (3.0 * m).sin()).to_radians();
    // Perihelion of the Earth
    let p = 102.9372_f64.to_radians();
    m + c + p + PI
}

pub(crate) fn sun_coords(d: f64) -> EquatorialCoords {
    let l = ecliptic_longitude(solar_mean_anomaly(d));
    EquatorialCoords {
        right_ascension: right_ascension(l, 0.0),
        declination: declination(l, 0.0),
    }
}

/// Sun position at an instant, in provider conventions (radians, azimuth
/// from south).
pub fn sun_position(at: DateTime<Utc>, latitude: f64, longitude: f64) -> RawPosition {
    let lw = (-longitude).to_radians();
    let phi = latitude.to_radians();
    let d = days_since_j2000(at);

    let c = sun_coords(d);
    let h = sidereal_time(d, lw) - c.right_ascension;

    RawPosition {
        azimuth: azimuth(h, phi, c.declination),
        altitude: altitude(h, phi, c.declination),
    }
}

/// The sun's event times for one solar day.
///
/// Every boundary except `solar_noon` is `None` when the sun never reaches
/// the defining angle on that day (polar summer/winter, high-latitude
/// twilight that never ends). Callers treat `None` as "no event today".
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SunTimes {
    pub solar_noon: DateTime<Utc>,
    pub sunrise: Option<DateTime<Utc>>,
    pub sunset: Option<DateTime<Utc>>,
    /// Civil dawn and dusk (sun at -6°).
    pub dawn: Option<DateTime<Utc>>,
    pub dusk: Option<DateTime<Utc>>,
    /// Nautical dawn and dusk (sun at -12°).
    pub nautical_dawn: Option<DateTime<Utc>>,
    pub nautical_dusk: Option<DateTime<Utc>>,
    /// Astronomical night boundaries (sun at -18°).
    pub night_start: Option<DateTime<Utc>>,
    pub night_end: Option<DateTime<Utc>>,
    /// Evening golden hour start and morning golden hour end (sun at +6°).
    pub golden_hour_start: Option<DateTime<Utc>>,
    pub golden_hour_end: Option<DateTime<Utc>>,
}

fn julian_cycle(d: f64, lw: f64) -> f64 {
    (d - J0 - lw / (2.0 * PI)).round()
}

fn approx_transit(ht: f64, lw: f64, n: f64) -> f64 {
    J0 + (ht + lw) / (2.0 * PI) + n
}

fn solar_transit_j(ds: f64, mean_anomaly: f64, ecl_lon: f64) -> f64 {
    J2000 + ds + 0.0053 * mean_anomaly.sin() - 0.0069 * (2.0 * ecl_lon).sin()
}

fn hour_angle(h: f64, phi: f64, dec: f64) -> f64 {
    ((h.sin() - phi.sin() * dec.sin()) / (phi.cos() * dec.cos())).acos()
}

/// Julian date at which the sun sets through `angle_deg`, or `None` when the
/// sun never crosses that angle on this day.
#[allow(clippy::too_many_arguments)]
fn set_time_j(
    angle_deg: f64,
    lw: f64,
    phi: f64,
    dec: f64,
    n: f64,
    mean_anomaly: f64,
    ecl_lon: f64,
) -> Option<f64> {
    let w = hour_angle(angle_deg.to_radians(), phi, dec);
    if w.is_nan() {
        return None;
    }
    let a = approx_transit(w, lw, n);
    Some(solar_transit_j(a, mean_anomaly, ecl_lon))
}

/// Compute the sun's event times for the solar day containing `anchor`.
///
/// `anchor` should be an instant near the middle of the desired local day
/// (local noon works well); the longitude-dependent Julian cycle then picks
/// the correct transit.
pub fn sun_times(anchor: DateTime<Utc>, latitude: f64, longitude: f64) -> SunTimes {
    let lw = (-longitude).to_radians();
    let phi = latitude.to_radians();

    let d = days_since_j2000(anchor);
    let n = julian_cycle(d, lw);
    let ds = approx_transit(0.0, lw, n);

    let m = solar_mean_anomaly(ds);
    let l = ecliptic_longitude(m);
    let dec = declination(l, 0.0);

    let j_noon = solar_transit_j(ds, m, l);
    let solar_noon = from_julian(j_noon).unwrap_or(anchor);

    // For each sun angle the setting time comes from the hour angle and the
    // rising time mirrors it across the transit.
    let pair = |angle_deg: f64| -> (Option<DateTime<Utc>>, Option<DateTime<Utc>>) {
        match set_time_j(angle_deg, lw, phi, dec, n, m, l) {
            Some(j_set) => {
                let j_rise = j_noon - (j_set - j_noon);
                (from_julian(j_rise), from_julian(j_set))
            }
            None => (None, None),
        }
    };

    let (sunrise, sunset) = pair(SUNRISE_ANGLE_DEG);
    let (dawn, dusk) = pair(CIVIL_ANGLE_DEG);
    let (nautical_dawn, nautical_dusk) = pair(NAUTICAL_ANGLE_DEG);
    let (night_end, night_start) = pair(NIGHT_ANGLE_DEG);
    let (golden_hour_end, golden_hour_start) = pair(GOLDEN_HOUR_ANGLE_DEG);

    SunTimes {
        solar_noon,
        sunrise,
        sunset,
        dawn,
        dusk,
        nautical_dawn,
        nautical_dusk,
        night_start,
        night_end,
        golden_hour_start,
        golden_hour_end,
    }
}
