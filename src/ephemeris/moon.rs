//! Lunar position, illumination, and rise/set calculations.
//!
//! The lunar model uses the mean longitude, mean anomaly, and mean distance
//! series with the leading periodic terms. Rise and set times come from
//! scanning the day's altitude curve in two-hour steps and interpolating the
//! horizon crossings quadratically, so circumpolar days naturally produce no
//! crossing at all.

use chrono::{DateTime, Duration, Utc};

use super::{
    RawPosition, altitude, astro_refraction, azimuth, days_since_j2000, declination,
    right_ascension, sidereal_time,
};

/// Mean Earth-Sun distance, km. Used for the illumination phase geometry.
const SUN_DISTANCE_KM: f64 = 149_598_000.0;

/// Altitude correction (degrees) applied when searching for moonrise and
/// moonset, covering refraction plus the lunar semi-diameter.
const MOON_RISE_SET_ANGLE_DEG: f64 = 0.133;

#[derive(Debug, Clone, Copy)]
pub(crate) struct MoonCoords {
    pub right_ascension: f64,
    pub declination: f64,
    pub distance_km: f64,
}

pub(crate) fn moon_coords(d: f64) -> MoonCoords {
    // Mean longitude, mean anomaly, mean distance of the moon
    let l = (218.316 + 13.176_396 * d).to_radians();
    let m = (134.963 + 13.064_993 * d).to_radians();
    let f = (93.272 + 13.229_350 * d).to_radians();

    let ecl_lon = l + 6.289_f64.to_radians() * m.sin();
    let ecl_lat = 5.128_f64.to_radians() * f.sin();
    let distance_km = 385_001.0 - 20_905.0 * m.cos();

    MoonCoords {
        right_ascension: right_ascension(ecl_lon, ecl_lat),
        declination: declination(ecl_lon, ecl_lat),
        distance_km,
    }
}

/// Moon position at an instant, in provider conventions (radians, azimuth
/// from south), with the distance at that instant.
#[derive(Debug, Clone, Copy)]
pub struct RawMoonPosition {
    pub position: RawPosition,
    pub distance_km: f64,
}

pub fn moon_position(at: DateTime<Utc>, latitude: f64, longitude: f64) -> RawMoonPosition {
    let lw = (-longitude).to_radians();
    let phi = latitude.to_radians();
    let d = days_since_j2000(at);

    let c = moon_coords(d);
    let h = sidereal_time(d, lw) - c.right_ascension;

    let raw_altitude = altitude(h, phi, c.declination);
    let corrected = raw_altitude + astro_refraction(raw_altitude);

    RawMoonPosition {
        position: RawPosition {
            azimuth: azimuth(h, phi, c.declination),
            altitude: corrected,
        },
        distance_km: c.distance_km,
    }
}

/// Phase geometry of the moon at an instant.
#[derive(Debug, Clone, Copy)]
pub struct MoonIllumination {
    /// Illuminated fraction of the disc, [0, 1].
    pub fraction: f64,
    /// Phase of the lunation cycle, [0, 1): 0 new, 0.25 first quarter,
    /// 0.5 full, 0.75 last quarter.
    pub phase: f64,
}

pub fn moon_illumination(at: DateTime<Utc>) -> MoonIllumination {
    let d = days_since_j2000(at);
    let s = super::sun::sun_coords(d);
    let m = moon_coords(d);

    // Geocentric elongation of the moon from the sun
    let phi = (s.declination.sin() * m.declination.sin()
        + s.declination.cos() * m.declination.cos() * (s.right_ascension - m.right_ascension).cos())
    .acos();
    // Selenocentric phase angle
    let inc = (SUN_DISTANCE_KM * phi.sin()).atan2(m.distance_km - SUN_DISTANCE_KM * phi.cos());
    // Position angle of the bright limb decides waxing vs waning
    let angle = (s.declination.cos() * (s.right_ascension - m.right_ascension).sin()).atan2(
        s.declination.sin() * m.declination.cos()
            - s.declination.cos()
                * m.declination.sin()
                * (s.right_ascension - m.right_ascension).cos(),
    );

    let fraction = (1.0 + inc.cos()) / 2.0;
    let signed = if angle < 0.0 { -1.0 } else { 1.0 };
    let phase = (0.5 + 0.5 * inc * signed / std::f64::consts::PI).rem_euclid(1.0);

    MoonIllumination { fraction, phase }
}

/// Approximate ecliptic longitude of the moon in degrees, [0, 360).
/// Coarser than the positional series; intended for zodiac placement.
pub fn ecliptic_longitude_deg(at: DateTime<Utc>) -> f64 {
    let d = days_since_j2000(at);
    let l = (218.316 + 13.176_396 * d).rem_euclid(360.0);
    let m = (134.963 + 13.064_993 * d).rem_euclid(360.0).to_radians();
    let f = (93.272 + 13.229_350 * d).rem_euclid(360.0).to_radians();

    let longitude =
        l + 6.289 * m.sin() + 1.274 * (2.0 * f - m).sin() + 0.658 * (2.0 * f).sin();
    longitude.rem_euclid(360.0)
}

/// Moonrise and moonset within one local day.
///
/// Either or both may be `None`: a circumpolar moon stays above (or below)
/// the horizon for the whole day. Absence is data, not an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MoonTimes {
    pub rise: Option<DateTime<Utc>>,
    pub set: Option<DateTime<Utc>>,
}

fn hours_later(t: DateTime<Utc>, hours: f64) -> DateTime<Utc> {
    t + Duration::milliseconds((hours * 3_600_000.0).round() as i64)
}

/// Find moonrise and moonset in the 24 hours starting at `day_start`.
///
/// Scans the altitude curve in two-hour steps and fits a parabola through
/// each triple of samples; real roots inside a step are horizon crossings.
pub fn moon_times(day_start: DateTime<Utc>, latitude: f64, longitude: f64) -> MoonTimes {
    let hc = MOON_RISE_SET_ANGLE_DEG.to_radians();
    let altitude_at = |hours: f64| -> f64 {
        moon_position(hours_later(day_start, hours), latitude, longitude)
            .position
            .altitude
            - hc
    };

    let mut h0 = altitude_at(0.0);
    let mut rise_hour: Option<f64> = None;
    let mut set_hour: Option<f64> = None;

    let mut i = 1.0;
    while i <= 24.0 {
        let h1 = altitude_at(i);
        let h2 = altitude_at(i + 1.0);

        // Parabola through (−1, h0), (0, h1), (1, h2)
        let a = (h0 + h2) / 2.0 - h1;
        let b = (h2 - h0) / 2.0;
        let xe = -b / (2.0 * a);
        let ye = (a * xe + b) * xe + h1;
        let discriminant = b * b - 4.0 * a * h1;

        let mut roots = 0;
        let mut x1 = 0.0;
        let mut x2 = 0.0;
        if discriminant >= 0.0 {
            let dx = discriminant.sqrt() / (a.abs() * 2.0);
            x1 = xe - dx;
            x2 = xe + dx;
            if x1.abs() <= 1.0 {
                roots += 1;
            }
            if x2.abs() <= 1.0 {
                roots += 1;
            }
            if x1 < -1.0 {
                x1 = x2;
            }
        }

        if roots == 1 {
            if h0 < 0.0 {
                rise_hour = Some(i + x1);
            } else {
                set_hour = Some(i + x1);
            }
        } else if roots == 2 {
            rise_hour = Some(i + if ye < 0.0 { x2 } else { x1 });
            set_hour = Some(i + if ye < 0.0 { x1 } else { x2 });
        }

        if rise_hour.is_some() && set_hour.is_some() {
            break;
        }

        h0 = h2;
        i += 2.0;
    }

    MoonTimes {
        rise: rise_hour.map(|h| hours_later(day_start, h)),
        set: set_hour.map(|h| hours_later(day_start, h)),
    }
}
