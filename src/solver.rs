//! Bounded root-finders for astronomical states.
//!
//! Two solvers live here: a bisection refiner for moon-phase crossings and a
//! bisection solver for target solar longitudes. Both are iteration-bounded
//! and return their best estimate when the budget runs out; the states they
//! solve for are guaranteed to exist within a lunar or solar cycle, so there
//! is no failure path.

use chrono::{DateTime, Duration, NaiveDate, Utc};

use crate::constants::{
    PHASE_REFINE_MAX_ITERATIONS, SOLAR_LONGITUDE_MAX_ITERATIONS, SOLAR_LONGITUDE_TOLERANCE_DEG,
    SOLAR_LONGITUDE_WINDOW_DAYS,
};
use crate::ephemeris::{DAY_MS, J2000, moon, to_julian};

/// Distance between two phase fractions on the cyclic [0, 1) scale.
///
/// Makes 0.98 and 0.02 neighbors, which is what lets the same refiner serve
/// both full-moon (target 0.5) and new-moon (target 0) searches.
pub fn cyclic_phase_distance(phase: f64, target: f64) -> f64 {
    let d = (phase - target).abs();
    d.min(1.0 - d)
}

/// Refine a moon-phase crossing inside a known bracket.
///
/// The bracket `[lo, hi]` must contain an instant where the phase reaches
/// `target`. Each step compares the phase distance one second ahead of the
/// midpoint against the midpoint itself and moves the bound on the side
/// that is walking away from the target. Stops after at most 50 iterations
/// or once the bracket is under a second wide; returns the bracket midpoint.
pub fn refine_phase_crossing(
    lo: DateTime<Utc>,
    hi: DateTime<Utc>,
    target: f64,
) -> DateTime<Utc> {
    let mut lo = lo;
    let mut hi = hi;

    for _ in 0..PHASE_REFINE_MAX_ITERATIONS {
        let mid = lo + (hi - lo) / 2;

        let dist_mid = cyclic_phase_distance(moon::moon_illumination(mid).phase, target);
        let dist_next = cyclic_phase_distance(
            moon::moon_illumination(mid + Duration::seconds(1)).phase,
            target,
        );

        // Phase still improving just past the midpoint: the crossing is to
        // the right, otherwise it is at or left of the midpoint.
        if dist_next < dist_mid {
            lo = mid;
        } else {
            hi = mid;
        }

        if hi - lo < Duration::seconds(1) {
            break;
        }
    }

    lo + (hi - lo) / 2
}

/// Apparent ecliptic longitude of the sun in degrees, [0, 360).
///
/// Low-order series in centuries since J2000: mean longitude plus the
/// equation-of-center terms in the mean anomaly. Accurate to well under the
/// solver tolerance across the catalog's date range.
pub fn solar_longitude(at: DateTime<Utc>) -> f64 {
    let t = (to_julian(at) - J2000) / 36525.0;

    let l0 = 280.46646 + 36000.76983 * t + 0.0003032 * t * t;
    let m = (357.52911 + 35999.05029 * t - 0.0001537 * t * t).to_radians();

    let c = (1.914602 - 0.004817 * t - 0.000014 * t * t) * m.sin()
        + (0.019993 - 0.000101 * t) * (2.0 * m).sin()
        + 0.000290 * (3.0 * m).sin();

    (l0 + c).rem_euclid(360.0)
}

/// Wrap an angular difference to (-180, 180] degrees.
fn wrap_signed_degrees(mut deg: f64) -> f64 {
    if deg > 180.0 {
        deg -= 360.0;
    }
    if deg < -180.0 {
        deg += 360.0;
    }
    deg
}

/// Find the instant the sun reaches `target_deg` of ecliptic longitude in
/// the solar year anchored at `year`'s March equinox.
///
/// Seeds `(target/360)·365.25` days past March 20 of `year`, then bisects a
/// ±5-day window on the signed wrapped longitude difference. At most 20
/// iterations with a 0.01° tolerance; the seed estimate is returned if the
/// window never tightens enough.
pub fn date_for_solar_longitude(target_deg: f64, year: i32) -> DateTime<Utc> {
    let march_equinox = NaiveDate::from_ymd_opt(year, 3, 20)
        .unwrap_or(NaiveDate::MIN)
        .and_hms_opt(0, 0, 0)
        .unwrap_or_default()
        .and_utc();

    let days_from_equinox = (target_deg / 360.0) * 365.25;
    let estimate = march_equinox + Duration::milliseconds((days_from_equinox * DAY_MS) as i64);

    let mut low = estimate - Duration::days(SOLAR_LONGITUDE_WINDOW_DAYS);
    let mut high = estimate + Duration::days(SOLAR_LONGITUDE_WINDOW_DAYS);

    for _ in 0..SOLAR_LONGITUDE_MAX_ITERATIONS {
        let mid = low + (high - low) / 2;
        let diff = wrap_signed_degrees(solar_longitude(mid) - target_deg);

        if diff.abs() < SOLAR_LONGITUDE_TOLERANCE_DEG {
            return mid;
        }

        if diff < 0.0 {
            low = mid;
        } else {
            high = mid;
        }
    }

    estimate
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Datelike, TimeZone};
    use crate::constants::PHASE_DETECTION_EPSILON;

    #[test]
    fn cyclic_distance_handles_wraparound() {
        assert!((cyclic_phase_distance(0.98, 0.0) - 0.02).abs() < 1e-12);
        assert!((cyclic_phase_distance(0.02, 0.0) - 0.02).abs() < 1e-12);
        assert!((cyclic_phase_distance(0.4, 0.5) - 0.1).abs() < 1e-12);
        assert_eq!(cyclic_phase_distance(0.5, 0.5), 0.0);
    }

    #[test]
    fn refined_full_moon_beats_both_bracket_endpoints() {
        // A day bracket known to contain the January 2026 full moon
        let lo = Utc.with_ymd_and_hms(2026, 1, 3, 0, 0, 0).unwrap();
        let hi = Utc.with_ymd_and_hms(2026, 1, 4, 0, 0, 0).unwrap();

        let refined = refine_phase_crossing(lo, hi, 0.5);
        assert!(refined >= lo && refined <= hi);

        let dist = |t| cyclic_phase_distance(moon::moon_illumination(t).phase, 0.5);
        assert!(dist(refined) <= dist(lo));
        assert!(dist(refined) <= dist(hi));
        assert!(dist(refined) < PHASE_DETECTION_EPSILON);
    }

    #[test]
    fn solar_longitude_is_near_zero_at_march_equinox() {
        let equinox = Utc.with_ymd_and_hms(2026, 3, 20, 14, 0, 0).unwrap();
        let lon = solar_longitude(equinox);
        assert!(lon < 1.0 || lon > 359.0, "equinox longitude was {lon}");
    }

    #[test]
    fn solstice_longitudes_land_on_the_right_dates() {
        // Summer solstice: longitude 90 falls on June 20-21
        let summer = date_for_solar_longitude(90.0, 2026);
        assert_eq!(summer.month(), 6);
        assert!((20..=21).contains(&summer.day()), "day {}", summer.day());

        // Winter solstice: longitude 270 falls on December 21-22
        let winter = date_for_solar_longitude(270.0, 2026);
        assert_eq!(winter.month(), 12);
        assert!((21..=22).contains(&winter.day()), "day {}", winter.day());
    }

    #[test]
    fn solved_longitude_matches_the_target() {
        for target in [0.0, 45.5, 140.0, 262.2, 283.15] {
            let solved = date_for_solar_longitude(target, 2025);
            let diff = (solar_longitude(solved) - target).abs();
            let wrapped = diff.min(360.0 - diff);
            assert!(
                wrapped < 0.05,
                "target {target}: solved to {} ({} off)",
                solved,
                wrapped
            );
        }
    }
}
