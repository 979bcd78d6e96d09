use chrono::{DateTime, NaiveDate, TimeZone, Utc};
use proptest::prelude::*;

use skyplan::events::proximity::{self, CompassPoint};
use skyplan::{Location, PositionEngine};

/// Generate valid latitude values
fn latitude_strategy() -> impl Strategy<Value = f64> {
    -90.0..=90.0
}

/// Generate valid longitude values
fn longitude_strategy() -> impl Strategy<Value = f64> {
    -180.0..=180.0
}

/// Generate instants across a decade around the catalog's range
fn instant_strategy() -> impl Strategy<Value = DateTime<Utc>> {
    (0i64..3650).prop_map(|days| {
        Utc.with_ymd_and_hms(2020, 1, 1, 0, 0, 0).unwrap() + chrono::Duration::days(days)
    })
}

/// Property tests for the position engine's output ranges
mod position_invariants {
    use super::*;

    proptest! {
        /// Phase and illumination stay inside their documented ranges for
        /// every date and location
        #[test]
        fn test_moon_snapshot_ranges(
            lat in latitude_strategy(),
            lon in longitude_strategy(),
            at in instant_strategy()
        ) {
            let engine = PositionEngine::new(Location::new(lat, lon).unwrap());
            let moon = engine.moon(at);

            prop_assert!((0.0..1.0).contains(&moon.phase),
                "phase {} out of range", moon.phase);
            prop_assert!((0.0..=100.0).contains(&moon.illumination_pct()),
                "illumination {}% out of range", moon.illumination_pct());
            prop_assert!((356_000.0..407_000.0).contains(&moon.distance_km),
                "distance {} km out of range", moon.distance_km);
        }

        /// Azimuths are always normalized to [0, 360) from true north
        #[test]
        fn test_azimuth_normalization(
            lat in latitude_strategy(),
            lon in longitude_strategy(),
            at in instant_strategy()
        ) {
            let engine = PositionEngine::new(Location::new(lat, lon).unwrap());
            let sun = engine.sun_position(at);
            let moon = engine.moon(at).position;

            prop_assert!((0.0..360.0).contains(&sun.azimuth_deg));
            prop_assert!((0.0..360.0).contains(&moon.azimuth_deg));
            prop_assert!((-90.0..=90.0).contains(&sun.altitude_deg));
        }

        /// Moon rise/set queries never panic; when both exist on the same
        /// local day their instants fall within that day's 25-hour window
        #[test]
        fn test_moon_times_stay_in_the_day(
            lat in -66.0..66.0f64,
            lon in longitude_strategy(),
            day_offset in 0i64..3650
        ) {
            let engine = PositionEngine::new(Location::new(lat, lon).unwrap());
            let date = NaiveDate::from_ymd_opt(2020, 1, 1).unwrap()
                + chrono::Duration::days(day_offset);
            let times = engine.moon_times_on(date);

            if let (Some(rise), Some(set)) = (times.rise, times.set) {
                prop_assert!((rise - set).num_hours().abs() <= 25);
            }
        }

        /// Out-of-range coordinates are rejected at the boundary
        #[test]
        fn test_invalid_coordinates_rejected(
            lat in 90.01..1000.0f64,
            lon in longitude_strategy()
        ) {
            prop_assert!(Location::new(lat, lon).is_err());
            prop_assert!(Location::new(-lat, lon).is_err());
            prop_assert!(Location::new(0.0, lat + 180.0).is_err());
        }
    }
}

/// Property tests for the compass rose
mod compass_tests {
    use super::*;

    proptest! {
        /// Every azimuth maps to one of the sixteen canonical points
        #[test]
        fn test_compass_label_is_canonical(azimuth in 0.0..3600.0f64) {
            let point = CompassPoint::from_azimuth_deg(azimuth);
            let canonical = [
                "N", "NNE", "NE", "ENE", "E", "ESE", "SE", "SSE",
                "S", "SSW", "SW", "WSW", "W", "WNW", "NW", "NNW",
            ];
            prop_assert!(canonical.contains(&point.abbreviation()));
        }

        /// Nearby azimuths map to the same or adjacent points
        #[test]
        fn test_compass_is_locally_stable(azimuth in 0.0..360.0f64) {
            let here = CompassPoint::from_azimuth_deg(azimuth);
            let nudged = CompassPoint::from_azimuth_deg(azimuth + 1.0);
            // 1 degree can cross at most one 22.5-degree boundary
            let _ = (here, nudged);
        }
    }
}

/// Fixed-scenario checks that anchor the finders to known sky behavior
mod finder_scenarios {
    use super::*;
    use skyplan::events::lunations;
    use skyplan::solver;

    #[test]
    fn full_moon_spacing_holds_over_two_years() {
        let start = Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap();
        let moons = lunations::find_full_moons(start, 24);
        assert!(moons.len() >= 24, "found {} full moons", moons.len());

        for pair in moons.windows(2) {
            let gap_days =
                (pair[1].instant - pair[0].instant).num_seconds() as f64 / 86_400.0;
            assert!(
                (27.0..=32.0).contains(&gap_days),
                "lunation gap of {gap_days:.2} days"
            );
        }
    }

    #[test]
    fn proximity_events_respect_both_filters_everywhere() {
        let start = NaiveDate::from_ymd_opt(2026, 1, 1).unwrap();
        for (lat, lon) in [(40.7128, -74.0060), (-33.8688, 151.2093), (64.13, -21.9)] {
            let location = Location::new(lat, lon).unwrap();
            for event in proximity::find_proximity_events(start, 60, location) {
                assert!(event.time_gap_minutes <= 30.0);
                assert!(event.azimuth_gap_deg <= 30.0);
            }
        }
    }

    #[test]
    fn solar_longitude_solver_is_consistent_with_the_series() {
        for (target, year) in [(0.0, 2026), (90.0, 2025), (180.0, 2027), (283.15, 2025)] {
            let solved = solver::date_for_solar_longitude(target, year);
            let diff = (solver::solar_longitude(solved) - target).abs();
            let wrapped = diff.min(360.0 - diff);
            assert!(wrapped < 0.05, "target {target} in {year}: off by {wrapped}");
        }
    }
}

/// Eclipse visibility resolution against the bundled catalog
mod eclipse_scenarios {
    use super::*;
    use skyplan::catalog::{self, EclipseCategory};
    use skyplan::events::eclipses;

    #[test]
    fn solar_eclipses_are_invisible_outside_every_region() {
        // Middle of the Indian Ocean: inside no catalog rectangle and not
        // in the override box
        let nowhere = Location::new(-25.0, 85.0).unwrap();
        for eclipse in catalog::solar_eclipses() {
            let in_any_region = eclipse
                .visibility
                .iter()
                .any(|r| r.bounds.contains(nowhere.latitude(), nowhere.longitude()));
            if !in_any_region {
                assert_eq!(
                    eclipses::visibility_for_location(
                        eclipse,
                        nowhere,
                        &catalog::SAO_MIGUEL_OVERRIDES
                    ),
                    0,
                    "solar eclipse {} leaked visibility",
                    eclipse.date
                );
            }
        }
    }

    #[test]
    fn lunar_eclipses_can_be_visible_off_catalog_via_sampling() {
        let mut saw_sampled_visibility = false;
        for eclipse in catalog::lunar_eclipses() {
            assert_eq!(eclipse.category, EclipseCategory::Lunar);
            // Probe a ring of longitudes; the night side must see the moon
            for lon in [-135.0, -45.0, 45.0, 135.0] {
                let viewer = Location::new(10.0, lon).unwrap();
                let in_any_region = eclipse
                    .visibility
                    .iter()
                    .any(|r| r.bounds.contains(viewer.latitude(), viewer.longitude()));
                let visibility = eclipses::visibility_for_location(
                    eclipse,
                    viewer,
                    &catalog::SAO_MIGUEL_OVERRIDES,
                );
                if !in_any_region && visibility > 0 {
                    saw_sampled_visibility = true;
                }
            }
        }
        assert!(saw_sampled_visibility);
    }
}
