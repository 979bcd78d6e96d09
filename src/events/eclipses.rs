//! Eclipse visibility resolution for a viewer's coordinates.
//!
//! Catalog eclipses carry coarse rectangular visibility regions. Resolution
//! layers three sources, keeping the maximum:
//!
//! 1. the high-precision override table, when the viewer is inside its
//!    bounding box and the event has a surveyed value;
//! 2. every static catalog region containing the viewer;
//! 3. for lunar eclipses only, a local estimate from sampling the moon's
//!    altitude across the eclipse window. A lunar eclipse looks the same
//!    from everywhere the moon is up, so "fraction of the window with the
//!    moon above the horizon" is a sound local estimate. Solar eclipses are
//!    path-dependent and never receive this term.

use chrono::{DateTime, Duration, Utc};
use once_cell::sync::Lazy;
use regex::Regex;

use crate::catalog::{self, EclipseCategory, EclipseEvent, PrecisionOverrides};
use crate::constants::ECLIPSE_SAMPLE_STEP_MINUTES;
use crate::ephemeris::moon;
use crate::location::Location;

static DURATION_HOURS: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(\d+)\s*h").expect("duration hours pattern is valid")
});
static DURATION_MINUTES: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(\d+)\s*m").expect("duration minutes pattern is valid")
});
static DURATION_SECONDS: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(\d+)\s*s").expect("duration seconds pattern is valid")
});

/// Parse a catalog duration string like "3h 38m 0s" into minutes.
/// Missing components count as zero.
pub fn parse_duration_minutes(duration: &str) -> f64 {
    let capture = |re: &Regex| -> f64 {
        re.captures(duration)
            .and_then(|c| c.get(1))
            .and_then(|m| m.as_str().parse::<f64>().ok())
            .unwrap_or(0.0)
    };

    capture(&DURATION_HOURS) * 60.0 + capture(&DURATION_MINUTES) + capture(&DURATION_SECONDS) / 60.0
}

fn override_key(eclipse: &EclipseEvent) -> String {
    eclipse.date.format("%Y-%m-%dT%H:%M:%SZ").to_string()
}

/// Surveyed override value for this eclipse, if the viewer stands inside the
/// override table's own bounding box and the event was surveyed.
fn precision_override(
    eclipse: &EclipseEvent,
    location: Location,
    overrides: &PrecisionOverrides,
) -> Option<u8> {
    if !overrides
        .location
        .bounds
        .contains(location.latitude(), location.longitude())
    {
        return None;
    }

    let table = match eclipse.category {
        EclipseCategory::Solar => &overrides.solar,
        EclipseCategory::Lunar => &overrides.lunar,
    };
    table.get(&override_key(eclipse)).copied()
}

/// Fraction of the eclipse window with the moon above the local horizon,
/// as a percentage. Samples every five minutes across the duration window
/// centered on the catalog instant.
fn local_lunar_visibility(eclipse: &EclipseEvent, location: Location) -> u8 {
    let duration_minutes = parse_duration_minutes(&eclipse.duration).max(1.0);
    let half_window = Duration::seconds((duration_minutes * 30.0) as i64);

    let start = eclipse.date - half_window;
    let end = eclipse.date + half_window;

    let mut total = 0_u32;
    let mut visible = 0_u32;

    let mut t: DateTime<Utc> = start;
    while t <= end {
        let position = moon::moon_position(t, location.latitude(), location.longitude());
        total += 1;
        if position.position.altitude > 0.0 {
            visible += 1;
        }
        t += Duration::minutes(ECLIPSE_SAMPLE_STEP_MINUTES);
    }

    if total == 0 {
        return 0;
    }
    ((f64::from(visible) / f64::from(total)) * 100.0).round() as u8
}

/// Resolve the visibility percentage of an eclipse for a viewer.
pub fn visibility_for_location(
    eclipse: &EclipseEvent,
    location: Location,
    overrides: &PrecisionOverrides,
) -> u8 {
    let mut best = precision_override(eclipse, location, overrides).unwrap_or(0);

    for region in &eclipse.visibility {
        if region
            .bounds
            .contains(location.latitude(), location.longitude())
        {
            best = best.max(region.percentage);
        }
    }

    if eclipse.category == EclipseCategory::Lunar {
        best = best.max(local_lunar_visibility(eclipse, location));
    }

    best
}

/// All catalog eclipses within `years` of `from`, sorted by date.
pub fn upcoming_eclipses(from: DateTime<Utc>, years: u32) -> Vec<&'static EclipseEvent> {
    let end = from
        .checked_add_months(chrono::Months::new(years.saturating_mul(12)))
        .unwrap_or(from);

    let mut upcoming: Vec<&EclipseEvent> = catalog::lunar_eclipses()
        .iter()
        .chain(catalog::solar_eclipses().iter())
        .filter(|eclipse| eclipse.date >= from && eclipse.date <= end)
        .collect();

    upcoming.sort_by_key(|eclipse| eclipse.date);
    upcoming
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Datelike, TimeZone};

    fn overrides() -> &'static PrecisionOverrides {
        &catalog::SAO_MIGUEL_OVERRIDES
    }

    #[test]
    fn duration_parsing_handles_all_components() {
        assert!((parse_duration_minutes("3h 38m 0s") - 218.0).abs() < 1e-9);
        assert!((parse_duration_minutes("1h") - 60.0).abs() < 1e-9);
        assert!((parse_duration_minutes("45m 30s") - 45.5).abs() < 1e-9);
        assert_eq!(parse_duration_minutes("nonsense"), 0.0);
    }

    #[test]
    fn solar_visibility_is_zero_outside_every_region() {
        // A point in the central Indian Ocean, outside all 2025-03-29
        // regions and the override box
        let location = Location::new(-30.0, 80.0).unwrap();
        let eclipse = catalog::solar_eclipses()
            .iter()
            .find(|e| e.date.year() == 2025 && e.date.month() == 3)
            .expect("catalog has the March 2025 solar eclipse");
        assert_eq!(visibility_for_location(eclipse, location, overrides()), 0);
    }

    #[test]
    fn lunar_visibility_can_exceed_region_values_via_sampling() {
        // Lunar eclipses get the altitude-sampling floor even where no
        // catalog rectangle applies
        let eclipse = &catalog::lunar_eclipses()[0];
        let mut any_positive = false;
        for lon in [-150.0, -75.0, 0.0, 75.0, 150.0] {
            let location = Location::new(20.0, lon).unwrap();
            if visibility_for_location(eclipse, location, overrides()) > 0 {
                any_positive = true;
            }
        }
        assert!(any_positive, "moon was below the horizon everywhere");
    }

    #[test]
    fn override_applies_only_inside_its_box() {
        let eclipse = catalog::solar_eclipses()
            .iter()
            .find(|e| override_key(e) == "2026-08-12T17:46:00Z")
            .expect("override target is in the catalog");

        let ponta_delgada = Location::new(37.74, -25.67).unwrap();
        let visibility = visibility_for_location(eclipse, ponta_delgada, overrides());
        assert_eq!(visibility, 91);

        // Lisbon is outside the override box; it gets the static region value
        let lisbon = Location::new(38.72, -9.14).unwrap();
        let visibility = visibility_for_location(eclipse, lisbon, overrides());
        assert_eq!(visibility, 80);
    }

    #[test]
    fn upcoming_window_filters_and_sorts() {
        let from = Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap();
        let within_year = upcoming_eclipses(from, 1);
        let within_two = upcoming_eclipses(from, 2);

        assert!(within_year.len() <= within_two.len());
        for pair in within_two.windows(2) {
            assert!(pair[0].date <= pair[1].date);
        }
        for eclipse in within_year {
            assert!(eclipse.date >= from);
            assert!(eclipse.date.year() == 2025 || eclipse.date.year() == 2026);
        }
    }
}
