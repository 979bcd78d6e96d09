//! Meteor shower placement and viewer-specific visibility rating.
//!
//! Catalog showers are anchored to solar longitudes, so each year's dates
//! come from the solar-longitude solver. Visibility is a purely geometric
//! estimate: the radiant's peak altitude from the viewer's latitude decides
//! the rating, and showers that never clear 10° are dropped outright.

use chrono::{DateTime, Datelike, Duration, Utc};

use crate::catalog::{self, MeteorShower};
use crate::constants::METEOR_WINDOW_DAYS_PER_MONTH;
use crate::solver::date_for_solar_longitude;

/// How well a shower's radiant presents from a viewer's latitude.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VisibilityRating {
    Excellent,
    Good,
    Poor,
    NotVisible,
}

impl VisibilityRating {
    /// Rate a radiant by the maximum altitude it reaches.
    pub fn from_max_altitude(max_altitude_deg: f64) -> Self {
        if max_altitude_deg >= 45.0 {
            Self::Excellent
        } else if max_altitude_deg >= 25.0 {
            Self::Good
        } else if max_altitude_deg >= 10.0 {
            Self::Poor
        } else {
            Self::NotVisible
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Excellent => "Excellent visibility",
            Self::Good => "Good visibility",
            Self::Poor => "Low on horizon",
            Self::NotVisible => "Not visible from your location",
        }
    }
}

/// Maximum altitude a body at `declination` reaches from `viewer_latitude`,
/// degrees. Can be negative for radiants that never rise.
pub fn max_altitude(viewer_latitude: f64, declination: f64) -> f64 {
    90.0 - (viewer_latitude - declination).abs()
}

/// ZHR star rating, 1-3.
pub fn zhr_rating(zhr: u32) -> u8 {
    if zhr >= 100 {
        3
    } else if zhr >= 40 {
        2
    } else {
        1
    }
}

/// A catalog shower placed into a specific year for a specific viewer.
#[derive(Debug, Clone)]
pub struct MeteorShowerEvent {
    pub shower: MeteorShower,
    pub peak: DateTime<Utc>,
    pub active_start: DateTime<Utc>,
    pub active_end: DateTime<Utc>,
    pub max_altitude_deg: f64,
    pub visibility: VisibilityRating,
}

impl MeteorShowerEvent {
    pub fn is_active_at(&self, at: DateTime<Utc>) -> bool {
        at >= self.active_start && at <= self.active_end
    }
}

/// Place one catalog shower into a year for a viewer.
pub fn place_shower(shower: &MeteorShower, year: i32, viewer_latitude: f64) -> MeteorShowerEvent {
    let peak = date_for_solar_longitude(shower.peak_solar_longitude, year);
    let active_start = date_for_solar_longitude(shower.active_start_solar_longitude, year);
    let mut active_end = date_for_solar_longitude(shower.active_end_solar_longitude, year);

    // Window crosses the anchor year's boundary: the end longitude belongs
    // to the next solar year
    if active_end < active_start {
        active_end = date_for_solar_longitude(shower.active_end_solar_longitude, year + 1);
    }

    let altitude = max_altitude(viewer_latitude, shower.radiant.dec);
    MeteorShowerEvent {
        shower: shower.clone(),
        peak,
        active_start,
        active_end,
        max_altitude_deg: altitude,
        visibility: VisibilityRating::from_max_altitude(altitude),
    }
}

/// Place every visible catalog shower into `year` for a viewer.
///
/// Showers whose radiant never clears the horizon usefully are dropped;
/// the rest are sorted by peak date.
pub fn meteor_showers_for_year(year: i32, viewer_latitude: f64) -> Vec<MeteorShowerEvent> {
    let mut events: Vec<MeteorShowerEvent> = catalog::METEOR_SHOWERS
        .iter()
        .map(|shower| place_shower(shower, year, viewer_latitude))
        .filter(|event| event.visibility != VisibilityRating::NotVisible)
        .collect();

    events.sort_by_key(|event| event.peak);
    events
}

/// Showers peaking within `[from, from + months·30d]`, for a viewer.
///
/// Solar-longitude anchoring makes "this year's" showers spill across
/// calendar years, so the current and next year are unioned before the
/// window filter. The window uses a fixed 30-day month.
pub fn upcoming_meteor_showers(
    from: DateTime<Utc>,
    months: u32,
    viewer_latitude: f64,
) -> Vec<MeteorShowerEvent> {
    let end = from + Duration::days(i64::from(months) * METEOR_WINDOW_DAYS_PER_MONTH);
    let year = from.year();

    let mut events: Vec<MeteorShowerEvent> = meteor_showers_for_year(year, viewer_latitude)
        .into_iter()
        .chain(meteor_showers_for_year(year + 1, viewer_latitude))
        .filter(|event| event.peak >= from && event.peak <= end)
        .collect();

    events.sort_by_key(|event| event.peak);
    events
}

/// The next shower to peak after `from`, if any peaks within a year.
pub fn next_meteor_shower(from: DateTime<Utc>, viewer_latitude: f64) -> Option<MeteorShowerEvent> {
    upcoming_meteor_showers(from, 12, viewer_latitude)
        .into_iter()
        .next()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn altitude_geometry_is_symmetric() {
        assert_eq!(max_altitude(40.0, 40.0), 90.0);
        assert_eq!(max_altitude(40.0, 60.0), 70.0);
        assert_eq!(max_altitude(-30.0, 58.0), 2.0);
        assert!((max_altitude(50.0, -16.3) - 23.7).abs() < 1e-9);
    }

    #[test]
    fn rating_thresholds_match_the_bands() {
        assert_eq!(
            VisibilityRating::from_max_altitude(45.0),
            VisibilityRating::Excellent
        );
        assert_eq!(
            VisibilityRating::from_max_altitude(44.9),
            VisibilityRating::Good
        );
        assert_eq!(
            VisibilityRating::from_max_altitude(25.0),
            VisibilityRating::Good
        );
        assert_eq!(
            VisibilityRating::from_max_altitude(10.0),
            VisibilityRating::Poor
        );
        assert_eq!(
            VisibilityRating::from_max_altitude(9.9),
            VisibilityRating::NotVisible
        );
    }

    #[test]
    fn perseids_peak_in_august() {
        let events = meteor_showers_for_year(2026, 48.0);
        let perseids = events
            .iter()
            .find(|e| e.shower.id == "perseids")
            .expect("Perseids visible from 48°N");
        assert_eq!(perseids.peak.month(), 8);
        assert!((11..=14).contains(&perseids.peak.day()), "day {}", perseids.peak.day());
        assert!(perseids.active_start < perseids.peak);
        assert!(perseids.peak < perseids.active_end);
    }

    #[test]
    fn southern_viewers_lose_the_northern_radiants() {
        let from_invercargill = meteor_showers_for_year(2026, -46.4);
        assert!(
            !from_invercargill.iter().any(|e| e.shower.id == "ursids"),
            "a radiant at +75° declination is below the horizon from 46°S"
        );
        // But the southern delta Aquariids rate excellent there
        let aquariids = from_invercargill
            .iter()
            .find(|e| e.shower.id == "southern-delta-aquariids")
            .expect("southern shower visible");
        assert_eq!(aquariids.visibility, VisibilityRating::Excellent);
    }

    #[test]
    fn upcoming_respects_the_thirty_day_window() {
        let from = Utc.with_ymd_and_hms(2026, 7, 1, 0, 0, 0).unwrap();
        let upcoming = upcoming_meteor_showers(from, 2, 40.0);
        let end = from + Duration::days(60);
        for event in &upcoming {
            assert!(event.peak >= from && event.peak <= end);
        }
        // Perseids (mid-August) fall inside a 60-day window from July 1
        assert!(upcoming.iter().any(|e| e.shower.id == "perseids"));
    }

    #[test]
    fn year_crossing_windows_resolve_forward() {
        for event in meteor_showers_for_year(2025, 40.0) {
            assert!(
                event.active_end > event.active_start,
                "{} has an inverted window",
                event.shower.id
            );
        }
    }

    #[test]
    fn inverted_end_longitude_re_solves_into_the_next_year() {
        // Active from late in the solar year through just past the next
        // March equinox: the end longitude is numerically below the start
        let shower = MeteorShower {
            id: "wraparound".to_string(),
            name: "Wraparound test shower".to_string(),
            peak_solar_longitude: 355.0,
            active_start_solar_longitude: 350.0,
            active_end_solar_longitude: 5.0,
            radiant: crate::catalog::Radiant { ra: 0.0, dec: 10.0 },
            velocity: 40.0,
            zhr: 20,
            parent_body: "none".to_string(),
            description: String::new(),
        };

        let event = place_shower(&shower, 2025, 40.0);
        assert!(
            event.active_end > event.active_start,
            "window stayed inverted"
        );
        // Start near mid-March 2026 (anchored at the 2025 equinox), end
        // just past the 2027 anchor's equinox
        assert!(event.active_start < event.peak);
        assert!((event.active_end - event.active_start).num_days() < 40);
    }

    #[test]
    fn zhr_ratings_band_correctly() {
        assert_eq!(zhr_rating(150), 3);
        assert_eq!(zhr_rating(100), 3);
        assert_eq!(zhr_rating(50), 2);
        assert_eq!(zhr_rating(15), 1);
    }
}
