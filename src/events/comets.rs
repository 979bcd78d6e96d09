//! Comet apparitions filtered for a viewer.
//!
//! Comet windows are plain catalog dates (no solving needed); the work here
//! is deciding whether a comet is observable from the viewer's latitude at
//! all, then keeping only apparitions that are active or still ahead.

use chrono::{DateTime, Utc};

use crate::catalog::{self, Comet};
use crate::constants::METEOR_MIN_VISIBLE_ALTITUDE_DEG;
use crate::events::meteors::max_altitude;

/// A catalog comet with its activity state at the query instant.
#[derive(Debug, Clone)]
pub struct CometEvent {
    pub comet: Comet,
    pub is_active: bool,
    pub is_upcoming: bool,
}

/// Whether a comet's constraints admit a viewer latitude at all.
pub fn is_comet_visible(comet: &Comet, viewer_latitude: f64) -> bool {
    let visibility = &comet.visibility;

    match visibility.hemisphere.as_deref() {
        Some("northern") if viewer_latitude < 0.0 => return false,
        Some("southern") if viewer_latitude > 0.0 => return false,
        _ => {}
    }

    if let Some(min_latitude) = visibility.min_latitude {
        match visibility.hemisphere.as_deref() {
            Some("northern") if viewer_latitude < min_latitude => return false,
            Some("southern") if viewer_latitude > -min_latitude => return false,
            _ => {}
        }
    }

    if let Some(range) = visibility.declination_range {
        let mid_declination = (range.min + range.max) / 2.0;
        if max_altitude(viewer_latitude, mid_declination) < METEOR_MIN_VISIBLE_ALTITUDE_DEG {
            return false;
        }
    }

    true
}

/// Active and upcoming comets for a viewer at an instant, sorted by peak.
pub fn comets_at(at: DateTime<Utc>, viewer_latitude: f64) -> Vec<CometEvent> {
    let today = at.date_naive();

    let mut events: Vec<CometEvent> = catalog::COMETS
        .iter()
        .filter(|comet| is_comet_visible(comet, viewer_latitude))
        .map(|comet| CometEvent {
            comet: comet.clone(),
            is_active: today >= comet.peak_start && today <= comet.peak_end,
            is_upcoming: today < comet.peak_start,
        })
        .filter(|event| event.is_active || event.is_upcoming)
        .collect();

    events.sort_by_key(|event| event.comet.peak);
    events
}

/// Human rating for an apparent magnitude (lower is brighter).
pub fn magnitude_rating(magnitude: f64) -> &'static str {
    if magnitude <= 0.0 {
        "Spectacular (very bright)"
    } else if magnitude <= 2.0 {
        "Naked eye visible"
    } else if magnitude <= 4.0 {
        "Visible with binoculars"
    } else if magnitude <= 6.0 {
        "Requires telescope"
    } else {
        "Faint"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn hemisphere_constraints_exclude_the_wrong_half() {
        let northern = catalog::COMETS
            .iter()
            .find(|c| c.visibility.hemisphere.as_deref() == Some("northern"))
            .expect("catalog has a northern-only comet");
        assert!(is_comet_visible(northern, 45.0));
        assert!(!is_comet_visible(northern, -35.0));

        let southern = catalog::COMETS
            .iter()
            .find(|c| c.visibility.hemisphere.as_deref() == Some("southern"))
            .expect("catalog has a southern-only comet");
        assert!(is_comet_visible(southern, -30.0));
        assert!(!is_comet_visible(southern, 20.0));
    }

    #[test]
    fn min_latitude_tightens_the_hemisphere() {
        let northern = catalog::COMETS
            .iter()
            .find(|c| {
                c.visibility.hemisphere.as_deref() == Some("northern")
                    && c.visibility.min_latitude.is_some()
            })
            .expect("catalog has a latitude-limited comet");
        let floor = northern.visibility.min_latitude.unwrap();
        assert!(is_comet_visible(northern, floor + 5.0));
        assert!(!is_comet_visible(northern, floor - 5.0));
    }

    #[test]
    fn past_apparitions_are_dropped() {
        let after_everything = Utc.with_ymd_and_hms(2030, 1, 1, 0, 0, 0).unwrap();
        assert!(comets_at(after_everything, 40.0).is_empty());
    }

    #[test]
    fn active_and_upcoming_flags_are_exclusive() {
        let at = Utc.with_ymd_and_hms(2025, 10, 20, 0, 0, 0).unwrap();
        for event in comets_at(at, 40.0) {
            assert!(event.is_active ^ event.is_upcoming);
        }
    }

    #[test]
    fn magnitude_ratings_band_correctly() {
        assert_eq!(magnitude_rating(-1.0), "Spectacular (very bright)");
        assert_eq!(magnitude_rating(1.5), "Naked eye visible");
        assert_eq!(magnitude_rating(3.0), "Visible with binoculars");
        assert_eq!(magnitude_rating(5.5), "Requires telescope");
        assert_eq!(magnitude_rating(9.0), "Faint");
    }
}
