//! Sun/moon proximity finder.
//!
//! A proximity event is a day when a moonrise or moonset lands close to a
//! sunrise or sunset in both time and compass direction: the window where
//! both bodies sit near the horizon together, which is the photogenic case.
//! Each local day is examined independently; rise/set pairs are filtered by
//! a 30-minute gap and a 30° circular azimuth separation measured at the
//! pair's midpoint.

use chrono::{DateTime, Duration, NaiveDate, Utc};

use crate::constants::{MAX_PROXIMITY_AZIMUTH_GAP_DEG, MAX_PROXIMITY_TIME_GAP_MINUTES};
use crate::location::Location;
use crate::position::PositionEngine;

/// Which rise/set events were paired.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PairingKind {
    MoonriseSunrise,
    MoonriseSunset,
    MoonsetSunrise,
    MoonsetSunset,
}

impl PairingKind {
    pub fn label(&self) -> &'static str {
        match self {
            Self::MoonriseSunrise => "Moonrise near sunrise",
            Self::MoonriseSunset => "Moonrise near sunset",
            Self::MoonsetSunrise => "Moonset near sunrise",
            Self::MoonsetSunset => "Moonset near sunset",
        }
    }
}

/// The sixteen canonical compass points.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompassPoint {
    N,
    NNE,
    NE,
    ENE,
    E,
    ESE,
    SE,
    SSE,
    S,
    SSW,
    SW,
    WSW,
    W,
    WNW,
    NW,
    NNW,
}

impl CompassPoint {
    /// Nearest compass point for a north-based azimuth in degrees.
    pub fn from_azimuth_deg(azimuth: f64) -> Self {
        let index = (azimuth.rem_euclid(360.0) / 22.5).round() as usize % 16;
        match index {
            0 => Self::N,
            1 => Self::NNE,
            2 => Self::NE,
            3 => Self::ENE,
            4 => Self::E,
            5 => Self::ESE,
            6 => Self::SE,
            7 => Self::SSE,
            8 => Self::S,
            9 => Self::SSW,
            10 => Self::SW,
            11 => Self::WSW,
            12 => Self::W,
            13 => Self::WNW,
            14 => Self::NW,
            _ => Self::NNW,
        }
    }

    pub fn abbreviation(&self) -> &'static str {
        match self {
            Self::N => "N",
            Self::NNE => "NNE",
            Self::NE => "NE",
            Self::ENE => "ENE",
            Self::E => "E",
            Self::ESE => "ESE",
            Self::SE => "SE",
            Self::SSE => "SSE",
            Self::S => "S",
            Self::SSW => "SSW",
            Self::SW => "SW",
            Self::WSW => "WSW",
            Self::W => "W",
            Self::WNW => "WNW",
            Self::NW => "NW",
            Self::NNW => "NNW",
        }
    }
}

/// A same-day pairing of moon and sun horizon events that passed both
/// closeness filters.
#[derive(Debug, Clone, PartialEq)]
pub struct ProximityEvent {
    pub date: NaiveDate,
    pub kind: PairingKind,
    pub time_gap_minutes: f64,
    pub azimuth_gap_deg: f64,
    /// Moon illumination percentage at the pair midpoint, rounded.
    pub moon_illumination_pct: u8,
    pub moon_instant: DateTime<Utc>,
    pub sun_instant: DateTime<Utc>,
    pub description: String,
}

/// Smaller arc between two azimuths, degrees.
fn azimuth_difference(a: f64, b: f64) -> f64 {
    let diff = (a - b).abs();
    diff.min(360.0 - diff)
}

fn round_tenth(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

/// Find proximity events for each local day in `[start, start + days)`.
///
/// A single day can yield up to four events (every moon event against every
/// sun event); most days yield none. Results are sorted by date.
pub fn find_proximity_events(
    start: NaiveDate,
    days: u32,
    location: Location,
) -> Vec<ProximityEvent> {
    let engine = PositionEngine::new(location);
    let mut events = Vec::new();

    for offset in 0..days {
        let date = start + Duration::days(i64::from(offset));

        let sun_times = engine.sun_times_on(date);
        let moon_times = engine.moon_times_on(date);

        let mut pairs: Vec<(DateTime<Utc>, DateTime<Utc>, PairingKind)> = Vec::with_capacity(4);
        if let (Some(moonrise), Some(sunrise)) = (moon_times.rise, sun_times.sunrise) {
            pairs.push((moonrise, sunrise, PairingKind::MoonriseSunrise));
        }
        if let (Some(moonrise), Some(sunset)) = (moon_times.rise, sun_times.sunset) {
            pairs.push((moonrise, sunset, PairingKind::MoonriseSunset));
        }
        if let (Some(moonset), Some(sunrise)) = (moon_times.set, sun_times.sunrise) {
            pairs.push((moonset, sunrise, PairingKind::MoonsetSunrise));
        }
        if let (Some(moonset), Some(sunset)) = (moon_times.set, sun_times.sunset) {
            pairs.push((moonset, sunset, PairingKind::MoonsetSunset));
        }

        for (moon_instant, sun_instant, kind) in pairs {
            let gap_minutes =
                (moon_instant - sun_instant).num_seconds().abs() as f64 / 60.0;
            if gap_minutes > MAX_PROXIMITY_TIME_GAP_MINUTES {
                continue;
            }

            // Both azimuths are sampled at the midpoint of the pair
            let midpoint = sun_instant + (moon_instant - sun_instant) / 2;
            let moon_snapshot = engine.moon(midpoint);
            let sun_position = engine.sun_position(midpoint);

            let azimuth_gap = azimuth_difference(
                moon_snapshot.position.azimuth_deg,
                sun_position.azimuth_deg,
            );
            if azimuth_gap > MAX_PROXIMITY_AZIMUTH_GAP_DEG {
                continue;
            }

            let illumination_pct = moon_snapshot.illumination_pct().round() as u8;
            let average_azimuth =
                (moon_snapshot.position.azimuth_deg + sun_position.azimuth_deg) / 2.0;
            let direction = CompassPoint::from_azimuth_deg(average_azimuth);

            let description = format!(
                "Moon {}° from Sun at {}, {}% illuminated",
                azimuth_gap.round(),
                direction.abbreviation(),
                illumination_pct
            );

            events.push(ProximityEvent {
                date,
                kind,
                time_gap_minutes: round_tenth(gap_minutes),
                azimuth_gap_deg: round_tenth(azimuth_gap),
                moon_illumination_pct: illumination_pct,
                moon_instant,
                sun_instant,
                description,
            });
        }
    }

    events.sort_by_key(|event| event.date);
    events
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn compass_points_cover_the_circle() {
        assert_eq!(CompassPoint::from_azimuth_deg(0.0), CompassPoint::N);
        assert_eq!(CompassPoint::from_azimuth_deg(90.0), CompassPoint::E);
        assert_eq!(CompassPoint::from_azimuth_deg(180.0), CompassPoint::S);
        assert_eq!(CompassPoint::from_azimuth_deg(270.0), CompassPoint::W);
        assert_eq!(CompassPoint::from_azimuth_deg(359.9), CompassPoint::N);
        assert_eq!(CompassPoint::from_azimuth_deg(22.5), CompassPoint::NNE);
        assert_eq!(CompassPoint::from_azimuth_deg(202.4), CompassPoint::SSW);
    }

    #[test]
    fn azimuth_difference_is_circular() {
        assert!((azimuth_difference(350.0, 10.0) - 20.0).abs() < 1e-9);
        assert!((azimuth_difference(10.0, 350.0) - 20.0).abs() < 1e-9);
        assert!((azimuth_difference(90.0, 270.0) - 180.0).abs() < 1e-9);
        assert_eq!(azimuth_difference(45.0, 45.0), 0.0);
    }

    #[test]
    fn every_event_satisfies_both_filters() {
        let start = NaiveDate::from_ymd_opt(2026, 3, 1).unwrap();
        let location = Location::new(40.7128, -74.0060).unwrap();
        let events = find_proximity_events(start, 90, location);

        for event in &events {
            assert!(
                event.time_gap_minutes <= MAX_PROXIMITY_TIME_GAP_MINUTES,
                "time gap {}",
                event.time_gap_minutes
            );
            assert!(
                event.azimuth_gap_deg <= MAX_PROXIMITY_AZIMUTH_GAP_DEG,
                "azimuth gap {}",
                event.azimuth_gap_deg
            );
            assert!(event.moon_illumination_pct <= 100);
        }
    }

    #[test]
    fn events_are_sorted_by_date() {
        let start = NaiveDate::from_ymd_opt(2026, 1, 1).unwrap();
        let location = Location::new(51.5074, -0.1278).unwrap();
        let events = find_proximity_events(start, 120, location);

        for pair in events.windows(2) {
            assert!(pair[0].date <= pair[1].date);
        }
    }

    #[test]
    fn a_quarter_year_scan_finds_something_at_mid_latitudes() {
        // Moonrise chases sunset by ~50 minutes a day, so a 90-day window
        // reliably produces at least one pairing within the filters.
        let start = NaiveDate::from_ymd_opt(2026, 4, 1).unwrap();
        let location = Location::new(40.7128, -74.0060).unwrap();
        let events = find_proximity_events(start, 90, location);
        assert!(!events.is_empty());
    }
}
