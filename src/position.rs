//! Position engine: the adapter between the raw ephemeris provider and the
//! rest of the crate.
//!
//! The provider reports radians with azimuth measured from south; everything
//! public here is degrees with azimuth measured clockwise from true north
//! (`(az + 180) mod 360`). Day-scoped queries (sun times, moon times) are
//! anchored to the coordinate's own calendar day, resolved through the
//! location's timezone, so callers never reason about UTC offsets.

use chrono::{DateTime, LocalResult, NaiveDate, NaiveTime, TimeZone, Utc};
use chrono_tz::Tz;

use crate::constants::SYNODIC_MONTH_DAYS;
use crate::ephemeris::{moon, sun};
use crate::location::Location;

pub use crate::ephemeris::moon::MoonTimes;
pub use crate::ephemeris::sun::SunTimes;

/// Where a body sits in the sky, in degrees.
///
/// Azimuth is clockwise from true north: 0 = N, 90 = E, 180 = S, 270 = W.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CelestialPosition {
    pub altitude_deg: f64,
    pub azimuth_deg: f64,
}

/// The eight conventional names for the lunation cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoonPhaseName {
    NewMoon,
    WaxingCrescent,
    FirstQuarter,
    WaxingGibbous,
    FullMoon,
    WaningGibbous,
    LastQuarter,
    WaningCrescent,
}

impl MoonPhaseName {
    /// Classify a phase fraction into its conventional name.
    pub fn from_phase(phase: f64) -> Self {
        if !(0.025..0.975).contains(&phase) {
            Self::NewMoon
        } else if phase < 0.225 {
            Self::WaxingCrescent
        } else if phase < 0.275 {
            Self::FirstQuarter
        } else if phase < 0.475 {
            Self::WaxingGibbous
        } else if phase < 0.525 {
            Self::FullMoon
        } else if phase < 0.725 {
            Self::WaningGibbous
        } else if phase < 0.775 {
            Self::LastQuarter
        } else {
            Self::WaningCrescent
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::NewMoon => "New Moon",
            Self::WaxingCrescent => "Waxing Crescent",
            Self::FirstQuarter => "First Quarter",
            Self::WaxingGibbous => "Waxing Gibbous",
            Self::FullMoon => "Full Moon",
            Self::WaningGibbous => "Waning Gibbous",
            Self::LastQuarter => "Last Quarter",
            Self::WaningCrescent => "Waning Crescent",
        }
    }
}

/// Everything about the moon at a single instant from a single place.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MoonSnapshot {
    /// Phase of the lunation cycle, [0, 1): 0 new, 0.5 full.
    pub phase: f64,
    pub phase_name: MoonPhaseName,
    /// Illuminated fraction of the disc, [0, 1].
    pub illuminated_fraction: f64,
    /// Days into the lunation cycle.
    pub age_days: f64,
    pub distance_km: f64,
    pub position: CelestialPosition,
}

impl MoonSnapshot {
    /// Illumination as a percentage, [0, 100].
    pub fn illumination_pct(&self) -> f64 {
        self.illuminated_fraction * 100.0
    }
}

fn north_azimuth_deg(azimuth_from_south_rad: f64) -> f64 {
    (azimuth_from_south_rad.to_degrees() + 180.0).rem_euclid(360.0)
}

/// Location-bound adapter over the ephemeris provider.
///
/// Holds nothing but the location and its resolved timezone; every query is
/// a pure function of its arguments.
#[derive(Debug, Clone, Copy)]
pub struct PositionEngine {
    location: Location,
    tz: Tz,
}

impl PositionEngine {
    pub fn new(location: Location) -> Self {
        Self {
            location,
            tz: location.timezone(),
        }
    }

    pub fn location(&self) -> Location {
        self.location
    }

    pub fn timezone(&self) -> Tz {
        self.tz
    }

    /// Sun position at an instant, normalized to north-based degrees.
    pub fn sun_position(&self, at: DateTime<Utc>) -> CelestialPosition {
        let raw = sun::sun_position(at, self.location.latitude(), self.location.longitude());
        CelestialPosition {
            altitude_deg: raw.altitude.to_degrees(),
            azimuth_deg: north_azimuth_deg(raw.azimuth),
        }
    }

    /// Full moon snapshot at an instant.
    pub fn moon(&self, at: DateTime<Utc>) -> MoonSnapshot {
        let ill = moon::moon_illumination(at);
        let raw = moon::moon_position(at, self.location.latitude(), self.location.longitude());

        MoonSnapshot {
            phase: ill.phase,
            phase_name: MoonPhaseName::from_phase(ill.phase),
            illuminated_fraction: ill.fraction,
            age_days: ill.phase * SYNODIC_MONTH_DAYS,
            distance_km: raw.distance_km,
            position: CelestialPosition {
                altitude_deg: raw.position.altitude.to_degrees(),
                azimuth_deg: north_azimuth_deg(raw.position.azimuth),
            },
        }
    }

    /// Sun event times for a local calendar day at this location.
    pub fn sun_times_on(&self, date: NaiveDate) -> SunTimes {
        // Anchor at local noon so the julian-cycle rounding picks this day's
        // transit regardless of the UTC offset.
        let anchor = self.local_instant(date, NaiveTime::from_hms_opt(12, 0, 0).unwrap_or_default());
        sun::sun_times(anchor, self.location.latitude(), self.location.longitude())
    }

    /// Moonrise and moonset for a local calendar day at this location.
    pub fn moon_times_on(&self, date: NaiveDate) -> MoonTimes {
        let day_start = self.local_instant(date, NaiveTime::MIN);
        moon::moon_times(
            day_start,
            self.location.latitude(),
            self.location.longitude(),
        )
    }

    /// Resolve a local wall-clock time at this location into a UTC instant.
    ///
    /// DST ambiguity takes the earlier mapping; in a DST gap (a time that was
    /// skipped) the wall-clock value is read as UTC, which stays within the
    /// right hour for every real offset.
    fn local_instant(&self, date: NaiveDate, time: NaiveTime) -> DateTime<Utc> {
        let naive = date.and_time(time);
        match self.tz.from_local_datetime(&naive) {
            LocalResult::Single(dt) => dt.with_timezone(&Utc),
            LocalResult::Ambiguous(earliest, _) => earliest.with_timezone(&Utc),
            LocalResult::None => Utc.from_utc_datetime(&naive),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn nyc_engine() -> PositionEngine {
        PositionEngine::new(Location::new(40.7128, -74.0060).unwrap())
    }

    #[test]
    fn azimuth_is_normalized_to_north_based_degrees() {
        let engine = nyc_engine();
        let mut t = Utc.with_ymd_and_hms(2026, 6, 1, 0, 0, 0).unwrap();
        for _ in 0..48 {
            let sun = engine.sun_position(t);
            assert!((0.0..360.0).contains(&sun.azimuth_deg));
            let moon = engine.moon(t).position;
            assert!((0.0..360.0).contains(&moon.azimuth_deg));
            t += chrono::Duration::hours(7);
        }
    }

    #[test]
    fn noon_sun_bears_south_from_mid_northern_latitudes() {
        let engine = nyc_engine();
        let times = engine.sun_times_on(NaiveDate::from_ymd_opt(2026, 3, 20).unwrap());
        let pos = engine.sun_position(times.solar_noon);
        assert!(
            (pos.azimuth_deg - 180.0).abs() < 10.0,
            "noon azimuth was {}",
            pos.azimuth_deg
        );
        assert!(pos.altitude_deg > 30.0);
    }

    #[test]
    fn moon_snapshot_fields_are_in_range() {
        let engine = nyc_engine();
        let snap = engine.moon(Utc.with_ymd_and_hms(2026, 2, 14, 3, 0, 0).unwrap());
        assert!((0.0..1.0).contains(&snap.phase));
        assert!((0.0..=100.0).contains(&snap.illumination_pct()));
        assert!(snap.age_days >= 0.0 && snap.age_days < SYNODIC_MONTH_DAYS);
    }

    #[test]
    fn phase_names_cover_the_cycle() {
        assert_eq!(MoonPhaseName::from_phase(0.0), MoonPhaseName::NewMoon);
        assert_eq!(MoonPhaseName::from_phase(0.99), MoonPhaseName::NewMoon);
        assert_eq!(MoonPhaseName::from_phase(0.25), MoonPhaseName::FirstQuarter);
        assert_eq!(MoonPhaseName::from_phase(0.5), MoonPhaseName::FullMoon);
        assert_eq!(MoonPhaseName::from_phase(0.75), MoonPhaseName::LastQuarter);
        assert_eq!(
            MoonPhaseName::from_phase(0.9),
            MoonPhaseName::WaningCrescent
        );
    }

    #[test]
    fn sun_times_fall_on_the_requested_local_day() {
        let engine = nyc_engine();
        let date = NaiveDate::from_ymd_opt(2026, 7, 4).unwrap();
        let times = engine.sun_times_on(date);
        let sunrise_local = times.sunrise.unwrap().with_timezone(&engine.timezone());
        assert_eq!(sunrise_local.date_naive(), date);
    }
}
