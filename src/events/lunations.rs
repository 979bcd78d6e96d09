//! Full- and new-moon finders.
//!
//! Both scan day by day across the requested range, flag a day when the
//! phase sample is already at the target or crossed it since the previous
//! day, then hand the one-day bracket to the solver for an exact instant.
//! A >20-day spacing rule de-duplicates detections within one lunation.

use chrono::{DateTime, Datelike, Duration, Month, Months, Utc};

use crate::constants::{LUNATION_DEDUP_DAYS, PHASE_DETECTION_EPSILON, SUPERMOON_DISTANCE_KM};
use crate::ephemeris::moon;
use crate::solver::{cyclic_phase_distance, refine_phase_crossing};

const FULL_MOON_PHASE: f64 = 0.5;
const NEW_MOON_PHASE: f64 = 0.0;

/// An exact full moon with its calendar trimmings.
#[derive(Debug, Clone, PartialEq)]
pub struct FullMoonEvent {
    pub instant: DateTime<Utc>,
    /// Traditional name for the month the refined instant falls in.
    pub folk_name: &'static str,
    /// Left false by the finder; the special-event detector sets it from
    /// distance.
    pub is_supermoon: bool,
    pub distance_km: f64,
}

impl FullMoonEvent {
    pub fn is_within_supermoon_distance(&self) -> bool {
        self.distance_km < SUPERMOON_DISTANCE_KM
    }
}

/// Traditional North American full-moon name for a calendar month.
pub fn folk_name(month: Month) -> &'static str {
    match month {
        Month::January => "Wolf Moon",
        Month::February => "Snow Moon",
        Month::March => "Worm Moon",
        Month::April => "Pink Moon",
        Month::May => "Flower Moon",
        Month::June => "Strawberry Moon",
        Month::July => "Buck Moon",
        Month::August => "Sturgeon Moon",
        Month::September => "Harvest Moon",
        Month::October => "Hunter's Moon",
        Month::November => "Beaver Moon",
        Month::December => "Cold Moon",
    }
}

fn folk_name_for_instant(instant: DateTime<Utc>) -> &'static str {
    Month::try_from(instant.month() as u8)
        .map(folk_name)
        .unwrap_or("Full Moon")
}

fn days_between(earlier: DateTime<Utc>, later: DateTime<Utc>) -> f64 {
    (later - earlier).num_milliseconds() as f64 / 86_400_000.0
}

fn scan_end(start: DateTime<Utc>, months: u32) -> DateTime<Utc> {
    start.checked_add_months(Months::new(months)).unwrap_or(start)
}

/// Find the instants where the phase reaches `target` within
/// `[start, start + months]`, refined to sub-second precision.
fn find_phase_events(start: DateTime<Utc>, months: u32, target: f64) -> Vec<DateTime<Utc>> {
    let end = scan_end(start, months);
    let mut events = Vec::new();

    let mut current = start;
    let mut prev_phase = moon::moon_illumination(current).phase;

    while current < end {
        let next = current + Duration::days(1);
        let phase = moon::moon_illumination(next).phase;

        let is_near = cyclic_phase_distance(phase, target) < PHASE_DETECTION_EPSILON;
        let crossed = if target == FULL_MOON_PHASE {
            prev_phase < FULL_MOON_PHASE && phase >= FULL_MOON_PHASE
        } else {
            // New moon wraps through 1.0 -> 0.0
            prev_phase > 0.9 && phase < 0.1
        };

        if is_near || crossed {
            let refined = refine_phase_crossing(current, next, target);

            let spaced = events
                .last()
                .map(|last| days_between(*last, refined) > LUNATION_DEDUP_DAYS)
                .unwrap_or(true);
            if spaced {
                events.push(refined);
            }
        }

        prev_phase = phase;
        current = next;
    }

    events
}

/// Find all full moons in `[start, start + months]`.
pub fn find_full_moons(start: DateTime<Utc>, months: u32) -> Vec<FullMoonEvent> {
    find_phase_events(start, months, FULL_MOON_PHASE)
        .into_iter()
        .map(|instant| {
            let distance_km = moon::moon_position(instant, 0.0, 0.0).distance_km;
            FullMoonEvent {
                instant,
                folk_name: folk_name_for_instant(instant),
                is_supermoon: false,
                distance_km,
            }
        })
        .collect()
}

/// Find all new moons in `[start, start + months]`.
pub fn find_new_moons(start: DateTime<Utc>, months: u32) -> Vec<DateTime<Utc>> {
    find_phase_events(start, months, NEW_MOON_PHASE)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn full_moons_are_spaced_a_synodic_month_apart() {
        let start = Utc.with_ymd_and_hms(2026, 1, 1, 0, 0, 0).unwrap();
        let moons = find_full_moons(start, 12);

        // Twelve months hold 12 or 13 full moons
        assert!(
            (12..=13).contains(&moons.len()),
            "found {} full moons",
            moons.len()
        );

        for pair in moons.windows(2) {
            let gap = days_between(pair[0].instant, pair[1].instant);
            assert!(
                (27.0..=32.0).contains(&gap),
                "full moons {} and {} are {gap:.1} days apart",
                pair[0].instant,
                pair[1].instant
            );
        }
    }

    #[test]
    fn refined_instants_are_at_the_target_phase() {
        let start = Utc.with_ymd_and_hms(2026, 3, 1, 0, 0, 0).unwrap();
        for event in find_full_moons(start, 6) {
            let phase = moon::moon_illumination(event.instant).phase;
            assert!(
                cyclic_phase_distance(phase, 0.5) < 0.005,
                "phase at refined instant was {phase}"
            );
        }
        for instant in find_new_moons(start, 6) {
            let phase = moon::moon_illumination(instant).phase;
            assert!(
                cyclic_phase_distance(phase, 0.0) < 0.005,
                "phase at refined instant was {phase}"
            );
        }
    }

    #[test]
    fn finder_leaves_supermoon_flag_unset() {
        let start = Utc.with_ymd_and_hms(2026, 1, 1, 0, 0, 0).unwrap();
        assert!(find_full_moons(start, 3).iter().all(|m| !m.is_supermoon));
    }

    #[test]
    fn folk_names_follow_the_refined_month() {
        let start = Utc.with_ymd_and_hms(2026, 1, 1, 0, 0, 0).unwrap();
        for event in find_full_moons(start, 4) {
            let month = Month::try_from(event.instant.month() as u8).unwrap();
            assert_eq!(event.folk_name, folk_name(month));
        }
    }

    #[test]
    fn distances_are_physically_plausible() {
        let start = Utc.with_ymd_and_hms(2026, 1, 1, 0, 0, 0).unwrap();
        for event in find_full_moons(start, 6) {
            assert!(
                (356_000.0..407_000.0).contains(&event.distance_km),
                "distance {}",
                event.distance_km
            );
        }
    }
}
