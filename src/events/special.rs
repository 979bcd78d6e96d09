//! Special lunar events derived from the full/new-moon finders.
//!
//! Nothing here touches the ephemeris directly: supermoons come from
//! thresholding the finder's distances, blue and black moons from grouping
//! finder output into (year, month) buckets. `MicroMoon` exists in the kind
//! enum but no rule currently produces it.

use std::collections::HashMap;

use chrono::{DateTime, Datelike, Utc};

use super::lunations::{self, FullMoonEvent};
use crate::constants::SUPERMOON_DISTANCE_KM;

/// The kinds of derived lunar event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpecialEventKind {
    Supermoon,
    BlueMoon,
    /// Declared for completeness; no detection rule produces it yet.
    MicroMoon,
    BlackMoon,
}

impl SpecialEventKind {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Supermoon => "Supermoon",
            Self::BlueMoon => "Blue Moon",
            Self::MicroMoon => "Micro Moon",
            Self::BlackMoon => "Black Moon",
        }
    }
}

/// A derived lunar event with a display name and description.
#[derive(Debug, Clone, PartialEq)]
pub struct SpecialEvent {
    pub instant: DateTime<Utc>,
    pub kind: SpecialEventKind,
    pub name: String,
    pub description: String,
}

/// Set `is_supermoon` on full moons closer than the perigee threshold.
pub fn flag_supermoons(full_moons: &mut [FullMoonEvent]) {
    for moon in full_moons {
        moon.is_supermoon = moon.distance_km < SUPERMOON_DISTANCE_KM;
    }
}

fn find_supermoons(full_moons: &[FullMoonEvent]) -> Vec<SpecialEvent> {
    full_moons
        .iter()
        .filter(|moon| moon.distance_km < SUPERMOON_DISTANCE_KM)
        .map(|moon| SpecialEvent {
            instant: moon.instant,
            kind: SpecialEventKind::Supermoon,
            name: format!("Supermoon ({})", moon.folk_name),
            description: format!(
                "Full moon at {:.0} km - appears ~7% larger and ~15% brighter than average",
                moon.distance_km
            ),
        })
        .collect()
}

fn month_bucket(instant: DateTime<Utc>) -> (i32, u32) {
    (instant.year(), instant.month())
}

/// Second event in each (year, month) bucket, if the bucket has two.
fn second_in_month(instants: impl Iterator<Item = DateTime<Utc>>) -> Vec<DateTime<Utc>> {
    let mut by_month: HashMap<(i32, u32), Vec<DateTime<Utc>>> = HashMap::new();
    for instant in instants {
        by_month.entry(month_bucket(instant)).or_default().push(instant);
    }

    let mut seconds: Vec<DateTime<Utc>> = by_month
        .into_values()
        .filter_map(|mut group| {
            if group.len() < 2 {
                return None;
            }
            group.sort();
            Some(group[1])
        })
        .collect();
    seconds.sort();
    seconds
}

fn find_blue_moons(full_moons: &[FullMoonEvent]) -> Vec<SpecialEvent> {
    second_in_month(full_moons.iter().map(|m| m.instant))
        .into_iter()
        .map(|instant| {
            let folk = full_moons
                .iter()
                .find(|m| m.instant == instant)
                .map(|m| m.folk_name)
                .unwrap_or("Full Moon");
            SpecialEvent {
                instant,
                kind: SpecialEventKind::BlueMoon,
                name: "Blue Moon".to_string(),
                description: format!(
                    "Second full moon of the month ({folk}) - a rare occurrence happening roughly every 2.7 years"
                ),
            }
        })
        .collect()
}

fn find_black_moons(new_moons: &[DateTime<Utc>]) -> Vec<SpecialEvent> {
    second_in_month(new_moons.iter().copied())
        .into_iter()
        .map(|instant| SpecialEvent {
            instant,
            kind: SpecialEventKind::BlackMoon,
            name: "Black Moon".to_string(),
            description: "Second new moon of the month - an uncommon event ideal for deep sky \
                          observation and astrophotography"
                .to_string(),
        })
        .collect()
}

/// All special lunar events in `[start, start + months]`, sorted by date.
pub fn find_special_events(start: DateTime<Utc>, months: u32) -> Vec<SpecialEvent> {
    let full_moons = lunations::find_full_moons(start, months);
    let new_moons = lunations::find_new_moons(start, months);

    let mut events = find_supermoons(&full_moons);
    events.extend(find_blue_moons(&full_moons));
    events.extend(find_black_moons(&new_moons));

    events.sort_by_key(|event| event.instant);
    events
}
