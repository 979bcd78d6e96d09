//! Next photographic event and countdown formatting.
//!
//! Collects the upcoming light-window boundaries (blue hour, golden hour,
//! sunrise/sunset) and moon horizon events for a day and picks the earliest
//! one still ahead of the query instant.

use chrono::{DateTime, Utc};

use crate::position::{MoonTimes, SunTimes};

/// The photographic instants worth counting down to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NextEventKind {
    BlueHourMorning,
    Sunrise,
    GoldenHourMorning,
    GoldenHourEvening,
    Sunset,
    BlueHourEvening,
    Moonrise,
    Moonset,
}

impl NextEventKind {
    pub fn label(&self) -> &'static str {
        match self {
            Self::BlueHourMorning => "Morning blue hour",
            Self::Sunrise => "Sunrise",
            Self::GoldenHourMorning => "Morning golden hour",
            Self::GoldenHourEvening => "Golden hour",
            Self::Sunset => "Sunset",
            Self::BlueHourEvening => "Blue hour",
            Self::Moonrise => "Moonrise",
            Self::Moonset => "Moonset",
        }
    }
}

/// The soonest upcoming event, with how far away it is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NextEvent {
    pub kind: NextEventKind,
    pub time: DateTime<Utc>,
    pub seconds_until: i64,
}

/// Pick the earliest candidate event after `now`, or `None` when the whole
/// day's events are already behind us.
pub fn next_event(
    now: DateTime<Utc>,
    sun_times: &SunTimes,
    moon_times: &MoonTimes,
) -> Option<NextEvent> {
    let mut candidates: Vec<(NextEventKind, DateTime<Utc>)> = Vec::with_capacity(8);

    // Morning blue hour starts at nautical dawn; sunrise doubles as the
    // start of the morning golden hour, so the golden-hour entry uses the
    // end of that window to stay distinct.
    let sun_candidates = [
        (NextEventKind::BlueHourMorning, sun_times.nautical_dawn),
        (NextEventKind::Sunrise, sun_times.sunrise),
        (NextEventKind::GoldenHourMorning, sun_times.golden_hour_end),
        (NextEventKind::GoldenHourEvening, sun_times.golden_hour_start),
        (NextEventKind::Sunset, sun_times.sunset),
        (NextEventKind::BlueHourEvening, sun_times.dusk),
    ];
    for (kind, time) in sun_candidates {
        if let Some(time) = time {
            candidates.push((kind, time));
        }
    }
    if let Some(moonrise) = moon_times.rise {
        candidates.push((NextEventKind::Moonrise, moonrise));
    }
    if let Some(moonset) = moon_times.set {
        candidates.push((NextEventKind::Moonset, moonset));
    }

    candidates
        .into_iter()
        .filter(|(_, time)| *time > now)
        .min_by_key(|(_, time)| *time)
        .map(|(kind, time)| NextEvent {
            kind,
            time,
            seconds_until: (time - now).num_seconds(),
        })
}

/// Render a countdown like "3h 12m", "42m", or "<1m".
pub fn format_countdown(seconds_until: i64) -> String {
    if seconds_until <= 0 {
        return "Now".to_string();
    }

    let hours = seconds_until / 3600;
    let minutes = (seconds_until % 3600) / 60;

    if hours > 0 {
        format!("{hours}h {minutes}m")
    } else if minutes > 0 {
        format!("{minutes}m")
    } else {
        "<1m".to_string()
    }
}
