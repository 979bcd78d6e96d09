//! The default `report` command: today's sky at a glance.

use anyhow::Result;
use chrono::Utc;

use crate::args::CommonArgs;
use crate::events::countdown::{format_countdown, next_event};
use crate::events::zodiac;
use crate::position::PositionEngine;

/// Print today's sun times, moon state, and the next-event countdown.
pub fn handle_report_command(common: &CommonArgs) -> Result<()> {
    let (config, location) = super::load_context(common)?;
    let engine = PositionEngine::new(location);
    let tz = engine.timezone();
    let clock = config.time_format;

    let now = Utc::now();
    let today = now.with_timezone(&tz).date_naive();

    log_block_start!("Sky report for {location} ({tz})");

    let sun_times = engine.sun_times_on(today);
    log_block_start!("Sun");
    match (sun_times.sunrise, sun_times.sunset) {
        (Some(sunrise), Some(sunset)) => {
            log_indented!("Sunrise {}", clock.format_time(&sunrise.with_timezone(&tz)));
            log_indented!("Sunset  {}", clock.format_time(&sunset.with_timezone(&tz)));
        }
        _ => log_indented!("No sunrise or sunset today at this latitude"),
    }
    if let (Some(dawn), Some(dusk)) = (sun_times.dawn, sun_times.dusk) {
        log_indented!(
            "Civil twilight {} - {}",
            clock.format_time(&dawn.with_timezone(&tz)),
            clock.format_time(&dusk.with_timezone(&tz))
        );
    }
    if let Some(golden) = sun_times.golden_hour_start {
        log_indented!(
            "Golden hour from {}",
            clock.format_time(&golden.with_timezone(&tz))
        );
    }
    log_indented!("Sun in {}", zodiac::sun_sign(now).name());

    let moon = engine.moon(now);
    let moon_times = engine.moon_times_on(today);
    log_block_start!("Moon");
    log_indented!(
        "{} - {:.0}% illuminated, {:.1} days old",
        moon.phase_name.label(),
        moon.illumination_pct(),
        moon.age_days
    );
    log_indented!("Distance {:.0} km", moon.distance_km);
    match moon_times.rise {
        Some(rise) => {
            log_indented!("Moonrise {}", clock.format_time(&rise.with_timezone(&tz)))
        }
        None => log_indented!("No moonrise today"),
    }
    match moon_times.set {
        Some(set) => log_indented!("Moonset  {}", clock.format_time(&set.with_timezone(&tz))),
        None => log_indented!("No moonset today"),
    }
    log_indented!("Moon in {}", zodiac::moon_sign(now).name());

    match next_event(now, &sun_times, &moon_times) {
        Some(next) => {
            log_block_start!(
                "Next: {} at {} (in {})",
                next.kind.label(),
                clock.format_time(&next.time.with_timezone(&tz)),
                format_countdown(next.seconds_until)
            );
        }
        None => log_block_start!("No further events today"),
    }

    log_end!();
    Ok(())
}
