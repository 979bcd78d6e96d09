//! Event-list subcommands: moons, special, proximity, meteors, eclipses,
//! comets.

use anyhow::Result;
use chrono::Utc;

use crate::args::CommonArgs;
use crate::catalog::SAO_MIGUEL_OVERRIDES;
use crate::constants::DEFAULT_PROXIMITY_DAYS;
use crate::events::{comets, eclipses, lunations, meteors, proximity, special};
use crate::position::PositionEngine;
use crate::weather::scoring;

/// List upcoming full moons with folk names and supermoon flags.
pub fn handle_moons_command(common: &CommonArgs, months: Option<u32>) -> Result<()> {
    let (config, location) = super::load_context(common)?;
    let months = months.unwrap_or(config.lookahead_months);
    let tz = location.timezone();

    let mut moons = lunations::find_full_moons(Utc::now(), months);
    special::flag_supermoons(&mut moons);

    log_block_start!("Full moons over the next {months} months");
    if moons.is_empty() {
        log_decorated!("None in this window");
    }
    for moon in &moons {
        let local = moon.instant.with_timezone(&tz);
        let marker = if moon.is_supermoon { "  ← supermoon" } else { "" };
        log_indented!(
            "{} {} at {} - {:.0} km{}",
            local.format("%Y-%m-%d"),
            moon.folk_name,
            config.time_format.format_time(&local),
            moon.distance_km,
            marker
        );
    }
    log_end!();
    Ok(())
}

/// List supermoons, blue moons, and black moons.
pub fn handle_special_command(common: &CommonArgs, months: Option<u32>) -> Result<()> {
    let (config, location) = super::load_context(common)?;
    let months = months.unwrap_or(config.lookahead_months);
    let tz = location.timezone();

    let events = special::find_special_events(Utc::now(), months);

    log_block_start!("Special lunar events over the next {months} months");
    if events.is_empty() {
        log_decorated!("None in this window");
    }
    for event in &events {
        let local = event.instant.with_timezone(&tz);
        log_indented!("{} {}", local.format("%Y-%m-%d"), event.name);
        log_indented!("  {}", event.description);
    }
    log_end!();
    Ok(())
}

/// List sun/moon proximity photo opportunities with astronomy scores.
pub fn handle_proximity_command(common: &CommonArgs, days: Option<u32>) -> Result<()> {
    let (_config, location) = super::load_context(common)?;
    let days = days.unwrap_or(DEFAULT_PROXIMITY_DAYS);
    let engine = PositionEngine::new(location);
    let tz = engine.timezone();

    let today = Utc::now().with_timezone(&tz).date_naive();
    let events = proximity::find_proximity_events(today, days, location);

    log_block_start!("Sun/moon proximity events over the next {days} days");
    if events.is_empty() {
        log_decorated!("None in this window - the moon keeps its distance for a while");
    }
    for event in &events {
        let score = scoring::astronomy_opportunity_score(event);
        log_indented!(
            "{} {} ({} min, {}°) - score {}",
            event.date.format("%Y-%m-%d"),
            event.kind.label(),
            event.time_gap_minutes.round(),
            event.azimuth_gap_deg.round(),
            score
        );
        log_indented!("  {}", event.description);
    }
    log_end!();
    Ok(())
}

/// List upcoming meteor showers rated for the viewer's latitude.
pub fn handle_meteors_command(common: &CommonArgs, months: Option<u32>) -> Result<()> {
    let (config, location) = super::load_context(common)?;
    let months = months.unwrap_or(config.lookahead_months);
    let tz = location.timezone();
    let now = Utc::now();

    let showers = meteors::upcoming_meteor_showers(now, months, location.latitude());

    log_block_start!("Meteor showers over the next {months} months");
    if showers.is_empty() {
        log_decorated!("None visible from this latitude in the window");
    }
    for event in &showers {
        let peak_local = event.peak.with_timezone(&tz);
        let stars = "★".repeat(usize::from(meteors::zhr_rating(event.shower.zhr)));
        let active = if event.is_active_at(now) { " (active now)" } else { "" };
        log_indented!(
            "{} {} {} - ZHR {}{}",
            peak_local.format("%Y-%m-%d"),
            event.shower.name,
            stars,
            event.shower.zhr,
            active
        );
        log_indented!(
            "  {} - radiant peaks at {:.0}°",
            event.visibility.label(),
            event.max_altitude_deg
        );
    }
    log_end!();
    Ok(())
}

/// List upcoming eclipses with their locally resolved visibility.
pub fn handle_eclipses_command(common: &CommonArgs, years: Option<u32>) -> Result<()> {
    let (config, location) = super::load_context(common)?;
    let years = years.unwrap_or(config.eclipse_years);
    let tz = location.timezone();

    let upcoming = eclipses::upcoming_eclipses(Utc::now(), years);

    log_block_start!("Eclipses within {years} years");
    if upcoming.is_empty() {
        log_decorated!("None in this window");
    }
    for eclipse in upcoming {
        let visibility =
            eclipses::visibility_for_location(eclipse, location, &SAO_MIGUEL_OVERRIDES);
        let local = eclipse.date.with_timezone(&tz);
        let category = match eclipse.category {
            crate::catalog::EclipseCategory::Solar => "solar",
            crate::catalog::EclipseCategory::Lunar => "lunar",
        };
        log_indented!(
            "{} {} {} eclipse - {}% visible from here",
            local.format("%Y-%m-%d"),
            eclipse.kind.label(),
            category,
            visibility
        );
        log_indented!("  {}", eclipse.description);
    }
    log_end!();
    Ok(())
}

/// List active and upcoming comets for the viewer.
pub fn handle_comets_command(common: &CommonArgs) -> Result<()> {
    let (_config, location) = super::load_context(common)?;
    let now = Utc::now();

    let events = comets::comets_at(now, location.latitude());

    log_block_start!("Comets");
    if events.is_empty() {
        log_decorated!("No active or upcoming comets for this latitude");
    }
    for event in &events {
        let comet = &event.comet;
        let state = if event.is_active { "active" } else { "upcoming" };
        log_indented!(
            "{} ({}) - peak {} - mag {:.1}, {}",
            comet.name,
            state,
            comet.peak.format("%Y-%m-%d"),
            comet.magnitude,
            comets::magnitude_rating(comet.magnitude)
        );
        log_indented!("  Best: {} toward {}", comet.best_viewing_time, comet.direction);
    }
    log_end!();
    Ok(())
}
