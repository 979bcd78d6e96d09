//! Weather-backed subcommands: daily scores and combined rankings.

use anyhow::{Context, Result};
use chrono::Utc;

use crate::args::CommonArgs;
use crate::constants::DEFAULT_PROXIMITY_DAYS;
use crate::events::proximity;
use crate::location::Location;
use crate::position::PositionEngine;
use crate::weather::client::ForecastClient;
use crate::weather::scoring;
use crate::weather::WeatherForecast;

/// Fetch the forecast, falling back to a stale cache entry only after the
/// fetch (with its retries) has failed, and saying so.
fn forecast_or_stale(
    client: &ForecastClient,
    location: Location,
    days: u32,
) -> Result<WeatherForecast> {
    match client.forecast(location.latitude(), location.longitude(), days) {
        Ok(forecast) => Ok(forecast),
        Err(error) => {
            log_pipe!();
            log_warning!("Forecast fetch failed: {error}");
            match client.cached_any_age(location.latitude(), location.longitude()) {
                Some(stale) => {
                    log_decorated!(
                        "Using cached forecast from {}",
                        stale.fetched_at.format("%Y-%m-%d %H:%M UTC")
                    );
                    Ok(stale)
                }
                None => Err(error).context("no cached forecast available either"),
            }
        }
    }
}

/// Print the best shooting window of each forecast day.
pub fn handle_weather_command(common: &CommonArgs, days: Option<u32>) -> Result<()> {
    let (config, location) = super::load_context(common)?;
    let days = days.unwrap_or(config.forecast_days);
    let tz = location.timezone();

    let client = ForecastClient::new();
    let forecast = forecast_or_stale(&client, location, days)?;
    let daily = scoring::daily_photo_scores(&forecast, tz);

    log_block_start!("Photo weather for {location}");
    if daily.is_empty() {
        log_decorated!("The forecast has no scoreable hours");
    }
    for day in &daily {
        let time_local = day.observation_time.with_timezone(&tz);
        log_indented!(
            "{} {} {} ({}) - best as {} at {}",
            day.date.format("%a %Y-%m-%d"),
            day.label.icon(),
            day.score,
            day.label.label(),
            day.profile.label(),
            config.time_format.format_time(&time_local)
        );
        log_indented!(
            "  {} - wind {:.0} km/h, cloud {:.0}%, humidity {:.0}%",
            day.summary,
            day.wind_speed_kmh,
            day.cloud_cover,
            day.relative_humidity
        );
    }
    log_end!();
    Ok(())
}

/// Rank proximity events by the combined astronomy + weather score.
pub fn handle_score_command(common: &CommonArgs, days: Option<u32>) -> Result<()> {
    let (config, location) = super::load_context(common)?;
    let days = days.unwrap_or(DEFAULT_PROXIMITY_DAYS);
    let engine = PositionEngine::new(location);
    let tz = engine.timezone();

    let today = Utc::now().with_timezone(&tz).date_naive();
    let events = proximity::find_proximity_events(today, days, location);

    if events.is_empty() {
        log_block_start!("No proximity events in the next {days} days to score");
        log_end!();
        return Ok(());
    }

    // Forecasts only reach ~16 days out; events beyond that keep their
    // astronomy-only score
    let client = ForecastClient::new();
    let forecast = forecast_or_stale(&client, location, config.forecast_days)?;

    let mut ranked: Vec<(u8, Option<u8>, &proximity::ProximityEvent)> = events
        .iter()
        .map(|event| {
            let astronomy = scoring::astronomy_opportunity_score(event);
            let profile = scoring::profile_for_proximity_event(event);
            let midpoint = event.sun_instant + (event.moon_instant - event.sun_instant) / 2;
            let weather = scoring::score_for_time(
                &forecast,
                midpoint,
                profile,
                Some(f64::from(event.moon_illumination_pct)),
            );
            let combined = weather
                .as_ref()
                .map(|w| scoring::combined_opportunity_score(astronomy, w.score));
            (astronomy, combined, event)
        })
        .collect();

    ranked.sort_by_key(|(astronomy, combined, _)| std::cmp::Reverse(combined.unwrap_or(*astronomy)));

    log_block_start!("Ranked photo opportunities, next {days} days");
    for (astronomy, combined, event) in &ranked {
        match combined {
            Some(combined) => log_indented!(
                "{} {} - combined {} (astronomy {})",
                event.date.format("%Y-%m-%d"),
                event.kind.label(),
                combined,
                astronomy
            ),
            None => log_indented!(
                "{} {} - astronomy {} (no forecast that far out)",
                event.date.format("%Y-%m-%d"),
                event.kind.label(),
                astronomy
            ),
        }
        log_indented!("  {}", event.description);
    }
    log_end!();
    Ok(())
}
