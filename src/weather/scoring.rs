//! Composite weather scoring for photography.
//!
//! Two profiles exist. `Sunset` rewards a band of high cloud to catch color
//! (peaking at 55% cover), punishes low/mid cloud that blocks it, and wants
//! calm air. `Night` wants clear, dry, dark, still skies. Every sub-score
//! lands in [0, 100]; composites are fixed weighted sums, so scores are
//! comparable across days and locations.

use chrono::{DateTime, NaiveDate, Timelike, Utc};
use chrono_tz::Tz;

use super::{HourlyWeatherSample, WeatherForecast};
use crate::constants::{
    GOOD_WEATHER_SCORE, MAX_DAILY_SCORE_DAYS, MAX_FORECAST_MATCH_HOURS,
    MAX_PROXIMITY_AZIMUTH_GAP_DEG, MAX_PROXIMITY_TIME_GAP_MINUTES,
};
use crate::events::proximity::ProximityEvent;

/// Which shooting scenario a score describes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WeatherProfile {
    Sunset,
    Night,
}

impl WeatherProfile {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Sunset => "sunset",
            Self::Night => "night",
        }
    }
}

/// Wind speeds between which the wind sub-score falls linearly from 100 to 0.
#[derive(Debug, Clone, Copy)]
struct WindThresholds {
    ideal_kmh: f64,
    max_kmh: f64,
}

const SUNSET_WIND: WindThresholds = WindThresholds {
    ideal_kmh: 9.0,
    max_kmh: 14.0,
};
const NIGHT_WIND: WindThresholds = WindThresholds {
    ideal_kmh: 8.0,
    max_kmh: 12.0,
};

/// High cloud cover percentage where backlit color peaks.
const IDEAL_HIGH_CLOUD_PCT: f64 = 55.0;

fn clamp_score(value: f64) -> f64 {
    value.clamp(0.0, 100.0)
}

/// 100 at or below the ideal speed, 0 at or above the maximum, linear
/// in between. Non-increasing in speed by construction.
fn score_wind(speed_kmh: f64, thresholds: WindThresholds) -> f64 {
    if speed_kmh <= thresholds.ideal_kmh {
        return 100.0;
    }
    if speed_kmh >= thresholds.max_kmh {
        return 0.0;
    }
    (100.0
        - ((speed_kmh - thresholds.ideal_kmh) / (thresholds.max_kmh - thresholds.ideal_kmh))
            * 100.0)
        .round()
}

/// Peaks at 55% high cloud and falls off at 2 points per percent either way.
fn score_high_clouds(cloud_cover_high: f64) -> f64 {
    clamp_score(100.0 - (cloud_cover_high - IDEAL_HIGH_CLOUD_PCT).abs() * 2.0).round()
}

/// 100 up to 65% RH, 0 from 95%, linear between.
fn score_humidity(relative_humidity: f64) -> f64 {
    const IDEAL: f64 = 65.0;
    const MAX: f64 = 95.0;
    if relative_humidity <= IDEAL {
        return 100.0;
    }
    if relative_humidity >= MAX {
        return 0.0;
    }
    (100.0 - ((relative_humidity - IDEAL) / (MAX - IDEAL)) * 100.0).round()
}

/// The named sub-scores behind a composite, per profile.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ScoreBreakdown {
    Sunset {
        wind: u8,
        high_cloud: u8,
        blocking_cloud: u8,
    },
    Night {
        wind: u8,
        clear_sky: u8,
        humidity: u8,
        moon: u8,
    },
}

/// Display band for a composite score, shared by label and icon selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScoreLabel {
    Excellent,
    Good,
    Fair,
    Poor,
}

impl ScoreLabel {
    pub fn from_score(score: u8) -> Self {
        if score >= 85 {
            Self::Excellent
        } else if score >= GOOD_WEATHER_SCORE {
            Self::Good
        } else if score >= 50 {
            Self::Fair
        } else {
            Self::Poor
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Excellent => "Excellent",
            Self::Good => "Good",
            Self::Fair => "Fair",
            Self::Poor => "Poor",
        }
    }

    pub fn icon(&self) -> &'static str {
        match self {
            Self::Excellent => "☀️",
            Self::Good => "🌤️",
            Self::Fair => "⛅",
            Self::Poor => "🌥️",
        }
    }
}

/// A scored hour of conditions under one profile.
#[derive(Debug, Clone, PartialEq)]
pub struct ScoredConditions {
    pub profile: WeatherProfile,
    /// Composite score, [0, 100].
    pub score: u8,
    pub breakdown: ScoreBreakdown,
    pub label: ScoreLabel,
    pub summary: String,
}

fn summarize_sunset(wind: f64, high_cloud: f64, blocking_cloud: f64) -> String {
    if blocking_cloud < 45.0 {
        "Low/mid clouds may block color"
    } else if high_cloud >= 75.0 && wind >= 70.0 {
        "Light wind, ideal red-sky setup"
    } else if wind < 50.0 {
        "Wind may shake long-lens sunset shots"
    } else {
        "Mixed sunset conditions"
    }
    .to_string()
}

fn summarize_night(wind: f64, clear_sky: f64, humidity: f64) -> String {
    if clear_sky < 55.0 {
        "Clouds likely limit night visibility"
    } else if wind < 55.0 {
        "Wind may blur long exposures"
    } else if humidity < 50.0 {
        "Humidity may reduce sharpness"
    } else {
        "Clear and stable for long exposures"
    }
    .to_string()
}

/// Score one hourly sample under a profile.
///
/// `moon_illumination_pct` feeds the night profile's darkness term; when it
/// is unknown the moon sub-score defaults to 100 (best case).
pub fn score_conditions(
    profile: WeatherProfile,
    sample: &HourlyWeatherSample,
    moon_illumination_pct: Option<f64>,
) -> ScoredConditions {
    match profile {
        WeatherProfile::Sunset => {
            let wind = score_wind(sample.wind_speed_kmh, SUNSET_WIND);
            let high_cloud = score_high_clouds(sample.cloud_cover_high);
            let blocking_cloud =
                100.0 - sample.cloud_cover_low.max(sample.cloud_cover_mid);

            let score = (wind * 0.4 + high_cloud * 0.3 + blocking_cloud * 0.3)
                .round_ties_even() as u8;
            ScoredConditions {
                profile,
                score,
                breakdown: ScoreBreakdown::Sunset {
                    wind: wind.round() as u8,
                    high_cloud: high_cloud.round() as u8,
                    blocking_cloud: clamp_score(blocking_cloud).round() as u8,
                },
                label: ScoreLabel::from_score(score),
                summary: summarize_sunset(wind, high_cloud, blocking_cloud),
            }
        }
        WeatherProfile::Night => {
            let wind = score_wind(sample.wind_speed_kmh, NIGHT_WIND);
            let clear_sky = 100.0 - sample.cloud_cover;
            let humidity = score_humidity(sample.relative_humidity);
            let moon = moon_illumination_pct.map_or(100.0, |pct| 100.0 - pct);

            let score = (wind * 0.3 + clear_sky * 0.4 + humidity * 0.15 + moon * 0.15)
                .round_ties_even() as u8;
            ScoredConditions {
                profile,
                score,
                breakdown: ScoreBreakdown::Night {
                    wind: wind.round() as u8,
                    clear_sky: clamp_score(clear_sky).round() as u8,
                    humidity: humidity.round() as u8,
                    moon: clamp_score(moon).round() as u8,
                },
                label: ScoreLabel::from_score(score),
                summary: summarize_night(wind, clear_sky, humidity),
            }
        }
    }
}

/// The sample nearest to `target`, or `None` when the nearest one is further
/// than `max_hours_diff` away. Never extrapolates.
pub fn closest_sample<'a>(
    samples: &'a [HourlyWeatherSample],
    target: DateTime<Utc>,
    max_hours_diff: f64,
) -> Option<&'a HourlyWeatherSample> {
    let best = samples
        .iter()
        .min_by_key(|sample| (sample.time - target).num_seconds().abs())?;

    let diff_hours = (best.time - target).num_seconds().abs() as f64 / 3600.0;
    (diff_hours <= max_hours_diff).then_some(best)
}

/// Score the forecast hour nearest to `time`, or `None` when no sample is
/// close enough ("insufficient data", never a guessed zero).
pub fn score_for_time(
    forecast: &WeatherForecast,
    time: DateTime<Utc>,
    profile: WeatherProfile,
    moon_illumination_pct: Option<f64>,
) -> Option<ScoredConditions> {
    let sample = closest_sample(&forecast.hourly, time, MAX_FORECAST_MATCH_HOURS)?;
    Some(score_conditions(profile, sample, moon_illumination_pct))
}

/// Profile to use when scoring the weather around a proximity event.
/// Every pairing involves a sun horizon event, so the color-hunting sunset
/// profile applies to all of them.
pub fn profile_for_proximity_event(_event: &ProximityEvent) -> WeatherProfile {
    WeatherProfile::Sunset
}

/// Astronomy-only opportunity score for a proximity event: how tight the
/// pairing is, before any weather is known.
pub fn astronomy_opportunity_score(event: &ProximityEvent) -> u8 {
    let azimuth_score = clamp_score(
        100.0 - (event.azimuth_gap_deg / MAX_PROXIMITY_AZIMUTH_GAP_DEG) * 100.0,
    );
    let timing_score = clamp_score(
        100.0 - (event.time_gap_minutes / MAX_PROXIMITY_TIME_GAP_MINUTES) * 100.0,
    );
    (azimuth_score * 0.6 + timing_score * 0.4).round_ties_even() as u8
}

/// Blend an astronomy score with a weather score once both are known.
pub fn combined_opportunity_score(astronomy_score: u8, weather_score: u8) -> u8 {
    (f64::from(astronomy_score) * 0.5 + f64::from(weather_score) * 0.5).round_ties_even() as u8
}

pub fn is_good_weather(score: u8) -> bool {
    score >= GOOD_WEATHER_SCORE
}

/// The best-scoring shooting window of one local day.
#[derive(Debug, Clone, PartialEq)]
pub struct DailyPhotoScore {
    pub date: NaiveDate,
    pub profile: WeatherProfile,
    pub score: u8,
    pub label: ScoreLabel,
    pub summary: String,
    /// The hour the score was taken from.
    pub observation_time: DateTime<Utc>,
    pub wind_speed_kmh: f64,
    pub cloud_cover: f64,
    pub relative_humidity: f64,
}

/// Candidate shooting hours of a day: local 16:00-22:00 under the sunset
/// profile, local 22:00-04:00 under the night profile. Hour 22 counts as
/// sunset first.
fn daily_candidates(
    samples: &[HourlyWeatherSample],
    tz: Tz,
) -> Vec<(WeatherProfile, HourlyWeatherSample)> {
    let mut candidates = Vec::new();
    for sample in samples {
        let hour = sample.time.with_timezone(&tz).hour();
        if (16..=22).contains(&hour) {
            candidates.push((WeatherProfile::Sunset, *sample));
            continue;
        }
        if hour <= 4 || hour >= 22 {
            candidates.push((WeatherProfile::Night, *sample));
        }
    }
    candidates
}

/// Best scored candidate per local day, at most seven days ascending.
///
/// Days without a candidate hour fall back to a sunset-profile score of the
/// day's first sample so no forecast day silently disappears.
pub fn daily_photo_scores(forecast: &WeatherForecast, tz: Tz) -> Vec<DailyPhotoScore> {
    let mut by_day: Vec<(NaiveDate, Vec<HourlyWeatherSample>)> = Vec::new();
    for sample in &forecast.hourly {
        let day = sample.time.with_timezone(&tz).date_naive();
        match by_day.last_mut() {
            Some((date, samples)) if *date == day => samples.push(*sample),
            _ => by_day.push((day, vec![*sample])),
        }
    }

    let mut results: Vec<DailyPhotoScore> = Vec::new();
    for (date, samples) in by_day {
        let Some(first) = samples.first().copied() else {
            continue;
        };

        let mut candidates = daily_candidates(&samples, tz);
        if candidates.is_empty() {
            candidates.push((WeatherProfile::Sunset, first));
        }

        let mut best: Option<(ScoredConditions, HourlyWeatherSample)> = None;
        for (profile, sample) in candidates {
            let scored = score_conditions(profile, &sample, None);
            let better = best
                .as_ref()
                .map(|(current, _)| scored.score > current.score)
                .unwrap_or(true);
            if better {
                best = Some((scored, sample));
            }
        }

        if let Some((scored, sample)) = best {
            results.push(DailyPhotoScore {
                date,
                profile: scored.profile,
                score: scored.score,
                label: scored.label,
                summary: scored.summary,
                observation_time: sample.time,
                wind_speed_kmh: sample.wind_speed_kmh,
                cloud_cover: sample.cloud_cover,
                relative_humidity: sample.relative_humidity,
            });
        }
    }

    results.sort_by_key(|score| score.date);
    results.truncate(MAX_DAILY_SCORE_DAYS);
    results
}
