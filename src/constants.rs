//! Shared constants for the skyplan engine and CLI.
//!
//! Thresholds that define the engine's behavior live here so the finders,
//! scorers, and command handlers all agree on them. Values mirror the
//! practical defaults the scoring model was tuned with; changing them changes
//! what counts as an "event" or a "good" night.

/// Average length of a lunar cycle (new moon to new moon) in days.
pub const SYNODIC_MONTH_DAYS: f64 = 29.53059;

/// Phase-fraction distance from the target within which a daily sample is
/// already considered "at" a full/new moon.
pub const PHASE_DETECTION_EPSILON: f64 = 0.02;

/// Minimum days between two accepted lunation events. Guards against the
/// daily scan re-triggering near the detection threshold within the same
/// lunation; true spacing is a synodic month (~29.53 days).
pub const LUNATION_DEDUP_DAYS: f64 = 20.0;

/// Maximum bisection steps when refining a phase crossing.
pub const PHASE_REFINE_MAX_ITERATIONS: u32 = 50;

/// Maximum bisection steps when solving for a target solar longitude.
pub const SOLAR_LONGITUDE_MAX_ITERATIONS: u32 = 20;

/// Angular tolerance (degrees) for the solar-longitude solver.
pub const SOLAR_LONGITUDE_TOLERANCE_DEG: f64 = 0.01;

/// Half-width (days) of the solar-longitude search window around the seed.
pub const SOLAR_LONGITUDE_WINDOW_DAYS: i64 = 5;

/// A full moon closer than this distance (km) counts as a supermoon.
/// Practical cutoff near 90% of perigee distance.
pub const SUPERMOON_DISTANCE_KM: f64 = 362_000.0;

/// Maximum minutes between paired sun and moon events for a proximity event.
pub const MAX_PROXIMITY_TIME_GAP_MINUTES: f64 = 30.0;

/// Maximum circular azimuth separation (degrees) for a proximity event.
pub const MAX_PROXIMITY_AZIMUTH_GAP_DEG: f64 = 30.0;

/// Sampling step (minutes) for local lunar-eclipse visibility estimation.
pub const ECLIPSE_SAMPLE_STEP_MINUTES: i64 = 5;

/// Minimum peak altitude (degrees) below which a meteor shower is dropped
/// entirely for a viewer.
pub const METEOR_MIN_VISIBLE_ALTITUDE_DEG: f64 = 10.0;

/// Fixed 30-day month approximation used by "upcoming showers" windows.
pub const METEOR_WINDOW_DAYS_PER_MONTH: i64 = 30;

/// Composite weather score at or above which conditions count as "good".
pub const GOOD_WEATHER_SCORE: u8 = 70;

/// Maximum hours between a requested instant and the nearest hourly forecast
/// sample before scoring reports "no data" instead of extrapolating.
pub const MAX_FORECAST_MATCH_HOURS: f64 = 2.0;

/// Maximum days of daily photo scores emitted per forecast.
pub const MAX_DAILY_SCORE_DAYS: usize = 7;

/// Open-Meteo forecast endpoint.
pub const FORECAST_BASE_URL: &str = "https://api.open-meteo.com/v1/forecast";

/// How long a fetched forecast stays fresh in the client cache.
pub const FORECAST_CACHE_TTL_SECS: u64 = 3 * 60 * 60;

/// Retries after the initial forecast request (3 attempts total).
pub const FORECAST_RETRY_ATTEMPTS: u32 = 2;

/// Base delay for exponential forecast retry backoff.
pub const FORECAST_RETRY_BASE_DELAY_MS: u64 = 500;

/// Default days of hourly forecast to request.
pub const DEFAULT_FORECAST_DAYS: u32 = 7;

/// Default months of lookahead for event scans.
pub const DEFAULT_LOOKAHEAD_MONTHS: u32 = 6;

/// Default days of lookahead for proximity scans.
pub const DEFAULT_PROXIMITY_DAYS: u32 = 30;

/// Default years of lookahead for eclipse listings.
pub const DEFAULT_ECLIPSE_YEARS: u32 = 2;

/// Process exit code used when a command fails.
pub const EXIT_FAILURE: i32 = 1;
