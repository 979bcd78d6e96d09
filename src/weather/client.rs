//! Open-Meteo forecast client with retry, caching, and request coalescing.
//!
//! Fetch policy, in order:
//!
//! 1. a TTL-fresh cache entry answers immediately;
//! 2. otherwise a per-location gate coalesces concurrent callers — one does
//!    the fetch, the rest block on the gate and pick up the cached result;
//! 3. the fetch itself retries transient failures (HTTP 408/429/500/502/
//!    503/504 and transport errors) with bounded exponential backoff;
//! 4. on exhaustion the error surfaces. Falling back to a stale cache entry
//!    is a separate, caller-chosen step via [`ForecastClient::cached_any_age`].

use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use chrono::{NaiveDateTime, Utc};
use serde::Deserialize;
use thiserror::Error;

use super::cache::{ForecastCache, location_key};
use super::{HourlyWeatherSample, WeatherForecast};
use crate::constants::{
    FORECAST_BASE_URL, FORECAST_CACHE_TTL_SECS, FORECAST_RETRY_ATTEMPTS,
    FORECAST_RETRY_BASE_DELAY_MS,
};

const RETRYABLE_STATUS_CODES: [u16; 6] = [408, 429, 500, 502, 503, 504];

/// Why a forecast fetch failed.
#[derive(Debug, Error)]
pub enum ForecastError {
    /// The provider answered with a non-success status.
    #[error("weather request failed (status {status})")]
    Status { status: u16 },
    /// The request never completed (DNS, connect, timeout).
    #[error("weather request failed: {0}")]
    Transport(#[from] reqwest::Error),
    /// The provider answered with something that isn't a forecast.
    #[error("weather response could not be parsed: {0}")]
    Parse(String),
    /// A well-formed response with no hourly data in it.
    #[error("weather forecast is unavailable")]
    Empty,
}

impl ForecastError {
    /// Whether retrying the same request can plausibly succeed.
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Status { status } => RETRYABLE_STATUS_CODES.contains(status),
            Self::Transport(_) => true,
            Self::Parse(_) | Self::Empty => false,
        }
    }
}

#[derive(Debug, Deserialize)]
struct OpenMeteoHourly {
    time: Vec<String>,
    wind_speed_10m: Vec<Option<f64>>,
    cloud_cover: Vec<Option<f64>>,
    cloud_cover_low: Vec<Option<f64>>,
    cloud_cover_mid: Vec<Option<f64>>,
    cloud_cover_high: Vec<Option<f64>>,
    relative_humidity_2m: Vec<Option<f64>>,
}

#[derive(Debug, Deserialize)]
struct OpenMeteoResponse {
    latitude: f64,
    longitude: f64,
    timezone: String,
    hourly: OpenMeteoHourly,
}

const HOURLY_PARAMS: &str = "wind_speed_10m,cloud_cover,cloud_cover_low,cloud_cover_mid,\
                             cloud_cover_high,relative_humidity_2m";

fn convert_response(response: OpenMeteoResponse) -> Result<WeatherForecast, ForecastError> {
    if response.hourly.time.is_empty() {
        return Err(ForecastError::Empty);
    }

    let hourly = &response.hourly;
    let value_at = |values: &[Option<f64>], i: usize| values.get(i).copied().flatten().unwrap_or(0.0);

    let mut samples = Vec::with_capacity(hourly.time.len());
    for (i, raw_time) in hourly.time.iter().enumerate() {
        // Open-Meteo returns "YYYY-MM-DDTHH:MM" in the requested timezone;
        // we always request UTC
        let time = NaiveDateTime::parse_from_str(raw_time, "%Y-%m-%dT%H:%M")
            .map_err(|e| ForecastError::Parse(format!("bad timestamp {raw_time:?}: {e}")))?
            .and_utc();

        samples.push(HourlyWeatherSample {
            time,
            wind_speed_kmh: value_at(&hourly.wind_speed_10m, i),
            cloud_cover: value_at(&hourly.cloud_cover, i),
            cloud_cover_low: value_at(&hourly.cloud_cover_low, i),
            cloud_cover_mid: value_at(&hourly.cloud_cover_mid, i),
            cloud_cover_high: value_at(&hourly.cloud_cover_high, i),
            relative_humidity: value_at(&hourly.relative_humidity_2m, i),
        });
    }

    Ok(WeatherForecast {
        latitude: response.latitude,
        longitude: response.longitude,
        timezone: response.timezone,
        hourly: samples,
        fetched_at: Utc::now(),
    })
}

/// Blocking forecast client owning the cache and the coalescing gates.
pub struct ForecastClient {
    http: reqwest::blocking::Client,
    base_url: String,
    cache: ForecastCache,
    /// One gate per rounded-coordinate key; concurrent fetches for the same
    /// location serialize on it instead of hitting the provider twice.
    gates: Mutex<HashMap<String, Arc<Mutex<()>>>>,
    ttl: Duration,
}

impl ForecastClient {
    pub fn new() -> Self {
        Self::with_base_url(FORECAST_BASE_URL)
    }

    /// Client against a different endpoint. Exists for tests.
    pub fn with_base_url(base_url: &str) -> Self {
        Self {
            http: reqwest::blocking::Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            cache: ForecastCache::new(),
            gates: Mutex::new(HashMap::new()),
            ttl: Duration::from_secs(FORECAST_CACHE_TTL_SECS),
        }
    }

    /// Hourly forecast for a location, `days` ahead.
    ///
    /// Serves TTL-fresh cache hits without touching the network; otherwise
    /// fetches with bounded retries, caching the result.
    pub fn forecast(
        &self,
        latitude: f64,
        longitude: f64,
        days: u32,
    ) -> Result<WeatherForecast, ForecastError> {
        if let Some(cached) = self.cache.fresh(latitude, longitude, self.ttl) {
            return Ok(cached);
        }

        let gate = self.gate_for(&location_key(latitude, longitude));
        let _held = gate.lock().ok();

        // A fetch that finished while we waited on the gate is our answer
        if let Some(cached) = self.cache.fresh(latitude, longitude, self.ttl) {
            return Ok(cached);
        }

        let forecast = self.fetch_with_retry(latitude, longitude, days)?;
        self.cache.store(forecast.clone());
        Ok(forecast)
    }

    /// The cached forecast for a location regardless of age, if any.
    ///
    /// This is the explicit stale-fallback path for when [`Self::forecast`]
    /// has failed; it is not part of the normal cache policy.
    pub fn cached_any_age(&self, latitude: f64, longitude: f64) -> Option<WeatherForecast> {
        self.cache.any_age(latitude, longitude)
    }

    fn gate_for(&self, key: &str) -> Arc<Mutex<()>> {
        let mut gates = match self.gates.lock() {
            Ok(gates) => gates,
            Err(poisoned) => poisoned.into_inner(),
        };
        gates.entry(key.to_string()).or_default().clone()
    }

    fn fetch_with_retry(
        &self,
        latitude: f64,
        longitude: f64,
        days: u32,
    ) -> Result<WeatherForecast, ForecastError> {
        let mut attempt = 0;
        loop {
            match self.fetch_once(latitude, longitude, days) {
                Ok(forecast) => return Ok(forecast),
                Err(error) => {
                    if !error.is_retryable() || attempt >= FORECAST_RETRY_ATTEMPTS {
                        return Err(error);
                    }
                    let delay = FORECAST_RETRY_BASE_DELAY_MS * 2_u64.pow(attempt);
                    std::thread::sleep(Duration::from_millis(delay));
                    attempt += 1;
                }
            }
        }
    }

    fn fetch_once(
        &self,
        latitude: f64,
        longitude: f64,
        days: u32,
    ) -> Result<WeatherForecast, ForecastError> {
        let response = self
            .http
            .get(&self.base_url)
            .query(&[
                ("latitude", latitude.to_string()),
                ("longitude", longitude.to_string()),
                ("hourly", HOURLY_PARAMS.to_string()),
                ("timezone", "UTC".to_string()),
                ("forecast_days", days.max(1).to_string()),
            ])
            .send()?;

        let status = response.status();
        if !status.is_success() {
            return Err(ForecastError::Status {
                status: status.as_u16(),
            });
        }

        let body: OpenMeteoResponse = response
            .json()
            .map_err(|e| ForecastError::Parse(e.to_string()))?;
        convert_response(body)
    }
}

impl Default for ForecastClient {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn retryable_statuses_match_the_policy() {
        for status in [408, 429, 500, 502, 503, 504] {
            assert!(ForecastError::Status { status }.is_retryable());
        }
        for status in [400, 401, 403, 404, 422] {
            assert!(!ForecastError::Status { status }.is_retryable());
        }
        assert!(!ForecastError::Empty.is_retryable());
        assert!(!ForecastError::Parse("bad".to_string()).is_retryable());
    }

    #[test]
    fn responses_convert_into_ordered_samples() {
        let raw = r#"{
            "latitude": 40.71,
            "longitude": -74.01,
            "timezone": "UTC",
            "hourly": {
                "time": ["2026-06-01T00:00", "2026-06-01T01:00"],
                "wind_speed_10m": [5.5, null],
                "cloud_cover": [20.0, 30.0],
                "cloud_cover_low": [10.0, 10.0],
                "cloud_cover_mid": [5.0, 15.0],
                "cloud_cover_high": [40.0, 55.0],
                "relative_humidity_2m": [60.0, 62.0]
            }
        }"#;
        let parsed: OpenMeteoResponse = serde_json::from_str(raw).unwrap();
        let forecast = convert_response(parsed).unwrap();

        assert_eq!(forecast.hourly.len(), 2);
        assert_eq!(forecast.hourly[0].wind_speed_kmh, 5.5);
        // Missing values read as zero, matching the provider's null padding
        assert_eq!(forecast.hourly[1].wind_speed_kmh, 0.0);
        assert!(forecast.hourly[0].time < forecast.hourly[1].time);
    }

    #[test]
    fn empty_hourly_data_is_an_error() {
        let raw = r#"{
            "latitude": 0.0,
            "longitude": 0.0,
            "timezone": "UTC",
            "hourly": {
                "time": [],
                "wind_speed_10m": [],
                "cloud_cover": [],
                "cloud_cover_low": [],
                "cloud_cover_mid": [],
                "cloud_cover_high": [],
                "relative_humidity_2m": []
            }
        }"#;
        let parsed: OpenMeteoResponse = serde_json::from_str(raw).unwrap();
        assert!(matches!(convert_response(parsed), Err(ForecastError::Empty)));
    }

    #[test]
    fn malformed_timestamps_are_a_parse_error() {
        let raw = r#"{
            "latitude": 0.0,
            "longitude": 0.0,
            "timezone": "UTC",
            "hourly": {
                "time": ["yesterday"],
                "wind_speed_10m": [1.0],
                "cloud_cover": [1.0],
                "cloud_cover_low": [1.0],
                "cloud_cover_mid": [1.0],
                "cloud_cover_high": [1.0],
                "relative_humidity_2m": [1.0]
            }
        }"#;
        let parsed: OpenMeteoResponse = serde_json::from_str(raw).unwrap();
        assert!(matches!(
            convert_response(parsed),
            Err(ForecastError::Parse(_))
        ));
    }

    #[test]
    fn gates_are_shared_per_location_key() {
        let client = ForecastClient::new();
        let a = client.gate_for("40.713:-74.006");
        let b = client.gate_for("40.713:-74.006");
        let c = client.gate_for("51.500:-0.130");
        assert!(Arc::ptr_eq(&a, &b));
        assert!(!Arc::ptr_eq(&a, &c));
    }
}
