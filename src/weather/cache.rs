//! TTL cache for fetched forecasts, keyed by rounded coordinates.
//!
//! Keys round to three decimals (roughly 100 m), so jittery GPS fixes for
//! the same spot share one cache entry. The cache distinguishes a fresh hit
//! (within the TTL) from an any-age lookup; the latter exists only for the
//! explicit stale-fallback path after a failed fetch.

use std::collections::HashMap;
use std::sync::Mutex;
use std::time::Duration;

use chrono::Utc;

use super::WeatherForecast;

/// Cache key for a coordinate pair, rounded to three decimals.
pub fn location_key(latitude: f64, longitude: f64) -> String {
    format!("{latitude:.3}:{longitude:.3}")
}

/// In-memory forecast store with TTL-based freshness.
#[derive(Debug, Default)]
pub struct ForecastCache {
    entries: Mutex<HashMap<String, WeatherForecast>>,
}

impl ForecastCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// A cached forecast no older than `max_age`, if present.
    pub fn fresh(&self, latitude: f64, longitude: f64, max_age: Duration) -> Option<WeatherForecast> {
        let entries = self.entries.lock().ok()?;
        let cached = entries.get(&location_key(latitude, longitude))?;

        let age = Utc::now().signed_duration_since(cached.fetched_at);
        if age.num_seconds() < 0 || age.num_seconds() as u64 > max_age.as_secs() {
            return None;
        }
        Some(cached.clone())
    }

    /// A cached forecast of any age. Only the explicit stale-fallback path
    /// after exhausted retries should use this.
    pub fn any_age(&self, latitude: f64, longitude: f64) -> Option<WeatherForecast> {
        let entries = self.entries.lock().ok()?;
        entries.get(&location_key(latitude, longitude)).cloned()
    }

    pub fn store(&self, forecast: WeatherForecast) {
        if let Ok(mut entries) = self.entries.lock() {
            entries.insert(
                location_key(forecast.latitude, forecast.longitude),
                forecast,
            );
        }
    }

    pub fn clear(&self, latitude: f64, longitude: f64) {
        if let Ok(mut entries) = self.entries.lock() {
            entries.remove(&location_key(latitude, longitude));
        }
    }
}
