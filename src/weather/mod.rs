//! Weather data model, scoring engine, and forecast client.
//!
//! The scoring math in [`scoring`] is pure: it sees hourly samples and
//! returns scores. Everything I/O-shaped (HTTP, retries, caching, request
//! coalescing) lives in [`client`] and [`cache`] and hands the engine plain
//! data.

pub mod cache;
pub mod client;
pub mod scoring;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One hour of forecast conditions.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HourlyWeatherSample {
    pub time: DateTime<Utc>,
    /// 10 m wind speed, km/h.
    pub wind_speed_kmh: f64,
    /// Total cloud cover, percent.
    pub cloud_cover: f64,
    pub cloud_cover_low: f64,
    pub cloud_cover_mid: f64,
    pub cloud_cover_high: f64,
    /// 2 m relative humidity, percent.
    pub relative_humidity: f64,
}

/// A fetched hourly forecast for one location.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeatherForecast {
    pub latitude: f64,
    pub longitude: f64,
    /// IANA timezone name reported by the provider.
    pub timezone: String,
    /// Samples in ascending time order.
    pub hourly: Vec<HourlyWeatherSample>,
    pub fetched_at: DateTime<Utc>,
}
