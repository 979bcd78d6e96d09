//! Configuration system for skyplan with validation and defaults.
//!
//! Settings live in a TOML file and cover presentation state only: a default
//! location, saved locations, the time format, and lookahead windows. The
//! engine never reads configuration itself; command handlers resolve a
//! [`crate::location::Location`] and pass explicit arguments down.
//!
//! ## Configuration Sources
//!
//! The configuration file is searched at:
//! 1. `<dir>/config.toml` when a directory is passed on the command line
//! 2. **XDG_CONFIG_HOME**/skyplan/config.toml otherwise
//!
//! A missing file yields defaults; a malformed or out-of-range file is an
//! error with a pointer at the offending value, never a silent fallback.
//!
//! ```toml
//! latitude = 40.7128        # Default latitude (-90 to 90)
//! longitude = -74.0060      # Default longitude (-180 to 180)
//! time_format = "24h"       # Clock display: "12h" or "24h"
//! forecast_days = 7         # Days of hourly forecast to request (1-16)
//! lookahead_months = 6      # Event scan window in months (1-24)
//! eclipse_years = 2         # Eclipse listing window in years (1-5)
//!
//! [[saved_locations]]
//! name = "Home"
//! latitude = 40.7128
//! longitude = -74.0060
//! ```

use std::path::PathBuf;

use anyhow::{Context, Result, bail};
use chrono::{DateTime, TimeZone};
use serde::Deserialize;

use crate::constants::{DEFAULT_ECLIPSE_YEARS, DEFAULT_FORECAST_DAYS, DEFAULT_LOOKAHEAD_MONTHS};
use crate::location::Location;

/// Clock display preference.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub enum TimeFormat {
    #[serde(rename = "12h")]
    TwelveHour,
    #[serde(rename = "24h")]
    TwentyFourHour,
}

impl TimeFormat {
    /// Render a local time per the preference.
    pub fn format_time<Tz: TimeZone>(&self, at: &DateTime<Tz>) -> String
    where
        Tz::Offset: std::fmt::Display,
    {
        match self {
            Self::TwelveHour => at.format("%-I:%M %p").to_string(),
            Self::TwentyFourHour => at.format("%H:%M").to_string(),
        }
    }
}

/// A named location bookmark.
#[derive(Debug, Clone, Deserialize)]
pub struct SavedLocation {
    pub name: String,
    pub latitude: f64,
    pub longitude: f64,
}

/// Persisted presentation settings.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Config {
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub time_format: TimeFormat,
    pub forecast_days: u32,
    pub lookahead_months: u32,
    pub eclipse_years: u32,
    pub saved_locations: Vec<SavedLocation>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            latitude: None,
            longitude: None,
            time_format: TimeFormat::TwentyFourHour,
            forecast_days: DEFAULT_FORECAST_DAYS,
            lookahead_months: DEFAULT_LOOKAHEAD_MONTHS,
            eclipse_years: DEFAULT_ECLIPSE_YEARS,
            saved_locations: Vec::new(),
        }
    }
}

/// Resolve the configuration file path.
pub fn config_path(config_dir: Option<&str>) -> Result<PathBuf> {
    let dir = match config_dir {
        Some(dir) => PathBuf::from(dir),
        None => dirs::config_dir()
            .context("could not determine the configuration directory")?
            .join("skyplan"),
    };
    Ok(dir.join("config.toml"))
}

impl Config {
    /// Load the configuration, falling back to defaults when no file exists.
    pub fn load(config_dir: Option<&str>) -> Result<Self> {
        let path = config_path(config_dir)?;
        if !path.exists() {
            return Ok(Self::default());
        }
        Self::load_from_path(&path)
    }

    /// Load and validate a specific configuration file.
    pub fn load_from_path(path: &std::path::Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config file: {}", path.display()))?;
        let config: Config = toml::from_str(&content)
            .with_context(|| format!("failed to parse config file: {}", path.display()))?;
        config.validate()?;
        Ok(config)
    }

    /// Reject out-of-range settings with a pointer at the offending value.
    fn validate(&self) -> Result<()> {
        if let (Some(latitude), Some(longitude)) = (self.latitude, self.longitude) {
            Location::new(latitude, longitude).context("invalid default coordinates in config")?;
        } else if self.latitude.is_some() != self.longitude.is_some() {
            bail!("config sets only one of latitude/longitude; both are required");
        }

        if !(1..=16).contains(&self.forecast_days) {
            bail!(
                "forecast_days must be between 1 and 16, got {}",
                self.forecast_days
            );
        }
        if !(1..=24).contains(&self.lookahead_months) {
            bail!(
                "lookahead_months must be between 1 and 24, got {}",
                self.lookahead_months
            );
        }
        if !(1..=5).contains(&self.eclipse_years) {
            bail!(
                "eclipse_years must be between 1 and 5, got {}",
                self.eclipse_years
            );
        }

        for saved in &self.saved_locations {
            Location::new(saved.latitude, saved.longitude)
                .with_context(|| format!("invalid saved location {:?}", saved.name))?;
        }

        Ok(())
    }

    /// Resolve the location for a command: CLI overrides win, then a saved
    /// location by name, then the config default.
    pub fn resolve_location(
        &self,
        cli_latitude: Option<f64>,
        cli_longitude: Option<f64>,
        saved_name: Option<&str>,
    ) -> Result<Location> {
        if let (Some(latitude), Some(longitude)) = (cli_latitude, cli_longitude) {
            return Location::new(latitude, longitude);
        }
        if cli_latitude.is_some() || cli_longitude.is_some() {
            bail!("--lat and --lon must be given together");
        }

        if let Some(name) = saved_name {
            let saved = self
                .saved_locations
                .iter()
                .find(|s| s.name.eq_ignore_ascii_case(name))
                .with_context(|| format!("no saved location named {name:?}"))?;
            return Location::new(saved.latitude, saved.longitude);
        }

        match (self.latitude, self.longitude) {
            (Some(latitude), Some(longitude)) => Location::new(latitude, longitude),
            _ => bail!(
                "no location configured; pass --lat/--lon or set latitude/longitude in config.toml"
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_config(content: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file
    }

    #[test]
    fn defaults_apply_when_fields_are_missing() {
        let file = write_config("latitude = 40.7128\nlongitude = -74.0060\n");
        let config = Config::load_from_path(file.path()).unwrap();
        assert_eq!(config.forecast_days, DEFAULT_FORECAST_DAYS);
        assert_eq!(config.lookahead_months, DEFAULT_LOOKAHEAD_MONTHS);
        assert_eq!(config.time_format, TimeFormat::TwentyFourHour);
    }

    #[test]
    fn invalid_coordinates_are_rejected_not_clamped() {
        let file = write_config("latitude = 94.0\nlongitude = 0.0\n");
        assert!(Config::load_from_path(file.path()).is_err());
    }

    #[test]
    fn half_specified_coordinates_are_rejected() {
        let file = write_config("latitude = 40.0\n");
        assert!(Config::load_from_path(file.path()).is_err());
    }

    #[test]
    fn out_of_range_windows_are_rejected() {
        let file = write_config("forecast_days = 30\n");
        assert!(Config::load_from_path(file.path()).is_err());

        let file = write_config("eclipse_years = 9\n");
        assert!(Config::load_from_path(file.path()).is_err());
    }

    #[test]
    fn saved_locations_resolve_by_name() {
        let file = write_config(
            r#"
[[saved_locations]]
name = "Dolomites"
latitude = 46.41
longitude = 11.84
"#,
        );
        let config = Config::load_from_path(file.path()).unwrap();
        let location = config
            .resolve_location(None, None, Some("dolomites"))
            .unwrap();
        assert!((location.latitude() - 46.41).abs() < 1e-9);
    }

    #[test]
    fn cli_coordinates_override_everything() {
        let config = Config {
            latitude: Some(10.0),
            longitude: Some(20.0),
            ..Config::default()
        };
        let location = config
            .resolve_location(Some(-33.87), Some(151.21), None)
            .unwrap();
        assert!((location.latitude() + 33.87).abs() < 1e-9);

        assert!(config.resolve_location(Some(1.0), None, None).is_err());
    }

    #[test]
    fn missing_location_is_a_helpful_error() {
        let config = Config::default();
        let error = config.resolve_location(None, None, None).unwrap_err();
        assert!(error.to_string().contains("--lat"));
    }

    #[test]
    fn time_formats_render_both_clocks() {
        let at = chrono::Utc.with_ymd_and_hms(2026, 6, 1, 18, 5, 0).unwrap();
        assert_eq!(TimeFormat::TwentyFourHour.format_time(&at), "18:05");
        assert_eq!(TimeFormat::TwelveHour.format_time(&at), "6:05 PM");
    }
}
