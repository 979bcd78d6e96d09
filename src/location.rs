//! Observer locations with boundary validation and timezone resolution.
//!
//! Coordinates are validated once, here, when a [`Location`] is constructed.
//! Everything downstream (the position engine, the finders, the scorers)
//! assumes coordinates are already in range and never re-validates or clamps.

use anyhow::{Result, bail};
use chrono_tz::Tz;
use once_cell::sync::Lazy;
use tzf_rs::DefaultFinder;

static TZ_FINDER: Lazy<DefaultFinder> = Lazy::new(DefaultFinder::new);

/// A validated observer position on Earth.
///
/// Latitude is degrees north of the equator in [-90, 90]; longitude is
/// degrees east of Greenwich in [-180, 180]. Construction is the validation
/// boundary: a `Location` that exists is a `Location` that is in range.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Location {
    latitude: f64,
    longitude: f64,
}

impl Location {
    /// Create a location, rejecting out-of-range coordinates.
    ///
    /// Coordinates are never silently clamped; callers get an error telling
    /// them which component was invalid.
    pub fn new(latitude: f64, longitude: f64) -> Result<Self> {
        if !(-90.0..=90.0).contains(&latitude) || !latitude.is_finite() {
            bail!("latitude {latitude} is outside the valid range -90 to 90");
        }
        if !(-180.0..=180.0).contains(&longitude) || !longitude.is_finite() {
            bail!("longitude {longitude} is outside the valid range -180 to 180");
        }
        Ok(Self {
            latitude,
            longitude,
        })
    }

    pub fn latitude(&self) -> f64 {
        self.latitude
    }

    pub fn longitude(&self) -> f64 {
        self.longitude
    }

    /// Resolve the IANA timezone for these coordinates.
    ///
    /// Ocean coordinates resolve to Etc/GMT offsets; anything tzf-rs cannot
    /// name falls back to UTC rather than failing the query.
    pub fn timezone(&self) -> Tz {
        let name = TZ_FINDER.get_tz_name(self.longitude, self.latitude);
        name.parse::<Tz>().unwrap_or(chrono_tz::UTC)
    }
}

impl std::fmt::Display for Location {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:.4}, {:.4}", self.latitude, self.longitude)
    }
}
