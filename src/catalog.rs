//! Static event catalogs bundled with the binary.
//!
//! Meteor showers, comets, eclipses, and the high-precision regional
//! override table ship as JSON under `data/` and are parsed once on first
//! use. They are read-only inputs: the engine never mutates them, and
//! per-viewer results are always derived copies.

use std::collections::HashMap;

use chrono::{DateTime, NaiveDate, Utc};
use once_cell::sync::Lazy;
use serde::Deserialize;

/// A shower radiant on the celestial sphere, degrees.
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct Radiant {
    pub ra: f64,
    pub dec: f64,
}

/// A catalog meteor shower. Peak and activity window are stored as target
/// solar longitudes so the same entry serves every year.
#[derive(Debug, Clone, Deserialize)]
pub struct MeteorShower {
    pub id: String,
    pub name: String,
    pub peak_solar_longitude: f64,
    pub active_start_solar_longitude: f64,
    pub active_end_solar_longitude: f64,
    pub radiant: Radiant,
    /// Atmospheric entry velocity, km/s.
    pub velocity: f64,
    /// Zenithal hourly rate at peak under ideal conditions.
    pub zhr: u32,
    pub parent_body: String,
    pub description: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EclipseCategory {
    Solar,
    Lunar,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EclipseKind {
    Total,
    Partial,
    Annular,
    Penumbral,
}

impl EclipseKind {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Total => "Total",
            Self::Partial => "Partial",
            Self::Annular => "Annular",
            Self::Penumbral => "Penumbral",
        }
    }
}

/// A latitude/longitude rectangle. `lon_min > lon_max` means the box wraps
/// the antimeridian.
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct RegionBounds {
    pub lat_min: f64,
    pub lat_max: f64,
    pub lon_min: f64,
    pub lon_max: f64,
}

impl RegionBounds {
    pub fn contains(&self, latitude: f64, longitude: f64) -> bool {
        let within_lat = latitude >= self.lat_min && latitude <= self.lat_max;

        let within_lon = if self.lon_min <= self.lon_max {
            longitude >= self.lon_min && longitude <= self.lon_max
        } else {
            // Wraps the antimeridian
            longitude >= self.lon_min || longitude <= self.lon_max
        };

        within_lat && within_lon
    }
}

/// One visibility rectangle of an eclipse with its catalog percentage.
#[derive(Debug, Clone, Deserialize)]
pub struct EclipseRegion {
    pub region: String,
    pub bounds: RegionBounds,
    pub percentage: u8,
}

/// A catalog eclipse.
#[derive(Debug, Clone, Deserialize)]
pub struct EclipseEvent {
    /// Instant of greatest eclipse.
    pub date: DateTime<Utc>,
    pub category: EclipseCategory,
    pub kind: EclipseKind,
    /// Overall duration as "Xh Ym Zs"; parsed where needed.
    pub duration: String,
    pub magnitude: f64,
    pub description: String,
    pub visibility: Vec<EclipseRegion>,
}

#[derive(Debug, Clone, Deserialize)]
struct EclipseCatalog {
    lunar: Vec<EclipseEvent>,
    solar: Vec<EclipseEvent>,
}

/// Visibility constraints a comet carries in the catalog.
#[derive(Debug, Clone, Deserialize)]
pub struct CometVisibility {
    #[serde(default)]
    pub hemisphere: Option<String>,
    #[serde(default)]
    pub min_latitude: Option<f64>,
    #[serde(default)]
    pub declination_range: Option<DeclinationRange>,
}

#[derive(Debug, Clone, Copy, Deserialize)]
pub struct DeclinationRange {
    pub min: f64,
    pub max: f64,
}

/// A catalog comet apparition.
#[derive(Debug, Clone, Deserialize)]
pub struct Comet {
    pub id: String,
    pub name: String,
    pub peak_start: NaiveDate,
    pub peak_end: NaiveDate,
    pub peak: NaiveDate,
    /// Expected peak apparent magnitude (lower is brighter).
    pub magnitude: f64,
    pub visibility: CometVisibility,
    pub best_viewing_time: String,
    pub direction: String,
    pub description: String,
}

/// The named high-precision override table: locally surveyed visibility
/// percentages, keyed by the exact catalog timestamp, valid only inside the
/// table's own bounding box.
#[derive(Debug, Clone, Deserialize)]
pub struct PrecisionOverrides {
    pub location: OverrideLocation,
    pub solar: HashMap<String, u8>,
    pub lunar: HashMap<String, u8>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct OverrideLocation {
    pub name: String,
    pub bounds: RegionBounds,
}

pub static METEOR_SHOWERS: Lazy<Vec<MeteorShower>> = Lazy::new(|| {
    serde_json::from_str(include_str!("../data/meteor_showers.json"))
        .expect("bundled meteor shower catalog is valid JSON")
});

static ECLIPSES: Lazy<EclipseCatalog> = Lazy::new(|| {
    serde_json::from_str(include_str!("../data/eclipses.json"))
        .expect("bundled eclipse catalog is valid JSON")
});

pub static COMETS: Lazy<Vec<Comet>> = Lazy::new(|| {
    serde_json::from_str(include_str!("../data/comets.json"))
        .expect("bundled comet catalog is valid JSON")
});

pub static SAO_MIGUEL_OVERRIDES: Lazy<PrecisionOverrides> = Lazy::new(|| {
    serde_json::from_str(include_str!("../data/sao_miguel_overrides.json"))
        .expect("bundled override table is valid JSON")
});

pub fn lunar_eclipses() -> &'static [EclipseEvent] {
    &ECLIPSES.lunar
}

pub fn solar_eclipses() -> &'static [EclipseEvent] {
    &ECLIPSES.solar
}
