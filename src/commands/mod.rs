//! CLI subcommand handlers.
//!
//! Each handler resolves the configuration and location once, runs the
//! relevant engine queries, and renders the results through the logger's
//! block structure. All astronomy output shows local times in the
//! coordinate's timezone.

pub mod events;
pub mod report;
pub mod weather;

use anyhow::Result;

use crate::args::CommonArgs;
use crate::config::Config;
use crate::location::Location;

/// Load configuration and resolve the command's location.
pub(crate) fn load_context(common: &CommonArgs) -> Result<(Config, Location)> {
    let config = Config::load(common.config_dir.as_deref())?;
    let location = config.resolve_location(
        common.latitude,
        common.longitude,
        common.place.as_deref(),
    )?;
    Ok((config, location))
}
