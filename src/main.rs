//! Main application entry point and CLI dispatch.
//!
//! This module stays thin: parse the command line, hand the action to the
//! matching command handler, and render failures through the logger before
//! exiting nonzero. All planning logic lives in the library.

use anyhow::Result;

// Import macros from logger module for use in all submodules
#[macro_use]
mod logger;

mod args;
mod catalog;
mod commands;
mod config;
mod constants;
mod ephemeris;
mod events;
mod location;
mod position;
mod solver;
mod weather;

use args::{CliAction, ParsedArgs};
use constants::EXIT_FAILURE;

fn main() {
    let parsed_args = ParsedArgs::from_env();

    let result = run(parsed_args.action);
    if let Err(error) = result {
        log_error_exit!("{error:#}");
        std::process::exit(EXIT_FAILURE);
    }
}

fn run(action: CliAction) -> Result<()> {
    match action {
        CliAction::ShowVersion => {
            args::display_version_info();
            Ok(())
        }
        CliAction::ShowHelp => {
            args::display_help();
            Ok(())
        }
        CliAction::ShowHelpDueToError => {
            args::display_help();
            std::process::exit(EXIT_FAILURE);
        }
        CliAction::Report { common } => commands::report::handle_report_command(&common),
        CliAction::Moons { common, months } => {
            commands::events::handle_moons_command(&common, months)
        }
        CliAction::Proximity { common, days } => {
            commands::events::handle_proximity_command(&common, days)
        }
        CliAction::Meteors { common, months } => {
            commands::events::handle_meteors_command(&common, months)
        }
        CliAction::Eclipses { common, years } => {
            commands::events::handle_eclipses_command(&common, years)
        }
        CliAction::Special { common, months } => {
            commands::events::handle_special_command(&common, months)
        }
        CliAction::Comets { common } => commands::events::handle_comets_command(&common),
        CliAction::Weather { common, days } => {
            commands::weather::handle_weather_command(&common, days)
        }
        CliAction::Score { common, days } => {
            commands::weather::handle_score_command(&common, days)
        }
    }
}
