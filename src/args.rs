//! Command-line argument parsing and processing.
//!
//! This module handles parsing of command-line arguments and provides a
//! clean interface for the main dispatcher. Subcommands pick what to plan
//! (moons, proximity windows, showers, eclipses, weather); shared flags
//! override the configured location and windows.

/// Options shared by every planning subcommand.
#[derive(Debug, Default, PartialEq)]
pub struct CommonArgs {
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    /// Name of a saved location from the config file.
    pub place: Option<String>,
    pub config_dir: Option<String>,
}

/// Represents the parsed command-line arguments and their intended actions.
#[derive(Debug, PartialEq)]
pub enum CliAction {
    /// Today's sky report with the next-event countdown (the default).
    Report { common: CommonArgs },
    /// Full moons (and supermoon flags) over the lookahead window.
    Moons { common: CommonArgs, months: Option<u32> },
    /// Sun/moon proximity photo opportunities.
    Proximity { common: CommonArgs, days: Option<u32> },
    /// Upcoming meteor showers rated for the viewer.
    Meteors { common: CommonArgs, months: Option<u32> },
    /// Upcoming eclipses with local visibility.
    Eclipses { common: CommonArgs, years: Option<u32> },
    /// Supermoons, blue moons, and black moons.
    Special { common: CommonArgs, months: Option<u32> },
    /// Active and upcoming comets.
    Comets { common: CommonArgs },
    /// Daily photo-weather scores from the forecast.
    Weather { common: CommonArgs, days: Option<u32> },
    /// Proximity events ranked by combined astronomy + weather score.
    Score { common: CommonArgs, days: Option<u32> },

    /// Display help information and exit.
    ShowHelp,
    /// Display version information and exit.
    ShowVersion,
    /// Show help due to unknown arguments and exit.
    ShowHelpDueToError,
}

/// Result of parsing command-line arguments.
pub struct ParsedArgs {
    pub action: CliAction,
}

impl ParsedArgs {
    /// Parse the process arguments.
    pub fn from_env() -> Self {
        Self::parse(std::env::args().skip(1))
    }

    /// Parse command-line arguments into a structured result.
    ///
    /// The first non-flag argument selects the subcommand; everything else
    /// is flags. Unknown flags or subcommands fall through to help with an
    /// error, never to a guessed command.
    pub fn parse<I, S>(args: I) -> ParsedArgs
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut common = CommonArgs::default();
        let mut subcommand: Option<String> = None;
        let mut months: Option<u32> = None;
        let mut days: Option<u32> = None;
        let mut years: Option<u32> = None;
        let mut errored = false;

        let mut iter = args.into_iter();
        while let Some(arg) = iter.next() {
            let arg = arg.as_ref();
            match arg {
                "--help" | "-h" => return ParsedArgs { action: CliAction::ShowHelp },
                "--version" | "-V" => return ParsedArgs { action: CliAction::ShowVersion },
                "--lat" => match iter.next().and_then(|v| v.as_ref().parse::<f64>().ok()) {
                    Some(value) => common.latitude = Some(value),
                    None => errored = true,
                },
                "--lon" => match iter.next().and_then(|v| v.as_ref().parse::<f64>().ok()) {
                    Some(value) => common.longitude = Some(value),
                    None => errored = true,
                },
                "--place" => match iter.next() {
                    Some(value) => common.place = Some(value.as_ref().to_string()),
                    None => errored = true,
                },
                "--config-dir" => match iter.next() {
                    Some(value) => common.config_dir = Some(value.as_ref().to_string()),
                    None => errored = true,
                },
                "--months" => match iter.next().and_then(|v| v.as_ref().parse::<u32>().ok()) {
                    Some(value) => months = Some(value),
                    None => errored = true,
                },
                "--days" => match iter.next().and_then(|v| v.as_ref().parse::<u32>().ok()) {
                    Some(value) => days = Some(value),
                    None => errored = true,
                },
                "--years" => match iter.next().and_then(|v| v.as_ref().parse::<u32>().ok()) {
                    Some(value) => years = Some(value),
                    None => errored = true,
                },
                _ if arg.starts_with('-') => errored = true,
                _ if subcommand.is_none() => subcommand = Some(arg.to_string()),
                _ => errored = true,
            }
        }

        if errored {
            return ParsedArgs { action: CliAction::ShowHelpDueToError };
        }

        let action = match subcommand.as_deref() {
            None | Some("report") => CliAction::Report { common },
            Some("moons") => CliAction::Moons { common, months },
            Some("proximity") => CliAction::Proximity { common, days },
            Some("meteors") => CliAction::Meteors { common, months },
            Some("eclipses") => CliAction::Eclipses { common, years },
            Some("special") => CliAction::Special { common, months },
            Some("comets") => CliAction::Comets { common },
            Some("weather") => CliAction::Weather { common, days },
            Some("score") => CliAction::Score { common, days },
            Some(_) => CliAction::ShowHelpDueToError,
        };

        ParsedArgs { action }
    }
}

/// Display help information.
pub fn display_help() {
    log_version!();
    log_block_start!("Usage: skyplan [COMMAND] [OPTIONS]");
    log_pipe!();
    log_decorated!("Commands:");
    log_indented!("report      Today's sky report and next-event countdown (default)");
    log_indented!("moons       Upcoming full moons with folk names and supermoon flags");
    log_indented!("proximity   Days the moon rises or sets beside the sun");
    log_indented!("meteors     Upcoming meteor showers rated for your latitude");
    log_indented!("eclipses    Upcoming eclipses with local visibility");
    log_indented!("special     Supermoons, blue moons, and black moons");
    log_indented!("comets      Active and upcoming comets");
    log_indented!("weather     Daily photo-weather scores from the forecast");
    log_indented!("score       Photo opportunities ranked with the weather");
    log_pipe!();
    log_decorated!("Options:");
    log_indented!("--lat <deg>         Latitude override (-90 to 90)");
    log_indented!("--lon <deg>         Longitude override (-180 to 180)");
    log_indented!("--place <name>      Use a saved location from config.toml");
    log_indented!("--months <n>        Lookahead months for event scans");
    log_indented!("--days <n>          Lookahead days (proximity, weather, score)");
    log_indented!("--years <n>         Lookahead years (eclipses)");
    log_indented!("--config-dir <dir>  Read configuration from this directory");
    log_indented!("-h, --help          Show this help");
    log_indented!("-V, --version       Show version information");
    log_end!();
}

/// Display version information.
pub fn display_version_info() {
    log_version!();
    log_block_start!("Plan photo shoots around sun, moon, and night-sky events");
    log_decorated!("https://github.com/psi4j/skyplan");
    log_end!();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_arguments_means_report() {
        let parsed = ParsedArgs::parse(Vec::<String>::new());
        assert_eq!(
            parsed.action,
            CliAction::Report { common: CommonArgs::default() }
        );
    }

    #[test]
    fn subcommands_parse_with_their_windows() {
        let parsed = ParsedArgs::parse(["moons", "--months", "3"]);
        match parsed.action {
            CliAction::Moons { months, .. } => assert_eq!(months, Some(3)),
            action => panic!("unexpected action {action:?}"),
        }

        let parsed = ParsedArgs::parse(["eclipses", "--years", "5"]);
        match parsed.action {
            CliAction::Eclipses { years, .. } => assert_eq!(years, Some(5)),
            action => panic!("unexpected action {action:?}"),
        }
    }

    #[test]
    fn coordinates_parse_anywhere_in_the_line() {
        let parsed = ParsedArgs::parse(["--lat", "40.7", "proximity", "--lon", "-74.0"]);
        match parsed.action {
            CliAction::Proximity { common, .. } => {
                assert_eq!(common.latitude, Some(40.7));
                assert_eq!(common.longitude, Some(-74.0));
            }
            action => panic!("unexpected action {action:?}"),
        }
    }

    #[test]
    fn unknown_input_falls_through_to_help() {
        assert_eq!(
            ParsedArgs::parse(["frobnicate"]).action,
            CliAction::ShowHelpDueToError
        );
        assert_eq!(
            ParsedArgs::parse(["--what"]).action,
            CliAction::ShowHelpDueToError
        );
        assert_eq!(
            ParsedArgs::parse(["--lat", "north"]).action,
            CliAction::ShowHelpDueToError
        );
    }

    #[test]
    fn help_and_version_short_circuit() {
        assert_eq!(ParsedArgs::parse(["--help"]).action, CliAction::ShowHelp);
        assert_eq!(ParsedArgs::parse(["-V"]).action, CliAction::ShowVersion);
        assert_eq!(
            ParsedArgs::parse(["moons", "--help"]).action,
            CliAction::ShowHelp
        );
    }
}
