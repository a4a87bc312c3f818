use clap::{Arg, ArgAction, CommandFactory, FromArgMatches, Parser, Subcommand};
use std::ffi::OsString;
use std::path::PathBuf;

use crate::dispatch::Target;
use crate::media::Action;

/// mediactl - control Windows media playback sessions 🎵
#[derive(Parser, Debug)]
#[command(
    name = "mediactl",
    version,
    about,
    arg_required_else_help = true,
    after_help = "Set MEDIACTL_DEBUG=1 (or DEBUG=mediactl) to enable verbose logging."
)]
pub struct Args {
    #[command(subcommand)]
    pub command: Option<Command>,

    /// Log every PowerShell call
    #[arg(long, global = true)]
    pub verbose: bool,

    /// Print results as JSON
    #[arg(long, global = true)]
    pub json: bool,

    /// Read settings from this file instead of the user config
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Print the default config.toml to stdout
    #[arg(long)]
    pub generate_config: bool,
}

#[derive(Subcommand, Debug, Clone, PartialEq)]
pub enum Command {
    /// Play media for the given apps
    Play(AppsArg),
    /// Pause media for the given apps
    Pause(AppsArg),
    /// Skip to the next track
    Next(AppsArg),
    /// Go back to the previous track
    Previous(AppsArg),
    /// Stop playback
    Stop(AppsArg),
    /// Toggle between play and pause
    Toggle(AppsArg),
    /// List active media sessions
    List,
}

#[derive(clap::Args, Debug, Clone, PartialEq, Default)]
pub struct AppsArg {
    /// App names or fragments ("spot" matches Spotify). Use `all` for every
    /// session; leave empty for the current session.
    pub apps: Vec<String>,
}

impl AppsArg {
    pub fn target(&self) -> Target {
        match self.apps.as_slice() {
            [] => Target::Current,
            [only] if only == "all" => Target::All,
            _ => Target::Apps(self.apps.clone()),
        }
    }
}

impl Command {
    /// The playback action and its targets, `None` for `list`.
    pub fn action(&self) -> Option<(Action, &AppsArg)> {
        match self {
            Command::Play(apps) => Some((Action::Play, apps)),
            Command::Pause(apps) => Some((Action::Pause, apps)),
            Command::Next(apps) => Some((Action::SkipNext, apps)),
            Command::Previous(apps) => Some((Action::SkipPrevious, apps)),
            Command::Stop(apps) => Some((Action::Stop, apps)),
            Command::Toggle(apps) => Some((Action::TogglePlayPause, apps)),
            Command::List => None,
        }
    }
}

/// The clap command, with `-v` as the version short flag.
pub fn command() -> clap::Command {
    Args::command().disable_version_flag(true).arg(
        Arg::new("version")
            .short('v')
            .long("version")
            .action(ArgAction::Version)
            .help("Print version"),
    )
}

pub fn try_parse_from<I, T>(args: I) -> Result<Args, clap::Error>
where
    I: IntoIterator<Item = T>,
    T: Into<OsString> + Clone,
{
    let args = normalize_subcommand(args.into_iter().map(Into::into).collect());
    let matches = command().try_get_matches_from(args)?;
    Args::from_arg_matches(&matches)
}

/// Subcommand names are matched case-insensitively, so `PAUSE` and
/// `Pause` mean `pause`. App names after it keep their case.
fn normalize_subcommand(mut args: Vec<OsString>) -> Vec<OsString> {
    let mut i = 1;
    while i < args.len() {
        let Some(arg) = args[i].to_str() else {
            break;
        };
        if arg == "--config" {
            i += 2;
            continue;
        }
        if arg.starts_with('-') {
            i += 1;
            continue;
        }
        let lower = arg.to_lowercase();
        if command().get_subcommands().any(|sub| sub.get_name() == lower) {
            args[i] = lower.into();
        }
        break;
    }
    args
}

pub fn try_parse() -> Result<Args, clap::Error> {
    try_parse_from(std::env::args_os())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::error::ErrorKind;

    #[test]
    fn test_command_is_well_formed() {
        command().debug_assert();
    }

    #[test]
    fn test_apps_become_targets() {
        let args = try_parse_from(["mediactl", "pause", "Spotify", "Firefox"]).unwrap();
        let (action, apps) = args.command.as_ref().unwrap().action().unwrap();
        assert_eq!(action, Action::Pause);
        assert_eq!(
            apps.target(),
            Target::Apps(vec!["Spotify".into(), "Firefox".into()])
        );
    }

    #[test]
    fn test_all_and_empty() {
        let args = try_parse_from(["mediactl", "play", "all"]).unwrap();
        assert_eq!(args.command.unwrap().action().unwrap().1.target(), Target::All);

        let args = try_parse_from(["mediactl", "next"]).unwrap();
        assert_eq!(args.command.unwrap().action().unwrap().1.target(), Target::Current);

        // "all" alongside other names is just another fragment
        let args = try_parse_from(["mediactl", "stop", "all", "vlc"]).unwrap();
        assert!(matches!(
            args.command.unwrap().action().unwrap().1.target(),
            Target::Apps(apps) if apps.len() == 2
        ));
    }

    #[test]
    fn test_flags() {
        let args = try_parse_from(["mediactl", "list", "--json", "--verbose"]).unwrap();
        assert_eq!(args.command, Some(Command::List));
        assert!(args.json && args.verbose);

        let err = try_parse_from(["mediactl", "-v"]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::DisplayVersion);

        let err = try_parse_from(["mediactl", "--help"]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::DisplayHelp);
    }

    #[test]
    fn test_subcommands_ignore_case() {
        let args = try_parse_from(["mediactl", "PAUSE", "Spotify"]).unwrap();
        let (action, apps) = args.command.as_ref().unwrap().action().unwrap();
        assert_eq!(action, Action::Pause);
        assert_eq!(apps.target(), Target::Apps(vec!["Spotify".into()]));

        let args = try_parse_from(["mediactl", "Play"]).unwrap();
        assert_eq!(args.command, Some(Command::Play(AppsArg::default())));

        let args = try_parse_from(["mediactl", "--json", "List"]).unwrap();
        assert_eq!(args.command, Some(Command::List));

        // A config path that looks like a subcommand stays untouched
        let args = try_parse_from(["mediactl", "--config", "Next", "Stop"]).unwrap();
        assert_eq!(args.config, Some(PathBuf::from("Next")));
        assert_eq!(args.command, Some(Command::Stop(AppsArg::default())));
    }

    #[test]
    fn test_unknown_subcommand_is_an_error() {
        let err = try_parse_from(["mediactl", "rewind"]).unwrap_err();
        assert!(matches!(
            err.kind(),
            ErrorKind::InvalidSubcommand | ErrorKind::UnknownArgument
        ));
    }
}
