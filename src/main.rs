use anyhow::Result;
use clap::error::ErrorKind;
use crossterm::style::Stylize;
use std::io::{self, Write};
use std::process::ExitCode;

use mediactl::cli::{self, Args, Command};
use mediactl::{logging, output, Config, MediaControl};

#[tokio::main]
async fn main() -> ExitCode {
    human_panic::setup_panic!();

    let args = match cli::try_parse() {
        Ok(args) => args,
        Err(e) => {
            let _ = e.print();
            // Help and version are informational, anything else is a usage error
            return match e.kind() {
                ErrorKind::DisplayHelp
                | ErrorKind::DisplayVersion
                | ErrorKind::DisplayHelpOnMissingArgumentOrSubcommand => ExitCode::SUCCESS,
                _ => ExitCode::FAILURE,
            };
        }
    };

    match run(args).await {
        Ok(code) => code,
        Err(e) => {
            eprintln!("{} {e:#}", "Error:".red());
            ExitCode::FAILURE
        }
    }
}

async fn run(args: Args) -> Result<ExitCode> {
    if args.generate_config {
        print!("{}", Config::default_toml()?);
        return Ok(ExitCode::SUCCESS);
    }

    let mut config = match &args.config {
        Some(path) => Config::load_from(path)?,
        None => Config::load()?,
    };
    config.apply_env();
    config.verbose |= args.verbose;
    let _log_guard = logging::init(&config)?;

    let Some(command) = args.command else {
        cli::command().print_help()?;
        return Ok(ExitCode::SUCCESS);
    };

    let control = MediaControl::from_config(&config);
    let mut stdout = io::stdout().lock();

    let Some((action, apps)) = command.action() else {
        // Only `list` has no action
        debug_assert_eq!(command, Command::List);
        let sessions = control.list_sessions().await;
        if args.json {
            writeln!(stdout, "{}", serde_json::to_string_pretty(&sessions)?)?;
        } else {
            output::write_sessions(&mut stdout, &sessions)?;
        }
        return Ok(ExitCode::SUCCESS);
    };

    let target = apps.target();
    if !args.json {
        writeln!(stdout, "{}", output::announce(action, &target))?;
        stdout.flush()?;
    }

    let outcome = control.control(target, action).await;
    if args.json {
        writeln!(stdout, "{}", serde_json::to_string_pretty(&outcome)?)?;
    } else {
        output::write_outcome(&mut stdout, &outcome)?;
    }

    if outcome.is_total_failure() {
        Ok(ExitCode::FAILURE)
    } else {
        Ok(ExitCode::SUCCESS)
    }
}
