use crossterm::style::Stylize;
use std::io::{self, Write};

use crate::dispatch::Target;
use crate::media::{Action, MediaSession, PlaybackStatus};
use crate::outcome::ActionOutcome;

/// Progress line printed before a control call, e.g. "Pausing media for: Spotify".
pub fn announce(action: Action, target: &Target) -> String {
    let verb = match action {
        Action::Play => "Playing",
        Action::Pause => "Pausing",
        Action::SkipNext => "Skipping to next track",
        Action::SkipPrevious => "Going back to previous track",
        Action::Stop => "Stopping",
        Action::TogglePlayPause => "Toggling play/pause",
    };
    match target {
        Target::Current => format!("{} {}", verb.cyan(), "(current session)"),
        Target::All => format!("{} {}", verb.cyan(), "for all media sessions..."),
        Target::Apps(apps) => format!("{} {}", format!("{verb} for:").cyan(), apps.join(", ")),
    }
}

pub fn write_outcome<W: Write>(out: &mut W, outcome: &ActionOutcome) -> io::Result<()> {
    if !outcome.success.is_empty() {
        writeln!(out, "{} Success: {}", "✓".green(), outcome.success.join(", "))?;
    }
    if !outcome.failed.is_empty() {
        writeln!(out, "{} Failed:", "⚠".yellow())?;
        for failure in &outcome.failed {
            writeln!(out, "  {} {}: {}", "✗".red(), failure.app, failure.reason)?;
        }
    }
    if outcome.is_empty() {
        writeln!(out, "{}", "Nothing to control".yellow())?;
    }
    Ok(())
}

pub fn write_sessions<W: Write>(out: &mut W, sessions: &[MediaSession]) -> io::Result<()> {
    if sessions.is_empty() {
        return writeln!(out, "{}", "No active media sessions found".yellow());
    }

    writeln!(out, "\n{}\n", "Active Media Sessions:".bold())?;
    for (index, session) in sessions.iter().enumerate() {
        writeln!(out, "{} {}", format!("{}.", index + 1).cyan(), session.app_name.as_str().bold())?;
        if !session.title.is_empty() {
            writeln!(out, "   Title:  {}", session.title)?;
        }
        if !session.artist.is_empty() {
            writeln!(out, "   Artist: {}", session.artist)?;
        }
        let status = session.playback_status.to_string();
        let status = if session.playback_status == PlaybackStatus::Playing {
            status.green()
        } else {
            status.dark_grey()
        };
        writeln!(out, "   Status: {status}")?;
        writeln!(out)?;
    }
    Ok(())
}
