use std::process::ExitStatus;
use std::time::Duration;

use thiserror::Error;

use crate::media::Action;
use crate::outcome::FailureKind;

pub type Result<T> = std::result::Result<T, ControlError>;

/// Everything that can go wrong between a target fragment and the OS media API.
#[derive(Debug, Error)]
pub enum ControlError {
    #[error("No active media sessions")]
    NoActiveSessions,

    #[error("Session not found")]
    SessionNotFound,

    #[error("No current media session")]
    NoCurrentSession,

    #[error("{action} is not supported by the current session")]
    UnsupportedAction { action: Action },

    #[error("{action} was rejected by the session")]
    Rejected { action: Action },

    #[error("Session {0} closed before the action ran")]
    SessionClosed(String),

    #[error("PowerShell execution failed: {0}")]
    Spawn(#[source] std::io::Error),

    #[error("PowerShell timed out after {}s", .0.as_secs())]
    Timeout(Duration),

    #[error("PowerShell exited with {status}: {stderr}")]
    ScriptFailed { status: ExitStatus, stderr: String },

    #[error("Malformed session list: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Media control is not supported on this platform")]
    UnsupportedPlatform,
}

impl ControlError {
    /// Short classification recorded next to the message in an outcome.
    pub fn failure_kind(&self) -> FailureKind {
        match self {
            ControlError::NoActiveSessions => FailureKind::NoActiveSessions,
            ControlError::SessionNotFound => FailureKind::SessionNotFound,
            ControlError::NoCurrentSession | ControlError::UnsupportedAction { .. } => {
                FailureKind::UnsupportedAction
            }
            _ => FailureKind::InvocationFailed,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reason_strings() {
        assert_eq!(
            ControlError::NoActiveSessions.to_string(),
            "No active media sessions"
        );
        assert_eq!(ControlError::SessionNotFound.to_string(), "Session not found");
        assert_eq!(
            ControlError::Timeout(Duration::from_secs(10)).to_string(),
            "PowerShell timed out after 10s"
        );
    }

    #[test]
    fn test_failure_kind() {
        assert_eq!(
            ControlError::UnsupportedAction { action: Action::Stop }.failure_kind(),
            FailureKind::UnsupportedAction
        );
        assert_eq!(
            ControlError::SessionClosed("Spotify.exe".into()).failure_kind(),
            FailureKind::InvocationFailed
        );
        assert_eq!(
            ControlError::UnsupportedPlatform.failure_kind(),
            FailureKind::InvocationFailed
        );
    }
}
