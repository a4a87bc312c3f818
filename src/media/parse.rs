use serde::Deserialize;

use super::traits::MediaSession;
use crate::error::ControlError;

/// `ConvertTo-Json` emits a bare object when the pipeline holds a single item.
#[derive(Deserialize)]
#[serde(untagged)]
enum RawSessions {
    Many(Vec<MediaSession>),
    One(Box<MediaSession>),
}

/// Normalize the bridge output into a list, whatever shape it came in.
pub fn parse_sessions(output: &str) -> Result<Vec<MediaSession>, ControlError> {
    let output = output.trim();
    if output.is_empty() || output == "null" {
        return Ok(Vec::new());
    }

    let sessions = match serde_json::from_str::<RawSessions>(output) {
        Ok(RawSessions::Many(list)) => list,
        Ok(RawSessions::One(session)) => vec![*session],
        // Untagged errors say nothing useful, retry strictly for a real message
        Err(_) => serde_json::from_str::<Vec<MediaSession>>(output)?,
    };
    Ok(sessions)
}
