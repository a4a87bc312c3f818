use std::fmt;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::Result;

/// Playback state as reported by the OS media transport controls.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum PlaybackStatus {
    Closed,
    Opened,
    Changing,
    Stopped,
    Playing,
    Paused,
    Unknown(String),
}

impl From<String> for PlaybackStatus {
    fn from(raw: String) -> Self {
        match raw.as_str() {
            "Closed" => Self::Closed,
            "Opened" => Self::Opened,
            "Changing" => Self::Changing,
            "Stopped" => Self::Stopped,
            "Playing" => Self::Playing,
            "Paused" => Self::Paused,
            _ => Self::Unknown(raw),
        }
    }
}

impl From<PlaybackStatus> for String {
    fn from(status: PlaybackStatus) -> Self {
        status.to_string()
    }
}

impl fmt::Display for PlaybackStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Closed => "Closed",
            Self::Opened => "Opened",
            Self::Changing => "Changing",
            Self::Stopped => "Stopped",
            Self::Playing => "Playing",
            Self::Paused => "Paused",
            Self::Unknown(raw) => raw,
        };
        f.write_str(s)
    }
}

impl Default for PlaybackStatus {
    fn default() -> Self {
        Self::Unknown(String::new())
    }
}

/// Point-in-time snapshot of one application's media session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MediaSession {
    /// Friendly label: process description, package name or the raw id.
    pub app_name: String,
    /// `SourceAppUserModelId`, the key used to address the session.
    pub app_id: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub title: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub artist: String,
    #[serde(default)]
    pub playback_status: PlaybackStatus,
}

impl MediaSession {
    pub fn new(app_name: &str, app_id: &str, playback_status: PlaybackStatus) -> Self {
        Self {
            app_name: app_name.to_string(),
            app_id: app_id.to_string(),
            title: String::new(),
            artist: String::new(),
            playback_status,
        }
    }

    /// Case-insensitive substring match against both the label and the id.
    pub fn matches(&self, fragment: &str) -> bool {
        let needle = fragment.to_lowercase();
        self.app_name.to_lowercase().contains(&needle)
            || self.app_id.to_lowercase().contains(&needle)
    }
}

fn null_as_empty<'de, D>(deserializer: D) -> std::result::Result<String, D::Error>
where
    D: serde::Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

/// Virtual-key codes for the hardware media keys.
pub const VK_MEDIA_NEXT_TRACK: u8 = 0xB0;
pub const VK_MEDIA_PREV_TRACK: u8 = 0xB1;
pub const VK_MEDIA_STOP: u8 = 0xB2;
pub const VK_MEDIA_PLAY_PAUSE: u8 = 0xB3;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Action {
    Play,
    Pause,
    SkipNext,
    SkipPrevious,
    Stop,
    TogglePlayPause,
}

impl Action {
    /// Method stem on the session object: `Try{verb}Async`.
    pub fn verb(self) -> &'static str {
        match self {
            Action::Play => "Play",
            Action::Pause => "Pause",
            Action::SkipNext => "SkipNext",
            Action::SkipPrevious => "SkipPrevious",
            Action::Stop => "Stop",
            Action::TogglePlayPause => "TogglePlayPause",
        }
    }

    /// Global key injected when no session can be addressed.
    /// There is no dedicated play or pause key, both map to the toggle.
    pub fn media_key(self) -> u8 {
        match self {
            Action::Play | Action::Pause | Action::TogglePlayPause => VK_MEDIA_PLAY_PAUSE,
            Action::SkipNext => VK_MEDIA_NEXT_TRACK,
            Action::SkipPrevious => VK_MEDIA_PREV_TRACK,
            Action::Stop => VK_MEDIA_STOP,
        }
    }

    /// Label reported as the success entry of the media-key fallback.
    pub fn key_label(self) -> &'static str {
        match self {
            Action::Play => "Play",
            Action::Pause => "Pause",
            Action::SkipNext => "Next Track",
            Action::SkipPrevious => "Previous Track",
            Action::Stop => "Stop",
            Action::TogglePlayPause => "Play/Pause Toggle",
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.verb())
    }
}

/// The OS media capability. Every call is one round trip to the OS;
/// implementations keep no session state between calls.
#[async_trait]
pub trait MediaController: Send + Sync {
    async fn list_sessions(&self) -> Result<Vec<MediaSession>>;

    /// Apply `action` to the session whose id equals `app_id`.
    async fn invoke(&self, app_id: &str, action: Action) -> Result<()>;

    /// Apply `action` to whatever session the OS considers current.
    async fn invoke_current(&self, action: Action) -> Result<()>;

    /// Inject the global media key for `action`. The OS picks the receiver.
    async fn simulate_key(&self, action: Action) -> Result<()>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_match_is_case_insensitive_substring() {
        let session = MediaSession::new("Spotify", "Spotify.exe", PlaybackStatus::Playing);
        assert!(session.matches("spot"));
        assert!(session.matches("SPOTIFY"));
        assert!(session.matches(".EXE"));
        assert!(!session.matches("firefox"));
    }

    #[test]
    fn test_status_roundtrip_keeps_unknown_words() {
        assert_eq!(PlaybackStatus::from("Paused".to_string()), PlaybackStatus::Paused);
        let odd = PlaybackStatus::from("Buffering".to_string());
        assert_eq!(odd, PlaybackStatus::Unknown("Buffering".into()));
        assert_eq!(odd.to_string(), "Buffering");
    }

    #[test]
    fn test_media_keys() {
        assert_eq!(Action::Play.media_key(), 0xB3);
        assert_eq!(Action::SkipNext.media_key(), 0xB0);
        assert_eq!(Action::SkipPrevious.media_key(), 0xB1);
        assert_eq!(Action::Stop.media_key(), 0xB2);
        assert_eq!(Action::Play.key_label(), "Play");
        assert_eq!(Action::TogglePlayPause.key_label(), "Play/Pause Toggle");
    }
}
