//! Target resolution and fan-out.
//!
//! A control call names its targets as app-name fragments. Each fragment is
//! matched against one fresh session listing and the action is sent to the
//! matched session's id. With no target the OS picks the session, and when
//! it cannot, the global media key is pressed instead.

use fuzzy_matcher::{skim::SkimMatcherV2, FuzzyMatcher};
use tracing::{debug, warn};

use crate::config::Config;
use crate::error::ControlError;
use crate::media::{get_controller, Action, MediaController, MediaSession};
use crate::outcome::ActionOutcome;

/// Success label when the OS-designated session handled the action.
pub const CURRENT_SESSION_LABEL: &str = "Current Session";
/// Failure label when even the media key could not be injected.
pub const MEDIA_KEY_LABEL: &str = "MediaKey";

/// Which sessions a control call is aimed at.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Target {
    /// Whatever the OS considers the current session
    Current,
    /// Every session active when the call starts
    All,
    /// Sessions matched by app-name fragments, in this order
    Apps(Vec<String>),
}

impl From<&str> for Target {
    fn from(name: &str) -> Self {
        if name == "all" {
            Target::All
        } else {
            Target::Apps(vec![name.to_string()])
        }
    }
}

impl From<String> for Target {
    fn from(name: String) -> Self {
        Target::from(name.as_str())
    }
}

impl From<Vec<String>> for Target {
    fn from(names: Vec<String>) -> Self {
        Target::Apps(names)
    }
}

impl From<Vec<&str>> for Target {
    fn from(names: Vec<&str>) -> Self {
        Target::from(names.as_slice())
    }
}

impl From<&[&str]> for Target {
    fn from(names: &[&str]) -> Self {
        Target::Apps(names.iter().map(|n| n.to_string()).collect())
    }
}

impl<const N: usize> From<[&str; N]> for Target {
    fn from(names: [&str; N]) -> Self {
        Target::from(names.as_slice())
    }
}

impl<T: Into<Target>> From<Option<T>> for Target {
    fn from(target: Option<T>) -> Self {
        target.map(Into::into).unwrap_or(Target::Current)
    }
}

/// First session, in listing order, whose name or id contains `fragment`.
pub fn find_session<'a>(sessions: &'a [MediaSession], fragment: &str) -> Option<&'a MediaSession> {
    sessions.iter().find(|session| session.matches(fragment))
}

/// Closest app name by fuzzy score, for "did you mean" hints.
pub fn suggest<'a>(sessions: &'a [MediaSession], fragment: &str) -> Option<&'a str> {
    let matcher = SkimMatcherV2::default().ignore_case();
    sessions
        .iter()
        .filter_map(|s| {
            matcher
                .fuzzy_match(&s.app_name, fragment)
                .map(|score| (score, s.app_name.as_str()))
        })
        .max_by_key(|(score, _)| *score)
        .map(|(_, name)| name)
}

/// Library entry point: lists sessions and applies playback actions.
pub struct MediaControl {
    controller: Box<dyn MediaController>,
}

impl MediaControl {
    pub fn new(controller: Box<dyn MediaController>) -> Self {
        Self { controller }
    }

    /// Use the platform's own controller, built from `config`.
    pub fn from_config(config: &Config) -> Self {
        Self::new(get_controller(config))
    }

    /// Active sessions right now. Errors count as "no sessions".
    pub async fn list_sessions(&self) -> Vec<MediaSession> {
        match self.controller.list_sessions().await {
            Ok(sessions) => {
                if sessions.is_empty() {
                    debug!("No active media sessions found");
                } else {
                    debug!(count = sessions.len(), ?sessions, "Found sessions");
                }
                sessions
            }
            Err(e) => {
                debug!(error = %e, "Error listing sessions");
                Vec::new()
            }
        }
    }

    pub async fn control(&self, target: impl Into<Target>, action: Action) -> ActionOutcome {
        match target.into() {
            Target::Current => self.control_current(action).await,
            Target::All => {
                let sessions = self.list_sessions().await;
                if sessions.is_empty() {
                    warn!("No active media sessions found");
                    return ActionOutcome::default();
                }
                let names: Vec<String> = sessions.into_iter().map(|s| s.app_name).collect();
                debug!(%action, apps = ?names, "Controlling all sessions");
                self.control_apps(&names, action).await
            }
            Target::Apps(apps) => self.control_apps(&apps, action).await,
        }
    }

    async fn control_apps(&self, apps: &[String], action: Action) -> ActionOutcome {
        let mut outcome = ActionOutcome::default();
        if apps.is_empty() {
            return outcome;
        }
        debug!(%action, ?apps, "Attempting to control");

        // One listing shared by every fragment of this call
        let sessions = self.list_sessions().await;
        if sessions.is_empty() {
            for app in apps {
                warn!("No active media sessions found for \"{app}\"");
                outcome.record_failure(app.as_str(), &ControlError::NoActiveSessions);
            }
            return outcome;
        }

        for app in apps {
            let Some(session) = find_session(&sessions, app) else {
                self.warn_not_found(&sessions, app);
                outcome.record_failure(app.as_str(), &ControlError::SessionNotFound);
                continue;
            };

            // Address the session by id so the bridge never re-matches the fragment
            match self.controller.invoke(&session.app_id, action).await {
                Ok(()) => {
                    debug!(%action, app = %session.app_name, "Controlled session");
                    outcome.record_success(session.app_name.as_str());
                }
                Err(e) => {
                    warn!("Failed to {action} \"{app}\": {e}");
                    outcome.record_failure(app.as_str(), &e);
                }
            }
        }

        outcome
    }

    async fn control_current(&self, action: Action) -> ActionOutcome {
        let err = match self.controller.invoke_current(action).await {
            Ok(()) => return ActionOutcome::succeeded(CURRENT_SESSION_LABEL),
            Err(e) => e,
        };
        debug!(error = %err, %action, "Current session unavailable, pressing media key");

        match self.controller.simulate_key(action).await {
            Ok(()) => ActionOutcome::succeeded(action.key_label()),
            Err(e) => {
                debug!(error = %e, key = action.key_label(), "Failed to simulate media key");
                ActionOutcome::failed(MEDIA_KEY_LABEL, &e)
            }
        }
    }

    fn warn_not_found(&self, sessions: &[MediaSession], app: &str) {
        let available = sessions
            .iter()
            .map(|s| s.app_name.as_str())
            .collect::<Vec<_>>()
            .join(", ");
        match suggest(sessions, app) {
            Some(hint) => warn!(
                "No media session found for \"{app}\" (did you mean \"{hint}\"?). Available apps: {available}"
            ),
            None => warn!("No media session found for \"{app}\". Available apps: {available}"),
        }
    }

    pub async fn play(&self, target: impl Into<Target>) -> ActionOutcome {
        self.control(target, Action::Play).await
    }

    pub async fn pause(&self, target: impl Into<Target>) -> ActionOutcome {
        self.control(target, Action::Pause).await
    }

    pub async fn next(&self, target: impl Into<Target>) -> ActionOutcome {
        self.control(target, Action::SkipNext).await
    }

    pub async fn previous(&self, target: impl Into<Target>) -> ActionOutcome {
        self.control(target, Action::SkipPrevious).await
    }

    pub async fn stop(&self, target: impl Into<Target>) -> ActionOutcome {
        self.control(target, Action::Stop).await
    }

    pub async fn toggle_play_pause(&self, target: impl Into<Target>) -> ActionOutcome {
        self.control(target, Action::TogglePlayPause).await
    }
}
