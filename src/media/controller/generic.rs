use async_trait::async_trait;

use crate::error::{ControlError, Result};
use crate::media::{Action, MediaController, MediaSession};

/// Stand-in for platforms without system media transport controls.
pub struct UnsupportedController;

#[async_trait]
impl MediaController for UnsupportedController {
    async fn list_sessions(&self) -> Result<Vec<MediaSession>> {
        Err(ControlError::UnsupportedPlatform)
    }

    async fn invoke(&self, _app_id: &str, _action: Action) -> Result<()> {
        Err(ControlError::UnsupportedPlatform)
    }

    async fn invoke_current(&self, _action: Action) -> Result<()> {
        Err(ControlError::UnsupportedPlatform)
    }

    async fn simulate_key(&self, _action: Action) -> Result<()> {
        Err(ControlError::UnsupportedPlatform)
    }
}
