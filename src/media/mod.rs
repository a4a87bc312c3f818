pub mod controller;
pub mod parse;
pub mod traits;

use crate::config::Config;

pub use controller::{PowerShellController, UnsupportedController};
pub use parse::parse_sessions;
pub use traits::{Action, MediaController, MediaSession, PlaybackStatus};

/// Factory to get the correct controller for the current OS
pub fn get_controller(config: &Config) -> Box<dyn MediaController> {
    #[cfg(target_os = "windows")]
    {
        Box::new(PowerShellController::new(config))
    }
    #[cfg(not(target_os = "windows"))]
    {
        let _ = config;
        Box::new(UnsupportedController)
    }
}
