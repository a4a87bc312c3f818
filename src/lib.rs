pub mod cli;
pub mod config;
pub mod dispatch;
pub mod error;
pub mod logging;
pub mod media;
pub mod outcome;
pub mod output;

pub use config::Config;
pub use dispatch::{MediaControl, Target};
pub use error::ControlError;
pub use media::{Action, MediaController, MediaSession, PlaybackStatus};
pub use outcome::{ActionOutcome, Failure, FailureKind};
