use serde::{Deserialize, Serialize};

use crate::error::ControlError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FailureKind {
    NoActiveSessions,
    SessionNotFound,
    InvocationFailed,
    UnsupportedAction,
}

/// One target that could not be controlled.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Failure {
    /// The target as the caller wrote it
    pub app: String,
    pub kind: FailureKind,
    pub reason: String,
}

impl Failure {
    pub fn new(app: impl Into<String>, error: &ControlError) -> Self {
        Self {
            app: app.into(),
            kind: error.failure_kind(),
            reason: error.to_string(),
        }
    }
}

/// Result of a control call, in processing order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ActionOutcome {
    pub success: Vec<String>,
    pub failed: Vec<Failure>,
}

impl ActionOutcome {
    pub fn succeeded(label: impl Into<String>) -> Self {
        Self {
            success: vec![label.into()],
            failed: Vec::new(),
        }
    }

    pub fn failed(app: impl Into<String>, error: &ControlError) -> Self {
        Self {
            success: Vec::new(),
            failed: vec![Failure::new(app, error)],
        }
    }

    pub fn record_success(&mut self, label: impl Into<String>) {
        self.success.push(label.into());
    }

    pub fn record_failure(&mut self, app: impl Into<String>, error: &ControlError) {
        self.failed.push(Failure::new(app, error));
    }

    pub fn is_empty(&self) -> bool {
        self.success.is_empty() && self.failed.is_empty()
    }

    /// Something was attempted and nothing worked.
    pub fn is_total_failure(&self) -> bool {
        self.success.is_empty() && !self.failed.is_empty()
    }
}
