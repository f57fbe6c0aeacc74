//! Process termination results.

use std::fmt;

use serde::{Deserialize, Serialize};

/// How a process should be asked to stop.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum TerminationMode {
    /// SIGTERM (or `taskkill` without `/F`) first, forced after a grace period.
    Graceful,
    /// A single forceful kill (SIGKILL / `taskkill /F`).
    #[default]
    Force,
}

/// What happened when termination was requested.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum TerminationOutcome {
    /// The process is gone.
    Terminated,
    /// No such process existed when the request was made.
    NotFound,
    /// The OS refused; retrying will not help.
    PermissionDenied,
    /// The signal failed or the process outlived the verification window.
    Failed,
}

impl TerminationOutcome {
    pub fn description(&self) -> &'static str {
        match self {
            TerminationOutcome::Terminated => "terminated",
            TerminationOutcome::NotFound => "not found",
            TerminationOutcome::PermissionDenied => "permission denied",
            TerminationOutcome::Failed => "failed",
        }
    }
}

/// Result of a termination request for one PID.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TerminationResult {
    pub pid: u32,
    pub outcome: TerminationOutcome,
}

impl TerminationResult {
    pub fn new(pid: u32, outcome: TerminationOutcome) -> Self {
        Self { pid, outcome }
    }

    pub fn is_terminated(&self) -> bool {
        self.outcome == TerminationOutcome::Terminated
    }
}

impl fmt::Display for TerminationResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "PID {}: {}", self.pid, self.outcome.description())
    }
}
