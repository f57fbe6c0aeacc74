//! Windows process termination using taskkill.
//!
//! - `taskkill /PID xxx` requests graceful termination (sends WM_CLOSE)
//! - `taskkill /PID xxx /F` forces termination (TerminateProcess)

use tokio::process::Command;
use tracing::{debug, warn};

use crate::error::{Error, Result};
use crate::ports::ProcessKillerPort;

/// Windows process killer.
#[derive(Debug, Default)]
pub struct TaskkillKiller;

impl TaskkillKiller {
    pub fn new() -> Self {
        Self
    }
}

/// Classify taskkill's combined stdout/stderr on failure.
fn classify_failure(pid: u32, combined: &str) -> Error {
    let lower = combined.to_lowercase();

    if lower.contains("not found") || lower.contains("could not be found") {
        return Error::ProcessNotFound(pid);
    }

    if lower.contains("access is denied") || lower.contains("access denied") {
        return Error::PermissionDenied { pid };
    }

    Error::KillFailed {
        pid,
        reason: combined.trim().to_string(),
    }
}

impl ProcessKillerPort for TaskkillKiller {
    async fn kill(&self, pid: u32, force: bool) -> Result<()> {
        debug!(pid, force, "Executing taskkill");

        let mut cmd = Command::new("taskkill");
        cmd.arg("/PID").arg(pid.to_string());
        if force {
            cmd.arg("/F");
        }

        let output = cmd
            .output()
            .await
            .map_err(|e| Error::CommandFailed(format!("taskkill: {}", e)))?;

        if output.status.success() {
            return Ok(());
        }

        let stderr = String::from_utf8_lossy(&output.stderr);
        let stdout = String::from_utf8_lossy(&output.stdout);
        let combined = format!("{} {}", stdout, stderr);

        // "The process has already been terminated" is also a success
        if combined.contains("already been terminated") || combined.contains("has exited") {
            return Ok(());
        }

        let err = classify_failure(pid, &combined);
        if matches!(err, Error::PermissionDenied { .. }) {
            warn!(pid, "Access denied to kill process");
        }
        Err(err)
    }
}
