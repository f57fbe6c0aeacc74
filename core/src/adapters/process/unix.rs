//! Unix process termination using signals.
//!
//! - SIGTERM (15): graceful termination request
//! - SIGKILL (9): immediate forced termination

use nix::errno::Errno;
use nix::sys::signal::{kill, Signal};
use nix::unistd::Pid;
use tracing::{debug, warn};

use crate::error::{Error, Result};
use crate::ports::ProcessKillerPort;

/// Unix process killer.
#[derive(Debug, Default)]
pub struct SignalKiller;

impl SignalKiller {
    pub fn new() -> Self {
        Self
    }
}

impl ProcessKillerPort for SignalKiller {
    async fn kill(&self, pid: u32, force: bool) -> Result<()> {
        // PID 0 and negative PIDs address process groups, never a single process.
        let raw = match i32::try_from(pid) {
            Ok(raw) if raw > 0 => raw,
            _ => return Err(Error::ProcessNotFound(pid)),
        };

        let signal = if force { Signal::SIGKILL } else { Signal::SIGTERM };
        debug!(pid, signal = signal.as_str(), "Sending signal to process");

        match kill(Pid::from_raw(raw), signal) {
            Ok(()) => Ok(()),
            Err(Errno::ESRCH) => {
                debug!(pid, "Process not found");
                Err(Error::ProcessNotFound(pid))
            }
            Err(Errno::EPERM) => {
                warn!(pid, "Permission denied to kill process");
                Err(Error::PermissionDenied { pid })
            }
            Err(e) => Err(Error::KillFailed {
                pid,
                reason: e.desc().to_string(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_kill_nonexistent_process() {
        let killer = SignalKiller::new();
        let result = killer.kill(999_999_999, true).await;
        assert!(matches!(result, Err(Error::ProcessNotFound(_))));
    }

    #[tokio::test]
    async fn test_kill_refuses_process_groups() {
        let killer = SignalKiller::new();
        assert!(matches!(killer.kill(0, true).await, Err(Error::ProcessNotFound(0))));
        assert!(matches!(
            killer.kill(u32::MAX, true).await,
            Err(Error::ProcessNotFound(_))
        ));
    }
}
