//! Process termination with verification.

use std::sync::Arc;
use std::time::Duration;

use tokio::time::sleep;
use tracing::{debug, warn};

use crate::config::TerminationConfig;
use crate::domain::{TerminationMode, TerminationOutcome, TerminationResult, UNKNOWN_PID};
use crate::error::Error;
use crate::ports::{ProcessDirectory, ProcessKillerPort};

/// Longest single pause while waiting out a graceful shutdown.
const MAX_GRACEFUL_POLL_STEP: Duration = Duration::from_millis(100);

/// Terminates processes and checks that they are actually gone.
///
/// Some platforms report a kill as successful before the process has
/// exited, so the outcome is decided by polling the process directory.
pub struct ProcessTerminator<K: ProcessKillerPort, D: ProcessDirectory> {
    killer: K,
    directory: Arc<D>,
    config: TerminationConfig,
    own_pid: u32,
}

impl<K: ProcessKillerPort, D: ProcessDirectory> ProcessTerminator<K, D> {
    pub fn new(killer: K, directory: Arc<D>, config: TerminationConfig) -> Self {
        Self {
            killer,
            directory,
            config,
            own_pid: std::process::id(),
        }
    }

    /// Forcefully terminate a process.
    pub async fn terminate(&self, pid: u32) -> TerminationResult {
        self.terminate_with(pid, TerminationMode::Force).await
    }

    /// Terminate a process using the given mode.
    ///
    /// Never fails; every failure mode is encoded in the outcome.
    pub async fn terminate_with(&self, pid: u32, mode: TerminationMode) -> TerminationResult {
        let outcome = self.run(pid, mode).await;
        debug!(pid, ?mode, outcome = outcome.description(), "Termination finished");
        TerminationResult::new(pid, outcome)
    }

    async fn run(&self, pid: u32, mode: TerminationMode) -> TerminationOutcome {
        if pid == UNKNOWN_PID {
            return TerminationOutcome::NotFound;
        }

        if pid == self.own_pid {
            warn!(pid, "Refusing to terminate own process");
            return TerminationOutcome::PermissionDenied;
        }

        if !self.directory.exists(pid) {
            return TerminationOutcome::NotFound;
        }

        if mode == TerminationMode::Graceful {
            match self.killer.kill(pid, false).await {
                Ok(()) => {
                    let timeout = self.config.graceful_timeout();
                    let exited = self
                        .wait_for_exit(
                            pid,
                            u32::MAX,
                            self.config.verify_initial_backoff(),
                            timeout,
                            MAX_GRACEFUL_POLL_STEP,
                        )
                        .await;
                    if exited {
                        return TerminationOutcome::Terminated;
                    }
                    debug!(pid, "Process still running after grace period, forcing");
                }
                Err(e) => {
                    if let Some(outcome) = Self::terminal_outcome(&e) {
                        return outcome;
                    }
                    // Graceful requests can fail where forced ones succeed
                    // (console apps on Windows), so escalate.
                    warn!(pid, error = %e, "Graceful termination failed, forcing");
                }
            }
        }

        match self.killer.kill(pid, true).await {
            Ok(()) => {}
            Err(e) => {
                if let Some(outcome) = Self::terminal_outcome(&e) {
                    return outcome;
                }
                warn!(pid, error = %e, "Kill request failed");
                return TerminationOutcome::Failed;
            }
        }

        let exited = self
            .wait_for_exit(
                pid,
                self.config.verify_attempts,
                self.config.verify_initial_backoff(),
                self.config.verify_max_wait(),
                self.config.verify_max_wait(),
            )
            .await;

        if exited {
            TerminationOutcome::Terminated
        } else {
            warn!(pid, "Process still alive after verification window");
            TerminationOutcome::Failed
        }
    }

    /// Kill errors that settle the outcome without escalation.
    fn terminal_outcome(error: &Error) -> Option<TerminationOutcome> {
        match error {
            Error::ProcessNotFound(_) => Some(TerminationOutcome::NotFound),
            Error::PermissionDenied { .. } => Some(TerminationOutcome::PermissionDenied),
            _ => None,
        }
    }

    /// Poll until the process is gone, with exponential backoff.
    ///
    /// Checks at most `attempts` times and sleeps at most `max_wait` in total.
    /// Returns whether the process exited.
    async fn wait_for_exit(
        &self,
        pid: u32,
        attempts: u32,
        initial_backoff: Duration,
        max_wait: Duration,
        max_step: Duration,
    ) -> bool {
        let mut waited = Duration::ZERO;
        let mut delay = initial_backoff.max(Duration::from_millis(1));

        for _ in 0..attempts {
            if !self.directory.exists(pid) {
                return true;
            }

            let remaining = max_wait.saturating_sub(waited);
            if remaining.is_zero() {
                return false;
            }

            let step = delay.min(remaining).min(max_step);
            sleep(step).await;
            waited += step;
            delay = delay.saturating_mul(2);
        }

        !self.directory.exists(pid)
    }
}
