//! Process killer port (interface).

use crate::error::Result;

/// Port for the platform's process-termination primitive.
///
/// Implementations only deliver the request; verifying that the process is
/// actually gone is up to the caller.
pub trait ProcessKillerPort: Send + Sync {
    /// Ask the OS to end a process.
    ///
    /// If `force` is true, sends SIGKILL (`taskkill /F` on Windows).
    /// Otherwise sends SIGTERM (plain `taskkill`).
    ///
    /// Errors:
    /// - [`crate::Error::ProcessNotFound`] if no such process exists
    /// - [`crate::Error::PermissionDenied`] if the OS refuses
    /// - [`crate::Error::CommandFailed`] if a helper command could not run
    /// - [`crate::Error::KillFailed`] for anything else
    fn kill(&self, pid: u32, force: bool) -> impl std::future::Future<Output = Result<()>> + Send;
}
