//! Error types for the portsniper-core library.

use thiserror::Error;

/// Result type alias for portsniper operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while reading the socket table, sampling telemetry
/// or talking to the process table.
#[derive(Error, Debug)]
pub enum Error {
    /// The OS socket table could not be read at all.
    #[error("Socket table enumeration failed: {0}")]
    Enumeration(String),

    /// The OS exposes no usable CPU or memory counters.
    #[error("Telemetry unavailable: {0}")]
    Telemetry(String),

    /// Failed to execute a system command.
    #[error("Command execution failed: {0}")]
    CommandFailed(String),

    /// The process does not exist (or exited before it could be signalled).
    #[error("Process {0} not found")]
    ProcessNotFound(u32),

    /// The OS refused to signal the process.
    #[error("Permission denied to kill process {pid}")]
    PermissionDenied { pid: u32 },

    /// Failed to kill a process.
    #[error("Failed to kill process {pid}: {reason}")]
    KillFailed { pid: u32, reason: String },

    /// Configuration error.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Platform not supported.
    #[error("Platform not supported: {0}")]
    UnsupportedPlatform(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = Error::ProcessNotFound(1234);
        assert!(err.to_string().contains("1234"));

        let err = Error::PermissionDenied { pid: 5678 };
        assert!(err.to_string().contains("5678"));

        let err = Error::Enumeration("no tables".to_string());
        assert!(err.to_string().contains("no tables"));
    }
}
