//! Socket table reader port (interface).

use crate::domain::RawSocket;
use crate::error::Result;

/// Port for reading the OS socket table.
///
/// Implementations handle platform-specific details (procfs, lsof, netstat).
pub trait SocketTableReader: Send + Sync {
    /// Read every listening TCP socket and bound UDP socket, IPv4 and IPv6.
    ///
    /// Sockets whose owner cannot be determined are returned with `pid: None`.
    /// Fails with [`crate::Error::Enumeration`] only when the table cannot be
    /// read at all.
    fn read_sockets(&self) -> impl std::future::Future<Output = Result<Vec<RawSocket>>> + Send;
}
