//! Socket table adapters.
//!
//! Platform-specific implementations of socket table reading. The lsof and
//! netstat parsers are also compiled into test builds on every platform so
//! their parsing stays covered.

#[cfg(any(target_os = "macos", test))]
mod darwin;

#[cfg(target_os = "linux")]
mod linux;

#[cfg(any(target_os = "windows", test))]
mod windows;

mod utils;

use crate::domain::RawSocket;
use crate::error::Result;
use crate::ports::SocketTableReader;

/// The socket table reader for the current platform.
pub struct PlatformSocketTable {
    #[cfg(target_os = "macos")]
    inner: darwin::LsofReader,

    #[cfg(target_os = "linux")]
    inner: linux::ProcNetReader,

    #[cfg(target_os = "windows")]
    inner: windows::NetstatReader,
}

impl PlatformSocketTable {
    /// Create a new socket table reader for the current platform.
    pub fn new() -> Self {
        Self {
            #[cfg(target_os = "macos")]
            inner: darwin::LsofReader::new(),

            #[cfg(target_os = "linux")]
            inner: linux::ProcNetReader::new(),

            #[cfg(target_os = "windows")]
            inner: windows::NetstatReader::new(),
        }
    }
}

impl Default for PlatformSocketTable {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(any(target_os = "macos", target_os = "linux", target_os = "windows"))]
impl SocketTableReader for PlatformSocketTable {
    async fn read_sockets(&self) -> Result<Vec<RawSocket>> {
        self.inner.scan().await
    }
}

#[cfg(not(any(target_os = "macos", target_os = "linux", target_os = "windows")))]
impl SocketTableReader for PlatformSocketTable {
    async fn read_sockets(&self) -> Result<Vec<RawSocket>> {
        Err(crate::error::Error::UnsupportedPlatform(
            std::env::consts::OS.to_string(),
        ))
    }
}

/// Internal trait for platform-specific implementations.
#[allow(dead_code)]
trait SocketScanner: Send + Sync {
    fn scan(&self) -> impl std::future::Future<Output = Result<Vec<RawSocket>>> + Send;
}
