//! Process adapters: PID lookup and the platform kill primitive.

mod directory;

#[cfg(unix)]
mod unix;

#[cfg(any(windows, test))]
mod windows;

pub use directory::SysinfoDirectory;

#[cfg(unix)]
pub use unix::SignalKiller as PlatformKiller;

#[cfg(windows)]
pub use windows::TaskkillKiller as PlatformKiller;
