//! Adapters layer - Operating system implementations.
//!
//! This module contains implementations of the port traits defined in `ports`.
//! Each adapter handles communication with one OS facility.

pub mod process;
pub mod scanner;
pub mod telemetry;

// Re-export main types for convenience
pub use process::{PlatformKiller, SysinfoDirectory};
pub use scanner::PlatformSocketTable;
pub use telemetry::{SysinfoCpuSampler, SysinfoMemorySource};
