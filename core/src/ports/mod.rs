//! Ports layer - Trait definitions (interfaces).
//!
//! This module defines the interfaces that the application layer uses
//! to interact with the operating system. Implementations live in `adapters`.

mod directory;
mod killer;
mod scanner;
mod telemetry;

pub use directory::ProcessDirectory;
pub use killer::ProcessKillerPort;
pub use scanner::SocketTableReader;
pub use telemetry::{CpuSampler, MemorySource};
