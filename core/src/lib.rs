//! PortSniper Core Library
//!
//! Cross-platform backend for inspecting listening ports and controlling
//! the processes behind them. Provides functionality to:
//! - Snapshot listening TCP and bound UDP sockets with their owning processes
//! - Terminate a process by PID and verify that it exited
//! - Sample aggregate CPU and memory usage
//!
//! # Architecture
//! This library follows hexagonal architecture (ports & adapters):
//! - `domain`: Pure data models and rules
//! - `ports`: Trait definitions (interfaces)
//! - `adapters`: OS-facing implementations
//! - `application`: Use case services
//!
//! # Platform Support
//! - Linux: reads `/proc/net/{tcp,tcp6,udp,udp6}` and maps socket inodes to PIDs
//! - macOS: uses `lsof`
//! - Windows: uses `netstat -ano` and `taskkill`
//!
//! # Example
//! ```no_run
//! use portsniper_core::PortRegistry;
//!
//! let registry = PortRegistry::new()?;
//! for entry in registry.snapshot_ports()? {
//!     println!("{}", entry);
//! }
//! # Ok::<(), portsniper_core::Error>(())
//! ```

// Hexagonal architecture layers
pub mod adapters;
pub mod application;
pub mod domain;
pub mod ports;

pub mod config;
pub mod error;
pub mod registry;

// Re-export domain types (primary API)
pub use domain::{
    PortEntry, Protocol, TelemetrySnapshot, TerminationMode, TerminationOutcome,
    TerminationResult, UNKNOWN_PID, UNKNOWN_PROCESS,
};

// Re-export other commonly used types
pub use application::{PlatformRegistryService, PortRegistryService};
pub use config::{ConfigStore, RegistryConfig, TerminationConfig};
pub use error::{Error, Result};
pub use registry::PortRegistry;
