//! Domain layer - Pure data models and rules.
//!
//! This module contains domain entities that represent core business concepts.
//! These types have no I/O dependencies and can be tested in isolation.

mod port;
mod process;
mod telemetry;
mod termination;

// Re-export all domain types
pub use port::{sort_and_dedup, PortEntry, Protocol, RawSocket, UNKNOWN_PID, UNKNOWN_PROCESS};
pub use process::{clean_process_name, display_name};
pub use telemetry::{MemoryUsage, TelemetrySnapshot};
pub use termination::{TerminationMode, TerminationOutcome, TerminationResult};
