//! Application layer - Use case services.
//!
//! Services orchestrate domain logic through the ports (traits), so every
//! OS-facing dependency can be replaced by a mock in tests.

mod registry_service;
mod telemetry;
mod terminator;

pub use registry_service::{PlatformRegistryService, PortRegistryService};
pub use telemetry::TelemetryReader;
pub use terminator::ProcessTerminator;
