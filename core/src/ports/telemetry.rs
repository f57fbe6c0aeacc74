//! Telemetry ports (interfaces).

use crate::domain::MemoryUsage;
use crate::error::Result;

/// A persistent CPU usage sampler.
///
/// CPU usage is a delta between two readings, so the sampler keeps the
/// previous reading and reports usage since then. Implementations guard
/// their state with an internal lock.
pub trait CpuSampler: Send + Sync {
    /// Take the baseline reading. Calling it again is harmless.
    fn init(&self) -> Result<()>;

    /// Aggregate CPU usage in percent since the previous sample.
    /// Initializes the sampler first if `init` was never called.
    fn sample(&self) -> Result<f64>;
}

/// Reads instantaneous memory counters.
pub trait MemorySource: Send + Sync {
    fn read_memory(&self) -> Result<MemoryUsage>;
}
