//! System telemetry reader.

use crate::domain::TelemetrySnapshot;
use crate::error::Result;
use crate::ports::{CpuSampler, MemorySource};

/// Combines a persistent CPU sampler with a fresh memory reading.
pub struct TelemetryReader<C: CpuSampler, M: MemorySource> {
    cpu: C,
    memory: M,
}

impl<C: CpuSampler, M: MemorySource> TelemetryReader<C, M> {
    pub fn new(cpu: C, memory: M) -> Self {
        Self { cpu, memory }
    }

    /// Take the CPU baseline so the first snapshot already covers a window.
    pub fn init(&self) -> Result<()> {
        self.cpu.init()
    }

    /// Read CPU usage since the previous call plus current memory counters.
    pub fn read_telemetry(&self) -> Result<TelemetrySnapshot> {
        let cpu = self.cpu.sample()?;
        let memory = self.memory.read_memory()?;
        Ok(TelemetrySnapshot::new(cpu, memory))
    }
}
