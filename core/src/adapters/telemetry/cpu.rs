//! Persistent CPU usage sampler.

use std::time::Instant;

use parking_lot::Mutex;
use sysinfo::{System, MINIMUM_CPU_UPDATE_INTERVAL};
use tracing::debug;

use crate::error::{Error, Result};
use crate::ports::CpuSampler;

struct SamplerState {
    system: System,
    last_refresh: Instant,
    last_usage: f64,
}

/// CPU sampler keeping one `sysinfo::System` alive across calls.
///
/// Each sample reports usage since the previous refresh. Samples requested
/// faster than sysinfo's minimum update interval return the last value.
pub struct SysinfoCpuSampler {
    state: Mutex<Option<SamplerState>>,
}

impl SysinfoCpuSampler {
    pub fn new() -> Self {
        Self {
            state: Mutex::new(None),
        }
    }

    fn baseline() -> Result<SamplerState> {
        let mut system = System::new();
        system.refresh_cpu_usage();
        if system.cpus().is_empty() {
            return Err(Error::Telemetry("no CPUs reported by the OS".to_string()));
        }
        debug!(cpus = system.cpus().len(), "CPU sampler initialized");

        Ok(SamplerState {
            system,
            last_refresh: Instant::now(),
            last_usage: 0.0,
        })
    }
}

impl Default for SysinfoCpuSampler {
    fn default() -> Self {
        Self::new()
    }
}

impl CpuSampler for SysinfoCpuSampler {
    fn init(&self) -> Result<()> {
        let mut state = self.state.lock();
        if state.is_none() {
            *state = Some(Self::baseline()?);
        }
        Ok(())
    }

    fn sample(&self) -> Result<f64> {
        let mut guard = self.state.lock();
        if guard.is_none() {
            *guard = Some(Self::baseline()?);
        }
        let Some(state) = guard.as_mut() else {
            return Err(Error::Telemetry("CPU sampler not initialized".to_string()));
        };

        if state.last_refresh.elapsed() >= MINIMUM_CPU_UPDATE_INTERVAL {
            state.system.refresh_cpu_usage();
            state.last_refresh = Instant::now();
            state.last_usage = f64::from(state.system.global_cpu_usage());
        }

        Ok(state.last_usage)
    }
}
