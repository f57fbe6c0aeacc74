//! Memory counters.

use sysinfo::System;

use crate::domain::MemoryUsage;
use crate::error::{Error, Result};
use crate::ports::MemorySource;

/// Reads memory counters fresh on every call.
#[derive(Debug, Default)]
pub struct SysinfoMemorySource;

impl SysinfoMemorySource {
    pub fn new() -> Self {
        Self
    }
}

impl MemorySource for SysinfoMemorySource {
    fn read_memory(&self) -> Result<MemoryUsage> {
        let mut system = System::new();
        system.refresh_memory();

        let total_bytes = system.total_memory();
        if total_bytes == 0 {
            return Err(Error::Telemetry("OS reported zero total memory".to_string()));
        }

        Ok(MemoryUsage {
            total_bytes,
            used_bytes: system.used_memory(),
        })
    }
}
