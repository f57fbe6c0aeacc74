//! Telemetry adapters backed by sysinfo.

mod cpu;
mod memory;

pub use cpu::SysinfoCpuSampler;
pub use memory::SysinfoMemorySource;
