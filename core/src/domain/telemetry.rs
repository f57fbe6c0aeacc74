//! System telemetry models.

use serde::{Deserialize, Serialize};

/// Instantaneous memory counters, in bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct MemoryUsage {
    pub total_bytes: u64,
    pub used_bytes: u64,
}

/// Aggregate CPU and memory usage at one point in time.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TelemetrySnapshot {
    /// Aggregate CPU usage across all cores. Never negative; sampling jitter
    /// can push it slightly above 100.
    pub cpu_usage_percent: f64,

    pub memory_total_bytes: u64,

    /// Always `<= memory_total_bytes`.
    pub memory_used_bytes: u64,
}

impl TelemetrySnapshot {
    /// Build a snapshot, clamping readings the OS reported with transient skew.
    pub fn new(cpu_usage_percent: f64, memory: MemoryUsage) -> Self {
        let cpu_usage_percent = if cpu_usage_percent.is_nan() {
            0.0
        } else {
            cpu_usage_percent.max(0.0)
        };

        Self {
            cpu_usage_percent,
            memory_total_bytes: memory.total_bytes,
            memory_used_bytes: memory.used_bytes.min(memory.total_bytes),
        }
    }

    /// CPU usage clamped to `[0, 100]`.
    pub fn cpu_usage_clamped(&self) -> f64 {
        self.cpu_usage_percent.clamp(0.0, 100.0)
    }

    /// Used memory as a percentage of total memory.
    pub fn memory_used_percent(&self) -> f64 {
        if self.memory_total_bytes == 0 {
            0.0
        } else {
            self.memory_used_bytes as f64 / self.memory_total_bytes as f64 * 100.0
        }
    }
}
