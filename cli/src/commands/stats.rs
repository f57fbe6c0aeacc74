//! Stats command - show system load.

use std::time::Duration;

use anyhow::Result;
use portsniper_core::{PlatformRegistryService, TelemetrySnapshot};

/// Window between the baseline and the reported CPU sample.
const SAMPLE_WINDOW: Duration = Duration::from_millis(250);

pub async fn run(service: &PlatformRegistryService, json: bool) -> Result<()> {
    service.init_telemetry()?;
    tokio::time::sleep(SAMPLE_WINDOW).await;
    let snapshot = service.snapshot_telemetry()?;

    if json {
        println!("{}", serde_json::to_string_pretty(&snapshot)?);
    } else {
        println!("{}", summary(&snapshot));
    }
    Ok(())
}

pub fn summary(snapshot: &TelemetrySnapshot) -> String {
    format!(
        "CPU {:>5.1}%  Memory {:>5.1}% ({} / {})",
        snapshot.cpu_usage_clamped(),
        snapshot.memory_used_percent(),
        format_bytes(snapshot.memory_used_bytes),
        format_bytes(snapshot.memory_total_bytes)
    )
}

fn format_bytes(bytes: u64) -> String {
    const UNITS: [&str; 4] = ["B", "KiB", "MiB", "GiB"];

    let mut value = bytes as f64;
    let mut unit = 0;
    while value >= 1024.0 && unit < UNITS.len() - 1 {
        value /= 1024.0;
        unit += 1;
    }

    if unit == 0 {
        format!("{} {}", bytes, UNITS[0])
    } else {
        format!("{:.1} {}", value, UNITS[unit])
    }
}
