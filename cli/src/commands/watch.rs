//! Watch command - periodic port and load summaries.

use std::time::Duration;

use anyhow::Result;
use chrono::Local;
use portsniper_core::PlatformRegistryService;
use tracing::warn;

use super::stats::summary;

pub async fn run(
    service: &PlatformRegistryService,
    interval_secs: u64,
    count: Option<u64>,
) -> Result<()> {
    service.init_telemetry()?;

    let mut ticker = tokio::time::interval(Duration::from_secs(interval_secs.max(1)));
    let mut ticks = 0u64;

    loop {
        ticker.tick().await;
        let now = Local::now().format("%H:%M:%S");

        // Snapshot errors are transient; report and try again next tick.
        match service.snapshot_ports().await {
            Ok(entries) => {
                let unknown = entries.iter().filter(|e| e.is_unknown_owner()).count();
                println!("[{}] {} ports ({} unattributed)", now, entries.len(), unknown);
            }
            Err(e) => warn!(error = %e, "Port snapshot failed"),
        }

        match service.snapshot_telemetry() {
            Ok(snapshot) => println!("[{}] {}", now, summary(&snapshot)),
            Err(e) => warn!(error = %e, "Telemetry snapshot failed"),
        }

        ticks += 1;
        if count.is_some_and(|c| ticks >= c) {
            return Ok(());
        }
    }
}
