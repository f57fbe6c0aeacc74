//! Config command - show the effective configuration.

use anyhow::Result;
use portsniper_core::{ConfigStore, RegistryConfig};

pub fn show(config: &RegistryConfig, json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(config)?);
        return Ok(());
    }

    if let Ok(store) = ConfigStore::new() {
        println!("Config file: {}", store.path().display());
    }
    println!("Port refresh interval:      {}s", config.port_refresh_interval_secs);
    println!("Telemetry refresh interval: {}s", config.telemetry_refresh_interval_secs);
    println!("Unknown process label:      {}", config.unknown_process_label);

    let t = &config.termination;
    println!(
        "Kill verification:          {} checks, {}ms initial backoff, {}ms max",
        t.verify_attempts, t.verify_initial_backoff_ms, t.verify_max_wait_ms
    );
    println!("Graceful timeout:           {}ms", t.graceful_timeout_ms);
    Ok(())
}
