//! Example: Scan and display all listening ports plus system load.

use portsniper_core::PortRegistry;

fn main() {
    println!("Scanning ports...\n");

    // Fall back to defaults when the saved config is missing or unreadable.
    let registry = match PortRegistry::from_saved_config().or_else(|_| PortRegistry::new()) {
        Ok(r) => r,
        Err(e) => {
            eprintln!("Error creating registry: {}", e);
            return;
        }
    };

    match registry.snapshot_ports() {
        Ok(entries) => {
            if entries.is_empty() {
                println!("No listening ports found.");
            } else {
                println!(
                    "{:<6} {:<5} {:<8} {:<24} {}",
                    "PORT", "PROTO", "PID", "PROCESS", "ADDRESS"
                );
                println!("{}", "-".repeat(60));

                for entry in &entries {
                    println!(
                        "{:<6} {:<5} {:<8} {:<24} {}",
                        entry.port,
                        entry.protocol,
                        entry.pid,
                        entry.process_name.chars().take(24).collect::<String>(),
                        entry.local_address.as_deref().unwrap_or("*")
                    );
                }

                println!("\nTotal: {} ports", entries.len());
            }
        }
        Err(e) => {
            eprintln!("Error scanning ports: {}", e);
        }
    }

    // The sampler needs a short window between readings.
    std::thread::sleep(std::time::Duration::from_millis(250));

    match registry.snapshot_telemetry() {
        Ok(t) => println!(
            "CPU: {:.1}%  Memory: {:.1}% of {} MiB",
            t.cpu_usage_clamped(),
            t.memory_used_percent(),
            t.memory_total_bytes / (1024 * 1024)
        ),
        Err(e) => eprintln!("Error reading telemetry: {}", e),
    }
}
