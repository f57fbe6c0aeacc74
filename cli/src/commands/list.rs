//! List command - show all listening ports.

use anyhow::Result;
use portsniper_core::{PlatformRegistryService, PortEntry};

use super::truncate;

pub async fn run(
    service: &PlatformRegistryService,
    port_filter: Option<u16>,
    name_filter: Option<String>,
    json: bool,
) -> Result<()> {
    let mut entries = service.snapshot_ports().await?;
    apply_filters(&mut entries, port_filter, name_filter.as_deref());

    if json {
        println!("{}", serde_json::to_string_pretty(&entries)?);
        return Ok(());
    }

    if entries.is_empty() {
        println!("No listening ports found.");
        return Ok(());
    }

    // Table header
    println!(
        "{:<6} {:<5} {:<8} {:<24} ADDRESS",
        "PORT", "PROTO", "PID", "PROCESS"
    );
    println!("{}", "-".repeat(64));

    for entry in &entries {
        let process_name = truncate(&entry.process_name, 24);
        let address = entry.local_address.as_deref().unwrap_or("*");

        println!(
            "{:<6} {:<5} {:<8} {:<24} {}",
            entry.port, entry.protocol, entry.pid, process_name, address
        );
    }

    println!("\nTotal: {} ports", entries.len());
    Ok(())
}

fn apply_filters(entries: &mut Vec<PortEntry>, port: Option<u16>, query: Option<&str>) {
    if let Some(p) = port {
        entries.retain(|e| e.port == p);
    }
    if let Some(q) = query {
        entries.retain(|e| e.matches_search(q));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use portsniper_core::Protocol;

    fn sample() -> Vec<PortEntry> {
        vec![
            PortEntry::new(53, Protocol::Udp, 1000, "dnsmasq", None),
            PortEntry::new(3000, Protocol::Tcp, 4242, "server.js", Some("::1".to_string())),
            PortEntry::new(8080, Protocol::Tcp, 1000, "dnsmasq", None),
        ]
    }

    #[test]
    fn test_port_filter() {
        let mut entries = sample();
        apply_filters(&mut entries, Some(3000), None);
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].pid, 4242);
    }

    #[test]
    fn test_name_filter_is_case_insensitive() {
        let mut entries = sample();
        apply_filters(&mut entries, None, Some("DNS"));
        assert_eq!(entries.len(), 2);
    }

    #[test]
    fn test_combined_filters() {
        let mut entries = sample();
        apply_filters(&mut entries, Some(8080), Some("dnsmasq"));
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].port, 8080);
    }
}
