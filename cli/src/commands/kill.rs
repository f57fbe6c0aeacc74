//! Kill command - terminate a process by PID.

use std::io::{self, BufRead, Write};

use anyhow::Result;
use portsniper_core::{PlatformRegistryService, PortEntry, TerminationMode, TerminationOutcome};
use tracing::warn;

/// Returns whether the process was terminated.
pub async fn run(
    service: &PlatformRegistryService,
    pid: u32,
    graceful: bool,
    yes: bool,
) -> Result<bool> {
    if !yes {
        // The prompt still works without port details.
        let held = match service.find_by_pid(pid).await {
            Ok(held) => held,
            Err(e) => {
                warn!(pid, error = %e, "Could not look up ports for process");
                Vec::new()
            }
        };

        if !confirm(&format!("Kill {}?", describe_target(pid, &held)))? {
            println!("Aborted.");
            return Ok(false);
        }
    }

    let mode = if graceful {
        TerminationMode::Graceful
    } else {
        TerminationMode::Force
    };

    let result = service.terminate_with(pid, mode).await;

    match result.outcome {
        TerminationOutcome::Terminated => println!("✓ Killed process {}", pid),
        TerminationOutcome::NotFound => println!("No process with PID {}", pid),
        TerminationOutcome::PermissionDenied => {
            println!("✗ Permission denied for PID {} (try running with elevated privileges)", pid)
        }
        TerminationOutcome::Failed => println!("✗ Process {} did not exit", pid),
    }

    Ok(result.is_terminated())
}

/// Human description of the process about to be killed.
fn describe_target(pid: u32, held: &[PortEntry]) -> String {
    let Some(entry) = held.first() else {
        return format!("PID {}", pid);
    };

    let ports: Vec<String> = held
        .iter()
        .map(|e| format!("{}/{}", e.port, e.protocol))
        .collect();
    format!("{} (PID {}) on {}", entry.process_name, pid, ports.join(", "))
}

fn confirm(prompt: &str) -> Result<bool> {
    print!("{} [y/N] ", prompt);
    io::stdout().flush()?;

    let mut answer = String::new();
    io::stdin().lock().read_line(&mut answer)?;
    Ok(is_yes(&answer))
}

fn is_yes(answer: &str) -> bool {
    matches!(answer.trim().to_lowercase().as_str(), "y" | "yes")
}
