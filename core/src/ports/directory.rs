//! Process directory port (interface).

use std::collections::HashMap;

/// Port for looking up processes by PID.
pub trait ProcessDirectory: Send + Sync {
    /// Display name of a live process, or `None` if the PID does not exist.
    fn resolve_name(&self, pid: u32) -> Option<String>;

    /// Whether the PID currently refers to a live (non-zombie) process.
    fn exists(&self, pid: u32) -> bool;

    /// Resolve many PIDs at once. PIDs that no longer exist are absent from
    /// the returned map.
    fn resolve_names(&self, pids: &[u32]) -> HashMap<u32, String> {
        pids.iter()
            .filter_map(|&pid| self.resolve_name(pid).map(|name| (pid, name)))
            .collect()
    }
}
