//! Port and socket domain models.

use std::fmt;

use serde::{Deserialize, Serialize};

/// PID reported for sockets whose owning process could not be determined.
pub const UNKNOWN_PID: u32 = 0;

/// Default display name for sockets with an undetermined owner.
pub const UNKNOWN_PROCESS: &str = "unknown";

// ============================================================================
// Protocol
// ============================================================================

/// Transport protocol of a socket.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Protocol {
    Tcp,
    Udp,
}

impl Protocol {
    pub fn as_str(&self) -> &'static str {
        match self {
            Protocol::Tcp => "TCP",
            Protocol::Udp => "UDP",
        }
    }
}

impl fmt::Display for Protocol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// RawSocket
// ============================================================================

/// One row of the OS socket table, before process resolution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawSocket {
    pub protocol: Protocol,
    pub port: u16,
    /// `None` when the OS would not tell us who owns the socket.
    pub pid: Option<u32>,
    pub local_address: Option<String>,
    /// Command name printed by the socket table tool, if it prints one.
    /// Used when the process directory cannot name a live process.
    pub command: Option<String>,
}

impl RawSocket {
    pub fn new(protocol: Protocol, port: u16, pid: Option<u32>) -> Self {
        Self {
            protocol,
            port,
            pid,
            local_address: None,
            command: None,
        }
    }

    pub fn with_address(mut self, address: impl Into<String>) -> Self {
        self.local_address = Some(address.into());
        self
    }

    pub fn with_command(mut self, command: impl Into<String>) -> Self {
        self.command = Some(command.into());
        self
    }
}

// ============================================================================
// PortEntry
// ============================================================================

/// A listening port together with the process that owns it.
///
/// Built fresh on every snapshot and never mutated afterwards. `pid` is
/// [`UNKNOWN_PID`] when the socket table could not attribute the socket.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PortEntry {
    /// The port number (e.g., 3000, 8080).
    pub port: u16,

    /// Transport protocol.
    pub protocol: Protocol,

    /// Process ID of the owning process.
    pub pid: u32,

    /// Display name of the owning process.
    pub process_name: String,

    /// Address the socket is bound to (e.g., "*", "127.0.0.1", "::1").
    pub local_address: Option<String>,
}

impl PortEntry {
    pub fn new(
        port: u16,
        protocol: Protocol,
        pid: u32,
        process_name: impl Into<String>,
        local_address: Option<String>,
    ) -> Self {
        Self {
            port,
            protocol,
            pid,
            process_name: process_name.into(),
            local_address,
        }
    }

    /// Whether the owning process could not be determined.
    pub fn is_unknown_owner(&self) -> bool {
        self.pid == UNKNOWN_PID
    }

    /// Key used for deduplication and ordering.
    pub fn sort_key(&self) -> (u16, Protocol, u32) {
        (self.port, self.protocol, self.pid)
    }

    /// Check if this entry matches a search query.
    ///
    /// Searches across port number, PID, process name and address.
    pub fn matches_search(&self, query: &str) -> bool {
        if query.is_empty() {
            return true;
        }

        let query_lower = query.to_lowercase();
        self.process_name.to_lowercase().contains(&query_lower)
            || self.port.to_string().contains(&query_lower)
            || self.pid.to_string().contains(&query_lower)
            || self
                .local_address
                .as_deref()
                .is_some_and(|a| a.to_lowercase().contains(&query_lower))
    }
}

impl fmt::Display for PortEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}/{}:{} (PID: {}, Process: {})",
            self.protocol,
            self.local_address.as_deref().unwrap_or("*"),
            self.port,
            self.pid,
            self.process_name
        )
    }
}

/// Order entries by `(port, protocol, pid)` and drop duplicate triples,
/// keeping the first occurrence.
pub fn sort_and_dedup(entries: &mut Vec<PortEntry>) {
    // Stable sort keeps the reader's order between equal keys, so the first
    // address reported for a triple survives.
    entries.sort_by_key(PortEntry::sort_key);
    entries.dedup_by_key(|e| e.sort_key());
}
