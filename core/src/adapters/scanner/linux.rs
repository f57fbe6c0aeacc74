//! Linux socket table reader using procfs.
//!
//! Reads `/proc/net/{tcp,tcp6,udp,udp6}` and attributes each socket inode to
//! the processes holding it by walking `/proc/<pid>/fd`. Without root, fds
//! of other users' processes are unreadable; their sockets come back with an
//! unknown owner instead of being dropped.

use std::collections::HashMap;
use std::fmt;
use std::net::SocketAddr;

use procfs::net::{TcpNetEntry, TcpState, UdpNetEntry};
use procfs::process::FDTarget;
use tracing::debug;

use crate::domain::{Protocol, RawSocket};
use crate::error::{Error, Result};

use super::utils::Utils;
use super::SocketScanner;

/// Linux-specific socket table reader.
pub struct ProcNetReader;

/// A listening socket row from one of the `/proc/net` tables.
#[derive(Debug, Clone)]
struct SocketRow {
    protocol: Protocol,
    local_address: SocketAddr,
    inode: u64,
}

impl ProcNetReader {
    pub fn new() -> Self {
        Self
    }

    /// Read all four tables, keeping listening TCP sockets and unconnected
    /// UDP sockets.
    fn read_tables(&self) -> Result<Vec<SocketRow>> {
        collect_tables([
            ("tcp", procfs::net::tcp().map(tcp_rows)),
            ("tcp6", procfs::net::tcp6().map(tcp_rows)),
            ("udp", procfs::net::udp().map(udp_rows)),
            ("udp6", procfs::net::udp6().map(udp_rows)),
        ])
    }

    /// Map socket inodes to the PIDs holding them.
    ///
    /// Processes that vanish mid-walk or whose fd directory is unreadable
    /// are skipped.
    fn socket_owners(&self) -> HashMap<u64, Vec<u32>> {
        let mut owners: HashMap<u64, Vec<u32>> = HashMap::new();

        let processes = match procfs::process::all_processes() {
            Ok(processes) => processes,
            Err(e) => {
                debug!(error = %e, "Cannot list processes, all socket owners unknown");
                return owners;
            }
        };

        for process in processes.flatten() {
            let Ok(pid) = u32::try_from(process.pid()) else {
                continue;
            };
            let Ok(fds) = process.fd() else {
                continue;
            };

            for fd in fds.flatten() {
                if let FDTarget::Socket(inode) = fd.target {
                    owners.entry(inode).or_default().push(pid);
                }
            }
        }

        for pids in owners.values_mut() {
            pids.sort_unstable();
            pids.dedup();
        }

        owners
    }
}

fn tcp_rows(entries: Vec<TcpNetEntry>) -> Vec<SocketRow> {
    entries
        .into_iter()
        .filter(|e| e.state == TcpState::Listen)
        .map(|e| SocketRow {
            protocol: Protocol::Tcp,
            local_address: e.local_address,
            inode: e.inode,
        })
        .collect()
}

fn udp_rows(entries: Vec<UdpNetEntry>) -> Vec<SocketRow> {
    entries
        .into_iter()
        .filter(|e| e.remote_address.port() == 0)
        .map(|e| SocketRow {
            protocol: Protocol::Udp,
            local_address: e.local_address,
            inode: e.inode,
        })
        .collect()
}

/// Merge the rows of every readable table.
///
/// An unreadable table only shrinks the result; the scan fails when no
/// table could be read at all.
fn collect_tables<E: fmt::Display, const N: usize>(
    tables: [(&str, std::result::Result<Vec<SocketRow>, E>); N],
) -> Result<Vec<SocketRow>> {
    let mut rows = Vec::new();
    let mut tables_read = 0;

    for (name, result) in tables {
        match result {
            Ok(table) => {
                tables_read += 1;
                rows.extend(table);
            }
            Err(e) => debug!(table = name, error = %e, "Socket table unreadable"),
        }
    }

    if tables_read == 0 {
        return Err(Error::Enumeration(
            "none of /proc/net/{tcp,tcp6,udp,udp6} could be read".to_string(),
        ));
    }

    debug!(rows = rows.len(), tables_read, "Read socket tables");
    Ok(rows)
}

impl Default for ProcNetReader {
    fn default() -> Self {
        Self::new()
    }
}

/// Attribute rows to owners, one raw socket per owning PID.
///
/// Inode 0 never identifies a real owner (the kernel reports it for sockets
/// in teardown), so those rows and rows with no known owner get `pid: None`.
fn attribute(rows: Vec<SocketRow>, owners: &HashMap<u64, Vec<u32>>) -> Vec<RawSocket> {
    let mut sockets = Vec::with_capacity(rows.len());

    for row in rows {
        let port = row.local_address.port();
        if port == 0 {
            continue;
        }
        let address = Utils::display_ip(&row.local_address.ip());

        match owners.get(&row.inode).filter(|_| row.inode != 0) {
            Some(pids) if !pids.is_empty() => {
                for &pid in pids {
                    let socket = RawSocket::new(row.protocol, port, Some(pid));
                    sockets.push(socket.with_address(&address));
                }
            }
            _ => sockets.push(RawSocket::new(row.protocol, port, None).with_address(address)),
        }
    }

    sockets
}

impl SocketScanner for ProcNetReader {
    async fn scan(&self) -> Result<Vec<RawSocket>> {
        let rows = self.read_tables()?;
        let owners = self.socket_owners();
        let sockets = attribute(rows, &owners);
        debug!(count = sockets.len(), "Read socket table");
        Ok(sockets)
    }
}
