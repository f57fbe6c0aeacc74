//! macOS socket table reader using lsof, topped up from netstat.

use std::collections::HashSet;
use std::process::Stdio;
use std::sync::OnceLock;

use regex::Regex;
use tokio::process::Command;
use tracing::debug;

use crate::domain::{Protocol, RawSocket};
use crate::error::{Error, Result};

use super::utils::Utils;
use super::SocketScanner;

/// macOS-specific socket table reader using lsof.
pub struct LsofReader;

fn hex_escape() -> &'static Regex {
    static HEX_ESCAPE: OnceLock<Regex> = OnceLock::new();
    // Constant pattern, cannot fail to compile.
    HEX_ESCAPE.get_or_init(|| Regex::new(r"\\x([0-9a-fA-F]{2})").expect("valid regex"))
}

/// Decode lsof's `\xNN` escapes in the COMMAND column.
fn decode_lsof_escapes(name: &str) -> String {
    hex_escape()
        .replace_all(name, |caps: &regex::Captures| {
            u8::from_str_radix(&caps[1], 16)
                .map(|b| char::from(b).to_string())
                .unwrap_or_else(|_| caps[0].to_string())
        })
        .into_owned()
}

impl LsofReader {
    /// Create a new macOS reader.
    pub fn new() -> Self {
        Self
    }

    /// Parse lsof output into raw sockets.
    ///
    /// Expected lsof output format:
    /// ```text
    /// COMMAND    PID  USER   FD   TYPE             DEVICE SIZE/OFF NODE NAME
    /// node     34805  code   19u  IPv6 0x3d8015e195af1f3f      0t0  TCP [::1]:3000 (LISTEN)
    /// mDNSResp   412  root    8u  IPv4 0x1234567890abcdef      0t0  UDP *:5353
    /// ```
    ///
    /// lsof always reports the owning PID, so every row is attributed.
    fn parse_lsof_output(&self, output: &str) -> Vec<RawSocket> {
        let mut sockets = Vec::new();

        for line in output.lines().skip(1) {
            if line.is_empty() {
                continue;
            }

            let components: Vec<&str> = line.split_whitespace().collect();
            if components.len() < 9 {
                continue;
            }

            let pid: u32 = match components[1].parse() {
                Ok(p) => p,
                Err(_) => continue,
            };

            let protocol = match components[7] {
                "TCP" => Protocol::Tcp,
                "UDP" => Protocol::Udp,
                _ => continue,
            };

            // UDP rows with a peer ("->") are connected, not bound listeners.
            if protocol == Protocol::Udp && components[8].contains("->") {
                continue;
            }

            let (address, port) = match Utils::parse_address(components[8]) {
                Some((a, p)) => (a, p),
                None => continue,
            };

            sockets.push(
                RawSocket::new(protocol, port, Some(pid))
                    .with_address(address)
                    .with_command(decode_lsof_escapes(components[0])),
            );
        }

        sockets
    }
}

/// Parse `netstat -an -p tcp|udp` output into listening endpoints.
///
/// ```text
/// Proto Recv-Q Send-Q  Local Address          Foreign Address        (state)
/// tcp4       0      0  *.22                   *.*                    LISTEN
/// udp4       0      0  *.5353                 *.*
/// ```
///
/// netstat prints `host.port`, so the port follows the last dot.
fn parse_netstat_listeners(output: &str) -> Vec<(Protocol, String, u16)> {
    let mut listeners = Vec::new();

    for line in output.lines() {
        let components: Vec<&str> = line.split_whitespace().collect();
        if components.len() < 5 {
            continue;
        }

        let protocol = if components[0].starts_with("tcp") {
            if components.get(5) != Some(&"LISTEN") {
                continue;
            }
            Protocol::Tcp
        } else if components[0].starts_with("udp") {
            if components[4] != "*.*" {
                continue;
            }
            Protocol::Udp
        } else {
            continue;
        };

        let Some((host, port)) = components[3].rsplit_once('.') else {
            continue;
        };
        let Ok(port) = port.parse::<u16>() else {
            continue;
        };
        if port == 0 {
            continue;
        }

        let host = host.split('%').next().unwrap_or(host);
        listeners.push((protocol, Utils::display_host(host), port));
    }

    listeners
}

/// Add endpoints lsof could not attribute as unknown-owner rows.
///
/// Unprivileged lsof omits other users' sockets entirely; netstat still
/// lists them, just without a PID.
fn merge_unattributed(
    mut sockets: Vec<RawSocket>,
    listeners: Vec<(Protocol, String, u16)>,
) -> Vec<RawSocket> {
    let mut covered: HashSet<(Protocol, u16)> =
        sockets.iter().map(|s| (s.protocol, s.port)).collect();

    for (protocol, address, port) in listeners {
        if covered.insert((protocol, port)) {
            sockets.push(RawSocket::new(protocol, port, None).with_address(address));
        }
    }

    sockets
}

/// Run netstat for one protocol. Failures only cost the unknown rows.
async fn run_netstat(protocol: &str) -> Option<String> {
    let output = Command::new("/usr/sbin/netstat")
        .args(["-an", "-p", protocol])
        .stdout(Stdio::piped())
        .stderr(Stdio::null())
        .output()
        .await;

    match output {
        Ok(output) if output.status.success() => {
            Some(String::from_utf8_lossy(&output.stdout).into_owned())
        }
        Ok(output) => {
            debug!(protocol, status = %output.status, "netstat failed");
            None
        }
        Err(e) => {
            debug!(protocol, error = %e, "Failed to run netstat");
            None
        }
    }
}

impl Default for LsofReader {
    fn default() -> Self {
        Self::new()
    }
}

impl SocketScanner for LsofReader {
    /// Executes: `lsof -nP +c 0 -iTCP -sTCP:LISTEN -iUDP`, then
    /// `netstat -an -p tcp|udp` for listeners lsof was not allowed to see.
    ///
    /// lsof exits with status 1 when nothing matched; empty stdout in that
    /// case is a valid empty table rather than an error.
    async fn scan(&self) -> Result<Vec<RawSocket>> {
        let output = Command::new("/usr/sbin/lsof")
            .args(["-nP", "+c", "0", "-iTCP", "-sTCP:LISTEN", "-iUDP"])
            .stdout(Stdio::piped())
            .stderr(Stdio::null())
            .output()
            .await
            .map_err(|e| Error::Enumeration(format!("Failed to run lsof: {}", e)))?;

        if !output.status.success() && output.status.code() != Some(1) {
            return Err(Error::Enumeration(format!(
                "lsof exited with {}",
                output.status
            )));
        }

        let stdout = String::from_utf8_lossy(&output.stdout);
        let sockets = self.parse_lsof_output(&stdout);

        let mut listeners = Vec::new();
        for protocol in ["tcp", "udp"] {
            if let Some(output) = run_netstat(protocol).await {
                listeners.extend(parse_netstat_listeners(&output));
            }
        }

        let merged = merge_unattributed(sockets, listeners);
        debug!(count = merged.len(), "Read socket table");
        Ok(merged)
    }
}
