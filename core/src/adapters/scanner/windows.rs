//! Windows socket table reader using netstat.

use tokio::process::Command;

use crate::domain::{Protocol, RawSocket};
use crate::error::{Error, Result};

use super::utils::Utils;
use super::SocketScanner;

/// Windows-specific socket table reader using `netstat -ano`.
pub struct NetstatReader;

impl NetstatReader {
    /// Create a new NetstatReader
    pub fn new() -> Self {
        Self
    }

    /// Parse the output of `netstat -ano` into raw sockets.
    ///
    /// Example output:
    /// ```text
    /// Active Connections
    ///
    ///   Proto  Local Address          Foreign Address        State           PID
    ///   TCP    0.0.0.0:135            0.0.0.0:0              LISTENING       1020
    ///   TCP    [::]:445               [::]:0                 LISTENING       4
    ///   UDP    0.0.0.0:5353           *:*                                    2212
    /// ```
    ///
    /// TCP rows are kept only in LISTENING state. UDP rows have no state
    /// column. PID 0 means the owner is not attributable.
    fn parse_netstat_output(output: &str) -> Vec<RawSocket> {
        let mut sockets = Vec::new();

        for line in output.lines() {
            let parts: Vec<&str> = line.split_whitespace().collect();

            let (protocol, local_addr, pid_str) = match parts.as_slice() {
                ["TCP", local, _foreign, "LISTENING", pid] => (Protocol::Tcp, *local, *pid),
                ["UDP", local, _foreign, pid] => (Protocol::Udp, *local, *pid),
                _ => continue,
            };

            let (address, port) = match Utils::parse_address(local_addr) {
                Some(parsed) => parsed,
                None => continue,
            };

            let pid = match pid_str.parse::<u32>() {
                Ok(0) => None,
                Ok(p) => Some(p),
                Err(_) => continue,
            };

            sockets.push(RawSocket::new(protocol, port, pid).with_address(address));
        }

        sockets
    }

    /// Run netstat command and return output
    async fn run_netstat() -> Result<String> {
        let output = Command::new("netstat")
            .args(["-ano"])
            .output()
            .await
            .map_err(|e| Error::Enumeration(format!("netstat -ano: {}", e)))?;

        if !output.status.success() {
            return Err(Error::Enumeration(format!(
                "netstat -ano failed: {}",
                String::from_utf8_lossy(&output.stderr)
            )));
        }

        Ok(String::from_utf8_lossy(&output.stdout).to_string())
    }
}

impl Default for NetstatReader {
    fn default() -> Self {
        Self::new()
    }
}

impl SocketScanner for NetstatReader {
    async fn scan(&self) -> Result<Vec<RawSocket>> {
        let output = Self::run_netstat().await?;
        Ok(Self::parse_netstat_output(&output))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_netstat_output() {
        let output = r#"
Active Connections

  Proto  Local Address          Foreign Address        State           PID
  TCP    0.0.0.0:135            0.0.0.0:0              LISTENING       1020
  TCP    127.0.0.1:3000         0.0.0.0:0              LISTENING       5432
  TCP    192.168.1.5:50123      140.82.112.3:443       ESTABLISHED     7788
  TCP    [::1]:6379             [::]:0                 LISTENING       8080
  UDP    0.0.0.0:5353           *:*                                    2212
  UDP    [::]:500               *:*                                    0
"#;
        let sockets = NetstatReader::parse_netstat_output(output);
        assert_eq!(sockets.len(), 5);

        assert!(sockets.iter().any(|s| {
            s.port == 135 && s.pid == Some(1020) && s.local_address.as_deref() == Some("*")
        }));
        assert!(sockets
            .iter()
            .any(|s| s.port == 6379 && s.local_address.as_deref() == Some("::1")));
        assert!(!sockets.iter().any(|s| s.port == 50123));

        let udp: Vec<&RawSocket> = sockets.iter().filter(|s| s.protocol == Protocol::Udp).collect();
        assert_eq!(udp.len(), 2);
        assert_eq!(udp[0].pid, Some(2212));
        assert_eq!(udp[1].pid, None);
    }

    #[test]
    fn test_parse_netstat_skips_headers() {
        let output = "Active Connections\n\n  Proto  Local Address  Foreign Address  State  PID\n";
        assert!(NetstatReader::parse_netstat_output(output).is_empty());
    }
}
