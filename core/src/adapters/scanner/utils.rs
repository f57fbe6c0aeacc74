use std::net::IpAddr;

pub struct Utils;

impl Utils {
    /// Parse an address:port string into a display address and a port.
    ///
    /// Handles multiple address formats:
    /// - IPv4: "127.0.0.1:3000", "0.0.0.0:135" or "*:8080"
    /// - IPv6: "\[::1]:3000" or "\[fe80::1%en0]:8080"
    /// - zone suffixes as printed by some tools: "127.0.0.53%lo:53"
    ///
    /// Brackets and zone suffixes are stripped; unspecified IPv4 becomes "*".
    #[cfg_attr(all(target_os = "linux", not(test)), allow(dead_code))]
    pub fn parse_address(address: &str) -> Option<(String, u16)> {
        let (host, port_str) = if let Some(rest) = address.strip_prefix('[') {
            // IPv6 format: [::1]:3000
            let bracket_end = rest.find(']')?;
            let port_str = rest[bracket_end + 1..].strip_prefix(':')?;
            (&rest[..bracket_end], port_str)
        } else {
            // IPv4 format: 127.0.0.1:3000 or *:8080
            let last_colon = address.rfind(':')?;
            (&address[..last_colon], &address[last_colon + 1..])
        };

        let port: u16 = port_str.parse().ok()?;
        let host = host.split('%').next().unwrap_or(host);
        Some((Self::display_host(host), port))
    }

    /// Normalize a bare host string for display.
    pub fn display_host(host: &str) -> String {
        match host {
            "" | "*" | "0.0.0.0" => "*".to_string(),
            other => other.to_string(),
        }
    }

    /// Display form of an IP address, unspecified IPv4 shown as "*".
    pub fn display_ip(ip: &IpAddr) -> String {
        Self::display_host(&ip.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_ipv4_address() {
        let (addr, port) = Utils::parse_address("127.0.0.1:3000").unwrap();
        assert_eq!(addr, "127.0.0.1");
        assert_eq!(port, 3000);

        let (addr, port) = Utils::parse_address("*:8080").unwrap();
        assert_eq!(addr, "*");
        assert_eq!(port, 8080);

        let (addr, _) = Utils::parse_address("0.0.0.0:135").unwrap();
        assert_eq!(addr, "*");
    }

    #[test]
    fn test_parse_ipv6_address() {
        let (addr, port) = Utils::parse_address("[::1]:3000").unwrap();
        assert_eq!(addr, "::1");
        assert_eq!(port, 3000);

        let (addr, port) = Utils::parse_address("[fe80::1%en0]:8080").unwrap();
        assert_eq!(addr, "fe80::1");
        assert_eq!(port, 8080);
    }

    #[test]
    fn test_parse_zone_suffix() {
        let (addr, port) = Utils::parse_address("127.0.0.53%lo:53").unwrap();
        assert_eq!(addr, "127.0.0.53");
        assert_eq!(port, 53);
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert!(Utils::parse_address("no-port").is_none());
        assert!(Utils::parse_address("[::1]").is_none());
        assert!(Utils::parse_address("*:*").is_none());
        assert!(Utils::parse_address("1.2.3.4:70000").is_none());
    }

    #[test]
    fn test_display_ip() {
        let ip: IpAddr = "0.0.0.0".parse().unwrap();
        assert_eq!(Utils::display_ip(&ip), "*");
        let ip: IpAddr = "::".parse().unwrap();
        assert_eq!(Utils::display_ip(&ip), "::");
    }
}
