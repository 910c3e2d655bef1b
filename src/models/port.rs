//! Well-known port table.
//!
//! A deliberately small, high-signal list of assignments. Entries with
//! `common` set are the ones worth memorizing.

use serde::{Deserialize, Serialize};

/// Transport protocol of an assignment, or the `both` filter.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "lowercase")]
pub enum Protocol {
    Tcp,
    Udp,
    #[default]
    Both,
}

impl Protocol {
    /// Interpret a user supplied filter; anything but tcp/udp means both.
    pub fn from_filter(s: Option<&str>) -> Protocol {
        match s.map(|s| s.trim().to_lowercase()).as_deref() {
            Some("tcp") => Protocol::Tcp,
            Some("udp") => Protocol::Udp,
            _ => Protocol::Both,
        }
    }

    /// Does an entry with protocol `self` pass `filter`?
    pub fn matches(self, filter: Protocol) -> bool {
        filter == Protocol::Both || self == filter
    }
}

impl std::fmt::Display for Protocol {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Protocol::Tcp => "tcp",
            Protocol::Udp => "udp",
            Protocol::Both => "both",
        })
    }
}

/// One row of a lookup answer.
///
/// `port` is signed: a service that is not in the table comes back with
/// port `-1`, and unknown port queries are echoed unchanged.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct PortEntry {
    pub port: i64,
    pub protocol: Protocol,
    pub service: String,
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub common: Option<bool>,
}

/// Static table row.
#[derive(Debug, Clone, Copy)]
pub struct WellKnownPort {
    pub port: u16,
    pub protocol: Protocol,
    pub service: &'static str,
    pub description: &'static str,
    pub common: bool,
}

impl From<&WellKnownPort> for PortEntry {
    fn from(w: &WellKnownPort) -> Self {
        PortEntry {
            port: i64::from(w.port),
            protocol: w.protocol,
            service: w.service.to_string(),
            description: w.description.to_string(),
            common: w.common.then_some(true),
        }
    }
}

const fn entry(
    port: u16,
    protocol: Protocol,
    service: &'static str,
    description: &'static str,
    common: bool,
) -> WellKnownPort {
    WellKnownPort {
        port,
        protocol,
        service,
        description,
        common,
    }
}

use Protocol::{Tcp, Udp};

pub static WELL_KNOWN_PORTS: &[WellKnownPort] = &[
    // core
    entry(20, Tcp, "ftp-data", "FTP data", true),
    entry(21, Tcp, "ftp", "FTP control", true),
    entry(22, Tcp, "ssh", "Secure Shell remote login", true),
    entry(23, Tcp, "telnet", "Telnet (unencrypted remote login)", false),
    entry(25, Tcp, "smtp", "Simple Mail Transfer", false),
    entry(53, Udp, "dns", "Domain Name System (queries)", true),
    entry(53, Tcp, "dns", "Domain Name System (zone transfers/DoT)", false),
    entry(67, Udp, "dhcp", "DHCP server", false),
    entry(68, Udp, "dhcp", "DHCP client", false),
    entry(69, Udp, "tftp", "Trivial File Transfer", false),
    entry(80, Tcp, "http", "HyperText Transfer Protocol", true),
    entry(110, Tcp, "pop3", "Post Office Protocol v3", false),
    entry(123, Udp, "ntp", "Network Time Protocol", true),
    entry(135, Tcp, "msrpc", "Microsoft RPC endpoint mapper", false),
    entry(137, Udp, "netbios-ns", "NetBIOS Name Service", false),
    entry(138, Udp, "netbios-dgm", "NetBIOS Datagram Service", false),
    entry(139, Tcp, "netbios-ssn", "NetBIOS Session Service", false),
    entry(143, Tcp, "imap", "IMAP (mail access)", false),
    entry(161, Udp, "snmp", "SNMP (management)", false),
    entry(162, Udp, "snmptrap", "SNMP traps", false),
    entry(389, Tcp, "ldap", "Lightweight Directory Access Protocol", false),
    entry(443, Tcp, "https", "HTTP over TLS/SSL", true),
    entry(445, Tcp, "microsoft-ds", "SMB over TCP", true),
    entry(465, Tcp, "smtps", "SMTP over TLS", false),
    entry(514, Udp, "syslog", "Syslog (legacy)", false),
    entry(515, Tcp, "printer", "Line Printer Daemon", false),
    entry(587, Tcp, "submission", "Mail submission (STARTTLS)", true),
    entry(636, Tcp, "ldaps", "LDAP over TLS", false),
    entry(873, Tcp, "rsync", "rsync file sync", false),
    entry(993, Tcp, "imaps", "IMAP over TLS", false),
    entry(995, Tcp, "pop3s", "POP3 over TLS", false),
    // remote management and VPN
    entry(500, Udp, "isakmp", "IPsec IKE", false),
    entry(1701, Udp, "l2tp", "Layer 2 Tunneling Protocol", false),
    entry(1723, Tcp, "pptp", "Point-to-Point Tunneling Protocol", false),
    entry(3389, Tcp, "rdp", "Remote Desktop Protocol", true),
    // web and dev
    entry(8080, Tcp, "http-alt", "HTTP alternate/Proxies", false),
    entry(8443, Tcp, "https-alt", "HTTPS alternate", false),
    // databases
    entry(1433, Tcp, "mssql", "Microsoft SQL Server", false),
    entry(1521, Tcp, "oracle", "Oracle DB listener", false),
    entry(3306, Tcp, "mysql", "MySQL", false),
    entry(5432, Tcp, "postgres", "PostgreSQL", false),
    entry(27017, Tcp, "mongodb", "MongoDB", false),
    // app consoles
    entry(8081, Tcp, "http-alt-1", "HTTP alternate", false),
    entry(9000, Tcp, "svc-http", "Common app/console port", false),
    // alternative mail submission
    entry(2525, Tcp, "smtp-alt", "Alternative SMTP (esp. cloud providers)", false),
    // DNS over TLS/QUIC
    entry(853, Tcp, "dot", "DNS over TLS", false),
    entry(853, Udp, "doq", "DNS over QUIC", false),
];
