//! Terminal output utilities.
//!
//! Renders results as aligned, coloured text for the CLI.

use crate::models::{PortEntry, SubnetResult};
use colored::Colorize;

/// Format a label padded to `width`, followed by a colon.
///
/// # Arguments
/// * `label` - The label text
/// * `width` - The minimum width of the label column
pub fn format_label(label: &str, width: usize) -> String {
    format!("{:<width$}", format!("{label}:"))
}

/// Render a subnet breakdown, one field per line.
///
/// Address rows carry their bit pattern in a second column.
pub fn render_subnet(r: &SubnetResult) -> String {
    const W: usize = 11;
    let mut lines = Vec::new();

    let mut row = |label: &str, value: String, bits: Option<&str>| {
        let value = format!("{value:<18}");
        match bits {
            Some(bits) => lines.push(format!(
                "{} {} {}",
                format_label(label, W),
                value.bold(),
                bits.dimmed()
            )),
            None => lines.push(format!("{} {}", format_label(label, W), value.bold())),
        }
    };

    row("Address", r.input.ip.to_string(), Some(r.bits.ip.as_str()));
    row(
        "Netmask",
        format!("{} = {}", r.input.mask, r.input.cidr),
        Some(r.bits.mask.as_str()),
    );
    row("Wildcard", r.wildcard_mask.to_string(), None);
    row("Network", format!("{}/{}", r.network, r.input.cidr), Some(r.bits.network.as_str()));
    row("Broadcast", r.broadcast.to_string(), Some(r.bits.broadcast.as_str()));
    row("HostMin", r.first_host.to_string(), None);
    row("HostMax", r.last_host.to_string(), None);
    row("Hosts", r.host_count.to_string(), None);

    let scope = if r.is_private {
        "private".green()
    } else {
        "public".yellow()
    };
    lines.push(format!(
        "{} {} {}",
        format_label("Class", W),
        r.class.to_string().bold(),
        scope
    ));

    lines.join("\n")
}

/// Render port lookup rows as a table.
pub fn render_ports(entries: &[PortEntry]) -> String {
    let mut lines = vec![format!(
        "{:>6}  {:<5}  {:<14}  {}",
        "port", "proto", "service", "description"
    )
    .underline()
    .to_string()];

    for e in entries {
        let port = if e.port < 0 {
            "-".to_string()
        } else {
            e.port.to_string()
        };
        let service = format!("{:<14}", e.service);
        let service = match (e.common, e.service.as_str()) {
            (Some(true), _) => service.green().bold(),
            (_, "unknown") => service.red(),
            _ if e.port < 0 => service.red(),
            _ => service.normal(),
        };
        lines.push(format!(
            "{port:>6}  {:<5}  {service}  {}",
            e.protocol.to_string(),
            e.description
        ));
    }

    lines.join("\n")
}
