//! Command-line interface.
//!
//! ```bash
//! netcalc subnet 192.168.1.10/24
//! netcalc subnet --ip 10.0.0.1 --mask 255.255.0.0 --json
//! netcalc ports 80,443,ssh --protocol tcp
//! NETCALC_BIND_ADDR=127.0.0.1:8080 netcalc serve
//! ```

use crate::config::{DEFAULT_BIND_ADDR, DEFAULT_MAX_BODY_BYTES, LOG_CONFIG_FILE};
use crate::processing::{PortLookupRequest, SubnetQuery};
use clap::{Args, Parser, Subcommand};
use log::LevelFilter;
use std::net::SocketAddr;
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(
    name = "netcalc",
    about = "IPv4 subnet calculator and well-known port lookup",
    version
)]
pub struct Cli {
    /// Log level used when no log4rs config file is found
    #[arg(
        short = 'l',
        long = "log-level",
        value_name = "LEVEL",
        default_value = "warn",
        env = "LOG_LEVEL",
        global = true
    )]
    pub log_level: LevelFilter,

    /// log4rs YAML config file
    #[arg(long = "log-config", value_name = "PATH", default_value = LOG_CONFIG_FILE, global = true)]
    pub log_config: PathBuf,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Break an IPv4 subnet down into network, broadcast, host range and class
    Subnet(SubnetArgs),
    /// Look up well-known ports by number or service name
    Ports(PortsArgs),
    /// Serve the calculators over HTTP
    Serve(ServeArgs),
}

#[derive(Debug, Args)]
pub struct SubnetArgs {
    /// Address with optional prefix, e.g. 192.168.1.10/24
    pub q: Option<String>,
    /// Address; overrides the one in Q
    #[arg(long)]
    pub ip: Option<String>,
    /// Prefix length; overrides --mask and the prefix in Q
    #[arg(long)]
    pub cidr: Option<String>,
    /// Dotted subnet mask; overrides the prefix in Q
    #[arg(long)]
    pub mask: Option<String>,
    /// Print JSON instead of a table
    #[arg(long)]
    pub json: bool,
}

impl From<&SubnetArgs> for SubnetQuery {
    fn from(args: &SubnetArgs) -> Self {
        SubnetQuery {
            q: args.q.clone(),
            ip: args.ip.clone(),
            mask: args.mask.clone(),
            cidr: args.cidr.clone(),
        }
    }
}

#[derive(Debug, Args)]
pub struct PortsArgs {
    /// Ports and/or service names, comma or space separated
    #[arg(required = true, num_args = 1..)]
    pub q: Vec<String>,
    /// tcp, udp or both
    #[arg(short = 'p', long)]
    pub protocol: Option<String>,
    /// Print JSON instead of a table
    #[arg(long)]
    pub json: bool,
}

impl From<&PortsArgs> for PortLookupRequest {
    fn from(args: &PortsArgs) -> Self {
        PortLookupRequest {
            q: Some(args.q.join(" ")),
            protocol: args.protocol.clone(),
            ..Default::default()
        }
    }
}

#[derive(Debug, Args)]
pub struct ServeArgs {
    #[arg(
        short = 'b',
        long = "bind",
        value_name = "ADDRESS:PORT",
        default_value = DEFAULT_BIND_ADDR,
        env = "NETCALC_BIND_ADDR"
    )]
    pub bind_addr: SocketAddr,

    /// Request bodies above this size are rejected with 413
    #[arg(
        long = "max-body-bytes",
        value_name = "BYTES",
        default_value_t = DEFAULT_MAX_BODY_BYTES,
        env = "NETCALC_MAX_BODY_BYTES"
    )]
    pub max_body_bytes: usize,
}
