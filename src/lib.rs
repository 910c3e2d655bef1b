//! # netcalc-tools
//!
//! IPv4 subnet calculator and well-known port lookup, usable as a library,
//! from the `netcalc` CLI, or over HTTP.
//!
//! ```
//! use netcalc_tools::{calculate, SubnetQuery};
//!
//! let r = calculate(&SubnetQuery::combined("192.168.1.10/24")).unwrap();
//! assert_eq!(r.network.to_string(), "192.168.1.0");
//! assert_eq!(r.host_count, 254);
//! ```

pub mod cli;
pub mod config;
pub mod error;
pub mod logging;
pub mod models;
pub mod output;
pub mod processing;
pub mod server;

pub use error::SubnetError;
pub use models::{AddressClass, Ipv4, PortEntry, Protocol, SubnetResult};
pub use processing::{
    calculate, compute_subnet, port_lookup, PortLookupRequest, PortLookupResponse, SubnetQuery,
};
pub use server::start_server;

pub const VERSION: &str = env!("CARGO_PKG_VERSION");
