//! Domain models for the network toolset.
//!
//! This module contains the core data structures used throughout the application:
//! - [`Ipv4`] - IPv4 address with CIDR notation support, plus the bit helpers
//! - [`SubnetResult`] - Output of the subnet calculator
//! - [`PortEntry`] and [`WELL_KNOWN_PORTS`] - Port lookup table

mod ipv4;
mod port;
mod subnet;

// Re-export public types
pub use ipv4::{
    broadcast_addr, cut_addr, get_cidr_mask, int_to_ipv4, ipv4_class, ipv4_to_int,
    is_private_ipv4, mask_to_prefix, parse_prefix, to_bits, AddressClass, Ipv4, MAX_LENGTH,
};
pub use port::{PortEntry, Protocol, WellKnownPort, WELL_KNOWN_PORTS};
pub use subnet::{SubnetBits, SubnetInput, SubnetResult};
