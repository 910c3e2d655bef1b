//! Subnet calculation result model.

use super::AddressClass;
use serde::{Deserialize, Serialize};
use std::net::Ipv4Addr;

/// Echo of the normalized input the result was computed from.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct SubnetInput {
    /// The address as given (not cut to the network).
    pub ip: Ipv4Addr,
    /// Subnet mask derived from the prefix.
    pub mask: Ipv4Addr,
    /// Prefix length (0-32).
    pub cidr: u8,
}

/// Bit-string renderings, four space-separated octets each.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct SubnetBits {
    pub ip: String,
    pub mask: String,
    pub network: String,
    pub broadcast: String,
}

/// Everything derived from one (address, prefix) pair.
///
/// Serializes to the JSON shape served by `/api/subnet-calc`; address fields
/// are rendered as dotted quads.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct SubnetResult {
    pub input: SubnetInput,
    pub network: Ipv4Addr,
    pub broadcast: Ipv4Addr,
    pub first_host: Ipv4Addr,
    pub last_host: Ipv4Addr,
    /// Usable hosts. `u64` because a /0 holds 2^32 - 2 of them.
    pub host_count: u64,
    pub wildcard_mask: Ipv4Addr,
    pub class: AddressClass,
    pub is_private: bool,
    pub bits: SubnetBits,
}
