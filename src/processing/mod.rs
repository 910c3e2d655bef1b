//! Calculation and lookup logic.
//!
//! This module contains the pure business logic behind every endpoint:
//! - [`resolve`] - Collapsing the accepted input shapes into one address/prefix pair
//! - [`subnet_calc`] - Network, broadcast, host range and classification
//! - [`port_lookup`] - Matching ports and service names against the port table

mod port_lookup;
mod resolve;
mod subnet_calc;

// Re-export public functions
pub use port_lookup::{
    coerce_integer, parse_port_query, port_lookup, search, PortLookupRequest,
    PortLookupResponse, PortQuery,
};
pub use resolve::{resolve_mask, SubnetQuery};
pub use subnet_calc::{compute_subnet, compute_subnet_ipv4};

use crate::error::SubnetError;
use crate::models::SubnetResult;

/// Resolve the raw inputs and compute the subnet in one step.
pub fn calculate(query: &SubnetQuery) -> Result<SubnetResult, SubnetError> {
    compute_subnet_ipv4(query.resolve()?)
}
