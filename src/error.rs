//! Error taxonomy for subnet calculation input.
//!
//! Every variant is a local, recoverable classification of bad input. The
//! HTTP layer maps all of them to `400 Bad Request` and uses the `Display`
//! text as the client-facing message.

use hyper::StatusCode;
use thiserror::Error;

/// Reasons a subnet calculation request cannot be answered.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SubnetError {
    /// Address text was supplied but is not a dotted quad.
    #[error("Invalid IP address '{0}'.")]
    InvalidAddress(String),

    /// CIDR prefix was supplied but is non-numeric or outside 0-32.
    #[error("Invalid CIDR prefix '{0}' (expected 0-32).")]
    InvalidPrefix(String),

    /// Mask text was supplied but is not a dotted quad.
    #[error("Invalid mask.")]
    InvalidMask(String),

    /// Mask bits are not a leading run of ones.
    #[error("Subnet mask must be contiguous (e.g., 255.255.255.0).")]
    NonContiguousMask(String),

    #[error("Missing or invalid IP.")]
    MissingAddress,

    #[error("Missing subnet size (CIDR or mask).")]
    MissingPrefix,
}

impl SubnetError {
    /// HTTP status used when this error reaches the API boundary.
    pub fn status_code(&self) -> StatusCode {
        StatusCode::BAD_REQUEST
    }
}
