//! IPv4 address and CIDR notation utilities.
//!
//! Provides [`Ipv4`] struct for representing an address together with its
//! prefix length, along with the bit-level helpers the subnet calculator is
//! built from. All arithmetic is done on `u32`, so right shifts are logical.

use crate::error::SubnetError;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::net::Ipv4Addr;
use std::sync::OnceLock;

/// Maximum length for an IPv4 subnet mask (32 bits).
pub const MAX_LENGTH: u8 = 32;

/// Four groups of one to three ASCII digits, nothing else.
static DOTTED_QUAD_REGEX: OnceLock<Regex> = OnceLock::new();

fn get_dotted_quad_regex() -> &'static Regex {
    DOTTED_QUAD_REGEX.get_or_init(|| {
        Regex::new(r"^([0-9]{1,3})\.([0-9]{1,3})\.([0-9]{1,3})\.([0-9]{1,3})$")
            .expect("Invalid Regex")
    })
}

/// Parse a dotted-quad string into its big-endian `u32` value.
///
/// Surrounding whitespace is ignored and leading zeros inside a group are
/// accepted (`010` is 10). Returns `None` for anything that is not exactly
/// four groups in `0..=255`.
///
/// # Examples
/// ```
/// use netcalc_tools::models::ipv4_to_int;
/// assert_eq!(ipv4_to_int("192.168.1.10"), Some(0xC0A8010A));
/// assert_eq!(ipv4_to_int("256.0.0.1"), None);
/// ```
pub fn ipv4_to_int(s: &str) -> Option<u32> {
    let caps = get_dotted_quad_regex().captures(s.trim())?;
    let mut octets = [0u8; 4];
    for (i, octet) in octets.iter_mut().enumerate() {
        *octet = caps[i + 1].parse::<u8>().ok()?;
    }
    Some(u32::from_be_bytes(octets))
}

/// Render a `u32` as a dotted quad, first octet from the most significant byte.
pub fn int_to_ipv4(x: u32) -> String {
    Ipv4Addr::from(x).to_string()
}

/// Parse a CIDR prefix length from text.
///
/// Accepts a decimal integer in `0..=32` with optional surrounding whitespace.
/// An integral float such as `24.0` is accepted as well, since JSON clients
/// sometimes send one.
pub fn parse_prefix(s: &str) -> Option<u8> {
    let s = s.trim();
    if s.is_empty() {
        return None;
    }
    let len = match s.parse::<u8>() {
        Ok(len) => len,
        Err(_) => {
            let f = s.parse::<f64>().ok()?;
            if !f.is_finite() || f.fract() != 0.0 || !(0.0..=f64::from(MAX_LENGTH)).contains(&f) {
                return None;
            }
            f as u8
        }
    };
    (len <= MAX_LENGTH).then_some(len)
}

/// Convert a CIDR prefix length to a subnet mask as u32.
///
/// The shift is done in `u64` so that a prefix of 0 (shift by 32) yields an
/// all-zero mask instead of overflowing.
///
/// # Examples
/// ```
/// use netcalc_tools::models::get_cidr_mask;
/// assert_eq!(get_cidr_mask(24).unwrap(), 0xFFFFFF00);
/// assert_eq!(get_cidr_mask(0).unwrap(), 0);
/// ```
pub fn get_cidr_mask(len: u8) -> Result<u32, SubnetError> {
    if len > MAX_LENGTH {
        Err(SubnetError::InvalidPrefix(len.to_string()))
    } else {
        let right_len = MAX_LENGTH - len;
        let all_bits = u32::MAX as u64;

        let mask = (all_bits >> right_len) << right_len;

        Ok(mask as u32)
    }
}

/// Count the leading one bits of a mask.
///
/// Returns `None` as soon as a one bit is found after a zero bit, i.e. the
/// mask is not contiguous.
pub fn mask_to_prefix(mask: u32) -> Option<u8> {
    let mut seen_zero = false;
    let mut ones = 0u8;
    for i in (0..MAX_LENGTH).rev() {
        if (mask >> i) & 1 == 1 {
            if seen_zero {
                return None;
            }
            ones += 1;
        } else {
            seen_zero = true;
        }
    }
    Some(ones)
}

/// Get the network address for a given IP and prefix length.
pub fn cut_addr(addr: u32, len: u8) -> Result<u32, SubnetError> {
    Ok(addr & get_cidr_mask(len)?)
}

/// Calculate the broadcast address for a given IP and prefix length.
pub fn broadcast_addr(addr: u32, len: u8) -> Result<u32, SubnetError> {
    let mask = get_cidr_mask(len)?;
    Ok((addr & mask) | !mask)
}

/// Legacy classful address class, decided by the first octet only.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AddressClass {
    A,
    B,
    C,
    D,
    E,
}

impl std::fmt::Display for AddressClass {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        let letter = match self {
            AddressClass::A => "A",
            AddressClass::B => "B",
            AddressClass::C => "C",
            AddressClass::D => "D",
            AddressClass::E => "E",
        };
        f.write_str(letter)
    }
}

/// Classify an address into the A-E scheme.
pub fn ipv4_class(addr: u32) -> AddressClass {
    match addr.to_be_bytes()[0] {
        0..=127 => AddressClass::A,
        128..=191 => AddressClass::B,
        192..=223 => AddressClass::C,
        224..=239 => AddressClass::D,
        _ => AddressClass::E,
    }
}

/// True for 10.0.0.0/8, 172.16.0.0/12 and 192.168.0.0/16.
///
/// Loopback, link-local and the other special ranges are reported as public.
pub fn is_private_ipv4(addr: u32) -> bool {
    matches!(
        addr.to_be_bytes(),
        [10, _, _, _] | [172, 16..=31, _, _] | [192, 168, _, _]
    )
}

/// Render 32 bits MSB first as four space-separated octets.
pub fn to_bits(x: u32) -> String {
    let [a, b, c, d] = x.to_be_bytes();
    format!("{a:08b} {b:08b} {c:08b} {d:08b}")
}

/// An address paired with its prefix length, as produced by input resolution.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub struct Ipv4 {
    /// The IPv4 address, not cut to the network.
    pub addr: Ipv4Addr,
    /// The subnet mask length (0-32).
    pub mask: u8,
}

impl std::fmt::Display for Ipv4 {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "{}/{}", self.addr, self.mask)
    }
}
