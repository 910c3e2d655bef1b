//! Input normalization for the subnet calculator.
//!
//! Callers may describe the subnet as a combined `q=<ip>/<prefix>` string,
//! a separate `ip`, an explicit `cidr`, or a dotted `mask`. [`SubnetQuery::resolve`]
//! collapses these into one [`Ipv4`] in a fixed order, later fields overriding
//! earlier ones:
//!
//! 1. address and prefix from `q`
//! 2. address from `ip`
//! 3. prefix from `mask`, unless `cidr` is given, in which case `cidr` wins
//!
//! An error attached to a value that is later overridden is dropped.

use crate::error::SubnetError;
use crate::models::{ipv4_to_int, mask_to_prefix, parse_prefix, Ipv4};
use serde::Deserialize;
use std::net::Ipv4Addr;

/// Raw, optional subnet calculator inputs as they arrive from a caller.
///
/// Empty strings count as absent.
#[derive(Deserialize, Debug, Default, Clone, PartialEq, Eq)]
pub struct SubnetQuery {
    pub q: Option<String>,
    pub ip: Option<String>,
    pub mask: Option<String>,
    pub cidr: Option<String>,
}

fn non_empty(field: &Option<String>) -> Option<&str> {
    field.as_deref().filter(|s| !s.is_empty())
}

fn parse_address(s: &str) -> Result<u32, SubnetError> {
    ipv4_to_int(s).ok_or_else(|| SubnetError::InvalidAddress(s.trim().to_string()))
}

fn parse_cidr(s: &str) -> Result<u8, SubnetError> {
    parse_prefix(s).ok_or_else(|| SubnetError::InvalidPrefix(s.trim().to_string()))
}

/// Turn a dotted mask into its prefix length.
pub fn resolve_mask(s: &str) -> Result<u8, SubnetError> {
    let mask = ipv4_to_int(s).ok_or_else(|| SubnetError::InvalidMask(s.trim().to_string()))?;
    mask_to_prefix(mask).ok_or_else(|| SubnetError::NonContiguousMask(s.trim().to_string()))
}

impl SubnetQuery {
    /// Query from a combined `<ip>/<prefix>` string.
    pub fn combined(q: &str) -> Self {
        SubnetQuery {
            q: Some(q.to_string()),
            ..Default::default()
        }
    }

    /// Field-wise merge: keep `self`'s non-empty fields, fill the rest from `other`.
    pub fn or(self, other: SubnetQuery) -> Self {
        fn pick(a: Option<String>, b: Option<String>) -> Option<String> {
            a.filter(|s| !s.is_empty()).or(b)
        }
        SubnetQuery {
            q: pick(self.q, other.q),
            ip: pick(self.ip, other.ip),
            mask: pick(self.mask, other.mask),
            cidr: pick(self.cidr, other.cidr),
        }
    }

    /// Resolve to a single normalized address and prefix.
    ///
    /// Mask problems are reported first, then a missing/invalid address,
    /// then a missing/invalid prefix.
    pub fn resolve(&self) -> Result<Ipv4, SubnetError> {
        let mut address: Option<Result<u32, SubnetError>> = None;
        let mut prefix: Option<Result<u8, SubnetError>> = None;

        if let Some(q) = non_empty(&self.q) {
            let q = q.trim();
            let parts: Vec<&str> = q.split('/').collect();
            match parts.as_slice() {
                [addr, len] => {
                    address = Some(parse_address(addr));
                    prefix = Some(parse_cidr(len));
                }
                [addr] => address = Some(parse_address(addr)),
                _ => address = Some(Err(SubnetError::InvalidAddress(q.to_string()))),
            }
        }

        if let Some(ip) = non_empty(&self.ip) {
            address = Some(parse_address(ip));
        }

        if let Some(cidr) = non_empty(&self.cidr) {
            prefix = Some(parse_cidr(cidr));
        } else if let Some(mask) = non_empty(&self.mask) {
            prefix = Some(Ok(resolve_mask(mask)?));
        }

        let addr = address.ok_or(SubnetError::MissingAddress)??;
        let len = prefix.ok_or(SubnetError::MissingPrefix)??;

        let resolved = Ipv4 {
            addr: Ipv4Addr::from(addr),
            mask: len,
        };
        log::debug!("resolved {:?} => {}", self, resolved);
        Ok(resolved)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ipv4(addr: &str, mask: u8) -> Ipv4 {
        Ipv4 {
            addr: addr.parse().unwrap(),
            mask,
        }
    }

    fn query(q: Option<&str>, ip: Option<&str>, mask: Option<&str>, cidr: Option<&str>) -> SubnetQuery {
        SubnetQuery {
            q: q.map(String::from),
            ip: ip.map(String::from),
            mask: mask.map(String::from),
            cidr: cidr.map(String::from),
        }
    }

    #[test]
    fn test_combined_string() {
        let r = SubnetQuery::combined("192.168.1.10/24").resolve().unwrap();
        assert_eq!(r, ipv4("192.168.1.10", 24));
    }

    #[test]
    fn test_ip_and_mask() {
        let r = query(None, Some("172.20.10.1"), Some("255.255.0.0"), None)
            .resolve()
            .unwrap();
        assert_eq!(r.mask, 16);
    }

    #[test]
    fn test_ip_overrides_combined_address() {
        let r = query(Some("10.0.0.1/8"), Some("192.168.0.1"), None, None)
            .resolve()
            .unwrap();
        assert_eq!(r, ipv4("192.168.0.1", 8));
    }

    #[test]
    fn test_cidr_wins_over_mask_and_combined_prefix() {
        let r = query(Some("10.0.0.1/8"), None, Some("255.255.0.0"), Some("30"))
            .resolve()
            .unwrap();
        assert_eq!(r.mask, 30);
    }

    #[test]
    fn test_mask_overrides_combined_prefix() {
        let r = query(Some("10.0.0.1/8"), None, Some("255.255.255.0"), None)
            .resolve()
            .unwrap();
        assert_eq!(r.mask, 24);
    }

    #[test]
    fn test_overridden_errors_are_dropped() {
        let r = query(Some("999.0.0.1/99"), Some("10.0.0.1"), None, Some("8"))
            .resolve()
            .unwrap();
        assert_eq!(r, ipv4("10.0.0.1", 8));
    }

    #[test]
    fn test_non_contiguous_mask() {
        assert_eq!(
            query(None, Some("10.0.0.1"), Some("255.0.255.0"), None).resolve(),
            Err(SubnetError::NonContiguousMask("255.0.255.0".into()))
        );
    }

    #[test]
    fn test_mask_errors_come_before_missing_address() {
        assert_eq!(
            query(None, None, Some("255.0.255.0"), None).resolve(),
            Err(SubnetError::NonContiguousMask("255.0.255.0".into()))
        );
        assert_eq!(
            query(None, None, Some("not-a-mask"), None).resolve(),
            Err(SubnetError::InvalidMask("not-a-mask".into()))
        );
    }

    #[test]
    fn test_missing_inputs() {
        assert_eq!(
            SubnetQuery::default().resolve(),
            Err(SubnetError::MissingAddress)
        );
        assert_eq!(
            query(None, Some("10.0.0.1"), None, None).resolve(),
            Err(SubnetError::MissingPrefix)
        );
        assert_eq!(
            SubnetQuery::combined("10.0.0.1").resolve(),
            Err(SubnetError::MissingPrefix)
        );
        assert_eq!(
            query(Some(""), Some(""), Some(""), Some("")).resolve(),
            Err(SubnetError::MissingAddress)
        );
    }

    #[test]
    fn test_invalid_inputs() {
        assert_eq!(
            SubnetQuery::combined("10.0.0/24").resolve(),
            Err(SubnetError::InvalidAddress("10.0.0".into()))
        );
        assert_eq!(
            SubnetQuery::combined("10.0.0.1/33").resolve(),
            Err(SubnetError::InvalidPrefix("33".into()))
        );
        assert_eq!(
            SubnetQuery::combined("10.0.0.1/").resolve(),
            Err(SubnetError::InvalidPrefix("".into()))
        );
        assert_eq!(
            SubnetQuery::combined("10.0.0.1/24/8").resolve(),
            Err(SubnetError::InvalidAddress("10.0.0.1/24/8".into()))
        );
        assert_eq!(
            query(None, Some("10.0.0.1"), None, Some("abc")).resolve(),
            Err(SubnetError::InvalidPrefix("abc".into()))
        );
    }

    #[test]
    fn test_or_merge_prefers_self() {
        let from_query = query(None, Some("10.0.0.1"), None, Some(""));
        let from_body = query(Some("1.1.1.1/32"), Some("2.2.2.2"), None, Some("16"));
        let merged = from_query.or(from_body);
        assert_eq!(merged.ip.as_deref(), Some("10.0.0.1"));
        assert_eq!(merged.cidr.as_deref(), Some("16"));
        assert_eq!(merged.q.as_deref(), Some("1.1.1.1/32"));
        assert_eq!(merged.resolve().unwrap(), ipv4("10.0.0.1", 16));
    }
}
