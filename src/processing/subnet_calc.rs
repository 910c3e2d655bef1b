//! Subnet calculation.
//!
//! Derives network, broadcast, usable host range and classification from a
//! single (address, prefix) pair. Pure and deterministic.

use crate::error::SubnetError;
use crate::models::{
    broadcast_addr, cut_addr, get_cidr_mask, ipv4_class, is_private_ipv4, to_bits, Ipv4, SubnetBits, SubnetInput,
    SubnetResult, MAX_LENGTH,
};
use std::net::Ipv4Addr;

/// Compute the full subnet breakdown for `addr` with prefix length `len`.
///
/// Host range policy:
/// * `/32` - one host, the address itself.
/// * `/31` - both addresses usable (RFC 3021).
/// * otherwise network and broadcast are excluded.
///
/// # Examples
/// ```
/// use netcalc_tools::processing::compute_subnet;
/// use std::net::Ipv4Addr;
///
/// let r = compute_subnet(Ipv4Addr::new(192, 168, 1, 10), 24).unwrap();
/// assert_eq!(r.network, Ipv4Addr::new(192, 168, 1, 0));
/// assert_eq!(r.host_count, 254);
/// ```
pub fn compute_subnet(addr: Ipv4Addr, len: u8) -> Result<SubnetResult, SubnetError> {
    let ip = u32::from(addr);
    let mask = get_cidr_mask(len)?;
    let network = cut_addr(ip, len)?;
    let broadcast = broadcast_addr(ip, len)?;

    let (first_host, last_host, host_count) = match len {
        32 => (ip, ip, 1),
        31 => (network, broadcast, 2),
        _ => {
            let total = 1u64 << (MAX_LENGTH - len);
            (network + 1, broadcast - 1, total - 2)
        }
    };

    log::debug!(
        "compute_subnet({addr}/{len}) network={} broadcast={} hosts={host_count}",
        Ipv4Addr::from(network),
        Ipv4Addr::from(broadcast)
    );

    Ok(SubnetResult {
        input: SubnetInput {
            ip: addr,
            mask: Ipv4Addr::from(mask),
            cidr: len,
        },
        network: Ipv4Addr::from(network),
        broadcast: Ipv4Addr::from(broadcast),
        first_host: Ipv4Addr::from(first_host),
        last_host: Ipv4Addr::from(last_host),
        host_count,
        wildcard_mask: Ipv4Addr::from(!mask),
        class: ipv4_class(ip),
        is_private: is_private_ipv4(ip),
        bits: SubnetBits {
            ip: to_bits(ip),
            mask: to_bits(mask),
            network: to_bits(network),
            broadcast: to_bits(broadcast),
        },
    })
}

/// Same as [`compute_subnet`] for an already paired [`Ipv4`].
pub fn compute_subnet_ipv4(ipv4: Ipv4) -> Result<SubnetResult, SubnetError> {
    compute_subnet(ipv4.addr, ipv4.mask)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::AddressClass;

    #[test]
    fn test_class_c_private_24() {
        let r = compute_subnet(Ipv4Addr::new(192, 168, 1, 10), 24).unwrap();
        assert_eq!(r.input.ip, Ipv4Addr::new(192, 168, 1, 10));
        assert_eq!(r.input.mask, Ipv4Addr::new(255, 255, 255, 0));
        assert_eq!(r.input.cidr, 24);
        assert_eq!(r.network, Ipv4Addr::new(192, 168, 1, 0));
        assert_eq!(r.broadcast, Ipv4Addr::new(192, 168, 1, 255));
        assert_eq!(r.first_host, Ipv4Addr::new(192, 168, 1, 1));
        assert_eq!(r.last_host, Ipv4Addr::new(192, 168, 1, 254));
        assert_eq!(r.host_count, 254);
        assert_eq!(r.wildcard_mask, Ipv4Addr::new(0, 0, 0, 255));
        assert_eq!(r.class, AddressClass::C);
        assert!(r.is_private);
        assert_eq!(r.bits.mask, "11111111 11111111 11111111 00000000");
        assert_eq!(r.bits.network, "11000000 10101000 00000001 00000000");
        assert_eq!(r.bits.broadcast, "11000000 10101000 00000001 11111111");
    }

    #[test]
    fn test_point_to_point_31() {
        let r = compute_subnet(Ipv4Addr::new(10, 0, 0, 5), 31).unwrap();
        assert_eq!(r.host_count, 2);
        assert_eq!(r.network, Ipv4Addr::new(10, 0, 0, 4));
        assert_eq!(r.broadcast, Ipv4Addr::new(10, 0, 0, 5));
        assert_eq!(r.first_host, Ipv4Addr::new(10, 0, 0, 4));
        assert_eq!(r.last_host, Ipv4Addr::new(10, 0, 0, 5));
    }

    #[test]
    fn test_single_host_32() {
        let r = compute_subnet(Ipv4Addr::new(8, 8, 8, 8), 32).unwrap();
        assert_eq!(r.host_count, 1);
        assert_eq!(r.first_host, Ipv4Addr::new(8, 8, 8, 8));
        assert_eq!(r.last_host, Ipv4Addr::new(8, 8, 8, 8));
        assert_eq!(r.network, Ipv4Addr::new(8, 8, 8, 8));
        assert_eq!(r.broadcast, Ipv4Addr::new(8, 8, 8, 8));
        assert_eq!(r.wildcard_mask, Ipv4Addr::new(0, 0, 0, 0));
        assert!(!r.is_private);
        assert_eq!(r.class, AddressClass::A);
    }

    #[test]
    fn test_slash_30() {
        let r = compute_subnet(Ipv4Addr::new(10, 0, 0, 6), 30).unwrap();
        assert_eq!(r.host_count, 2);
        assert_eq!(r.first_host, Ipv4Addr::new(10, 0, 0, 5));
        assert_eq!(r.last_host, Ipv4Addr::new(10, 0, 0, 6));
    }

    #[test]
    fn test_whole_space_0() {
        let r = compute_subnet(Ipv4Addr::new(203, 0, 113, 9), 0).unwrap();
        assert_eq!(r.input.mask, Ipv4Addr::new(0, 0, 0, 0));
        assert_eq!(r.network, Ipv4Addr::new(0, 0, 0, 0));
        assert_eq!(r.broadcast, Ipv4Addr::new(255, 255, 255, 255));
        assert_eq!(r.first_host, Ipv4Addr::new(0, 0, 0, 1));
        assert_eq!(r.last_host, Ipv4Addr::new(255, 255, 255, 254));
        assert_eq!(r.host_count, 4_294_967_294);
        assert_eq!(r.wildcard_mask, Ipv4Addr::new(255, 255, 255, 255));
    }

    #[test]
    fn test_high_addresses_do_not_sign_extend() {
        let r = compute_subnet(Ipv4Addr::new(255, 255, 255, 200), 25).unwrap();
        assert_eq!(r.network, Ipv4Addr::new(255, 255, 255, 128));
        assert_eq!(r.broadcast, Ipv4Addr::new(255, 255, 255, 255));
        assert_eq!(r.last_host, Ipv4Addr::new(255, 255, 255, 254));
        assert_eq!(r.class, AddressClass::E);
    }

    #[test]
    fn test_invalid_prefix_is_rejected() {
        assert_eq!(
            compute_subnet(Ipv4Addr::new(1, 2, 3, 4), 33).unwrap_err(),
            SubnetError::InvalidPrefix("33".into())
        );
    }

    #[test]
    fn test_json_shape() {
        let r = compute_subnet(Ipv4Addr::new(172, 20, 10, 1), 16).unwrap();
        let json = serde_json::to_value(&r).unwrap();
        assert_eq!(json["input"]["ip"], "172.20.10.1");
        assert_eq!(json["input"]["mask"], "255.255.0.0");
        assert_eq!(json["input"]["cidr"], 16);
        assert_eq!(json["network"], "172.20.0.0");
        assert_eq!(json["firstHost"], "172.20.0.1");
        assert_eq!(json["lastHost"], "172.20.255.254");
        assert_eq!(json["hostCount"], 65534);
        assert_eq!(json["wildcardMask"], "0.0.255.255");
        assert_eq!(json["class"], "B");
        assert_eq!(json["isPrivate"], true);
        assert_eq!(json["bits"]["ip"], "10101100 00010100 00001010 00000001");
    }

    #[test]
    fn test_ipv4_pair_matches_address_and_prefix() {
        let ip = Ipv4 {
            addr: Ipv4Addr::new(192, 168, 7, 77),
            mask: 22,
        };
        let r = compute_subnet_ipv4(ip).unwrap();
        assert_eq!(r, compute_subnet(ip.addr, ip.mask).unwrap());
        assert_eq!(r.network, Ipv4Addr::new(192, 168, 4, 0));
        assert_eq!(r.broadcast, Ipv4Addr::new(192, 168, 7, 255));
    }

    #[test]
    fn test_compute_is_deterministic() {
        let ip = Ipv4 {
            addr: Ipv4Addr::new(10, 20, 30, 40),
            mask: 12,
        };
        assert_eq!(
            compute_subnet_ipv4(ip).unwrap(),
            compute_subnet_ipv4(ip).unwrap()
        );
    }
}
