//! Utilities for [RFC 6052](https://datatracker.ietf.org/doc/html/rfc6052)
//! IPv4-embedded IPv6 addresses.
//!
//! Byte 8 of the IPv6 address (bits 64..71, the "u" octet) is never used, so
//! the four IPv4 bytes are laid out around it depending on the prefix length.

use std::net::{Ipv4Addr, Ipv6Addr};

use super::bits::Prefix;
use crate::error::{CidrError, Result};

/// IPv6 prefix lengths that have an RFC 6052 layout.
pub const EMBEDDING_PREFIXES: [u8; 6] = [32, 40, 48, 56, 64, 96];

/// IPv6 byte positions that receive IPv4 bytes 0..4.
fn layout(prefix_len: u8) -> Option<[usize; 4]> {
    match prefix_len {
        32 => Some([4, 5, 6, 7]),
        40 => Some([5, 6, 7, 9]),
        48 => Some([6, 7, 9, 10]),
        56 => Some([7, 9, 10, 11]),
        64 => Some([9, 10, 11, 12]),
        96 => Some([12, 13, 14, 15]),
        _ => None,
    }
}

fn layout_for(network: &Prefix<u128>) -> Result<[usize; 4]> {
    layout(network.prefix_len())
        .ok_or(CidrError::InvalidEmbeddingPrefix(network.prefix_len()))
}

/// Embed `v4` into the IPv6 `network`.
///
/// Bytes outside the IPv4 slots keep the network's base address.
pub fn embed(network: Prefix<u128>, v4: Ipv4Addr) -> Result<Ipv6Addr> {
    let slots = layout_for(&network)?;
    let mut octets = Ipv6Addr::from(network.addr()).octets();

    for (slot, byte) in slots.iter().zip(v4.octets()) {
        octets[*slot] = byte;
    }

    Ok(Ipv6Addr::from(octets))
}

/// Recover the IPv4 address embedded in `v6` under `network`'s layout.
pub fn extract(network: Prefix<u128>, v6: Ipv6Addr) -> Result<Ipv4Addr> {
    let slots = layout_for(&network)?;
    let octets = v6.octets();

    let mut v4 = [0u8; 4];
    for (byte, slot) in v4.iter_mut().zip(slots) {
        *byte = octets[slot];
    }

    Ok(Ipv4Addr::from(v4))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn v6(s: &str) -> Prefix<u128> {
        s.parse().unwrap()
    }

    const V4: Ipv4Addr = Ipv4Addr::new(192, 0, 2, 33);

    #[test]
    fn test_rfc6052_examples() {
        // Table in RFC 6052 section 2.4.
        let cases = [
            ("2001:db8::/32", "2001:db8:c000:221::"),
            ("2001:db8:100::/40", "2001:db8:1c0:2:21::"),
            ("2001:db8:122::/48", "2001:db8:122:c000:2:2100::"),
            ("2001:db8:122:300::/56", "2001:db8:122:3c0:0:221::"),
            ("2001:db8:122:344::/64", "2001:db8:122:344:c0:2:2100:0"),
            ("2001:db8:122:344::/96", "2001:db8:122:344::c000:221"),
        ];

        for (network, expected) in cases {
            let embedded = embed(v6(network), V4).unwrap();
            assert_eq!(embedded, expected.parse::<Ipv6Addr>().unwrap(), "network {}", network);
        }
    }

    #[test]
    fn test_well_known_prefix() {
        let embedded = embed(v6("64:ff9b::/96"), V4).unwrap();
        assert_eq!(embedded.to_string(), "64:ff9b::c000:221");
    }

    #[test]
    fn test_invalid_prefix() {
        assert_eq!(
            embed(v6("2001:db8::/33"), V4),
            Err(CidrError::InvalidEmbeddingPrefix(33))
        );
        assert_eq!(
            extract(v6("2001:db8::/128"), Ipv6Addr::UNSPECIFIED),
            Err(CidrError::InvalidEmbeddingPrefix(128))
        );
    }

    #[test]
    fn test_extract_round_trip() {
        for len in EMBEDDING_PREFIXES {
            let network = Prefix::<u128>::new(0x2001_0db8_0000_0000_0000_0000_0000_0000, len).unwrap();
            let embedded = embed(network, V4).unwrap();
            assert_eq!(extract(network, embedded), Ok(V4), "prefix /{}", len);
        }
    }
}
