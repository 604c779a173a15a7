//! Network descriptor.
//!
//! The generic half derives base, netmask, usable range and size from a
//! [`Prefix`]. [`Network`] detects the family of a CIDR string and routes each
//! operation to the matching instantiation.

use std::collections::BTreeMap;
use std::fmt;
use std::net::{IpAddr, Ipv6Addr};
use std::str::FromStr;

use ipnet::IpNet;
use num_bigint::BigUint;

use super::bits::{AddressBits, Prefix};
use super::divide::divide;
use super::embed::embed;
use super::vlsm::{allocate, VlsmPlan};
use super::Family;
use crate::config::DivideOptions;
use crate::error::{CidrError, Result};

impl<A: AddressBits> Prefix<A> {
    pub fn base_address(&self) -> A::Addr {
        self.addr().to_addr()
    }

    pub fn netmask_address(&self) -> A::Addr {
        A::netmask(self.prefix_len()).to_addr()
    }

    /// Last address in the block, all host bits set.
    pub fn last_address(&self) -> A::Addr {
        self.last().to_addr()
    }

    /// First host address.
    ///
    /// Blocks with one host bit or none have no network/broadcast pair to
    /// skip, so every address is usable and the range saturates to the block.
    pub fn first_usable(&self) -> A::Addr {
        if self.host_bits() <= 1 {
            return self.base_address();
        }
        self.addr().checked_add(A::ONE).unwrap_or(self.addr()).to_addr()
    }

    /// Last host address. Saturates like [`Prefix::first_usable`].
    pub fn last_usable(&self) -> A::Addr {
        let last = self.last();
        if self.host_bits() <= 1 {
            return last.to_addr();
        }
        last.checked_sub(A::ONE).unwrap_or(last).to_addr()
    }

    /// Total number of addresses, `2^(WIDTH - prefix_len)`.
    pub fn count(&self) -> BigUint {
        self.size()
    }
}

/// A parsed CIDR network of either family.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Network {
    V4(Prefix<u32>),
    V6(Prefix<u128>),
}

impl Network {
    /// Parse a CIDR string, detecting the family from the address.
    pub fn parse(cidr: &str) -> Result<Self> {
        cidr.parse()
    }

    pub fn family(&self) -> Family {
        match self {
            Network::V4(_) => Family::V4,
            Network::V6(_) => Family::V6,
        }
    }

    pub fn prefix_len(&self) -> u8 {
        match self {
            Network::V4(p) => p.prefix_len(),
            Network::V6(p) => p.prefix_len(),
        }
    }

    pub fn base_address(&self) -> IpAddr {
        match self {
            Network::V4(p) => IpAddr::V4(p.base_address()),
            Network::V6(p) => IpAddr::V6(p.base_address()),
        }
    }

    /// Broadcast address; IPv6 has none.
    pub fn broadcast_address(&self) -> Option<IpAddr> {
        match self {
            Network::V4(p) => Some(IpAddr::V4(p.last_address())),
            Network::V6(_) => None,
        }
    }

    pub fn netmask(&self) -> IpAddr {
        match self {
            Network::V4(p) => IpAddr::V4(p.netmask_address()),
            Network::V6(p) => IpAddr::V6(p.netmask_address()),
        }
    }

    pub fn first_usable_address(&self) -> IpAddr {
        match self {
            Network::V4(p) => IpAddr::V4(p.first_usable()),
            Network::V6(p) => IpAddr::V6(p.first_usable()),
        }
    }

    pub fn last_usable_address(&self) -> IpAddr {
        match self {
            Network::V4(p) => IpAddr::V4(p.last_usable()),
            Network::V6(p) => IpAddr::V6(p.last_usable()),
        }
    }

    pub fn count(&self) -> BigUint {
        match self {
            Network::V4(p) => p.count(),
            Network::V6(p) => p.count(),
        }
    }

    /// Whether `addr` lies in this network. Addresses of the other family
    /// never do.
    pub fn contains_address(&self, addr: IpAddr) -> bool {
        match (self, addr) {
            (Network::V4(p), IpAddr::V4(a)) => p.contains_addr(u32::from(a)),
            (Network::V6(p), IpAddr::V6(a)) => p.contains_addr(u128::from(a)),
            _ => false,
        }
    }

    /// Check each address string for membership.
    ///
    /// Unparsable input and addresses of the other family map to `false`
    /// with a warning instead of failing the whole call.
    pub fn contains<S: AsRef<str>>(&self, addrs: &[S]) -> BTreeMap<String, bool> {
        let mut result = BTreeMap::new();
        for addr in addrs {
            let text = addr.as_ref();
            let member = match text.trim().parse::<IpAddr>() {
                Ok(ip) if family_of(ip) == self.family() => self.contains_address(ip),
                Ok(_) | Err(_) => {
                    log::warn!("Invalid {} address: {}", self.family(), text);
                    false
                }
            };
            result.insert(text.to_string(), member);
        }
        result
    }

    /// Divide into `count` subnets.
    pub fn divide(&self, count: usize, options: &DivideOptions) -> Result<Vec<Network>> {
        Ok(match self {
            Network::V4(p) => divide(*p, count, options)?.into_iter().map(Network::V4).collect(),
            Network::V6(p) => divide(*p, count, options)?.into_iter().map(Network::V6).collect(),
        })
    }

    /// VLSM best-fit allocation. Defined for IPv4 only: the per-subnet
    /// reservation of network and broadcast addresses has no IPv6 meaning.
    pub fn vlsm(&self, host_counts: &[u64]) -> Result<VlsmPlan<u32>> {
        match self {
            Network::V4(p) => allocate(*p, host_counts),
            Network::V6(_) => Err(CidrError::Unsupported {
                operation: "VLSM",
                family: Family::V6,
            }),
        }
    }

    /// Embed an IPv4 address into this IPv6 network.
    pub fn embed(&self, v4: &str) -> Result<Ipv6Addr> {
        let network = match self {
            Network::V6(p) => *p,
            Network::V4(_) => {
                return Err(CidrError::FamilyMismatch {
                    expected: Family::V6,
                    found: Family::V4,
                })
            }
        };

        let v4 = v4.trim();
        let addr = match v4.parse::<IpAddr>() {
            Ok(IpAddr::V4(addr)) => addr,
            Ok(IpAddr::V6(_)) => {
                return Err(CidrError::FamilyMismatch {
                    expected: Family::V4,
                    found: Family::V6,
                })
            }
            Err(e) => return Err(CidrError::parse("IPv4 address", v4, e)),
        };

        embed(network, addr)
    }
}

fn family_of(addr: IpAddr) -> Family {
    match addr {
        IpAddr::V4(_) => Family::V4,
        IpAddr::V6(_) => Family::V6,
    }
}

impl FromStr for Network {
    type Err = CidrError;

    fn from_str(s: &str) -> Result<Self> {
        let s = s.trim();
        match IpNet::from_str(s) {
            Ok(IpNet::V4(net)) => Ok(Network::V4(net.into())),
            Ok(IpNet::V6(net)) => Ok(Network::V6(net.into())),
            Err(e) => Err(CidrError::parse("CIDR", s, e)),
        }
    }
}

impl fmt::Display for Network {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Network::V4(p) => write!(f, "{}", p),
            Network::V6(p) => write!(f, "{}", p),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn net(s: &str) -> Network {
        Network::parse(s).unwrap()
    }

    #[test]
    fn test_parse_detects_family() {
        assert_eq!(net("10.0.0.0/16").family(), Family::V4);
        assert_eq!(net("2001:db8::/32").family(), Family::V6);
        assert_eq!(net(" 10.1.2.3/8 ").to_string(), "10.0.0.0/8");
        assert!(matches!(Network::parse("10.0.0.0"), Err(CidrError::Parse { .. })));
        assert!(matches!(Network::parse("10.0.0.0/40"), Err(CidrError::Parse { .. })));
    }

    #[test]
    fn test_v4_descriptor() {
        let n = net("192.168.1.77/24");
        assert_eq!(n.base_address().to_string(), "192.168.1.0");
        assert_eq!(n.broadcast_address().unwrap().to_string(), "192.168.1.255");
        assert_eq!(n.netmask().to_string(), "255.255.255.0");
        assert_eq!(n.first_usable_address().to_string(), "192.168.1.1");
        assert_eq!(n.last_usable_address().to_string(), "192.168.1.254");
        assert_eq!(n.count(), BigUint::from(256u32));
    }

    #[test]
    fn test_v4_netmask_extremes() {
        assert_eq!(net("0.0.0.0/0").netmask().to_string(), "0.0.0.0");
        assert_eq!(net("10.0.0.1/32").netmask().to_string(), "255.255.255.255");
        assert_eq!(net("10.0.0.0/17").netmask().to_string(), "255.255.128.0");
    }

    #[test]
    fn test_v4_degenerate_usable_range() {
        let n = net("10.0.0.4/31");
        assert_eq!(n.first_usable_address().to_string(), "10.0.0.4");
        assert_eq!(n.last_usable_address().to_string(), "10.0.0.5");

        let n = net("255.255.255.255/32");
        assert_eq!(n.first_usable_address().to_string(), "255.255.255.255");
        assert_eq!(n.last_usable_address().to_string(), "255.255.255.255");
        assert_eq!(n.count(), BigUint::from(1u8));

        let n = net("0.0.0.0/0");
        assert_eq!(n.first_usable_address().to_string(), "0.0.0.1");
        assert_eq!(n.last_usable_address().to_string(), "255.255.255.254");
    }

    #[test]
    fn test_v6_descriptor() {
        let n = net("2001:db8::1/32");
        assert_eq!(n.base_address().to_string(), "2001:db8::");
        assert_eq!(n.broadcast_address(), None);
        assert_eq!(n.netmask().to_string(), "ffff:ffff::");
        assert_eq!(n.first_usable_address().to_string(), "2001:db8::1");
        assert_eq!(
            n.last_usable_address().to_string(),
            "2001:db8:ffff:ffff:ffff:ffff:ffff:fffe"
        );
        assert_eq!(n.count(), BigUint::from(1u8) << 96usize);
    }

    #[test]
    fn test_v6_extremes() {
        let all = net("::/0");
        assert_eq!(all.count().to_string(), "340282366920938463463374607431768211456");
        assert_eq!(all.netmask().to_string(), "::");
        assert_eq!(net("::1/128").netmask().to_string(), "ffff:ffff:ffff:ffff:ffff:ffff:ffff:ffff");
        assert_eq!(net("2001:db8::/127").last_usable_address().to_string(), "2001:db8::1");
        assert_eq!(net("2001:db8::/121").netmask().to_string(), "ffff:ffff:ffff:ffff:ffff:ffff:ffff:ff80");
    }

    #[test]
    fn test_contains_degrades_per_item() {
        let n = net("10.0.0.0/16");
        let result = n.contains(&["10.0.0.1", "10.1.0.1", "2001:db8::1", "bogus"]);
        assert_eq!(result.get("10.0.0.1"), Some(&true));
        assert_eq!(result.get("10.1.0.1"), Some(&false));
        assert_eq!(result.get("2001:db8::1"), Some(&false));
        assert_eq!(result.get("bogus"), Some(&false));

        let n = net("2001:db8::/32");
        let result = n.contains(&["2001:db8:ffff::1".to_string(), "10.0.0.1".to_string()]);
        assert_eq!(result.get("2001:db8:ffff::1"), Some(&true));
        assert_eq!(result.get("10.0.0.1"), Some(&false));
    }

    #[test]
    fn test_divide_wraps_family() {
        let subnets = net("2001:db8::/32").divide(4, &DivideOptions::default()).unwrap();
        assert_eq!(subnets.len(), 4);
        assert_eq!(subnets[3].to_string(), "2001:db8:c000::/34");
        assert!(subnets.iter().all(|s| s.family() == Family::V6));
    }

    #[test]
    fn test_vlsm_is_ipv4_only() {
        assert_eq!(
            net("2001:db8::/32").vlsm(&[10]),
            Err(CidrError::Unsupported { operation: "VLSM", family: Family::V6 })
        );
        assert_eq!(net("10.0.0.0/24").vlsm(&[10]).unwrap().allocated.len(), 1);
    }

    #[test]
    fn test_embed_checks_families() {
        assert_eq!(
            net("2001:db8::/32").embed("192.0.2.33").unwrap().to_string(),
            "2001:db8:c000:221::"
        );
        assert_eq!(
            net("10.0.0.0/8").embed("192.0.2.33"),
            Err(CidrError::FamilyMismatch { expected: Family::V6, found: Family::V4 })
        );
        assert_eq!(
            net("2001:db8::/32").embed("2001:db8::1"),
            Err(CidrError::FamilyMismatch { expected: Family::V4, found: Family::V6 })
        );
        assert!(matches!(net("2001:db8::/32").embed("300.1.1.1"), Err(CidrError::Parse { .. })));
        assert_eq!(
            net("2001:db8::/36").embed("192.0.2.33"),
            Err(CidrError::InvalidEmbeddingPrefix(36))
        );
    }
}
