//! Bit arithmetic primitives.
//!
//! IPv4 and IPv6 differ only in the width of the integer that holds an
//! address, so every algorithm in this crate is written once against the
//! [`AddressBits`] trait and instantiated for `u32` and `u128`.

use std::fmt;
use std::hash::Hash;
use std::net::{Ipv4Addr, Ipv6Addr};
use std::ops::{BitAnd, BitOr, Not};
use std::str::FromStr;

use ipnet::{Ipv4Net, Ipv6Net};
use num_bigint::BigUint;

use super::Family;
use crate::error::{CidrError, Result};

/// A fixed-width unsigned integer that stores one address of a family.
pub trait AddressBits:
    Copy
    + Ord
    + Hash
    + fmt::Debug
    + BitAnd<Output = Self>
    + BitOr<Output = Self>
    + Not<Output = Self>
{
    /// Number of bits in an address.
    const WIDTH: u8;
    const FAMILY: Family;
    const ZERO: Self;
    const ONE: Self;

    /// The standard library address type for this family.
    type Addr: Copy + fmt::Display + fmt::Debug;

    fn from_addr(addr: Self::Addr) -> Self;
    fn to_addr(self) -> Self::Addr;
    fn checked_add(self, rhs: Self) -> Option<Self>;
    fn checked_sub(self, rhs: Self) -> Option<Self>;

    /// The host part of a `len`-bit prefix with every bit set, i.e.
    /// `2^(WIDTH - len) - 1`. Zero for a full-width prefix.
    fn host_mask(len: u8) -> Self;

    /// Top `len` bits set.
    fn netmask(len: u8) -> Self {
        !Self::host_mask(len)
    }

    /// The single bit that separates the two halves of a `len`-bit prefix.
    /// Zero when `len == WIDTH`.
    fn half_bit(len: u8) -> Self {
        if len >= Self::WIDTH {
            return Self::ZERO;
        }
        Self::host_mask(len) & !Self::host_mask(len + 1)
    }
}

macro_rules! impl_address_bits {
    ($int:ty, $addr:ty, $family:expr) => {
        impl AddressBits for $int {
            const WIDTH: u8 = <$int>::BITS as u8;
            const FAMILY: Family = $family;
            const ZERO: Self = 0;
            const ONE: Self = 1;

            type Addr = $addr;

            fn from_addr(addr: $addr) -> Self {
                <$int>::from(addr)
            }

            fn to_addr(self) -> $addr {
                <$addr>::from(self)
            }

            fn checked_add(self, rhs: Self) -> Option<Self> {
                <$int>::checked_add(self, rhs)
            }

            fn checked_sub(self, rhs: Self) -> Option<Self> {
                <$int>::checked_sub(self, rhs)
            }

            fn host_mask(len: u8) -> Self {
                debug_assert!(len <= Self::WIDTH);
                <$int>::MAX.checked_shr(u32::from(len)).unwrap_or(0)
            }
        }
    };
}

impl_address_bits!(u32, Ipv4Addr, Family::V4);
impl_address_bits!(u128, Ipv6Addr, Family::V6);

/// `ceil(log2(n))`, with 0 for `n <= 1`.
pub fn ceil_log2(n: u128) -> u32 {
    if n <= 1 {
        return 0;
    }
    u128::BITS - (n - 1).leading_zeros()
}

/// A CIDR block: a masked base address and a prefix length.
///
/// The base address never carries host bits, so two prefixes covering the
/// same range always compare equal. Ordering is by address, then by prefix
/// length (shorter first).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Prefix<A: AddressBits> {
    addr: A,
    len: u8,
}

impl<A: AddressBits> Prefix<A> {
    /// Build a prefix, zeroing any host bits in `addr`.
    pub fn new(addr: A, len: u8) -> Result<Self> {
        if len > A::WIDTH {
            return Err(CidrError::PrefixOverflow { width: A::WIDTH });
        }
        Ok(Self::masked(addr, len))
    }

    /// Build a prefix from a length already known to be in range.
    pub(crate) fn masked(addr: A, len: u8) -> Self {
        debug_assert!(len <= A::WIDTH);
        Prefix {
            addr: addr & A::netmask(len),
            len,
        }
    }

    /// The whole address space of the family.
    pub fn full_space() -> Self {
        Prefix { addr: A::ZERO, len: 0 }
    }

    pub fn addr(&self) -> A {
        self.addr
    }

    pub fn prefix_len(&self) -> u8 {
        self.len
    }

    pub fn host_bits(&self) -> u8 {
        A::WIDTH - self.len
    }

    /// Highest address inside the block.
    pub fn last(&self) -> A {
        self.addr | A::host_mask(self.len)
    }

    pub fn contains_addr(&self, addr: A) -> bool {
        addr & A::netmask(self.len) == self.addr
    }

    /// True if `other` lies entirely inside this block.
    pub fn contains(&self, other: &Prefix<A>) -> bool {
        other.len >= self.len && self.contains_addr(other.addr)
    }

    pub fn overlaps(&self, other: &Prefix<A>) -> bool {
        self.contains(other) || other.contains(self)
    }

    /// Number of addresses in the block, `2^host_bits`.
    pub fn size(&self) -> BigUint {
        BigUint::from(1u8) << usize::from(self.host_bits())
    }
}

impl<A: AddressBits> fmt::Display for Prefix<A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.addr.to_addr(), self.len)
    }
}

impl From<Ipv4Net> for Prefix<u32> {
    fn from(net: Ipv4Net) -> Self {
        Prefix::masked(u32::from(net.addr()), net.prefix_len())
    }
}

impl From<Ipv6Net> for Prefix<u128> {
    fn from(net: Ipv6Net) -> Self {
        Prefix::masked(u128::from(net.addr()), net.prefix_len())
    }
}

impl FromStr for Prefix<u32> {
    type Err = CidrError;

    fn from_str(s: &str) -> Result<Self> {
        let s = s.trim();
        Ipv4Net::from_str(s)
            .map(Prefix::from)
            .map_err(|e| CidrError::parse("IPv4 CIDR", s, e))
    }
}

impl FromStr for Prefix<u128> {
    type Err = CidrError;

    fn from_str(s: &str) -> Result<Self> {
        let s = s.trim();
        Ipv6Net::from_str(s)
            .map(Prefix::from)
            .map_err(|e| CidrError::parse("IPv6 CIDR", s, e))
    }
}
