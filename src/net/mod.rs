//! Subnet address-space engine.
//!
//! This module holds the address arithmetic shared by both families, the
//! network descriptor, and the partitioning algorithms built on top of it:
//! buddy split/merge, equal division, greedy bisection, VLSM best-fit
//! allocation and RFC 6052 embedding.

use std::fmt;

pub mod bits;
pub mod buddy;
pub mod descriptor;
pub mod divide;
pub mod embed;
pub mod vlsm;

// Re-export commonly used types
pub use bits::{AddressBits, Prefix};
pub use buddy::{coalesce, split_once, try_merge_pair};
pub use descriptor::Network;
pub use divide::{divide, divide_bisect, divide_equal};
pub use embed::{embed, extract, EMBEDDING_PREFIXES};
pub use vlsm::{allocate, Allocation, VlsmPlan};

/// Address family of a network or address
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Family {
    V4,
    V6,
}

impl fmt::Display for Family {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Family::V4 => write!(f, "IPv4"),
            Family::V6 => write!(f, "IPv6"),
        }
    }
}
