//! VLSM best-fit allocation.
//!
//! Host demands are served largest first. Each demand takes the smallest free
//! block that is still big enough, which is then halved down to the exact
//! size needed; every upper half produced along the way goes back on the
//! free list. Leftover space is coalesced once all demands are placed.

use std::collections::VecDeque;

use super::bits::{ceil_log2, AddressBits, Prefix};
use super::buddy::{coalesce, split_once};
use crate::error::{CidrError, Result};

/// Addresses reserved in every allocated subnet (network and broadcast).
pub const RESERVED_ADDRESSES: u64 = 2;

/// One placed host demand.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Allocation<A: AddressBits> {
    /// Position of the demand in the caller's input.
    pub request: usize,
    /// Hosts that were asked for.
    pub hosts: u64,
    pub block: Prefix<A>,
}

/// Result of a VLSM run: the placed blocks and the unused remainder, both
/// sorted by address.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VlsmPlan<A: AddressBits> {
    pub allocated: Vec<Allocation<A>>,
    pub leftover: Vec<Prefix<A>>,
}

/// Prefix length of the smallest block holding `hosts` usable addresses.
fn prefix_for_hosts<A: AddressBits>(hosts: u64) -> Result<u8> {
    let required = u128::from(hosts) + u128::from(RESERVED_ADDRESSES);
    let needed_bits = ceil_log2(required);
    if needed_bits > u32::from(A::WIDTH) {
        return Err(CidrError::InsufficientSpace(format!("{} hosts", hosts)));
    }
    Ok(A::WIDTH - needed_bits as u8)
}

/// Free blocks bucketed by prefix length.
///
/// Each bucket is first in, first out, so among equal-size blocks the one
/// freed earliest is handed out first.
struct FreeList<A: AddressBits> {
    buckets: Vec<VecDeque<Prefix<A>>>,
}

impl<A: AddressBits> FreeList<A> {
    fn new(network: Prefix<A>) -> Self {
        let mut buckets = vec![VecDeque::new(); usize::from(A::WIDTH) + 1];
        buckets[usize::from(network.prefix_len())].push_back(network);
        Self { buckets }
    }

    fn push(&mut self, block: Prefix<A>) {
        self.buckets[usize::from(block.prefix_len())].push_back(block);
    }

    /// Take the smallest free block that can hold a `want_len` prefix.
    fn take_best(&mut self, want_len: u8) -> Option<Prefix<A>> {
        self.buckets[..=usize::from(want_len)]
            .iter_mut()
            .rev()
            .find_map(|bucket| bucket.pop_front())
    }

    fn into_blocks(self) -> Vec<Prefix<A>> {
        self.buckets.into_iter().flatten().collect()
    }
}

/// Allocate one subnet per entry of `host_counts` from `network`.
///
/// Every count must be positive. Each subnet is sized to the next power of
/// two that fits the hosts plus [`RESERVED_ADDRESSES`].
pub fn allocate<A: AddressBits>(network: Prefix<A>, host_counts: &[u64]) -> Result<VlsmPlan<A>> {
    if let Some(&zero) = host_counts.iter().find(|&&hosts| hosts == 0) {
        return Err(CidrError::InvalidHostCount(zero));
    }

    // Largest demand first; the stable sort keeps input order among equals.
    let mut order: Vec<usize> = (0..host_counts.len()).collect();
    order.sort_by(|&a, &b| host_counts[b].cmp(&host_counts[a]));

    let mut free = FreeList::new(network);
    let mut allocated = Vec::with_capacity(host_counts.len());

    for request in order {
        let hosts = host_counts[request];
        let want_len = prefix_for_hosts::<A>(hosts)?;

        let mut block = free
            .take_best(want_len)
            .ok_or_else(|| CidrError::InsufficientSpace(format!("{} hosts", hosts)))?;

        while block.prefix_len() < want_len {
            let (lower, upper) = split_once(block);
            free.push(upper);
            block = lower;
        }

        log::debug!("Allocated {} for {} hosts (request #{})", block, hosts, request);
        allocated.push(Allocation { request, hosts, block });
    }

    let mut leftover = coalesce(free.into_blocks());
    leftover.sort();
    allocated.sort_by_key(|allocation| allocation.block);

    Ok(VlsmPlan { allocated, leftover })
}
