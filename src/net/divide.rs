//! Division of a network into a fixed number of subnets.
//!
//! Two strategies exist. Equal division borrows enough host bits to fit the
//! requested count and emits that many same-size subnets from the start of
//! the network. Bisection keeps halving the largest remaining block until
//! the count is reached, so the result covers the whole network with
//! subnets whose sizes differ by at most a factor of two.

use std::cmp::Reverse;
use std::collections::BinaryHeap;

use super::bits::{ceil_log2, AddressBits, Prefix};
use super::buddy::split_once;
use crate::config::{DivideMode, DivideOptions};
use crate::error::{CidrError, Result};

/// Divide `network` into `count` subnets using the strategy in `options`.
pub fn divide<A: AddressBits>(
    network: Prefix<A>,
    count: usize,
    options: &DivideOptions,
) -> Result<Vec<Prefix<A>>> {
    match options.mode {
        DivideMode::Equal => divide_equal(network, count),
        DivideMode::Bisect => divide_bisect(network, count),
    }
}

/// Split `network` into `count` contiguous subnets of equal size.
///
/// The subnet length is the network length plus `ceil(log2(count))`. When
/// `count` is not a power of two the trailing subnets that would complete
/// the power are not emitted.
pub fn divide_equal<A: AddressBits>(network: Prefix<A>, count: usize) -> Result<Vec<Prefix<A>>> {
    if count == 0 {
        return Err(CidrError::InvalidSubnetCount);
    }

    let borrow = ceil_log2(count as u128);
    let new_len = u32::from(network.prefix_len()) + borrow;
    if new_len > u32::from(A::WIDTH) {
        return Err(CidrError::PrefixOverflow { width: A::WIDTH });
    }
    let new_len = new_len as u8;

    // Step between subnets is host_mask + 1; kept split so a /0 result never
    // needs the unrepresentable 2^WIDTH.
    let step = A::host_mask(new_len);
    let mut out = Vec::new();
    reserve(&mut out, count)?;
    let mut next = Some(network.addr());

    for index in 0..count {
        let addr = next.ok_or_else(|| {
            CidrError::InsufficientSpace(format!("subnet {} of {}", index + 1, count))
        })?;
        out.push(Prefix::masked(addr, new_len));
        next = addr.checked_add(step).and_then(|a| a.checked_add(A::ONE));
    }

    Ok(out)
}

/// Repeatedly halve the largest block until there are `count` blocks.
///
/// The working list starts with the whole network. Each round picks the
/// block with the shortest prefix (earliest on ties), replaces it with its
/// lower half and appends its upper half. The result is sorted by address.
pub fn divide_bisect<A: AddressBits>(network: Prefix<A>, count: usize) -> Result<Vec<Prefix<A>>> {
    if count == 0 {
        return Err(CidrError::InvalidSubnetCount);
    }

    let host_bits = u32::from(network.host_bits());
    if host_bits < usize::BITS && count > (1usize << host_bits) {
        return Err(CidrError::InsufficientSpace(format!("{} subnets", count)));
    }

    let mut blocks = Vec::new();
    reserve(&mut blocks, count)?;
    blocks.push(network);

    // A block keeps its index for life: the lower half overwrites it and the
    // upper half is appended, so (prefix_len, index) orders the heap the same
    // way as a scan for the shortest prefix, earliest first.
    let mut queue = BinaryHeap::new();
    queue.push(Reverse((network.prefix_len(), 0usize)));

    while blocks.len() < count {
        let Reverse((_, index)) = queue
            .pop()
            .ok_or_else(|| CidrError::InsufficientSpace(format!("{} subnets", count)))?;
        let block = blocks[index];

        if block.prefix_len() == A::WIDTH {
            return Err(CidrError::PrefixOverflow { width: A::WIDTH });
        }

        let (lower, upper) = split_once(block);
        log::trace!("Bisecting {} into {} and {}", block, lower, upper);
        blocks[index] = lower;
        blocks.push(upper);
        queue.push(Reverse((lower.prefix_len(), index)));
        queue.push(Reverse((upper.prefix_len(), blocks.len() - 1)));
    }

    blocks.sort();
    Ok(blocks)
}

/// Reserve room for `count` subnets, failing cleanly when it cannot be held.
fn reserve<A: AddressBits>(out: &mut Vec<Prefix<A>>, count: usize) -> Result<()> {
    out.try_reserve_exact(count)
        .map_err(|_| CidrError::InsufficientSpace(format!("{} subnets do not fit in memory", count)))
}
