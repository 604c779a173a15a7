//! Buddy-block split and merge.
//!
//! A block of prefix length `L` splits into two buddies of length `L + 1`.
//! Two blocks merge back into their parent only when they are exactly such a
//! pair: same length, adjacent, and the lower one sits on an even slot.

use super::bits::{AddressBits, Prefix};

/// Split a block into its lower and upper halves.
///
/// A full-width block cannot be split and is returned as both halves.
pub fn split_once<A: AddressBits>(block: Prefix<A>) -> (Prefix<A>, Prefix<A>) {
    let len = block.prefix_len();
    if len >= A::WIDTH {
        return (block, block);
    }

    let lower = Prefix::masked(block.addr(), len + 1);
    let upper = Prefix::masked(block.addr() | A::half_bit(len), len + 1);
    (lower, upper)
}

/// Merge two buddies into their parent block.
///
/// Returns `None` unless `a` and `b` have the same non-zero prefix length,
/// are adjacent, and the lower-addressed one is aligned to the parent size.
pub fn try_merge_pair<A: AddressBits>(a: Prefix<A>, b: Prefix<A>) -> Option<Prefix<A>> {
    let len = a.prefix_len();
    if len != b.prefix_len() || len == 0 {
        return None;
    }

    let (lower, upper) = if a.addr() <= b.addr() { (a, b) } else { (b, a) };
    let buddy_bit = A::half_bit(len - 1);

    if lower.addr() & buddy_bit != A::ZERO {
        return None;
    }
    if upper.addr() != lower.addr() | buddy_bit {
        return None;
    }

    Some(Prefix::masked(lower.addr(), len - 1))
}

/// Merge a set of non-overlapping blocks into the fewest blocks covering the
/// same addresses.
///
/// Blocks are sorted by address then prefix length and merged pairwise from
/// the tail of the output, so one merge can cascade into the previous element.
/// Passes repeat until the block count stops shrinking.
pub fn coalesce<A: AddressBits>(mut blocks: Vec<Prefix<A>>) -> Vec<Prefix<A>> {
    loop {
        blocks.sort();
        let before = blocks.len();

        let mut out: Vec<Prefix<A>> = Vec::with_capacity(before);
        for block in blocks {
            out.push(block);
            while out.len() >= 2 {
                let n = out.len();
                match try_merge_pair(out[n - 2], out[n - 1]) {
                    Some(parent) => {
                        out.truncate(n - 2);
                        out.push(parent);
                    }
                    None => break,
                }
            }
        }

        if out.len() == before {
            return out;
        }
        log::debug!("Coalesced {} blocks into {}", before, out.len());
        blocks = out;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn v4(s: &str) -> Prefix<u32> {
        s.parse().unwrap()
    }

    fn v6(s: &str) -> Prefix<u128> {
        s.parse().unwrap()
    }

    #[test]
    fn test_split_once_v4() {
        let (lo, hi) = split_once(v4("10.0.0.0/16"));
        assert_eq!(lo, v4("10.0.0.0/17"));
        assert_eq!(hi, v4("10.0.128.0/17"));
    }

    #[test]
    fn test_split_once_v6_and_full_space() {
        let (lo, hi) = split_once(Prefix::<u128>::full_space());
        assert_eq!(lo, v6("::/1"));
        assert_eq!(hi, v6("8000::/1"));

        let (lo, hi) = split_once(v6("2001:db8::/127"));
        assert_eq!(lo, v6("2001:db8::/128"));
        assert_eq!(hi, v6("2001:db8::1/128"));
    }

    #[test]
    fn test_split_once_maximal_is_noop() {
        let host = v4("10.0.0.1/32");
        assert_eq!(split_once(host), (host, host));
    }

    #[test]
    fn test_try_merge_pair() {
        assert_eq!(
            try_merge_pair(v4("10.0.1.0/24"), v4("10.0.0.0/24")),
            Some(v4("10.0.0.0/23"))
        );
        // Adjacent but straddling a /23 boundary.
        assert_eq!(try_merge_pair(v4("10.0.1.0/24"), v4("10.0.2.0/24")), None);
        // Different lengths.
        assert_eq!(try_merge_pair(v4("10.0.0.0/24"), v4("10.0.1.0/25")), None);
        // Not adjacent.
        assert_eq!(try_merge_pair(v4("10.0.0.0/24"), v4("10.0.3.0/24")), None);
        // Nothing above /0.
        let all = Prefix::<u32>::full_space();
        assert_eq!(try_merge_pair(all, all), None);
    }

    #[test]
    fn test_try_merge_pair_top_of_space() {
        assert_eq!(
            try_merge_pair(v6("::/1"), v6("8000::/1")),
            Some(Prefix::<u128>::full_space())
        );
        assert_eq!(
            try_merge_pair(v4("255.255.255.254/32"), v4("255.255.255.255/32")),
            Some(v4("255.255.255.254/31"))
        );
    }

    #[test]
    fn test_coalesce_cascades() {
        let blocks = vec![
            v4("10.0.3.0/24"),
            v4("10.0.0.0/24"),
            v4("10.0.2.0/24"),
            v4("10.0.1.128/25"),
            v4("10.0.1.0/25"),
        ];
        assert_eq!(coalesce(blocks), vec![v4("10.0.0.0/22")]);
    }

    #[test]
    fn test_coalesce_keeps_unmergeable() {
        let blocks = vec![v4("10.0.1.0/24"), v4("10.0.2.0/24"), v4("10.0.4.0/23")];
        assert_eq!(
            coalesce(blocks),
            vec![v4("10.0.1.0/24"), v4("10.0.2.0/24"), v4("10.0.4.0/23")]
        );
        assert!(coalesce(Vec::<Prefix<u32>>::new()).is_empty());
    }

    #[test]
    fn test_coalesce_undoes_split() {
        for block in [v4("0.0.0.0/0"), v4("192.168.0.0/16"), v4("10.0.0.0/31")] {
            let (lo, hi) = split_once(block);
            assert_eq!(coalesce(vec![hi, lo]), vec![block]);
        }
        let block = v6("2001:db8::/32");
        let (lo, hi) = split_once(block);
        assert_eq!(coalesce(vec![lo, hi]), vec![block]);
    }
}
