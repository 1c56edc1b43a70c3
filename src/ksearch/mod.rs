//! Key search primitives shared by both indexes.
//!
//! Provides binary search for:
//! - Exact match inside a closed position window (RMI correction step, tree leaves)
//! - Upper bound over split keys (routing through internal nodes)
//!
//! All functions operate on sorted `u64` slices. With duplicate keys an exact
//! match may land on any of the equal entries.

use std::cmp::Ordering;

// ============================================================================
//  Generic Binary Search
// ============================================================================

/// Binary search with a custom comparator over logical positions `0..size`.
///
/// The comparator receives a position and returns the ordering of the search
/// key relative to the key stored there:
/// - `Ordering::Less` if `search_key < key_at(pos)`
/// - `Ordering::Equal` if `search_key == key_at(pos)`
/// - `Ordering::Greater` if `search_key > key_at(pos)`
///
/// # Errors
///
/// `Err(insertion_point)` if no position compares equal; `Ok(pos)` otherwise.
#[inline]
pub fn search_by<F>(size: usize, compare: F) -> Result<usize, usize>
where
    F: Fn(usize) -> Ordering,
{
    let mut l: usize = 0;
    let mut r: usize = size;

    while l < r {
        let m: usize = l + ((r - l) >> 1);

        match compare(m) {
            Ordering::Less => {
                r = m;
            }

            Ordering::Equal => {
                return Ok(m);
            }

            Ordering::Greater => {
                l = m + 1;
            }
        }
    }

    Err(l)
}

/// Index of the first key strictly greater than `search_key`, or `keys.len()`.
///
/// Used for internal-node routing: with split keys `[K0, K1, ...]` where `Ki`
/// is the minimum of child `i + 1`, the returned index is the child to follow.
///
/// ```text
///    C0: keys < K0
///    C1: keys >= K0 and < K1
///    Cn: keys >= K(n-1)
/// ```
#[must_use]
#[inline]
pub fn upper_bound(keys: &[u64], search_key: u64) -> usize {
    keys.partition_point(|&k| k <= search_key)
}

/// Index of the first key not less than `search_key`, or `keys.len()`.
#[must_use]
#[inline]
pub fn lower_bound(keys: &[u64], search_key: u64) -> usize {
    keys.partition_point(|&k| k < search_key)
}

/// Exact-match search over a whole sorted slice.
#[must_use]
#[inline]
pub fn find_exact(keys: &[u64], search_key: u64) -> Option<usize> {
    search_by(keys.len(), |i| search_key.cmp(&keys[i])).ok()
}

/// Exact-match search restricted to the closed window `[lo, hi]`.
///
/// Returns the absolute position of a match. An inverted window (`lo > hi`) or
/// one that starts past the end of `keys` finds nothing; `hi` is clipped to the
/// last element.
#[must_use]
#[inline]
pub fn find_in_window(keys: &[u64], search_key: u64, lo: usize, hi: usize) -> Option<usize> {
    if lo > hi || lo >= keys.len() {
        return None;
    }
    let hi = hi.min(keys.len() - 1);
    let window = &keys[lo..=hi];
    find_exact(window, search_key).map(|i| lo + i)
}
