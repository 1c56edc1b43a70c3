//! Seeded query generation.
//!
//! Queries are drawn with `StdRng`, so a given seed reproduces the same
//! stream across runs and across the indexes being compared.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Samples `count` keys uniformly (with replacement) from `keys`.
///
/// Returns an empty vector if `keys` is empty.
#[must_use]
pub fn sample_existing(keys: &[u64], count: usize, seed: u64) -> Vec<u64> {
    if keys.is_empty() {
        return Vec::new();
    }
    let mut rng = StdRng::seed_from_u64(seed);
    (0..count)
        .map(|_| keys[rng.random_range(0..keys.len())])
        .collect()
}

/// Returns `count` probes of the form `key + 1` for randomly chosen keys.
///
/// Most probes are absent from `keys`; those that happen to hit the next key
/// are still valid lookups. `u64::MAX` wraps to 0.
#[must_use]
pub fn absent_probes(keys: &[u64], count: usize, seed: u64) -> Vec<u64> {
    sample_existing(keys, count, seed)
        .into_iter()
        .map(|key| key.wrapping_add(1))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_samples_come_from_keys() {
        let keys: Vec<u64> = (0..100).map(|i| i * 11).collect();
        let queries = sample_existing(&keys, 1000, 42);
        assert_eq!(queries.len(), 1000);
        assert!(queries.iter().all(|q| keys.binary_search(q).is_ok()));
    }

    #[test]
    fn test_same_seed_same_stream() {
        let keys: Vec<u64> = (0..1000).collect();
        assert_eq!(sample_existing(&keys, 50, 7), sample_existing(&keys, 50, 7));
        assert_ne!(sample_existing(&keys, 50, 7), sample_existing(&keys, 50, 8));
    }

    #[test]
    fn test_empty_keys() {
        assert!(sample_existing(&[], 10, 1).is_empty());
        assert!(absent_probes(&[], 10, 1).is_empty());
    }

    #[test]
    fn test_absent_probes_shift_by_one() {
        let keys: Vec<u64> = (0..100).map(|i| i * 2).collect();
        let probes = absent_probes(&keys, 200, 3);
        assert!(probes.iter().all(|p| p % 2 == 1));
        assert_eq!(absent_probes(&[u64::MAX], 1, 0), vec![0]);
    }
}
