//! `Rmi` - a two-level recursive model index over a sorted `u64` array.
//!
//! # Structure
//!
//! ```text
//!                 root (fit over all keys)
//!                /    |    ...    |     \
//!           leaf 0  leaf 1  ...  leaf L-2  leaf L-1
//! ```
//!
//! The root predicts a position for a key; `floor(pos · L / n)` picks the
//! leaf. Each leaf is fitted only on the keys the root sends it and records:
//! - its segment: `[min, max + 1)` of the true positions it saw
//! - its error bound: the largest `|clamp(predicted) − true|` over those keys
//!
//! # Lookup
//!
//! A query is routed with exactly the arithmetic used in training, so a key
//! present in the array always reaches the leaf that was trained on it. The
//! leaf's prediction `p` gives the window
//!
//! ```text
//! [max(start, p − err), min(end − 1, p + err)]      (err > 0)
//! [start, end − 1]                                  (err = 0)
//! ```
//!
//! which provably contains the key's true position; a binary search finishes.
//!
//! # Empty Leaves
//!
//! A leaf that received no keys is [`LinearModel::EMPTY`]. Only absent keys
//! can be routed there, and such queries return `None` without probing.
//!
//! # Untrained State
//!
//! Before a successful [`Rmi::train`], or when `search` is handed a key array
//! whose length differs from the trained one, every search returns `None`.

use std::ops::RangeInclusive;

use crate::config::{DEFAULT_NUM_LEAVES, check_num_leaves};
use crate::error::{IndexError, Result, validate_sorted};
use crate::index::PointIndex;
use crate::ksearch::find_in_window;
use crate::model::LinearModel;
use crate::regression::RegressionAccumulator;

// ============================================================================
//  RmiStats
// ============================================================================

/// Summary of a trained RMI's leaves.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct RmiStats {
    /// Leaves that received no training keys.
    pub empty_leaves: usize,
    /// Largest error bound over all leaves.
    pub max_error: usize,
    /// Mean error bound over non-empty leaves.
    pub mean_error: f64,
}

// ============================================================================
//  LeafBuilder
// ============================================================================

/// Per-leaf training state for the fitting pass.
#[derive(Debug, Clone, Copy)]
struct LeafBuilder {
    acc: RegressionAccumulator,
    min_pos: usize,
    max_pos: usize,
}

impl LeafBuilder {
    const fn new() -> Self {
        Self {
            acc: RegressionAccumulator::new(),
            min_pos: usize::MAX,
            max_pos: 0,
        }
    }

    #[inline]
    #[expect(clippy::cast_precision_loss, reason = "positions are regression targets")]
    fn push(&mut self, key: u64, pos: usize) {
        self.acc.push(key, pos as f64);
        self.min_pos = self.min_pos.min(pos);
        self.max_pos = self.max_pos.max(pos);
    }

    fn build(&self) -> LinearModel {
        if self.acc.count() == 0 {
            return LinearModel::EMPTY;
        }
        LinearModel::from_fit(self.acc.finish(), self.min_pos, self.max_pos + 1, 0)
    }
}

// ============================================================================
//  Rmi
// ============================================================================

/// Two-level learned index: one root model routing to `num_leaves` leaf models.
///
/// The index borrows nothing between calls; the caller passes the same sorted
/// key array to [`train`](Self::train) and to every [`search`](Self::search).
#[derive(Debug, Clone)]
pub struct Rmi {
    num_leaves: usize,
    root: LinearModel,
    leaves: Vec<LinearModel>,
    /// Length of the key array used for training; 0 while untrained.
    trained_len: usize,
}

impl Default for Rmi {
    fn default() -> Self {
        Self::untrained(DEFAULT_NUM_LEAVES)
    }
}

impl Rmi {
    /// Creates an untrained index with `num_leaves` leaf models.
    ///
    /// # Errors
    ///
    /// Returns [`IndexError::InvalidConfig`] if `num_leaves` is zero.
    pub fn new(num_leaves: usize) -> Result<Self> {
        check_num_leaves(num_leaves)?;
        Ok(Self::untrained(num_leaves))
    }

    fn untrained(num_leaves: usize) -> Self {
        Self {
            num_leaves,
            root: LinearModel::EMPTY,
            leaves: vec![LinearModel::EMPTY; num_leaves],
            trained_len: 0,
        }
    }

    /// Number of leaf models.
    #[must_use]
    #[inline]
    pub const fn num_leaves(&self) -> usize {
        self.num_leaves
    }

    /// Length of the key array the index was trained on (0 if untrained).
    #[must_use]
    #[inline]
    pub const fn trained_len(&self) -> usize {
        self.trained_len
    }

    /// True once a `train` call has succeeded.
    #[must_use]
    #[inline]
    pub const fn is_trained(&self) -> bool {
        self.trained_len != 0
    }

    /// The routing model.
    #[must_use]
    #[inline]
    pub const fn root(&self) -> &LinearModel {
        &self.root
    }

    /// The leaf models, in routing order.
    #[must_use]
    #[inline]
    pub fn leaves(&self) -> &[LinearModel] {
        &self.leaves
    }

    /// `(1 + num_leaves) × size_of::<LinearModel>()`.
    #[must_use]
    pub const fn memory_usage_bytes(&self) -> usize {
        (1 + self.num_leaves) * size_of::<LinearModel>()
    }

    // =========================================================================
    // Training
    // =========================================================================

    /// Trains the root and all leaves on `keys`, replacing any previous state.
    ///
    /// Runs three linear passes (root fit, leaf fits, leaf error bounds) and
    /// allocates only the leaf models.
    ///
    /// # Errors
    ///
    /// Returns [`IndexError::EmptyKeys`] if `keys` is empty; the index is left
    /// untrained.
    #[cfg_attr(
        feature = "tracing",
        tracing::instrument(level = "debug", skip_all, fields(n = keys.len(), leaves = self.num_leaves))
    )]
    #[expect(clippy::cast_precision_loss, reason = "positions are regression targets")]
    pub fn train(&mut self, keys: &[u64]) -> Result<()> {
        let n = keys.len();
        if n == 0 {
            *self = Self::untrained(self.num_leaves);
            return Err(IndexError::EmptyKeys);
        }

        // 1) Root: every key against its index.
        let mut root_acc = RegressionAccumulator::new();
        for (i, &key) in keys.iter().enumerate() {
            root_acc.push(key, i as f64);
        }
        let root = LinearModel::from_fit(root_acc.finish(), 0, n, 0);
        #[cfg(feature = "tracing")]
        tracing::debug!(a = root.a, b = root.b, origin = root.origin, "Rmi: root fitted");

        // 2) Route each key and fit its leaf.
        let mut builders = vec![LeafBuilder::new(); self.num_leaves];
        for (i, &key) in keys.iter().enumerate() {
            let leaf = route(&root, key, n, self.num_leaves);
            builders[leaf].push(key, i);
        }
        let mut leaves: Vec<LinearModel> = builders.iter().map(LeafBuilder::build).collect();

        // 3) Error bound of each leaf over its own members.
        for (i, &key) in keys.iter().enumerate() {
            let leaf = &mut leaves[route(&root, key, n, self.num_leaves)];
            let err = leaf.predict_clamped(key, n).abs_diff(i);
            leaf.max_error = leaf.max_error.max(err);
        }

        #[cfg(feature = "tracing")]
        for (leaf_id, leaf) in leaves.iter().enumerate() {
            tracing::trace!(
                leaf_id,
                start = leaf.segment_start,
                end = leaf.segment_end,
                max_error = leaf.max_error,
                "Rmi: leaf trained"
            );
        }

        self.root = root;
        self.leaves = leaves;
        self.trained_len = n;

        #[cfg(feature = "tracing")]
        {
            let stats = self.stats();
            tracing::info!(
                n,
                leaves = self.num_leaves,
                empty_leaves = stats.empty_leaves,
                max_error = stats.max_error,
                mean_error = stats.mean_error,
                "Rmi: trained"
            );
        }
        Ok(())
    }

    /// [`train`](Self::train) after checking that `keys` is sorted.
    ///
    /// # Errors
    ///
    /// Returns [`IndexError::UnsortedKeys`] or any error from `train`.
    pub fn train_checked(&mut self, keys: &[u64]) -> Result<()> {
        validate_sorted(keys)?;
        self.train(keys)
    }

    // =========================================================================
    // Lookup
    // =========================================================================

    /// Leaf a key is routed to (valid even when untrained).
    #[must_use]
    #[inline(always)]
    pub fn leaf_index(&self, key: u64) -> usize {
        if self.trained_len == 0 {
            return 0;
        }
        route(&self.root, key, self.trained_len, self.num_leaves)
    }

    /// Closed position window searched for `key`, or `None` if the key is
    /// routed to an empty leaf or the index is untrained.
    #[must_use]
    #[inline(always)]
    pub fn search_window(&self, key: u64) -> Option<RangeInclusive<usize>> {
        let n = self.trained_len;
        if n == 0 {
            return None;
        }

        let leaf = &self.leaves[self.leaf_index(key)];
        if leaf.is_empty() {
            return None;
        }

        let mut lo = leaf.segment_start;
        let mut hi = leaf.segment_end - 1;
        if leaf.max_error > 0 {
            let p = leaf.predict_clamped(key, n);
            lo = lo.max(p.saturating_sub(leaf.max_error));
            hi = hi.min(p.saturating_add(leaf.max_error).min(n - 1));
        }
        Some(lo..=hi)
    }

    /// Finds a position `p` with `keys[p] == key`.
    ///
    /// `keys` must be the array passed to [`train`](Self::train).
    #[must_use]
    #[inline]
    pub fn search(&self, keys: &[u64], key: u64) -> Option<usize> {
        if keys.len() != self.trained_len {
            return None;
        }
        let window = self.search_window(key)?;
        find_in_window(keys, key, *window.start(), *window.end())
    }

    // =========================================================================
    // Introspection
    // =========================================================================

    /// Error-bound summary over the leaves.
    #[must_use]
    #[expect(clippy::cast_precision_loss, reason = "averages are advisory")]
    pub fn stats(&self) -> RmiStats {
        let mut stats = RmiStats::default();
        let mut total_error = 0usize;
        for leaf in &self.leaves {
            if leaf.is_empty() {
                stats.empty_leaves += 1;
                continue;
            }
            stats.max_error = stats.max_error.max(leaf.max_error);
            total_error += leaf.max_error;
        }

        let populated = self.leaves.len() - stats.empty_leaves;
        if populated > 0 {
            stats.mean_error = total_error as f64 / populated as f64;
        }
        stats
    }
}

/// Leaf for `key` under `root`, shared by training and lookup.
#[inline(always)]
fn route(root: &LinearModel, key: u64, n: usize, num_leaves: usize) -> usize {
    let pos = root.predict_clamped(key, n);
    leaf_for_position(pos, n, num_leaves)
}

/// `floor(pos · num_leaves / n)`, clamped to the last leaf.
#[inline(always)]
fn leaf_for_position(pos: usize, n: usize, num_leaves: usize) -> usize {
    let last = num_leaves - 1;
    let leaf = (pos as u128 * num_leaves as u128) / n as u128;
    usize::try_from(leaf).map_or(last, |leaf| leaf.min(last))
}

impl PointIndex for Rmi {
    fn name(&self) -> &'static str {
        "RMI"
    }

    #[inline]
    fn lookup(&self, keys: &[u64], key: u64) -> Option<usize> {
        self.search(keys, key)
    }

    fn memory_usage_bytes(&self) -> usize {
        Self::memory_usage_bytes(self)
    }
}
