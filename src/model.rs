//! `LinearModel` - one piecewise-linear position predictor.

use crate::regression::{LinearFit, clamp_position};

/// A linear predictor responsible for a half-open range of array positions.
///
/// The prediction is `a · (key − origin) + b`. Anchoring at `origin` keeps the
/// arithmetic exact for keys near `u64::MAX`; with `origin == 0` this is the
/// plain `a · key + b` form.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LinearModel {
    /// Slope in positions per key unit.
    pub a: f64,
    /// Predicted position at `origin`.
    pub b: f64,
    /// Key the line is anchored at.
    pub origin: u64,
    /// First position this model covers.
    pub segment_start: usize,
    /// One past the last position this model covers.
    pub segment_end: usize,
    /// Largest `|clamp(predicted) − true|` seen during training.
    pub max_error: usize,
}

impl Default for LinearModel {
    fn default() -> Self {
        Self::EMPTY
    }
}

impl LinearModel {
    /// The model of a leaf that received no training keys.
    ///
    /// Its range is empty, so searches routed to it report not-found without
    /// touching the key array.
    pub const EMPTY: Self = Self {
        a: 0.0,
        b: 0.0,
        origin: 0,
        segment_start: 0,
        segment_end: 0,
        max_error: 0,
    };

    /// Builds a model from a fit and its bookkeeping.
    #[must_use]
    pub const fn from_fit(
        fit: LinearFit,
        segment_start: usize,
        segment_end: usize,
        max_error: usize,
    ) -> Self {
        Self {
            a: fit.slope,
            b: fit.intercept,
            origin: fit.origin,
            segment_start,
            segment_end,
            max_error,
        }
    }

    /// The fitted line without the segment bookkeeping.
    #[must_use]
    #[inline(always)]
    pub const fn fit(&self) -> LinearFit {
        LinearFit {
            slope: self.a,
            intercept: self.b,
            origin: self.origin,
        }
    }

    /// Raw (unclamped) predicted position.
    #[must_use]
    #[inline(always)]
    pub fn predict(&self, key: u64) -> f64 {
        self.fit().predict(key)
    }

    /// Predicted position clamped into `[0, n - 1]`.
    #[must_use]
    #[inline(always)]
    pub fn predict_clamped(&self, key: u64, n: usize) -> usize {
        clamp_position(self.predict(key), n)
    }

    /// True if this model covers no positions.
    #[must_use]
    #[inline(always)]
    pub const fn is_empty(&self) -> bool {
        self.segment_start == self.segment_end
    }

    /// Number of positions covered.
    #[must_use]
    #[inline]
    pub const fn segment_len(&self) -> usize {
        self.segment_end - self.segment_start
    }
}
