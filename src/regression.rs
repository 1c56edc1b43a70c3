//! Ordinary least squares over `(key, position)` pairs.
//!
//! Keys are 64-bit integers, so squaring them in `f64` loses everything below
//! the top 53 bits and the textbook `n·Σx² − (Σx)²` denominator cancels to
//! noise. The accumulator instead anchors every key at the first key it sees
//! (an exact integer subtraction) and updates centered moments with Welford's
//! recurrence, which never forms the large sums.
//!
//! A fit whose keys are all identical has no usable slope; it falls back to a
//! flat predictor at the mean position.

/// Denominators (`n · Σ(x − x̄)²`) below this are treated as zero.
pub const DEGENERATE_TOLERANCE: f64 = 1e-12;

/// Fitted line `y ≈ slope · (x − origin) + intercept`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LinearFit {
    /// Positions per key unit.
    pub slope: f64,
    /// Predicted position at `origin`.
    pub intercept: f64,
    /// Key the line is anchored at.
    pub origin: u64,
}

impl LinearFit {
    /// The zero line.
    pub const ZERO: Self = Self {
        slope: 0.0,
        intercept: 0.0,
        origin: 0,
    };

    /// Evaluates the line at `key`.
    #[must_use]
    #[inline(always)]
    #[expect(clippy::cast_precision_loss, reason = "key offsets are predicted, not stored")]
    pub fn predict(&self, key: u64) -> f64 {
        let dx = i128::from(key) - i128::from(self.origin);
        self.slope.mul_add(dx as f64, self.intercept)
    }

    /// Returns `(a, b)` for the unanchored form `y ≈ a·x + b`.
    #[must_use]
    #[expect(clippy::cast_precision_loss, reason = "the unanchored form is inherently lossy")]
    pub fn absolute(&self) -> (f64, f64) {
        let b = (-self.slope).mul_add(self.origin as f64, self.intercept);
        (self.slope, b)
    }
}

/// Streaming least-squares accumulator.
#[derive(Debug, Clone, Copy, Default)]
pub struct RegressionAccumulator {
    count: u64,
    origin: u64,
    mean_x: f64,
    mean_y: f64,
    /// Σ(x − x̄)²
    m2_x: f64,
    /// Σ(x − x̄)(y − ȳ)
    c_xy: f64,
}

impl RegressionAccumulator {
    /// Creates an empty accumulator.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            count: 0,
            origin: 0,
            mean_x: 0.0,
            mean_y: 0.0,
            m2_x: 0.0,
            c_xy: 0.0,
        }
    }

    /// Number of points pushed so far.
    #[must_use]
    #[inline]
    pub const fn count(&self) -> u64 {
        self.count
    }

    /// Adds one point.
    #[inline]
    #[expect(clippy::cast_precision_loss, reason = "moments are approximate by nature")]
    pub fn push(&mut self, key: u64, position: f64) {
        if self.count == 0 {
            self.origin = key;
        }
        self.count += 1;
        let n = self.count as f64;

        let x = (i128::from(key) - i128::from(self.origin)) as f64;
        let dx = x - self.mean_x;
        self.mean_x += dx / n;
        self.mean_y += (position - self.mean_y) / n;
        // Uses the updated means on the right-hand factor (Welford).
        self.c_xy += dx * (position - self.mean_y);
        self.m2_x += dx * (x - self.mean_x);
    }

    /// Produces the fitted line.
    ///
    /// No points yields [`LinearFit::ZERO`]; identical keys yield a flat line
    /// at the mean position.
    #[must_use]
    #[expect(clippy::cast_precision_loss, reason = "moments are approximate by nature")]
    pub fn finish(&self) -> LinearFit {
        if self.count == 0 {
            return LinearFit::ZERO;
        }

        let denom = self.count as f64 * self.m2_x;
        if denom.abs() < DEGENERATE_TOLERANCE {
            return LinearFit {
                slope: 0.0,
                intercept: self.mean_y,
                origin: self.origin,
            };
        }

        let slope = self.c_xy / self.m2_x;
        // Re-anchor from the centroid back to `origin`.
        let intercept = (-slope).mul_add(self.mean_x, self.mean_y);
        LinearFit {
            slope,
            intercept,
            origin: self.origin,
        }
    }
}

/// Fits `y ≈ a·x + b` over parallel slices and returns `(a, b)`.
///
/// Extra elements in the longer slice are ignored. An empty input returns
/// `(0, 0)`; all-identical keys return `(0, mean(y))`.
#[must_use]
pub fn fit_linear(xs: &[u64], ys: &[f64]) -> (f64, f64) {
    let mut acc = RegressionAccumulator::new();
    for (&x, &y) in xs.iter().zip(ys) {
        acc.push(x, y);
    }
    acc.finish().absolute()
}

/// Clamps a predicted position into `[0, n - 1]`, flooring fractions.
///
/// NaN and negative predictions map to 0. `n` must be positive.
#[must_use]
#[inline(always)]
#[expect(
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    clippy::cast_precision_loss,
    reason = "the value is range-checked before the cast"
)]
pub fn clamp_position(predicted: f64, n: usize) -> usize {
    debug_assert!(n > 0);
    if predicted.is_nan() || predicted <= 0.0 {
        return 0;
    }
    if predicted >= n as f64 {
        return n - 1;
    }
    (predicted as usize).min(n - 1)
}
