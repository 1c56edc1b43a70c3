//! Latency summaries.

/// Mean and tail latencies in nanoseconds.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct LatencyStats {
    /// Arithmetic mean.
    pub mean_ns: f64,
    /// 95th percentile.
    pub p95_ns: f64,
    /// 99th percentile.
    pub p99_ns: f64,
}

impl LatencyStats {
    /// Summarizes `samples`, sorting them in place.
    ///
    /// The `q` percentile is the sample at index `floor(q · n)`, clamped to
    /// the last sample. No samples gives all zeros.
    #[must_use]
    #[expect(
        clippy::cast_precision_loss,
        clippy::cast_possible_truncation,
        clippy::cast_sign_loss,
        reason = "latency statistics are approximate"
    )]
    pub fn from_samples(samples: &mut [u64]) -> Self {
        let n = samples.len();
        if n == 0 {
            return Self::default();
        }
        samples.sort_unstable();

        let total: u128 = samples.iter().map(|&s| u128::from(s)).sum();
        let percentile = |q: f64| {
            let idx = ((q * n as f64) as usize).min(n - 1);
            samples[idx] as f64
        };

        Self {
            mean_ns: total as f64 / n as f64,
            p95_ns: percentile(0.95),
            p99_ns: percentile(0.99),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty() {
        assert_eq!(LatencyStats::from_samples(&mut []), LatencyStats::default());
    }

    #[test]
    fn test_single_sample() {
        let stats = LatencyStats::from_samples(&mut [40]);
        assert_eq!(stats.mean_ns, 40.0);
        assert_eq!(stats.p95_ns, 40.0);
        assert_eq!(stats.p99_ns, 40.0);
    }

    #[test]
    fn test_percentile_indexing() {
        // 1..=100 shuffled: floor(0.95 * 100) = 95 -> 96, floor(0.99 * 100) = 99 -> 100.
        let mut samples: Vec<u64> = (1..=100).rev().collect();
        let stats = LatencyStats::from_samples(&mut samples);
        assert_eq!(stats.mean_ns, 50.5);
        assert_eq!(stats.p95_ns, 96.0);
        assert_eq!(stats.p99_ns, 100.0);
        assert_eq!(samples[0], 1);
    }

    #[test]
    fn test_small_sample_clamps() {
        let stats = LatencyStats::from_samples(&mut [5, 1, 3]);
        assert_eq!(stats.mean_ns, 3.0);
        assert_eq!(stats.p95_ns, 5.0);
        assert_eq!(stats.p99_ns, 5.0);
    }
}
