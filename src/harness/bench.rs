//! Timing, sanity checks, and the end-to-end benchmark run.

use std::hint::black_box;
use std::time::Instant;

use crate::bptree::StaticBPTree;
use crate::error::Result;
use crate::index::PointIndex;
use crate::rmi::Rmi;

use super::config::{BenchConfig, DatasetSpec};
use super::dataset::load_keys;
use super::queries::sample_existing;
use super::report::CsvReport;
use super::stats::LatencyStats;

/// Present keys probed by [`sanity_check`], and likewise absent probes.
pub const SANITY_PROBES: usize = 100;

// ============================================================================
//  Timing
// ============================================================================

/// Times each lookup individually and returns the latencies in nanoseconds.
///
/// Results are passed through [`black_box`] so the lookups cannot be elided.
pub fn time_lookups<I: PointIndex + ?Sized>(index: &I, keys: &[u64], queries: &[u64]) -> Vec<u64> {
    let mut latencies = Vec::with_capacity(queries.len());
    for &query in queries {
        let start = Instant::now();
        let found = index.lookup(keys, black_box(query));
        let elapsed = start.elapsed();
        black_box(found);
        latencies.push(u64::try_from(elapsed.as_nanos()).unwrap_or(u64::MAX));
    }
    latencies
}

// ============================================================================
//  Sanity Check
// ============================================================================

/// A present key that an index failed to find at a matching position.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SanityMismatch {
    /// Name of the failing index.
    pub index: &'static str,
    /// The key that was looked up.
    pub key: u64,
    /// What the index returned.
    pub position: Option<usize>,
}

/// Outcome of [`sanity_check`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SanityReport {
    /// Present keys verified before the check stopped.
    pub present_checked: usize,
    /// `key + 1` probes issued.
    pub absent_probed: usize,
    /// First mismatch, if any. Checking stops there.
    pub mismatch: Option<SanityMismatch>,
}

impl SanityReport {
    /// True if every present key was found.
    #[must_use]
    pub const fn passed(&self) -> bool {
        self.mismatch.is_none()
    }
}

/// Verifies that every index finds [`SANITY_PROBES`] randomly chosen present
/// keys at a position holding that key, then issues as many `key + 1` probes,
/// whose results are ignored.
///
/// An empty `keys` passes trivially.
pub fn sanity_check(keys: &[u64], indexes: &[&dyn PointIndex], seed: u64) -> SanityReport {
    let mut report = SanityReport::default();
    let draws = sample_existing(keys, 2 * SANITY_PROBES, seed);
    let (present, absent) = draws.split_at(draws.len() / 2);

    for &key in present {
        for index in indexes {
            let position = index.lookup(keys, key);
            if position.is_none_or(|p| keys.get(p) != Some(&key)) {
                #[cfg(feature = "tracing")]
                tracing::warn!(index = index.name(), key, ?position, "sanity mismatch");

                report.mismatch = Some(SanityMismatch {
                    index: index.name(),
                    key,
                    position,
                });
                return report;
            }
        }
        report.present_checked += 1;
    }

    for &key in absent {
        let probe = key.wrapping_add(1);
        for index in indexes {
            black_box(index.lookup(keys, probe));
        }
        report.absent_probed += 1;
    }

    report
}

// ============================================================================
//  Run
// ============================================================================

/// Build and lookup figures for one index on one dataset.
#[derive(Debug, Clone, PartialEq)]
pub struct IndexResult {
    /// Dataset name.
    pub dataset: String,
    /// Index name.
    pub index: &'static str,
    /// Keys indexed.
    pub num_keys: usize,
    /// RMI leaf count; `None` for the B+tree.
    pub num_leaves: Option<usize>,
    /// Build (or training) wall time in seconds.
    pub build_time_s: f64,
    /// Advisory footprint.
    pub mem_bytes: usize,
    /// Lookup latencies.
    pub lookup: LatencyStats,
    /// Sanity outcome; only RMI runs are checked, against the tree.
    pub sanity: Option<SanityReport>,
}

/// Everything a [`run`] produced.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RunSummary {
    /// One entry per index built, in run order.
    pub results: Vec<IndexResult>,
    /// Datasets that could not be loaded, with the reason.
    pub skipped: Vec<(String, String)>,
}

/// Benchmarks every dataset in `config` and writes both CSV reports to
/// `config.output_dir`.
///
/// Per dataset: load the keys, bulk-load the B+tree, draw the shared query
/// set, time the tree, then for each leaf count train an RMI, sanity-check it
/// alongside the tree, and time it. Datasets that fail to load are skipped.
///
/// # Errors
///
/// Returns an error if the config is invalid or a report cannot be written.
#[cfg_attr(feature = "tracing", tracing::instrument(level = "info", skip_all))]
pub fn run(config: &BenchConfig) -> Result<RunSummary> {
    config.validate()?;
    let mut report = CsvReport::create(&config.output_dir)?;
    let mut summary = RunSummary::default();

    for dataset in &config.datasets {
        let path = config.dataset_path(dataset);
        let keys = match load_keys(&path, config.max_keys) {
            Ok(keys) => keys,
            Err(err) => {
                #[cfg(feature = "tracing")]
                tracing::error!(dataset = %dataset.name, %err, "skipping dataset");

                summary.skipped.push((dataset.name.clone(), err.to_string()));
                continue;
            }
        };
        run_dataset(config, dataset, &keys, &mut report, &mut summary)?;
    }

    report.flush()?;
    Ok(summary)
}

fn run_dataset<W: std::io::Write>(
    config: &BenchConfig,
    dataset: &DatasetSpec,
    keys: &[u64],
    report: &mut CsvReport<W>,
    summary: &mut RunSummary,
) -> Result<()> {
    let name = dataset.name.as_str();
    let n = keys.len();

    let mut tree = StaticBPTree::new(config.bpt_order)?;
    let start = Instant::now();
    tree.bulk_load(keys);
    let tree_build_s = start.elapsed().as_secs_f64();
    let tree_mem = tree.memory_usage_bytes();
    report.build_row(name, tree.name(), n, None, tree_build_s, tree_mem)?;

    #[cfg(feature = "tracing")]
    tracing::info!(dataset = name, build_s = tree_build_s, mem_bytes = tree_mem, "bptree built");

    let queries = sample_existing(keys, config.num_queries, config.query_seed);

    let tree_stats = LatencyStats::from_samples(&mut time_lookups(&tree, keys, &queries));
    report.lookup_row(name, tree.name(), n, None, &tree_stats)?;
    summary.results.push(IndexResult {
        dataset: name.to_string(),
        index: tree.name(),
        num_keys: n,
        num_leaves: None,
        build_time_s: tree_build_s,
        mem_bytes: tree_mem,
        lookup: tree_stats,
        sanity: None,
    });

    for leaves in dataset.leaf_sweep() {
        let mut rmi = Rmi::new(leaves)?;
        let start = Instant::now();
        rmi.train(keys)?;
        let rmi_build_s = start.elapsed().as_secs_f64();
        let rmi_mem = rmi.memory_usage_bytes();
        report.build_row(name, rmi.name(), n, Some(leaves), rmi_build_s, rmi_mem)?;

        let sanity = sanity_check(keys, &[&tree, &rmi], config.sanity_seed);

        #[cfg(feature = "tracing")]
        tracing::info!(
            dataset = name,
            leaves,
            build_s = rmi_build_s,
            max_error = rmi.stats().max_error,
            sanity = sanity.passed(),
            "rmi trained"
        );

        let rmi_stats = LatencyStats::from_samples(&mut time_lookups(&rmi, keys, &queries));
        report.lookup_row(name, rmi.name(), n, Some(leaves), &rmi_stats)?;
        summary.results.push(IndexResult {
            dataset: name.to_string(),
            index: rmi.name(),
            num_keys: n,
            num_leaves: Some(leaves),
            build_time_s: rmi_build_s,
            mem_bytes: rmi_mem,
            lookup: rmi_stats,
            sanity: Some(sanity),
        });
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Broken;

    impl PointIndex for Broken {
        fn name(&self) -> &'static str {
            "broken"
        }

        fn lookup(&self, _keys: &[u64], _key: u64) -> Option<usize> {
            Some(0)
        }

        fn memory_usage_bytes(&self) -> usize {
            0
        }
    }

    fn sample_keys() -> Vec<u64> {
        (0..5_000u64).map(|i| i * i + 3 * i).collect()
    }

    #[test]
    fn test_time_lookups_one_sample_per_query() {
        let keys = sample_keys();
        let mut tree = StaticBPTree::new(16).unwrap();
        tree.bulk_load(&keys);
        let queries = sample_existing(&keys, 250, 1);
        assert_eq!(time_lookups(&tree, &keys, &queries).len(), 250);
        assert!(time_lookups(&tree, &keys, &[]).is_empty());
    }

    #[test]
    fn test_sanity_passes_for_real_indexes() {
        let keys = sample_keys();
        let mut tree = StaticBPTree::new(8).unwrap();
        tree.bulk_load(&keys);
        let mut rmi = Rmi::new(32).unwrap();
        rmi.train(&keys).unwrap();

        let report = sanity_check(&keys, &[&tree, &rmi], 123);
        assert!(report.passed());
        assert_eq!(report.present_checked, SANITY_PROBES);
        assert_eq!(report.absent_probed, SANITY_PROBES);
    }

    #[test]
    fn test_sanity_reports_first_mismatch() {
        let keys = sample_keys();
        let report = sanity_check(&keys, &[&Broken], 5);
        assert!(!report.passed());
        let mismatch = report.mismatch.unwrap();
        assert_eq!(mismatch.index, "broken");
        assert_ne!(mismatch.key, keys[0]);
        assert_eq!(report.absent_probed, 0);
    }

    #[test]
    fn test_sanity_untrained_rmi_fails() {
        let keys = sample_keys();
        let rmi = Rmi::default();
        let report = sanity_check(&keys, &[&rmi], 9);
        assert_eq!(report.mismatch.map(|m| m.position), Some(None));
    }

    #[test]
    fn test_sanity_empty_keys() {
        let rmi = Rmi::default();
        let report = sanity_check(&[], &[&rmi], 1);
        assert!(report.passed());
        assert_eq!(report.present_checked, 0);
    }
}
