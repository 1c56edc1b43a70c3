//! CSV reports: one file of lookup latencies, one of build cost.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use crate::error::Result;

use super::stats::LatencyStats;

/// File name of the lookup report.
pub const LOOKUP_FILE: &str = "results_lookup.csv";

/// File name of the build report.
pub const BUILD_FILE: &str = "results_build.csv";

const LOOKUP_HEADER: &str = "dataset,index,num_keys,num_leaves,metric,mean_ns,p95_ns,p99_ns";
const BUILD_HEADER: &str = "dataset,index,num_keys,num_leaves,build_time_s,mem_bytes";

/// Paired CSV writers. `num_leaves` is `None` for indexes without leaves,
/// which leaves that column empty.
pub struct CsvReport<W: Write> {
    lookup: W,
    build: W,
}

impl CsvReport<BufWriter<File>> {
    /// Creates both report files in `dir`, truncating existing ones.
    ///
    /// # Errors
    ///
    /// Returns [`IndexError::Io`](crate::IndexError::Io) on failure.
    pub fn create(dir: &Path) -> Result<Self> {
        std::fs::create_dir_all(dir)?;
        let lookup = BufWriter::new(File::create(dir.join(LOOKUP_FILE))?);
        let build = BufWriter::new(File::create(dir.join(BUILD_FILE))?);
        Self::new(lookup, build)
    }
}

impl<W: Write> CsvReport<W> {
    /// Wraps two writers and emits the headers.
    ///
    /// # Errors
    ///
    /// Returns [`IndexError::Io`](crate::IndexError::Io) on failure.
    pub fn new(mut lookup: W, mut build: W) -> Result<Self> {
        writeln!(lookup, "{LOOKUP_HEADER}")?;
        writeln!(build, "{BUILD_HEADER}")?;
        Ok(Self { lookup, build })
    }

    /// Appends a lookup row.
    ///
    /// # Errors
    ///
    /// Returns [`IndexError::Io`](crate::IndexError::Io) on failure.
    pub fn lookup_row(
        &mut self,
        dataset: &str,
        index: &str,
        num_keys: usize,
        num_leaves: Option<usize>,
        stats: &LatencyStats,
    ) -> Result<()> {
        writeln!(
            self.lookup,
            "{dataset},{index},{num_keys},{},lookup,{},{},{}",
            leaves_column(num_leaves),
            stats.mean_ns,
            stats.p95_ns,
            stats.p99_ns
        )?;
        Ok(())
    }

    /// Appends a build row.
    ///
    /// # Errors
    ///
    /// Returns [`IndexError::Io`](crate::IndexError::Io) on failure.
    pub fn build_row(
        &mut self,
        dataset: &str,
        index: &str,
        num_keys: usize,
        num_leaves: Option<usize>,
        build_time_s: f64,
        mem_bytes: usize,
    ) -> Result<()> {
        writeln!(
            self.build,
            "{dataset},{index},{num_keys},{},{build_time_s},{mem_bytes}",
            leaves_column(num_leaves)
        )?;
        Ok(())
    }

    /// Flushes both writers.
    ///
    /// # Errors
    ///
    /// Returns [`IndexError::Io`](crate::IndexError::Io) on failure.
    pub fn flush(&mut self) -> Result<()> {
        self.lookup.flush()?;
        self.build.flush()?;
        Ok(())
    }

    /// Returns the underlying writers.
    pub fn into_inner(self) -> (W, W) {
        (self.lookup, self.build)
    }
}

fn leaves_column(num_leaves: Option<usize>) -> String {
    num_leaves.map(|n| n.to_string()).unwrap_or_default()
}
