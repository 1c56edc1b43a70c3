//! Benchmark harness: dataset loading, query generation, timing, and reports.
//!
//! The indexes themselves know nothing about files or clocks; everything here
//! drives them through [`PointIndex`](crate::PointIndex).
//!
//! # Submodules
//!
//! - [`config`]: `BenchConfig`, the JSON-loadable run description
//! - [`dataset`]: flat little-endian `u64` key files
//! - [`queries`]: seeded query sampling
//! - [`stats`]: latency summaries
//! - [`report`]: CSV output
//! - [`bench`]: the per-dataset driver and sanity check

pub mod bench;
pub mod config;
pub mod dataset;
pub mod queries;
pub mod report;
pub mod stats;

pub use bench::{
    IndexResult, RunSummary, SanityMismatch, SanityReport, run, sanity_check, time_lookups,
};
pub use config::{BenchConfig, DatasetSpec};
pub use dataset::{load_keys, write_keys};
pub use queries::{absent_probes, sample_existing};
pub use report::CsvReport;
pub use stats::LatencyStats;
