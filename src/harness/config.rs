//! Run configuration for the benchmark driver.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::config::{DEFAULT_NUM_LEAVES, DEFAULT_ORDER, check_num_leaves, check_order};
use crate::error::{IndexError, Result};

/// One dataset to benchmark.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DatasetSpec {
    /// Name used in reports.
    pub name: String,
    /// File name, relative to [`BenchConfig::data_dir`].
    pub file: String,
    /// RMI leaf counts to sweep; empty means `[DEFAULT_NUM_LEAVES]`.
    #[serde(default)]
    pub rmi_leaves: Vec<usize>,
}

impl DatasetSpec {
    /// Dataset with the default leaf count.
    #[must_use]
    pub fn new(name: &str, file: &str) -> Self {
        Self {
            name: name.to_string(),
            file: file.to_string(),
            rmi_leaves: Vec::new(),
        }
    }

    /// Dataset with an explicit leaf sweep.
    #[must_use]
    pub fn with_leaves(mut self, leaves: &[usize]) -> Self {
        self.rmi_leaves = leaves.to_vec();
        self
    }

    /// Leaf counts to train, falling back to the default.
    #[must_use]
    pub fn leaf_sweep(&self) -> Vec<usize> {
        if self.rmi_leaves.is_empty() {
            vec![DEFAULT_NUM_LEAVES]
        } else {
            self.rmi_leaves.clone()
        }
    }
}

/// Everything the driver needs for one run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BenchConfig {
    /// Directory holding the dataset files.
    pub data_dir: PathBuf,
    /// Directory the CSV reports are written to.
    pub output_dir: PathBuf,
    /// Datasets, benchmarked in order.
    pub datasets: Vec<DatasetSpec>,
    /// Keys to load per dataset (0 = whole file).
    pub max_keys: usize,
    /// Lookup queries per index.
    pub num_queries: usize,
    /// Seed for query sampling.
    pub query_seed: u64,
    /// Seed for the sanity check's probes.
    pub sanity_seed: u64,
    /// B+tree fan-out.
    pub bpt_order: usize,
}

impl Default for BenchConfig {
    fn default() -> Self {
        let sweep = [32, 64, 128, 256];
        Self {
            data_dir: PathBuf::from("data"),
            output_dir: PathBuf::from("."),
            datasets: vec![
                DatasetSpec::new("books", "books_200M_uint64").with_leaves(&sweep),
                DatasetSpec::new("fb", "fb_200M_uint64"),
                DatasetSpec::new("osm", "osm_cellids_200M_uint64").with_leaves(&sweep),
                DatasetSpec::new("wiki", "wiki_ts_200M_uint64"),
            ],
            max_keys: 100_000_000,
            num_queries: 100_000,
            query_seed: 42,
            sanity_seed: 123,
            bpt_order: DEFAULT_ORDER,
        }
    }
}

impl BenchConfig {
    /// Reads a JSON config; missing fields take their defaults.
    ///
    /// # Errors
    ///
    /// Returns [`IndexError::Io`] if the file cannot be read and
    /// [`IndexError::Config`] if it does not parse or validate.
    pub fn from_file(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&text)?;
        config.validate()?;
        Ok(config)
    }

    /// Checks every numeric parameter.
    ///
    /// # Errors
    ///
    /// Returns [`IndexError::InvalidConfig`] for the first bad parameter.
    pub fn validate(&self) -> Result<()> {
        check_order(self.bpt_order)?;
        if self.num_queries == 0 {
            return Err(IndexError::InvalidConfig {
                name: "num_queries",
                value: 0,
                reason: "must be positive",
            });
        }
        for dataset in &self.datasets {
            for &leaves in &dataset.rmi_leaves {
                check_num_leaves(leaves)?;
            }
        }
        Ok(())
    }

    /// Full path of a dataset file.
    #[must_use]
    pub fn dataset_path(&self, dataset: &DatasetSpec) -> PathBuf {
        self.data_dir.join(&dataset.file)
    }
}
