//! # `lindex`
//!
//! Two read-only point indexes over a sorted array of `u64` keys, plus the
//! harness that compares them.
//!
//! - [`Rmi`]: a two-level recursive model index. A root linear model picks
//!   one of `L` leaf models; the leaf predicts a position and a binary search
//!   inside its recorded error bound finds the key.
//! - [`StaticBPTree`]: a bulk-loaded B+tree with linked leaves, packed
//!   bottom-up from the sorted array.
//!
//! Both map a key to a position `p` with `keys[p] == key`, or `None`.
//!
//! ## Example
//!
//! ```rust
//! use lindex::{PointIndex, Rmi, StaticBPTree};
//!
//! let keys: Vec<u64> = (0..1_000).map(|i| i * 7).collect();
//!
//! let mut rmi = Rmi::new(16)?;
//! rmi.train(&keys)?;
//! assert_eq!(rmi.search(&keys, 700), Some(100));
//!
//! let mut tree = StaticBPTree::new(32)?;
//! tree.bulk_load(&keys);
//! assert_eq!(tree.search(700), Some(100));
//! assert_eq!(tree.lookup(&keys, 701), None);
//! # Ok::<(), lindex::IndexError>(())
//! ```
//!
//! ## Key Constraints
//!
//! - Keys must be sorted non-decreasing. The plain build methods trust the
//!   caller; [`Rmi::train_checked`] and [`StaticBPTree::bulk_load_checked`]
//!   verify first.
//! - Duplicate keys are allowed. A lookup returns the position of one of the
//!   equal entries.
//! - The RMI borrows the key array at query time; the tree keeps its own copy.
//!
//! ## Thread Safety
//!
//! Building takes `&mut self`. A built index is immutable and `Sync`, so
//! lookups may run from any number of threads.
//!
//! ## Logging
//!
//! With the `tracing` feature, builds emit `debug` spans and the harness
//! emits `info` events. Without it no logging code is compiled.

#![deny(missing_docs)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
// Hot-path accessors are small and called per probe.
#![allow(clippy::inline_always)]

pub mod bptree;
pub mod config;
pub mod error;
pub mod harness;
pub mod index;
pub mod ksearch;
pub mod model;
pub mod regression;
pub mod rmi;

// Re-export main types for convenience
pub use bptree::{LeafIter, StaticBPTree};
pub use config::IndexConfig;
pub use error::{IndexError, Result, validate_sorted};
pub use index::PointIndex;
pub use model::LinearModel;
pub use regression::{clamp_position, fit_linear};
pub use rmi::{Rmi, RmiStats};
