//! Construction-time configuration for both indexes.

use serde::{Deserialize, Serialize};

use crate::error::{IndexError, Result};
use crate::model::LinearModel;

/// Default number of RMI leaf models.
pub const DEFAULT_NUM_LEAVES: usize = 64;

/// Default B+tree order (max children per internal node, max entries per leaf).
pub const DEFAULT_ORDER: usize = 64;

/// Smallest order for which every internal node can hold at least two children.
///
/// An order of 1 never reduces a level to a single root, and an order of 2
/// cannot split an odd number of nodes into groups of exactly two.
pub const MIN_ORDER: usize = 3;

/// Largest leaf count whose model table fits in one allocation.
pub const MAX_NUM_LEAVES: usize = isize::MAX.unsigned_abs() / size_of::<LinearModel>();

/// Construction parameters shared by [`Rmi`](crate::Rmi) and
/// [`StaticBPTree`](crate::StaticBPTree).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct IndexConfig {
    /// Number of leaf models in the RMI.
    pub num_leaves: usize,
    /// Fan-out of the B+tree.
    pub order: usize,
}

impl Default for IndexConfig {
    fn default() -> Self {
        Self {
            num_leaves: DEFAULT_NUM_LEAVES,
            order: DEFAULT_ORDER,
        }
    }
}

impl IndexConfig {
    /// Checks both parameters.
    ///
    /// # Errors
    ///
    /// Returns [`IndexError::InvalidConfig`] for the first bad parameter.
    pub fn validate(&self) -> Result<()> {
        check_num_leaves(self.num_leaves)?;
        check_order(self.order)
    }
}

pub(crate) const fn check_num_leaves(num_leaves: usize) -> Result<()> {
    if num_leaves == 0 {
        return Err(IndexError::InvalidConfig {
            name: "num_leaves",
            value: num_leaves,
            reason: "must be positive",
        });
    }
    if num_leaves > MAX_NUM_LEAVES {
        return Err(IndexError::InvalidConfig {
            name: "num_leaves",
            value: num_leaves,
            reason: "too many leaves to allocate",
        });
    }
    Ok(())
}

pub(crate) const fn check_order(order: usize) -> Result<()> {
    if order < MIN_ORDER {
        return Err(IndexError::InvalidConfig {
            name: "order",
            value: order,
            reason: "must be at least 3",
        });
    }
    Ok(())
}
