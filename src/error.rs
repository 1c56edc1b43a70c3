//! Error types for index construction and the benchmark harness.
//!
//! A missing key is never an error: searches return `Option<usize>`.

use std::path::PathBuf;

use thiserror::Error;

/// Result type alias using [`IndexError`].
pub type Result<T> = std::result::Result<T, IndexError>;

/// Errors reported synchronously by build operations and harness I/O.
#[derive(Debug, Error)]
pub enum IndexError {
    /// Training was attempted on an empty key array.
    #[error("cannot train on an empty key array")]
    EmptyKeys,

    /// A construction parameter is out of range.
    #[error("invalid configuration: {name} = {value} ({reason})")]
    InvalidConfig {
        /// Parameter name.
        name: &'static str,
        /// Rejected value.
        value: usize,
        /// Why the value was rejected.
        reason: &'static str,
    },

    /// The key array is not non-decreasing.
    #[error("keys are not sorted: keys[{position}] < keys[{}]", .position - 1)]
    UnsortedKeys {
        /// First index whose key is smaller than its predecessor.
        position: usize,
    },

    /// Underlying I/O failure.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A dataset file could not be interpreted as a flat u64 array.
    #[error("dataset {}: {reason}", .path.display())]
    Dataset {
        /// Dataset path.
        path: PathBuf,
        /// What was wrong with it.
        reason: String,
    },

    /// A bench configuration file could not be parsed.
    #[error("configuration error: {0}")]
    Config(String),
}

impl From<serde_json::Error> for IndexError {
    fn from(err: serde_json::Error) -> Self {
        Self::Config(err.to_string())
    }
}

/// Checks that `keys` is non-decreasing.
///
/// # Errors
///
/// Returns [`IndexError::UnsortedKeys`] naming the first descent.
pub fn validate_sorted(keys: &[u64]) -> Result<()> {
    keys.windows(2)
        .position(|w| w[0] > w[1])
        .map_or(Ok(()), |i| Err(IndexError::UnsortedKeys { position: i + 1 }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{Error as IoError, ErrorKind};

    #[test]
    fn test_empty_keys_display() {
        assert_eq!(
            IndexError::EmptyKeys.to_string(),
            "cannot train on an empty key array"
        );
    }

    #[test]
    fn test_invalid_config_display() {
        let err = IndexError::InvalidConfig {
            name: "order",
            value: 1,
            reason: "must be at least 3",
        };
        assert_eq!(
            err.to_string(),
            "invalid configuration: order = 1 (must be at least 3)"
        );
    }

    #[test]
    fn test_unsorted_keys_display() {
        let err = IndexError::UnsortedKeys { position: 3 };
        assert_eq!(err.to_string(), "keys are not sorted: keys[3] < keys[2]");
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = IoError::new(ErrorKind::NotFound, "file not found");
        let err: IndexError = io_err.into();
        assert!(matches!(err, IndexError::Io(_)));
        assert!(err.to_string().contains("I/O error"));
    }

    #[test]
    fn test_dataset_display() {
        let err = IndexError::Dataset {
            path: PathBuf::from("data/books"),
            reason: "length 7 is not a multiple of 8".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "dataset data/books: length 7 is not a multiple of 8"
        );
    }

    #[test]
    fn test_json_error_conversion() {
        let json_err = serde_json::from_str::<u64>("not json").unwrap_err();
        let err: IndexError = json_err.into();
        assert!(matches!(err, IndexError::Config(_)));
    }

    #[test]
    fn test_validate_sorted() {
        assert!(validate_sorted(&[]).is_ok());
        assert!(validate_sorted(&[5]).is_ok());
        assert!(validate_sorted(&[1, 1, 2, 9]).is_ok());
        assert!(matches!(
            validate_sorted(&[1, 4, 3, 5]),
            Err(IndexError::UnsortedKeys { position: 2 })
        ));
    }

    #[test]
    fn test_error_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<IndexError>();
    }
}
