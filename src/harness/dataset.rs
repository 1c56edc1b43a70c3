//! Flat binary key files: a bare sequence of little-endian `u64`s.

use std::fs::File;
use std::io::{BufWriter, Read, Write};
use std::path::Path;

use zerocopy::IntoBytes;

use crate::error::{IndexError, Result};

const KEY_BYTES: usize = size_of::<u64>();

/// Loads up to `max_keys` keys from `path` (0 loads the whole file).
///
/// # Errors
///
/// Returns [`IndexError::Io`] on read failure and [`IndexError::Dataset`] if
/// the file length is not a multiple of 8 or the file holds no keys.
pub fn load_keys(path: &Path, max_keys: usize) -> Result<Vec<u64>> {
    let file = File::open(path)?;
    let bytes = usize::try_from(file.metadata()?.len()).map_err(|_| IndexError::Dataset {
        path: path.to_path_buf(),
        reason: "file too large for this platform".to_string(),
    })?;
    if bytes % KEY_BYTES != 0 {
        return Err(IndexError::Dataset {
            path: path.to_path_buf(),
            reason: format!("length {bytes} is not a multiple of {KEY_BYTES}"),
        });
    }

    let mut total = bytes / KEY_BYTES;
    if max_keys > 0 {
        total = total.min(max_keys);
    }
    if total == 0 {
        return Err(IndexError::Dataset {
            path: path.to_path_buf(),
            reason: "no keys".to_string(),
        });
    }

    // Read straight into the key buffer; the file is its byte image.
    let mut keys = vec![0u64; total];
    file.take((total * KEY_BYTES) as u64)
        .read_exact(keys.as_mut_bytes())?;
    for key in &mut keys {
        *key = u64::from_le(*key);
    }

    #[cfg(feature = "tracing")]
    tracing::info!(path = %path.display(), keys = total, "dataset loaded");

    Ok(keys)
}

/// Writes `keys` in the format [`load_keys`] reads.
///
/// # Errors
///
/// Returns [`IndexError::Io`] on write failure.
pub fn write_keys(path: &Path, keys: &[u64]) -> Result<()> {
    let mut out = BufWriter::new(File::create(path)?);
    for key in keys {
        out.write_all(&key.to_le_bytes())?;
    }
    out.flush()?;
    Ok(())
}
