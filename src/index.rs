//! `PointIndex` - the lookup interface shared by both index structures.
//!
//! The harness drives every index through this trait so that timing, sanity
//! checks, and report rows are written once.

/// A read-only exact-match index over a borrowed, sorted key array.
///
/// Implementations are built once and then queried; `lookup` takes `&self`
/// and touches no shared mutable state, so concurrent lookups are safe.
pub trait PointIndex {
    /// Short display name used in reports.
    fn name(&self) -> &'static str;

    /// Finds a position `p` with `keys[p] == key`.
    ///
    /// `keys` must be the array the index was built from. Indexes that keep
    /// their own copy of the keys may ignore it.
    fn lookup(&self, keys: &[u64], key: u64) -> Option<usize>;

    /// Advisory estimate of the structure's footprint in bytes.
    fn memory_usage_bytes(&self) -> usize;
}
