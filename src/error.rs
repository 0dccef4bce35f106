//! Error types for uidalgo

use std::collections::TryReserveError;

/// Failures surfaced by the freshly allocating operations and the checked
/// list constructor. The in-place operators are infallible.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Reserving the result storage failed. Nothing was written.
    #[error("failed to reserve space for {requested} elements: {source}")]
    Alloc {
        /// Number of elements (or blocks) that was requested.
        requested: usize,
        /// The allocator's report.
        #[source]
        source: TryReserveError,
    },

    /// An input was not non-decreasing.
    #[error("uid list is not sorted at index {index}: {prev} > {next}")]
    Unsorted {
        /// Position of the first out of order value.
        index: usize,
        /// The value preceding it.
        prev: u64,
        /// The out of order value.
        next: u64,
    },
}

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, Error>;

/// Reserve exactly `requested` additional slots in `vec`, mapping the failure
/// into [`Error::Alloc`].
pub(crate) fn reserve_exact<T>(vec: &mut Vec<T>, requested: usize) -> Result<()> {
    vec.try_reserve_exact(requested)
        .map_err(|source| Error::Alloc { requested, source })
}
