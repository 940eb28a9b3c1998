use std::collections::TryReserveError;
use thiserror::Error;

/// Errors surfaced by `Dictionary` construction and fallible insertion.
///
/// A missing key is never an error; lookups return `None`.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DictionaryError {
    #[error("dictionary capacity must be at least one bucket")]
    ZeroCapacity,
    #[error("failed to allocate a bucket array of {requested} buckets: {source}")]
    AllocationFailed {
        requested: usize,
        #[source]
        source: TryReserveError,
    },
}
