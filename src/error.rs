//! Error types for the interval indexes

use thiserror::Error;

/// Result type alias using our Error
pub type Result<T> = std::result::Result<T, Error>;

/// Errors reported by the interval tree and the indexes built on it.
///
/// Validation errors are raised before anything is mutated. Logical errors
/// mean the request was well formed but does not match the stored state.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// A multi-dimensional index needs at least one dimension
    #[error("an index must have at least one dimension")]
    NoDimensions,

    /// Coordinate slices do not match the index dimension count
    #[error("expected {expected} coordinates, got {start} start and {end} end coordinates")]
    DimensionMismatch {
        expected: usize,
        start: usize,
        end: usize,
    },

    /// A coordinate equals the reserved sentinel value
    #[error("coordinate in dimension {dimension} equals the reserved sentinel value")]
    SentinelCoordinate { dimension: usize },

    /// Delete on a tree or index that holds nothing
    #[error("cannot delete from an empty tree")]
    EmptyTree,

    /// Delete of an interval or rectangle that is not stored
    #[error("interval does not exist")]
    NotFound,
}

impl Error {
    /// Returns true for malformed input rejected before any mutation
    #[must_use]
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            Error::NoDimensions | Error::DimensionMismatch { .. } | Error::SentinelCoordinate { .. }
        )
    }

    /// Returns true when the input was well formed but does not match the stored state
    #[must_use]
    pub fn is_logical(&self) -> bool {
        matches!(self, Error::EmptyTree | Error::NotFound)
    }
}
