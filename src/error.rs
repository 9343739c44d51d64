//! Checked errors surfaced by the sequence and the suite configuration.
//!
//! Only indexed access reports a recoverable error during normal use; every
//! other sequence operation treats bad input as a caller bug and panics.

use thiserror::Error;

/// Result type alias for dynseq operations
pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    /// `at` was called with an index not less than the current length
    #[error("index {index} out of range for sequence of length {len}")]
    OutOfRange { index: usize, len: usize },

    /// The requested capacity does not fit in a single allocation
    #[error("capacity overflow: cannot hold {requested} elements")]
    CapacityOverflow { requested: usize },

    /// An environment variable could not be parsed
    #[error("invalid configuration: {0}")]
    Config(String),
}
