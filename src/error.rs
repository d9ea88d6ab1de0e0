use thiserror::Error;

/// Error type for the tsregrs crate
///
/// Only programmer-error-class conditions (invalid configuration, mismatched
/// inputs) surface as errors. Numerical degeneracy during an analysis is an
/// in-band result (`ok = false` with NaN statistics), never an `Error`.
#[derive(Error, Debug)]
pub enum Error {
    #[error("invalid value: {0}")]
    InvalidValue(String),

    #[error("invalid operation: {0}")]
    InvalidOperation(String),

    #[error("dimension mismatch: {0}")]
    DimensionMismatch(String),

    #[error("empty data: {0}")]
    EmptyData(String),

    #[error("insufficient data: {0}")]
    InsufficientData(String),

    #[error("out of range: {0}")]
    OutOfRange(String),

    #[error("format error: {0}")]
    Format(String),

    #[error("computation error: {0}")]
    ComputationError(String),
}

/// Type alias for Result
pub type Result<T> = std::result::Result<T, Error>;
