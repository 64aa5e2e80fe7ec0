//! Error types for the pulselens engine

use thiserror::Error;

/// Failures raised by a [`crate::store::SampleStore`] implementation.
///
/// These are hard failures of the backing store, not missing-data
/// conditions. A date with no samples is an empty result, never an error.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Store unavailable: {0}")]
    Unavailable(String),

    #[error("Malformed stored record: {0}")]
    Malformed(String),
}

/// Errors that can occur during feature or analysis computation.
#[derive(Debug, Error)]
pub enum EngineError {
    #[error("Invalid timezone: {0}")]
    InvalidTimezone(String),

    #[error("Invalid date range: {0}")]
    InvalidDateRange(String),

    #[error(transparent)]
    Store(#[from] StoreError),
}
