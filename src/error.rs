//! Error types for influxdb-point.

use thiserror::Error;

/// Error type for influxdb-point operations.
///
/// Only point construction and the upstream batch stream can fail. Encoding a
/// valid point and decoding a row never produce an error.
#[derive(Error, Debug)]
pub enum Error {
    /// A point was built from an invalid argument (empty measurement, empty
    /// field key, non-UTC timestamp where UTC is required).
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// Failed to parse a value from its textual form.
    #[error("Failed to parse value: {message}")]
    Parse {
        /// Description of what failed to parse.
        message: String,
    },

    /// The record batch source reported an error.
    #[error("Arrow error: {0}")]
    Arrow(#[from] arrow_schema::ArrowError),
}

impl Error {
    pub(crate) fn invalid_argument(message: impl Into<String>) -> Self {
        Error::InvalidArgument(message.into())
    }
}

/// Result type alias for influxdb-point operations.
pub type Result<T> = std::result::Result<T, Error>;
