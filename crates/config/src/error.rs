//! Configuration Error Types
//!
//! This module provides structured errors using `exn` for automatic location
//! tracking and error tree construction.

use derive_more::{Display, Error};

/// A configuration error with automatic location tracking.
pub type Error = exn::Exn<ErrorKind>;
/// Result type alias for configuration loading.
pub type Result<T> = std::result::Result<T, Error>;

/// Actionable error categories.
#[derive(Debug, Display, Error, Clone, PartialEq, Eq)]
pub enum ErrorKind {
    /// The configuration could not be read or deserialized.
    #[display("could not load configuration")]
    Load,
    /// An explicitly given configuration file does not exist.
    #[display("configuration file not found: {_0}")]
    NotFound(#[error(not(source))] String),
    /// Only TOML, YAML and JSON files are understood.
    #[display("unsupported configuration format: {_0}")]
    UnsupportedFormat(#[error(not(source))] String),
    /// No data directory could be determined for the default database path.
    #[display("no data directory available; set database.path explicitly")]
    NoDataDirectory,
    /// A value was read successfully but is not acceptable.
    #[display("invalid configuration for {field}: {reason}")]
    Invalid { field: &'static str, reason: String },
}

impl ErrorKind {
    /// Returns `true` if retrying might succeed.
    ///
    /// Configuration errors need the configuration fixed, so never.
    pub fn is_retryable(&self) -> bool {
        false
    }
}
