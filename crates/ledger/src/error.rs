//! Ledger Error Types
//!
//! This module provides structured errors using `exn` for automatic location
//! tracking and error tree construction.

use derive_more::{Display, Error};

/// A ledger error with automatic location tracking.
pub type Error = exn::Exn<ErrorKind>;
/// Result type alias for ledger operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Actionable error categories.
///
/// These describe what the caller should *do*, not what went wrong internally.
#[derive(Debug, Display, Error, Clone, PartialEq, Eq)]
pub enum ErrorKind {
    /// Storage-level failure; the ledger is unchanged and the request may be
    /// retried as-is.
    #[display("database error")]
    Database,
    #[display("database migration error")]
    Migration,
    /// The catalog has no such package.
    #[display("package not found: ({_0})")]
    PackageNotFound(#[error(not(source))] String),
    /// The catalog has no such version; ingest it before reporting builds.
    #[display("version not found: ({_0}, {_1})")]
    VersionNotFound(#[error(not(source))] String, String),
    #[display("build not found: ({_0})")]
    BuildNotFound(#[error(not(source))] i64),
    /// Packages can only be deleted once all of their versions are gone.
    #[display("package still has versions: ({_0})")]
    PackageInUse(#[error(not(source))] String),
    /// `none` marks universal wheels and cannot be registered as a target.
    #[display("reserved ABI tag cannot be a build target: ({_0})")]
    ReservedAbi(#[error(not(source))] String),
    /// A build report failed validation; nothing was recorded.
    #[display("malformed build report: {_0}")]
    MalformedPayload(#[error(not(source))] String),
    /// The upstream serial may only move forwards.
    #[display("serial regression: {requested} is behind the current serial {current}")]
    SerialRegression {
        /// Serial currently on record.
        current: u64,
        /// Serial the caller tried to store.
        requested: u64,
    },
    /// Data read from (or destined for) the database is out of range.
    #[display("invalid ledger data: {_0}")]
    InvalidData(#[error(not(source))] &'static str),
}

impl ErrorKind {
    /// Returns `true` if retrying might succeed.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Database)
    }
}
