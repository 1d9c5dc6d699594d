//! CLI Error Types
//!
//! Library errors are wrapped with `or_raise` so the printed error tree shows
//! both the command that failed and the underlying cause.

use derive_more::{Display, Error};
use exn::ResultExt;

/// A CLI error with automatic location tracking.
pub type Error = exn::Exn<ErrorKind>;
/// Result type alias for CLI commands.
pub type Result<T> = std::result::Result<T, Error>;

/// What the command was doing when it failed.
#[derive(Debug, Display, Error, Clone, PartialEq, Eq)]
pub enum ErrorKind {
    /// The configuration could not be loaded or failed validation.
    #[display("configuration error")]
    Config,
    /// The database file could not be created, opened or migrated.
    #[display("could not open the ledger at {_0}")]
    Open(#[error(not(source))] String),
    /// A ledger operation failed; the child error says why.
    #[display("ledger operation failed")]
    Ledger { retryable: bool },
    /// A build report could not be read or parsed as JSON.
    #[display("could not read build report {_0}")]
    Report(#[error(not(source))] String),
    #[display("could not write output")]
    Output,
}

impl ErrorKind {
    /// Returns `true` if running the same command again might succeed.
    ///
    /// Only ledger failures can be transient (a busy or locked database).
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Ledger { retryable: true })
    }
}

/// Wrap ledger results, carrying over whether the failure is worth retrying.
pub trait LedgerResultExt<T> {
    fn or_ledger(self) -> Result<T>;
}
impl<T> LedgerResultExt<T> for wheelhouse_ledger::error::Result<T> {
    fn or_ledger(self) -> Result<T> {
        let retryable = self.as_ref().is_err_and(|err| err.is_retryable());
        self.or_raise(|| ErrorKind::Ledger { retryable })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use wheelhouse_ledger::error::ErrorKind as LedgerErrorKind;

    fn fail(kind: LedgerErrorKind) -> wheelhouse_ledger::error::Result<()> {
        exn::bail!(kind)
    }

    #[rstest]
    #[case(LedgerErrorKind::Database, true)]
    #[case(LedgerErrorKind::SerialRegression { current: 5, requested: 3 }, false)]
    #[case(LedgerErrorKind::PackageNotFound("foo".to_string()), false)]
    fn test_ledger_retryability_is_kept(#[case] kind: LedgerErrorKind, #[case] retryable: bool) {
        let err = fail(kind).or_ledger().unwrap_err();
        assert_eq!(*err, ErrorKind::Ledger { retryable });
        assert_eq!(err.is_retryable(), retryable);
    }
}
