//! Build Model Error Types
//!
//! This module provides structured errors using `exn` for automatic location
//! tracking and error tree construction.

use derive_more::{Display, Error};

/// A build model error with automatic location tracking.
pub type Error = exn::Exn<ErrorKind>;
/// Result type alias for build model operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Actionable error categories.
///
/// These describe what the caller should *do*, not what went wrong internally.
#[derive(Debug, Display, Error, Clone, PartialEq, Eq)]
pub enum ErrorKind {
    /// The filename does not end in `.whl`.
    #[display("not a wheel filename: {_0}")]
    NotAWheel(#[error(not(source))] String),
    /// The filename does not split into the five or six tags of a wheel.
    #[display("wheel filename '{filename}' has {found} components, expected 5 or 6")]
    ComponentCount {
        /// The offending filename.
        filename: String,
        /// The number of `-` separated components found.
        found: usize,
    },
    /// One of the tags in the filename is blank.
    #[display("wheel filename '{filename}' has an empty {component} tag")]
    EmptyComponent {
        /// The offending filename.
        filename: String,
        /// Which tag was blank.
        component: &'static str,
    },
    /// A classification tag disagrees with the same tag in the filename.
    #[display("wheel '{filename}' declares {tag} tag '{declared}' which its filename does not carry")]
    TagMismatch {
        /// The offending filename.
        filename: String,
        /// Which tag disagreed.
        tag: &'static str,
        /// The value declared alongside the filename.
        declared: String,
    },
}

impl ErrorKind {
    /// Returns `true` if retrying might succeed.
    pub fn is_retryable(&self) -> bool {
        // A filename is either well-formed or it isn't.
        false
    }
}
