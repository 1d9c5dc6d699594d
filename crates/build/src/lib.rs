//! Models exchanged between build workers and the ledger.
//!
//! A worker that finishes building one version of a package reports a
//! [`BuildReport`]: whether the build succeeded, how long it took, the full
//! build log, and every wheel it produced ([`BuiltFile`]). Each wheel carries
//! the classification tags encoded in its filename ([`WheelName`]) along with
//! the system packages it needs at install time.
//!
//! The ABI tag [`UNIVERSAL_ABI`] (`none`) is special: a wheel tagged with it
//! installs on every interpreter ABI, so one such wheel satisfies every build
//! target for its version.

mod consts;
pub mod error;
mod models;
mod name;

pub use crate::models::{BuildReport, BuiltFile, Dependencies, WheelName};
pub use crate::name::canonicalize_name;

/// ABI tag of a wheel that is compatible with every interpreter ABI.
///
/// This is a marker produced by builds, never a target that can be requested.
pub const UNIVERSAL_ABI: &str = "none";
