//! SQLite catalog and build ledger for the wheel build farm.
//!
//! This crate owns all persistent state shared by catalog ingest, the build
//! workers' coordinator and any dashboards:
//!
//! # Architecture
//! - **Catalog**: packages, their versions, and the interpreter ABIs that every
//!   version should be built for. Packages and versions can be *skipped*, which
//!   removes them from the work set without deleting anything.
//! - **Ledger**: the immutable history of build attempts. Each attempt has
//!   exactly one log (output), zero or more wheels (files), and each wheel
//!   zero or more install-time dependencies. A wheel filename is unique across
//!   the whole ledger; reporting it again replaces the earlier record.
//! - **Resolver**: [`Repository::next_build_targets`] derives the outstanding
//!   work from the two above on every call.
//! - **Serial**: the upstream change-feed cursor, which only moves forwards.
//!
//! Writes that span several tables run in a single transaction, so concurrent
//! readers see either all of a build result or none of it.

mod db;
pub mod error;
mod models;
mod repo;

pub use crate::db::{DEFAULT_MAX_CONNECTIONS, Database};
pub use crate::models::{Build, BuildId, BuildTarget, FileRecord, Package, Statistics, Version};
pub use crate::repo::Repository;
pub use wheelhouse_build::{BuildReport, BuiltFile, Dependencies, UNIVERSAL_ABI};
