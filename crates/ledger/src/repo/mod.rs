//! Repository over the catalog and the build ledger.
//!
//! The two halves are tightly coupled: builds reference catalog versions, the
//! resolver reads both, and deleting a version takes its build history with
//! it. They therefore share one [`Repository`], with each concern's methods
//! kept in its own module.

mod abi;
mod catalog;
mod commit;
mod history;
mod resolver;
mod serial;
mod stats;
#[cfg(test)]
mod testutil;

use crate::Database;
use crate::error::Result;
use crate::models::{DependencyRow, FileRecord};
use std::collections::HashMap;

/// Repository for the catalog and build ledger.
///
/// # Relationships
///
/// - A package has many versions; it cannot be deleted while any remain
/// - A version has many builds; deleting the version deletes its builds
/// - A build has exactly one output (its log) and any number of files
/// - A file belongs to exactly one build and has any number of dependencies
/// - A filename is unique across all builds: committing it again moves it to
///   the new build and replaces its dependencies
#[derive(Debug, Clone)]
pub struct Repository {
    pool: sqlx::SqlitePool,
}
impl From<&Database> for Repository {
    fn from(db: &Database) -> Self {
        Self { pool: db.pool().clone() }
    }
}
impl Repository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: sqlx::SqlitePool) -> Self {
        Self { pool }
    }
}

/// Fill in each file's dependencies from a flat list of dependency rows.
fn attach_dependencies(files: Vec<FileRecord>, dependencies: Vec<DependencyRow>) -> Vec<FileRecord> {
    let mut files: HashMap<String, FileRecord> =
        files.into_iter().map(|record| (record.file.filename.clone(), record)).collect();
    for row in dependencies {
        if let Some(record) = files.get_mut(&row.filename) {
            record.file.dependencies.entry(row.tool).or_default().insert(row.dependency);
        }
    }
    let mut files: Vec<FileRecord> = files.into_values().collect();
    files.sort_by(|a, b| a.file.filename.cmp(&b.file.filename));
    files
}

fn into_records(rows: Vec<crate::models::FileRow>) -> Result<Vec<FileRecord>> {
    rows.into_iter().map(FileRecord::try_from).collect()
}
