use crate::Repository;
use crate::error::{ErrorKind, Result};
use crate::models::{Build, BuildId, BuildRow, DependencyRow, FileRecord, FileRow};
use crate::repo::{attach_dependencies, into_records};
use exn::{OptionExt, ResultExt};
use wheelhouse_build::Dependencies;

impl Repository {
    // =========================================================================
    // Get/List
    // =========================================================================

    /// List every recorded attempt at building a version, oldest first.
    pub async fn builds(&self, package: impl AsRef<str>, version: impl AsRef<str>) -> Result<Vec<Build>> {
        let rows: Vec<BuildRow> = sqlx::query_as(include_str!("../../queries/list_builds.sql"))
            .bind(package.as_ref())
            .bind(version.as_ref())
            .fetch_all(&self.pool)
            .await
            .or_raise(|| ErrorKind::Database)?;
        rows.into_iter().map(Build::try_from).collect()
    }

    /// Get the full log of a build.
    pub async fn build_output(&self, build_id: BuildId) -> Result<String> {
        let output: Option<String> = sqlx::query_scalar(include_str!("../../queries/get_build_output.sql"))
            .bind(build_id.get())
            .fetch_optional(&self.pool)
            .await
            .or_raise(|| ErrorKind::Database)?;
        output.ok_or_raise(|| ErrorKind::BuildNotFound(build_id.get()))
    }

    /// List the files currently on record for a build, with their
    /// dependencies.
    ///
    /// Files that a later build took over are no longer listed here.
    pub async fn build_files(&self, build_id: BuildId) -> Result<Vec<FileRecord>> {
        // Both reads share one snapshot, otherwise a commit landing between
        // them pairs files with another build's dependencies.
        let mut tx = self.pool.begin().await.or_raise(|| ErrorKind::Database)?;
        let rows: Vec<FileRow> = sqlx::query_as(include_str!("../../queries/list_build_files.sql"))
            .bind(build_id.get())
            .fetch_all(&mut *tx)
            .await
            .or_raise(|| ErrorKind::Database)?;
        let dependencies: Vec<DependencyRow> =
            sqlx::query_as(include_str!("../../queries/list_build_dependencies.sql"))
                .bind(build_id.get())
                .fetch_all(&mut *tx)
                .await
                .or_raise(|| ErrorKind::Database)?;
        tx.commit().await.or_raise(|| ErrorKind::Database)?;
        Ok(attach_dependencies(into_records(rows)?, dependencies))
    }

    /// List every file on record for a package, across all of its versions.
    pub async fn package_files(&self, package: impl AsRef<str>) -> Result<Vec<FileRecord>> {
        let package = package.as_ref();
        let mut tx = self.pool.begin().await.or_raise(|| ErrorKind::Database)?;
        let rows: Vec<FileRow> = sqlx::query_as(include_str!("../../queries/list_package_files.sql"))
            .bind(package)
            .fetch_all(&mut *tx)
            .await
            .or_raise(|| ErrorKind::Database)?;
        let dependencies: Vec<DependencyRow> =
            sqlx::query_as(include_str!("../../queries/list_package_dependencies.sql"))
                .bind(package)
                .fetch_all(&mut *tx)
                .await
                .or_raise(|| ErrorKind::Database)?;
        tx.commit().await.or_raise(|| ErrorKind::Database)?;
        Ok(attach_dependencies(into_records(rows)?, dependencies))
    }

    /// Get the install-time dependencies of a file, grouped by tool.
    ///
    /// Unknown files have no dependencies.
    pub async fn file_dependencies(&self, filename: impl AsRef<str>) -> Result<Dependencies> {
        let rows: Vec<DependencyRow> = sqlx::query_as(include_str!("../../queries/list_file_dependencies.sql"))
            .bind(filename.as_ref())
            .fetch_all(&self.pool)
            .await
            .or_raise(|| ErrorKind::Database)?;
        let mut dependencies = Dependencies::new();
        for row in rows {
            dependencies.entry(row.tool).or_default().insert(row.dependency);
        }
        Ok(dependencies)
    }

    // =========================================================================
    // Delete
    // =========================================================================

    /// Forget every build attempt of a version, along with their logs, files
    /// and dependencies.
    ///
    /// The version itself stays in the catalog and goes back to looking as if
    /// it had never been built, so the resolver will hand it out again.
    /// Returns the number of builds deleted.
    pub async fn delete_build_history(&self, package: impl AsRef<str>, version: impl AsRef<str>) -> Result<u64> {
        let (package, version) = (package.as_ref(), version.as_ref());
        let result = sqlx::query(include_str!("../../queries/delete_build_history.sql"))
            .bind(package)
            .bind(version)
            .execute(&self.pool)
            .await
            .or_raise(|| ErrorKind::Database)?;
        let deleted = result.rows_affected();
        tracing::info!(package, version, deleted, "Deleted build history");
        Ok(deleted)
    }
}
