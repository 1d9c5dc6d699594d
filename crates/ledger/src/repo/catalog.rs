use crate::Repository;
use crate::error::{ErrorKind, Result};
use crate::models::{Package, PackageRow, Version, VersionRow};
use exn::ResultExt;
use time::UtcDateTime;

impl Repository {
    // =========================================================================
    // Insert
    // =========================================================================

    /// Add a package to the catalog.
    ///
    /// Returns `true` if the package is new and `false` if it was already
    /// known. Re-announcing a package never fails and never touches the
    /// existing record (including its skip reason), so concurrent ingest
    /// processes can race on the same name: exactly one of them sees `true`.
    pub async fn add_package(&self, package: impl AsRef<str>, skip: Option<&str>) -> Result<bool> {
        let package = package.as_ref();
        let result = sqlx::query(include_str!("../../queries/insert_package.sql"))
            .bind(package)
            .bind(skip)
            .execute(&self.pool)
            .await
            .or_raise(|| ErrorKind::Database)?;
        let new = result.rows_affected() > 0;
        match new {
            true => tracing::info!(package, skip, "Added package"),
            false => tracing::debug!(package, "Package already known"),
        }
        Ok(new)
    }

    /// Add a version of an existing package to the catalog.
    ///
    /// Like [`add_package`](Self::add_package), this is idempotent and returns
    /// whether the version is new. `released` defaults to now.
    ///
    /// Returns [`ErrorKind::PackageNotFound`] if the package hasn't been added.
    pub async fn add_version(
        &self,
        package: impl AsRef<str>,
        version: impl AsRef<str>,
        released: Option<UtcDateTime>,
        skip: Option<&str>,
    ) -> Result<bool> {
        let (package, version) = (package.as_ref(), version.as_ref());
        let released = released.unwrap_or_else(UtcDateTime::now);
        // Inserted only if the package exists, so a missing package shows up as
        // zero rows rather than as a foreign key failure.
        let result = sqlx::query(include_str!("../../queries/insert_version.sql"))
            .bind(package)
            .bind(version)
            .bind(released.unix_timestamp())
            .bind(skip)
            .execute(&self.pool)
            .await
            .or_raise(|| ErrorKind::Database)?;
        if result.rows_affected() > 0 {
            tracing::info!(package, version, skip, "Added version");
            return Ok(true);
        }
        if !self.package_exists(package).await? {
            exn::bail!(ErrorKind::PackageNotFound(package.to_string()));
        }
        tracing::debug!(package, version, "Version already known");
        Ok(false)
    }

    // =========================================================================
    // Skip
    // =========================================================================

    /// Exclude a package (all of its versions) from building.
    ///
    /// Setting a skip on a package that isn't in the catalog does nothing.
    pub async fn set_package_skip(&self, package: impl AsRef<str>, reason: impl AsRef<str>) -> Result<()> {
        let (package, reason) = (package.as_ref(), reason.as_ref());
        let result = sqlx::query(include_str!("../../queries/set_package_skip.sql"))
            .bind(package)
            .bind(reason)
            .execute(&self.pool)
            .await
            .or_raise(|| ErrorKind::Database)?;
        match result.rows_affected() {
            0 => tracing::debug!(package, "Not skipping unknown package"),
            _ => tracing::info!(package, reason, "Skipping package"),
        }
        Ok(())
    }

    /// Exclude a single version from building.
    ///
    /// Setting a skip on a version that isn't in the catalog does nothing.
    pub async fn set_version_skip(
        &self,
        package: impl AsRef<str>,
        version: impl AsRef<str>,
        reason: impl AsRef<str>,
    ) -> Result<()> {
        let (package, version, reason) = (package.as_ref(), version.as_ref(), reason.as_ref());
        let result = sqlx::query(include_str!("../../queries/set_version_skip.sql"))
            .bind(package)
            .bind(version)
            .bind(reason)
            .execute(&self.pool)
            .await
            .or_raise(|| ErrorKind::Database)?;
        match result.rows_affected() {
            0 => tracing::debug!(package, version, "Not skipping unknown version"),
            _ => tracing::info!(package, version, reason, "Skipping version"),
        }
        Ok(())
    }

    // =========================================================================
    // Get/List
    // =========================================================================

    async fn package_exists(&self, package: &str) -> Result<bool> {
        let exists: i64 = sqlx::query_scalar(include_str!("../../queries/package_exists.sql"))
            .bind(package)
            .fetch_one(&self.pool)
            .await
            .or_raise(|| ErrorKind::Database)?;
        Ok(exists != 0)
    }

    /// List every package in the catalog, skipped or not, ordered by name.
    pub async fn packages(&self) -> Result<Vec<Package>> {
        let rows: Vec<PackageRow> = sqlx::query_as(include_str!("../../queries/list_packages.sql"))
            .fetch_all(&self.pool)
            .await
            .or_raise(|| ErrorKind::Database)?;
        Ok(rows.into_iter().map(Package::from).collect())
    }

    /// List every version of a package, oldest release first.
    pub async fn versions(&self, package: impl AsRef<str>) -> Result<Vec<Version>> {
        let rows: Vec<VersionRow> = sqlx::query_as(include_str!("../../queries/list_versions.sql"))
            .bind(package.as_ref())
            .fetch_all(&self.pool)
            .await
            .or_raise(|| ErrorKind::Database)?;
        rows.into_iter().map(Version::try_from).collect()
    }

    // =========================================================================
    // Delete
    // =========================================================================

    /// Remove a version from the catalog, along with its whole build history.
    ///
    /// Returns `true` if the version was deleted, `false` if it was not found.
    pub async fn delete_version(&self, package: impl AsRef<str>, version: impl AsRef<str>) -> Result<bool> {
        let (package, version) = (package.as_ref(), version.as_ref());
        let result = sqlx::query(include_str!("../../queries/delete_version.sql"))
            .bind(package)
            .bind(version)
            .execute(&self.pool)
            .await
            .or_raise(|| ErrorKind::Database)?;
        let deleted = result.rows_affected() > 0;
        if deleted {
            tracing::info!(package, version, "Deleted version and its build history");
        }
        Ok(deleted)
    }

    /// Remove a package from the catalog.
    ///
    /// Returns [`ErrorKind::PackageInUse`] while the package still has
    /// versions; delete those first. Returns `false` if the package was not
    /// found.
    pub async fn delete_package(&self, package: impl AsRef<str>) -> Result<bool> {
        let package = package.as_ref();
        // Versions hold a restricting foreign key on their package; check for
        // them in the same statement instead of tripping over the constraint.
        let result = sqlx::query(include_str!("../../queries/delete_package.sql"))
            .bind(package)
            .execute(&self.pool)
            .await
            .or_raise(|| ErrorKind::Database)?;
        if result.rows_affected() > 0 {
            tracing::info!(package, "Deleted package");
            return Ok(true);
        }
        let in_use: i64 = sqlx::query_scalar(include_str!("../../queries/package_has_versions.sql"))
            .bind(package)
            .fetch_one(&self.pool)
            .await
            .or_raise(|| ErrorKind::Database)?;
        if in_use != 0 {
            exn::bail!(ErrorKind::PackageInUse(package.to_string()));
        }
        Ok(false)
    }
}
