use crate::Repository;
use crate::error::{ErrorKind, Result};
use crate::models::{BuildId, FileRow};
use exn::ResultExt;
use std::collections::HashSet;
use time::UtcDateTime;
use tracing::instrument;
use wheelhouse_build::{BuildReport, UNIVERSAL_ABI};

impl Repository {
    /// Record the outcome of a build attempt.
    ///
    /// The attempt, its log, every file it produced and each file's
    /// dependencies are written in a single transaction: either all of it is
    /// recorded or none of it is. A filename that is already on record from an
    /// earlier build is taken over by this one, and its old dependencies are
    /// replaced.
    ///
    /// Failed builds are recorded too; they are what moves the resolver on to
    /// the next ABI.
    ///
    /// Returns [`ErrorKind::MalformedPayload`] if the report is inconsistent
    /// and [`ErrorKind::VersionNotFound`] if the version isn't in the catalog.
    /// In both cases nothing is recorded.
    #[instrument(skip_all, fields(package = %report.package, version = %report.version, abi_tag = %report.abi_tag))]
    pub async fn commit_build_result(&self, report: &BuildReport) -> Result<BuildId> {
        validate(report)?;
        let built_by = i64::try_from(report.worker_id).or_raise(|| malformed("worker id out of range"))?;
        let duration_ms = i64::try_from(report.duration.as_millis()).or_raise(|| malformed("duration out of range"))?;
        let files = report
            .files
            .iter()
            .map(FileRow::try_from)
            .collect::<Result<Vec<_>>>()
            .or_raise(|| malformed("file size out of range"))?;

        let mut tx = self.pool.begin().await.or_raise(|| ErrorKind::Database)?;
        // The build row goes in first: the transaction takes the write lock
        // straight away, and a missing version shows up as no row returned.
        let build_id: Option<i64> = sqlx::query_scalar(include_str!("../../queries/insert_build.sql"))
            .bind(&report.package)
            .bind(&report.version)
            .bind(built_by)
            .bind(UtcDateTime::now().unix_timestamp())
            .bind(duration_ms)
            .bind(report.success)
            .bind(&report.abi_tag)
            .fetch_optional(&mut *tx)
            .await
            .or_raise(|| ErrorKind::Database)?;
        let Some(build_id) = build_id else {
            exn::bail!(ErrorKind::VersionNotFound(report.package.clone(), report.version.clone()));
        };
        sqlx::query(include_str!("../../queries/insert_output.sql"))
            .bind(build_id)
            .bind(&report.output)
            .execute(&mut *tx)
            .await
            .or_raise(|| ErrorKind::Database)?;
        for (row, file) in files.into_iter().zip(&report.files) {
            let previous: Option<i64> = sqlx::query_scalar(include_str!("../../queries/delete_file.sql"))
                .bind(&row.filename)
                .fetch_optional(&mut *tx)
                .await
                .or_raise(|| ErrorKind::Database)?;
            if let Some(previous) = previous {
                tracing::debug!(filename = %row.filename, previous, "Replacing file from earlier build");
            }
            sqlx::query(include_str!("../../queries/insert_file.sql"))
                .bind(&row.filename)
                .bind(build_id)
                .bind(row.filesize)
                .bind(&row.filehash)
                .bind(&row.package_tag)
                .bind(&row.package_version_tag)
                .bind(&row.py_version_tag)
                .bind(&row.abi_tag)
                .bind(&row.platform_tag)
                .execute(&mut *tx)
                .await
                .or_raise(|| ErrorKind::Database)?;
            for (tool, dependencies) in &file.dependencies {
                for dependency in dependencies {
                    sqlx::query(include_str!("../../queries/insert_dependency.sql"))
                        .bind(&row.filename)
                        .bind(tool)
                        .bind(dependency)
                        .execute(&mut *tx)
                        .await
                        .or_raise(|| ErrorKind::Database)?;
                }
            }
        }
        tx.commit().await.or_raise(|| ErrorKind::Database)?;

        tracing::info!(
            build_id,
            success = report.success,
            files = report.files.len(),
            universal = report.is_universal(),
            "Recorded build"
        );
        Ok(BuildId(build_id))
    }
}

fn malformed(reason: &str) -> ErrorKind {
    ErrorKind::MalformedPayload(reason.to_string())
}

/// Reject reports that can't be recorded as they stand.
fn validate(report: &BuildReport) -> Result<()> {
    if report.package.is_empty() || report.version.is_empty() {
        exn::bail!(malformed("missing package or version"));
    }
    if report.abi_tag.is_empty() {
        exn::bail!(malformed("missing ABI tag"));
    }
    if report.abi_tag == UNIVERSAL_ABI {
        exn::bail!(malformed("the universal ABI cannot be requested"));
    }
    let mut seen = HashSet::with_capacity(report.files.len());
    for file in &report.files {
        if file.filename.is_empty() {
            exn::bail!(malformed("file without a filename"));
        }
        if !seen.insert(file.filename.as_str()) {
            exn::bail!(ErrorKind::MalformedPayload(format!("duplicate file: {}", file.filename)));
        }
        file.check_tags()
            .or_raise(|| ErrorKind::MalformedPayload(format!("tags do not match filename: {}", file.filename)))?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use crate::error::ErrorKind;
    use crate::repo::testutil::{failure, seeded, success, wheel};
    use crate::{Database, Repository};
    use rstest::rstest;
    use std::time::Duration;
    use wheelhouse_build::{BuildReport, BuiltFile};

    #[tokio::test]
    async fn test_commit_success() {
        let repo = seeded("foo", "1.0", &["cp35m"]).await;
        let file = wheel("foo-1.0-cp35-cp35m-linux_armv7l.whl")
            .with_dependency("apt", "libssl1.1")
            .with_dependency("apt", "zlib1g");
        let id = repo.commit_build_result(&success("foo", "1.0", "cp35m", vec![file.clone()])).await.unwrap();

        let builds = repo.builds("foo", "1.0").await.unwrap();
        assert_eq!(builds.len(), 1);
        assert_eq!(builds[0].id, id);
        assert!(builds[0].success);
        assert_eq!(builds[0].worker_id, 1);
        assert_eq!(builds[0].duration, Duration::from_secs(60));
        assert_eq!(builds[0].abi_tag, "cp35m");
        assert_eq!(repo.build_output(id).await.unwrap(), "Successfully built");

        let files = repo.build_files(id).await.unwrap();
        assert_eq!(files.len(), 1);
        assert_eq!(files[0].build_id, id);
        assert_eq!(files[0].file, file);
    }

    #[tokio::test]
    async fn test_commit_failure_keeps_output() {
        let repo = seeded("foo", "1.0", &["cp35m"]).await;
        let id = repo.commit_build_result(&failure("foo", "1.0", "cp35m")).await.unwrap();
        let builds = repo.builds("foo", "1.0").await.unwrap();
        assert_eq!(builds.len(), 1);
        assert!(!builds[0].success);
        assert_eq!(repo.build_output(id).await.unwrap(), "error: command 'gcc' failed");
        assert!(repo.build_files(id).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_commit_for_unknown_version_records_nothing() {
        let repo = seeded("foo", "1.0", &["cp35m"]).await;
        let report = success("foo", "2.0", "cp35m", vec![wheel("foo-2.0-py3-none-any.whl")]);
        let err = repo.commit_build_result(&report).await.unwrap_err();
        assert_eq!(*err, ErrorKind::VersionNotFound("foo".to_string(), "2.0".to_string()));
        let stats = repo.statistics().await.unwrap();
        assert_eq!(stats.builds_count, 0);
        assert_eq!(stats.files_count, 0);
        assert!(repo.file_dependencies("foo-2.0-py3-none-any.whl").await.unwrap().is_empty());
    }

    #[rstest]
    #[case::empty_package(BuildReport::failure("", "1.0", "cp35m", 1, Duration::ZERO, ""))]
    #[case::empty_version(BuildReport::failure("foo", "", "cp35m", 1, Duration::ZERO, ""))]
    #[case::empty_abi(BuildReport::failure("foo", "1.0", "", 1, Duration::ZERO, ""))]
    #[case::universal_abi(BuildReport::failure("foo", "1.0", "none", 1, Duration::ZERO, ""))]
    #[case::worker_out_of_range(BuildReport::failure("foo", "1.0", "cp35m", u64::MAX, Duration::ZERO, ""))]
    #[case::duration_out_of_range(BuildReport::failure("foo", "1.0", "cp35m", 1, Duration::MAX, ""))]
    #[tokio::test]
    async fn test_malformed_reports_are_rejected(#[case] report: BuildReport) {
        let repo = seeded("foo", "1.0", &["cp35m"]).await;
        let err = repo.commit_build_result(&report).await.unwrap_err();
        assert!(matches!(*err, ErrorKind::MalformedPayload(_)), "{err:?}");
        assert!(repo.builds("foo", "1.0").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_duplicate_filename_in_report_is_rejected() {
        let repo = seeded("foo", "1.0", &["cp35m"]).await;
        let file = wheel("foo-1.0-py3-none-any.whl");
        let report = success("foo", "1.0", "cp35m", vec![file.clone(), file]);
        let err = repo.commit_build_result(&report).await.unwrap_err();
        assert_eq!(*err, ErrorKind::MalformedPayload("duplicate file: foo-1.0-py3-none-any.whl".to_string()));
        assert!(repo.builds("foo", "1.0").await.unwrap().is_empty());
    }

    #[rstest]
    #[case::abi("foo-1.0-cp35-cp35m-linux_armv7l.whl", |f: &mut BuiltFile| f.abi_tag = "none".to_string())]
    #[case::version("foo-1.0-py3-none-any.whl", |f: &mut BuiltFile| f.package_version_tag = "1.1".to_string())]
    #[case::unparseable("foo-1.0.tar.gz", |_: &mut BuiltFile| {})]
    #[tokio::test]
    async fn test_file_tags_must_match_filename(#[case] filename: &str, #[case] tamper: fn(&mut BuiltFile)) {
        let repo = seeded("foo", "1.0", &["cp35m"]).await;
        let mut file = BuiltFile {
            filename: filename.to_string(),
            ..wheel("foo-1.0-cp35-cp35m-linux_armv7l.whl")
        };
        tamper(&mut file);
        let err = repo.commit_build_result(&success("foo", "1.0", "cp35m", vec![file])).await.unwrap_err();
        assert!(matches!(*err, ErrorKind::MalformedPayload(_)));
        assert!(repo.builds("foo", "1.0").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_retired_abi_tag_is_stored_as_universal() {
        let repo = seeded("foo", "1.0", &["cp35m", "cp36m"]).await;
        let mut file = wheel("foo-1.0-py3-noabi-any.whl");
        file.abi_tag = "noabi".to_string();
        let id = repo.commit_build_result(&success("foo", "1.0", "cp35m", vec![file])).await.unwrap();
        assert_eq!(repo.build_files(id).await.unwrap()[0].file.abi_tag, "none");
        // A universal wheel satisfies every ABI, so the version is done.
        assert!(repo.next_build_targets().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_resubmitted_file_moves_to_new_build() {
        let repo = seeded("foo", "1.0", &["cp35m", "cp36m"]).await;
        let filename = "foo-1.0-cp35-cp35m-linux_armv7l.whl";
        let first = wheel(filename).with_dependency("apt", "libxml2");
        let first_id = repo.commit_build_result(&success("foo", "1.0", "cp35m", vec![first])).await.unwrap();
        let second = BuiltFile::from_filename(filename, 2048, "other-hash")
            .unwrap()
            .with_dependency("apt", "libxslt1.1");
        let second_id = repo.commit_build_result(&success("foo", "1.0", "cp35m", vec![second])).await.unwrap();

        assert!(second_id > first_id);
        assert!(repo.build_files(first_id).await.unwrap().is_empty());
        let files = repo.build_files(second_id).await.unwrap();
        assert_eq!(files.len(), 1);
        assert_eq!(files[0].file.hash, "other-hash");
        assert_eq!(files[0].file.size, 2048);
        let dependencies = repo.file_dependencies(filename).await.unwrap();
        assert_eq!(dependencies.len(), 1);
        assert_eq!(dependencies["apt"].iter().collect::<Vec<_>>(), vec!["libxslt1.1"]);
        // Both attempts stay on record.
        assert_eq!(repo.builds("foo", "1.0").await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_concurrent_commits() {
        let dir = tempfile::tempdir().unwrap();
        let db = Database::connect(dir.path().join("ledger.db"), None).await.unwrap();
        let repo = Repository::from(&db);
        repo.add_package("foo", None).await.unwrap();
        repo.add_version("foo", "1.0", None, None).await.unwrap();
        let first = failure("foo", "1.0", "cp35m");
        let second = success("foo", "1.0", "cp36m", vec![wheel("foo-1.0-cp36-cp36m-linux_armv7l.whl")]);
        let (a, b) = tokio::join!(repo.commit_build_result(&first), repo.commit_build_result(&second));
        assert_ne!(a.unwrap(), b.unwrap());
        assert_eq!(repo.builds("foo", "1.0").await.unwrap().len(), 2);
        db.close().await;
    }

    #[tokio::test]
    async fn test_build_ids_increase() {
        let repo = seeded("foo", "1.0", &["cp35m"]).await;
        let mut previous = None;
        for _ in 0..3 {
            let id = repo.commit_build_result(&failure("foo", "1.0", "cp35m")).await.unwrap();
            if let Some(previous) = previous {
                assert!(id > previous);
            }
            previous = Some(id);
        }
    }
}
