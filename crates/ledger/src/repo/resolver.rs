use crate::Repository;
use crate::error::{ErrorKind, Result};
use crate::models::{BuildTarget, TargetRow};
use exn::ResultExt;
use tracing::instrument;

impl Repository {
    /// Work out what still needs building, one target per version.
    ///
    /// Every version that isn't skipped (and whose package isn't skipped)
    /// should be built for every registered ABI, except that:
    ///
    /// - once any build of a version produces a universal (`none`) wheel, the
    ///   version is finished for every ABI;
    /// - otherwise an ABI is finished once it has been attempted at all,
    ///   successfully or not. The ABI of the produced wheel counts, falling
    ///   back to the requested ABI for builds that produced nothing.
    ///
    /// Of each version's remaining ABIs only the lowest is returned. Most
    /// packages turn out to build universal wheels, so one attempt is usually
    /// all a version needs; further ABIs are only handed out after a failure
    /// or an ABI-specific success. A version drains out of the work set once
    /// every ABI has been tried.
    ///
    /// The result is computed afresh from a single consistent snapshot on
    /// every call; results are ordered by package, then version.
    #[instrument(skip(self))]
    pub async fn next_build_targets(&self) -> Result<Vec<BuildTarget>> {
        let rows: Vec<TargetRow> = sqlx::query_as(include_str!("../../queries/next_build_targets.sql"))
            .fetch_all(&self.pool)
            .await
            .or_raise(|| ErrorKind::Database)?;
        let targets: Vec<BuildTarget> = rows.into_iter().map(BuildTarget::from).collect();
        tracing::debug!(count = targets.len(), "Resolved outstanding build targets");
        Ok(targets)
    }
}

#[cfg(test)]
mod tests {
    use crate::BuildTarget;
    use crate::repo::testutil::{failure, repository, seeded, success, wheel};

    #[tokio::test]
    async fn test_fresh_version_gets_lowest_abi() {
        let repo = seeded("foo", "1.0", &["cp37m", "cp35m", "cp36m"]).await;
        let targets = repo.next_build_targets().await.unwrap();
        assert_eq!(targets, vec![BuildTarget::new("foo", "1.0", "cp35m")]);
    }

    #[tokio::test]
    async fn test_no_abis_means_no_work() {
        let repo = seeded("foo", "1.0", &[]).await;
        assert!(repo.next_build_targets().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_empty_catalog_means_no_work() {
        let repo = repository().await;
        repo.add_build_abi("cp35m").await.unwrap();
        assert!(repo.next_build_targets().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_failure_escalates_to_next_abi() {
        let repo = seeded("foo", "1.0", &["cp35m", "cp36m", "cp37m"]).await;
        repo.commit_build_result(&failure("foo", "1.0", "cp35m")).await.unwrap();
        let targets = repo.next_build_targets().await.unwrap();
        assert_eq!(targets, vec![BuildTarget::new("foo", "1.0", "cp36m")]);
    }

    #[tokio::test]
    async fn test_universal_wheel_satisfies_every_abi() {
        let repo = seeded("foo", "1.0", &["cp35m", "cp36m", "cp37m"]).await;
        let report = success("foo", "1.0", "cp35m", vec![wheel("foo-1.0-py3-none-any.whl")]);
        repo.commit_build_result(&report).await.unwrap();
        assert!(repo.next_build_targets().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_universal_wheel_mid_escalation() {
        let repo = seeded("foo", "1.0", &["cp35m", "cp36m", "cp37m"]).await;
        repo.commit_build_result(&failure("foo", "1.0", "cp35m")).await.unwrap();
        let report = success("foo", "1.0", "cp36m", vec![wheel("foo-1.0-py3-none-any.whl")]);
        repo.commit_build_result(&report).await.unwrap();
        assert!(repo.next_build_targets().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_abi_specific_success_escalates() {
        let repo = seeded("foo", "1.0", &["cp35m", "cp36m"]).await;
        let report = success("foo", "1.0", "cp35m", vec![wheel("foo-1.0-cp35-cp35m-linux_armv7l.whl")]);
        repo.commit_build_result(&report).await.unwrap();
        let targets = repo.next_build_targets().await.unwrap();
        assert_eq!(targets, vec![BuildTarget::new("foo", "1.0", "cp36m")]);
        let report = success("foo", "1.0", "cp36m", vec![wheel("foo-1.0-cp36-cp36m-linux_armv7l.whl")]);
        repo.commit_build_result(&report).await.unwrap();
        assert!(repo.next_build_targets().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_file_abi_takes_precedence_over_requested_abi() {
        // Requested cp35m, but the wheel that came out is for cp36m: cp36m is
        // done and cp35m is still outstanding.
        let repo = seeded("foo", "1.0", &["cp35m", "cp36m", "cp37m"]).await;
        let report = success("foo", "1.0", "cp35m", vec![wheel("foo-1.0-cp36-cp36m-linux_armv7l.whl")]);
        repo.commit_build_result(&report).await.unwrap();
        let targets = repo.next_build_targets().await.unwrap();
        assert_eq!(targets, vec![BuildTarget::new("foo", "1.0", "cp35m")]);
        repo.commit_build_result(&failure("foo", "1.0", "cp35m")).await.unwrap();
        let targets = repo.next_build_targets().await.unwrap();
        assert_eq!(targets, vec![BuildTarget::new("foo", "1.0", "cp37m")]);
    }

    #[tokio::test]
    async fn test_all_abis_tried_drains_version() {
        let repo = seeded("foo", "1.0", &["cp35m", "cp36m"]).await;
        repo.commit_build_result(&failure("foo", "1.0", "cp35m")).await.unwrap();
        repo.commit_build_result(&failure("foo", "1.0", "cp36m")).await.unwrap();
        assert!(repo.next_build_targets().await.unwrap().is_empty());
        // A newly registered ABI reopens the version for that ABI only.
        repo.add_build_abi("cp37m").await.unwrap();
        let targets = repo.next_build_targets().await.unwrap();
        assert_eq!(targets, vec![BuildTarget::new("foo", "1.0", "cp37m")]);
    }

    #[tokio::test]
    async fn test_skipped_package_is_excluded() {
        let repo = seeded("foo", "1.0", &["cp35m", "cp36m"]).await;
        repo.add_version("foo", "2.0", None, None).await.unwrap();
        repo.add_package("bar", None).await.unwrap();
        repo.add_version("bar", "0.1", None, None).await.unwrap();
        repo.commit_build_result(&failure("foo", "1.0", "cp35m")).await.unwrap();
        repo.set_package_skip("foo", "reason").await.unwrap();
        let targets = repo.next_build_targets().await.unwrap();
        assert_eq!(targets, vec![BuildTarget::new("bar", "0.1", "cp35m")]);
    }

    #[tokio::test]
    async fn test_skipped_version_is_excluded() {
        let repo = seeded("foo", "1.0", &["cp35m"]).await;
        repo.add_version("foo", "2.0", None, None).await.unwrap();
        repo.set_version_skip("foo", "1.0", "").await.unwrap();
        let targets = repo.next_build_targets().await.unwrap();
        assert_eq!(targets, vec![BuildTarget::new("foo", "2.0", "cp35m")]);
    }

    #[tokio::test]
    async fn test_skip_on_insert_is_excluded() {
        let repo = repository().await;
        repo.add_build_abi("cp35m").await.unwrap();
        repo.add_package("foo", Some("binary only")).await.unwrap();
        repo.add_version("foo", "1.0", None, None).await.unwrap();
        repo.add_package("bar", None).await.unwrap();
        repo.add_version("bar", "1.0", None, Some("yanked")).await.unwrap();
        assert!(repo.next_build_targets().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_one_target_per_version_in_stable_order() {
        let repo = seeded("foo", "1.0", &["cp35m", "cp36m"]).await;
        repo.add_version("foo", "0.9", None, None).await.unwrap();
        repo.add_package("bar", None).await.unwrap();
        repo.add_version("bar", "2.0", None, None).await.unwrap();
        repo.commit_build_result(&failure("foo", "0.9", "cp35m")).await.unwrap();
        let targets = repo.next_build_targets().await.unwrap();
        assert_eq!(
            targets,
            vec![
                BuildTarget::new("bar", "2.0", "cp35m"),
                BuildTarget::new("foo", "0.9", "cp36m"),
                BuildTarget::new("foo", "1.0", "cp35m"),
            ]
        );
        // Polling again without any writes gives the same answer.
        assert_eq!(repo.next_build_targets().await.unwrap(), targets);
    }

    #[tokio::test]
    async fn test_end_to_end() {
        let repo = seeded("foo", "1.0", &["cp35m", "cp36m"]).await;
        assert_eq!(repo.next_build_targets().await.unwrap(), vec![BuildTarget::new("foo", "1.0", "cp35m")]);
        repo.commit_build_result(&failure("foo", "1.0", "cp35m")).await.unwrap();
        assert_eq!(repo.next_build_targets().await.unwrap(), vec![BuildTarget::new("foo", "1.0", "cp36m")]);
        let report = success("foo", "1.0", "cp36m", vec![wheel("foo-1.0-py3-none-any.whl")]);
        repo.commit_build_result(&report).await.unwrap();
        assert!(repo.next_build_targets().await.unwrap().is_empty());
    }
}
