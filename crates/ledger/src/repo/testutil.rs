use crate::{Database, Repository};
use std::time::Duration;
use wheelhouse_build::{BuildReport, BuiltFile};

pub(crate) async fn repository() -> Repository {
    let db = Database::connect_in_memory().await.unwrap();
    Repository::from(&db)
}

/// A repository with `package` at `version` and the given ABIs registered.
pub(crate) async fn seeded(package: &str, version: &str, abis: &[&str]) -> Repository {
    let repo = repository().await;
    repo.add_package(package, None).await.unwrap();
    repo.add_version(package, version, None, None).await.unwrap();
    for abi in abis {
        repo.add_build_abi(abi).await.unwrap();
    }
    repo
}

pub(crate) fn wheel(filename: &str) -> BuiltFile {
    BuiltFile::from_filename(filename, 1024, format!("sha256-of-{filename}")).unwrap()
}

pub(crate) fn failure(package: &str, version: &str, abi: &str) -> BuildReport {
    BuildReport::failure(package, version, abi, 1, Duration::from_secs(30), "error: command 'gcc' failed")
}

pub(crate) fn success(package: &str, version: &str, abi: &str, files: Vec<BuiltFile>) -> BuildReport {
    BuildReport::success(package, version, abi, 1, Duration::from_secs(60), "Successfully built", files)
}
