use crate::error::{Error, ErrorKind};
use derive_more::Display;
use exn::ResultExt;
use std::time::Duration;
use time::UtcDateTime;
use wheelhouse_build::{BuiltFile, Dependencies};

/// Identifier of a recorded build attempt.
///
/// Allocated by the ledger when a result is committed; later builds always
/// have larger identifiers.
#[derive(Debug, Display, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct BuildId(pub(crate) i64);
impl BuildId {
    pub fn get(self) -> i64 {
        self.0
    }
}
impl From<i64> for BuildId {
    fn from(id: i64) -> Self {
        Self(id)
    }
}

/// A recorded build attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Build {
    pub id: BuildId,
    pub package: String,
    pub version: String,
    pub worker_id: u64,
    pub built_at: UtcDateTime,
    pub duration: Duration,
    pub success: bool,
    /// The ABI the attempt was dispatched for.
    pub abi_tag: String,
}

/// A wheel currently on record, along with the build that produced it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileRecord {
    pub build_id: BuildId,
    pub file: BuiltFile,
}

#[derive(sqlx::FromRow)]
pub(crate) struct BuildRow {
    build_id: i64,
    package: String,
    version: String,
    built_by: i64,
    built_at: i64,
    duration_ms: i64,
    success: bool,
    abi_tag: String,
}
impl TryFrom<BuildRow> for Build {
    type Error = Error;
    fn try_from(row: BuildRow) -> Result<Self, Self::Error> {
        Ok(Self {
            id: BuildId(row.build_id),
            package: row.package,
            version: row.version,
            worker_id: u64::try_from(row.built_by).or_raise(|| ErrorKind::InvalidData("worker id"))?,
            built_at: UtcDateTime::from_unix_timestamp(row.built_at).or_raise(|| ErrorKind::InvalidData("build date"))?,
            duration: Duration::from_millis(
                u64::try_from(row.duration_ms).or_raise(|| ErrorKind::InvalidData("build duration"))?,
            ),
            success: row.success,
            abi_tag: row.abi_tag,
        })
    }
}

#[derive(sqlx::FromRow)]
pub(crate) struct FileRow {
    pub(crate) filename: String,
    pub(crate) build_id: i64,
    pub(crate) filesize: i64,
    pub(crate) filehash: String,
    pub(crate) package_tag: String,
    pub(crate) package_version_tag: String,
    pub(crate) py_version_tag: String,
    pub(crate) abi_tag: String,
    pub(crate) platform_tag: String,
}
impl TryFrom<&BuiltFile> for FileRow {
    type Error = Error;
    /// The build id is allocated at commit time, so it is left at zero here.
    fn try_from(file: &BuiltFile) -> Result<Self, Self::Error> {
        Ok(Self {
            filename: file.filename.clone(),
            build_id: 0,
            filesize: i64::try_from(file.size).or_raise(|| ErrorKind::InvalidData("file size"))?,
            filehash: file.hash.clone(),
            package_tag: file.package_tag.clone(),
            package_version_tag: file.package_version_tag.clone(),
            py_version_tag: file.py_version_tag.clone(),
            abi_tag: file.canonical_abi_tag().to_string(),
            platform_tag: file.platform_tag.clone(),
        })
    }
}
impl TryFrom<FileRow> for FileRecord {
    type Error = Error;
    fn try_from(row: FileRow) -> Result<Self, Self::Error> {
        Ok(Self {
            build_id: BuildId(row.build_id),
            file: BuiltFile {
                filename: row.filename,
                size: u64::try_from(row.filesize).or_raise(|| ErrorKind::InvalidData("file size"))?,
                hash: row.filehash,
                package_tag: row.package_tag,
                package_version_tag: row.package_version_tag,
                py_version_tag: row.py_version_tag,
                abi_tag: row.abi_tag,
                platform_tag: row.platform_tag,
                dependencies: Dependencies::new(),
            },
        })
    }
}

#[derive(sqlx::FromRow)]
pub(crate) struct DependencyRow {
    pub(crate) filename: String,
    pub(crate) tool: String,
    pub(crate) dependency: String,
}
