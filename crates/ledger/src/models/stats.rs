use crate::error::{Error, ErrorKind};
use exn::ResultExt;
use std::time::Duration;

/// Point-in-time summary of the catalog and ledger, for dashboards.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Statistics {
    /// Packages that are not skipped.
    pub packages_count: u64,
    /// Packages with at least one wheel on record.
    pub packages_built: u64,
    /// Versions that are not skipped (and whose package is not skipped).
    pub versions_count: u64,
    /// Versions with at least one build attempt.
    pub versions_built: u64,
    pub builds_count: u64,
    pub builds_last_hour: u64,
    pub builds_success: u64,
    /// Total time spent building, across all attempts.
    pub builds_time: Duration,
    pub files_count: u64,
    /// Total size of all wheels on record, in bytes.
    pub files_size: u64,
}

#[derive(sqlx::FromRow)]
pub(crate) struct StatisticsRow {
    packages_count: i64,
    packages_built: i64,
    versions_count: i64,
    versions_built: i64,
    builds_count: i64,
    builds_last_hour: i64,
    builds_success: i64,
    builds_time_ms: i64,
    files_count: i64,
    files_size: i64,
}
impl TryFrom<StatisticsRow> for Statistics {
    type Error = Error;
    fn try_from(row: StatisticsRow) -> Result<Self, Self::Error> {
        let count = |value: i64, field: &'static str| u64::try_from(value).or_raise(|| ErrorKind::InvalidData(field));
        Ok(Self {
            packages_count: count(row.packages_count, "packages count")?,
            packages_built: count(row.packages_built, "packages built")?,
            versions_count: count(row.versions_count, "versions count")?,
            versions_built: count(row.versions_built, "versions built")?,
            builds_count: count(row.builds_count, "builds count")?,
            builds_last_hour: count(row.builds_last_hour, "builds last hour")?,
            builds_success: count(row.builds_success, "builds success")?,
            builds_time: Duration::from_millis(count(row.builds_time_ms, "builds time")?),
            files_count: count(row.files_count, "files count")?,
            files_size: count(row.files_size, "files size")?,
        })
    }
}
