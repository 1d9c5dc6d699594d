use crate::Repository;
use crate::error::{ErrorKind, Result};
use crate::models::{Statistics, StatisticsRow};
use exn::ResultExt;
use time::{Duration, UtcDateTime};

impl Repository {
    /// Summarise the catalog and ledger in a single consistent read.
    pub async fn statistics(&self) -> Result<Statistics> {
        let cutoff = UtcDateTime::now() - Duration::HOUR;
        let row: StatisticsRow = sqlx::query_as(include_str!("../../queries/statistics.sql"))
            .bind(cutoff.unix_timestamp())
            .fetch_one(&self.pool)
            .await
            .or_raise(|| ErrorKind::Database)?;
        Statistics::try_from(row)
    }
}
