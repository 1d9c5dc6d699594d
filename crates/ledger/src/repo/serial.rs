use crate::Repository;
use crate::error::{ErrorKind, Result};
use exn::ResultExt;

impl Repository {
    /// The last upstream index serial that was fully ingested.
    ///
    /// Starts at zero on a fresh database.
    pub async fn serial(&self) -> Result<u64> {
        let serial: i64 = sqlx::query_scalar(include_str!("../../queries/get_serial.sql"))
            .fetch_one(&self.pool)
            .await
            .or_raise(|| ErrorKind::Database)?;
        u64::try_from(serial).or_raise(|| ErrorKind::InvalidData("serial"))
    }

    /// Record the upstream index serial that has been ingested up to.
    ///
    /// The serial only ever moves forwards. Storing the current value again is
    /// fine; anything lower fails with [`ErrorKind::SerialRegression`] and
    /// leaves the stored serial alone. The comparison happens in the same
    /// statement as the write, so concurrent writers can't interleave a
    /// regression between a check and an update.
    pub async fn set_serial(&self, serial: u64) -> Result<()> {
        let value = i64::try_from(serial).or_raise(|| ErrorKind::InvalidData("serial"))?;
        let result = sqlx::query(include_str!("../../queries/set_serial.sql"))
            .bind(value)
            .execute(&self.pool)
            .await
            .or_raise(|| ErrorKind::Database)?;
        if result.rows_affected() == 0 {
            let current = self.serial().await?;
            tracing::warn!(current, requested = serial, "Refusing to move serial backwards");
            exn::bail!(ErrorKind::SerialRegression { current, requested: serial });
        }
        tracing::info!(serial, "Updated serial");
        Ok(())
    }
}
