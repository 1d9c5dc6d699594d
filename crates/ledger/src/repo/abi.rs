use crate::Repository;
use crate::error::{ErrorKind, Result};
use exn::ResultExt;
use wheelhouse_build::UNIVERSAL_ABI;

impl Repository {
    /// Register an interpreter ABI that every version should be built for.
    ///
    /// Returns `true` if the ABI is new. The universal marker `none` is not a
    /// target and is rejected with [`ErrorKind::ReservedAbi`].
    pub async fn add_build_abi(&self, abi_tag: impl AsRef<str>) -> Result<bool> {
        let abi_tag = abi_tag.as_ref();
        if abi_tag == UNIVERSAL_ABI || abi_tag.is_empty() {
            exn::bail!(ErrorKind::ReservedAbi(abi_tag.to_string()));
        }
        let result = sqlx::query(include_str!("../../queries/insert_build_abi.sql"))
            .bind(abi_tag)
            .execute(&self.pool)
            .await
            .or_raise(|| ErrorKind::Database)?;
        let new = result.rows_affected() > 0;
        if new {
            tracing::info!(abi_tag, "Registered build ABI");
        }
        Ok(new)
    }

    /// Stop building for an ABI. Build history for it is kept.
    ///
    /// Returns `true` if the ABI was registered.
    pub async fn remove_build_abi(&self, abi_tag: impl AsRef<str>) -> Result<bool> {
        let abi_tag = abi_tag.as_ref();
        let result = sqlx::query(include_str!("../../queries/delete_build_abi.sql"))
            .bind(abi_tag)
            .execute(&self.pool)
            .await
            .or_raise(|| ErrorKind::Database)?;
        let removed = result.rows_affected() > 0;
        if removed {
            tracing::info!(abi_tag, "Removed build ABI");
        }
        Ok(removed)
    }

    /// List the registered ABIs in the order the resolver tries them.
    pub async fn build_abis(&self) -> Result<Vec<String>> {
        sqlx::query_scalar(include_str!("../../queries/list_build_abis.sql"))
            .fetch_all(&self.pool)
            .await
            .or_raise(|| ErrorKind::Database)
    }
}
