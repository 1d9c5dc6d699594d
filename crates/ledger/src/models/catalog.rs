use crate::error::{Error, ErrorKind};
use exn::ResultExt;
use time::UtcDateTime;

/// A package in the catalog.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Package {
    pub name: String,
    /// Reason the package is excluded from building, if it is.
    pub skip: Option<String>,
}

/// A released version of a package.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Version {
    pub package: String,
    pub version: String,
    pub released: UtcDateTime,
    /// Reason the version is excluded from building, if it is.
    pub skip: Option<String>,
}

#[derive(sqlx::FromRow)]
pub(crate) struct PackageRow {
    package: String,
    skip: Option<String>,
}
impl From<PackageRow> for Package {
    fn from(row: PackageRow) -> Self {
        Self { name: row.package, skip: row.skip }
    }
}

#[derive(sqlx::FromRow)]
pub(crate) struct VersionRow {
    package: String,
    version: String,
    released: i64,
    skip: Option<String>,
}
impl TryFrom<VersionRow> for Version {
    type Error = Error;
    fn try_from(row: VersionRow) -> Result<Self, Self::Error> {
        Ok(Self {
            package: row.package,
            version: row.version,
            released: UtcDateTime::from_unix_timestamp(row.released)
                .or_raise(|| ErrorKind::InvalidData("release date"))?,
            skip: row.skip,
        })
    }
}
