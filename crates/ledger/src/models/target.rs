use std::fmt::{Display, Formatter, Result as FmtResult};

/// One unit of outstanding work: build `version` of `package` for `abi_tag`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct BuildTarget {
    pub package: String,
    pub version: String,
    pub abi_tag: String,
}
impl BuildTarget {
    pub fn new(package: impl Into<String>, version: impl Into<String>, abi_tag: impl Into<String>) -> Self {
        Self {
            package: package.into(),
            version: version.into(),
            abi_tag: abi_tag.into(),
        }
    }
}
impl Display for BuildTarget {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        write!(f, "{} {} ({})", self.package, self.version, self.abi_tag)
    }
}

#[derive(sqlx::FromRow)]
pub(crate) struct TargetRow {
    package: String,
    version: String,
    abi_tag: String,
}
impl From<TargetRow> for BuildTarget {
    fn from(row: TargetRow) -> Self {
        Self {
            package: row.package,
            version: row.version,
            abi_tag: row.abi_tag,
        }
    }
}
