mod build;
mod catalog;
mod stats;
mod target;

pub use self::build::{Build, BuildId, FileRecord};
pub(crate) use self::build::{BuildRow, DependencyRow, FileRow};
pub use self::catalog::{Package, Version};
pub(crate) use self::catalog::{PackageRow, VersionRow};
pub use self::stats::Statistics;
pub(crate) use self::stats::StatisticsRow;
pub use self::target::BuildTarget;
pub(crate) use self::target::TargetRow;
