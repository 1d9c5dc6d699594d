mod file;
mod report;
#[cfg(feature = "serde")]
mod serde_duration;
mod wheel;

pub use self::file::{BuiltFile, Dependencies};
pub use self::report::BuildReport;
pub use self::wheel::WheelName;
