use crate::models::BuiltFile;
use std::time::Duration;

/// Everything a worker reports about one finished build attempt.
///
/// A report is recorded whether or not the build succeeded; a failed build
/// still carries its log, and usually no files. The `abi_tag` is the target
/// the attempt was dispatched for, which need not match the ABI tags of the
/// files it actually produced.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BuildReport {
    pub package: String,
    pub version: String,
    pub worker_id: u64,
    #[cfg_attr(feature = "serde", serde(with = "crate::models::serde_duration"))]
    pub duration: Duration,
    pub success: bool,
    pub abi_tag: String,
    /// Full build log.
    #[cfg_attr(feature = "serde", serde(default))]
    pub output: String,
    #[cfg_attr(feature = "serde", serde(default))]
    pub files: Vec<BuiltFile>,
}
impl BuildReport {
    /// A failed attempt with no files.
    pub fn failure(
        package: impl Into<String>,
        version: impl Into<String>,
        abi_tag: impl Into<String>,
        worker_id: u64,
        duration: Duration,
        output: impl Into<String>,
    ) -> Self {
        Self {
            package: package.into(),
            version: version.into(),
            worker_id,
            duration,
            success: false,
            abi_tag: abi_tag.into(),
            output: output.into(),
            files: Vec::new(),
        }
    }

    /// A successful attempt that produced `files`.
    pub fn success(
        package: impl Into<String>,
        version: impl Into<String>,
        abi_tag: impl Into<String>,
        worker_id: u64,
        duration: Duration,
        output: impl Into<String>,
        files: Vec<BuiltFile>,
    ) -> Self {
        Self {
            success: true,
            files,
            ..Self::failure(package, version, abi_tag, worker_id, duration, output)
        }
    }

    /// Returns `true` if any produced file installs on every interpreter ABI.
    pub fn is_universal(&self) -> bool {
        self.files.iter().any(BuiltFile::is_universal)
    }
}
