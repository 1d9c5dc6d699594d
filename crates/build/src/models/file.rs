use crate::UNIVERSAL_ABI;
use crate::error::{ErrorKind, Result};
use crate::models::WheelName;
use crate::models::wheel::normalize_abi;
use std::collections::{BTreeMap, BTreeSet};

/// Install-time dependencies of a wheel, keyed by the tool that provides them
/// (e.g. `"apt"`), each with the set of package names required from it.
pub type Dependencies = BTreeMap<String, BTreeSet<String>>;

/// A wheel produced by a build, as reported by the worker.
///
/// The classification tags normally mirror the filename (see
/// [`from_filename`](Self::from_filename)) but are carried separately because
/// the ledger stores and queries them individually.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BuiltFile {
    pub filename: String,
    /// File size in bytes.
    pub size: u64,
    /// Hex-encoded SHA256 digest of the wheel.
    pub hash: String,
    pub package_tag: String,
    pub package_version_tag: String,
    pub py_version_tag: String,
    pub abi_tag: String,
    pub platform_tag: String,
    #[cfg_attr(feature = "serde", serde(default))]
    pub dependencies: Dependencies,
}
impl BuiltFile {
    /// Describe a wheel from its filename, size and hash, deriving the
    /// classification tags from the filename.
    pub fn from_filename(filename: impl Into<String>, size: u64, hash: impl Into<String>) -> Result<Self> {
        let filename = filename.into();
        let name: WheelName = filename.parse()?;
        Ok(Self {
            filename,
            size,
            hash: hash.into(),
            package_tag: name.package,
            package_version_tag: name.version,
            py_version_tag: name.python,
            abi_tag: name.abi,
            platform_tag: name.platform,
            dependencies: Dependencies::new(),
        })
    }

    pub fn with_dependency(mut self, tool: impl Into<String>, name: impl Into<String>) -> Self {
        self.dependencies.entry(tool.into()).or_default().insert(name.into());
        self
    }

    /// The ABI tag, with the retired `noabi` spelling read as [`UNIVERSAL_ABI`].
    pub fn canonical_abi_tag(&self) -> &str {
        normalize_abi(&self.abi_tag)
    }

    /// Returns `true` if the wheel installs on every interpreter ABI.
    pub fn is_universal(&self) -> bool {
        self.canonical_abi_tag() == UNIVERSAL_ABI
    }

    /// Check that the classification tags agree with the filename.
    ///
    /// Returns [`ErrorKind::TagMismatch`] naming the first tag that differs.
    pub fn check_tags(&self) -> Result<()> {
        let name: WheelName = self.filename.parse()?;
        let tags = [
            ("package", self.package_tag.as_str(), name.package.as_str()),
            ("version", self.package_version_tag.as_str(), name.version.as_str()),
            ("python", self.py_version_tag.as_str(), name.python.as_str()),
            ("abi", self.canonical_abi_tag(), name.abi.as_str()),
            ("platform", self.platform_tag.as_str(), name.platform.as_str()),
        ];
        for (tag, declared, expected) in tags {
            if declared != expected {
                exn::bail!(ErrorKind::TagMismatch {
                    filename: self.filename.clone(),
                    tag,
                    declared: declared.to_string(),
                });
            }
        }
        Ok(())
    }
}
