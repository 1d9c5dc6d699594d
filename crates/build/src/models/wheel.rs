use crate::UNIVERSAL_ABI;
use crate::consts::{RETIRED_UNIVERSAL_ABI, WHEEL_EXTENSION};
use crate::error::{Error, ErrorKind};
use std::fmt::{Display, Formatter, Result as FmtResult};
use std::str::FromStr;

/// The tags encoded in a wheel's filename (PEP 427).
///
/// `{package}-{version}(-{build})?-{python}-{abi}-{platform}.whl`
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct WheelName {
    pub package: String,
    pub version: String,
    /// Optional build number, only present in six-component names.
    pub build: Option<String>,
    pub python: String,
    pub abi: String,
    pub platform: String,
}
impl WheelName {
    /// Returns `true` if the wheel installs on every interpreter ABI.
    pub fn is_universal(&self) -> bool {
        self.abi == UNIVERSAL_ABI
    }
}

/// Fold the retired spelling of the universal ABI into [`UNIVERSAL_ABI`].
pub(crate) fn normalize_abi(abi: &str) -> &str {
    match abi {
        RETIRED_UNIVERSAL_ABI => UNIVERSAL_ABI,
        abi => abi,
    }
}
impl FromStr for WheelName {
    type Err = Error;
    fn from_str(filename: &str) -> Result<Self, Self::Err> {
        let Some(stem) = filename.strip_suffix(WHEEL_EXTENSION) else {
            exn::bail!(ErrorKind::NotAWheel(filename.to_string()));
        };
        let mut parts: Vec<&str> = stem.split('-').collect();
        let build = match parts.len() {
            5 => None,
            6 => Some(parts.remove(2)),
            found => exn::bail!(ErrorKind::ComponentCount { filename: filename.to_string(), found }),
        };
        let names = ["package", "version", "python", "abi", "platform"];
        let tagged = names.into_iter().zip(parts.iter().copied()).chain(build.map(|b| ("build", b)));
        for (component, value) in tagged {
            if value.is_empty() {
                exn::bail!(ErrorKind::EmptyComponent { filename: filename.to_string(), component });
            }
        }
        let abi = normalize_abi(parts[3]);
        if abi != parts[3] {
            tracing::debug!(filename, "Normalising retired ABI tag '{RETIRED_UNIVERSAL_ABI}' to '{UNIVERSAL_ABI}'");
        }
        Ok(Self {
            package: parts[0].to_string(),
            version: parts[1].to_string(),
            build: build.map(str::to_string),
            python: parts[2].to_string(),
            abi: abi.to_string(),
            platform: parts[4].to_string(),
        })
    }
}
impl Display for WheelName {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        write!(f, "{}-{}-", self.package, self.version)?;
        if let Some(build) = &self.build {
            write!(f, "{build}-")?;
        }
        write!(f, "{}-{}-{}{WHEEL_EXTENSION}", self.python, self.abi, self.platform)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[test]
    fn test_parse_five_components() {
        let name: WheelName = "numpy-1.14.0-cp35-cp35m-linux_armv7l.whl".parse().unwrap();
        assert_eq!(name.package, "numpy");
        assert_eq!(name.version, "1.14.0");
        assert_eq!(name.build, None);
        assert_eq!(name.python, "cp35");
        assert_eq!(name.abi, "cp35m");
        assert_eq!(name.platform, "linux_armv7l");
        assert!(!name.is_universal());
    }

    #[test]
    fn test_parse_with_build_tag() {
        let name: WheelName = "foo-1.0-2-py3-none-any.whl".parse().unwrap();
        assert_eq!(name.build.as_deref(), Some("2"));
        assert_eq!(name.python, "py3");
        assert!(name.is_universal());
        assert_eq!(name.to_string(), "foo-1.0-2-py3-none-any.whl");
    }

    #[test]
    fn test_retired_abi_tag_is_universal() {
        let name: WheelName = "foo-1.0-py2.py3-noabi-any.whl".parse().unwrap();
        assert_eq!(name.abi, "none");
        assert!(name.is_universal());
    }

    #[rstest]
    #[case("foo-1.0-py3-none-any.tar.gz")]
    #[case("foo-1.0-py3-none-any")]
    fn test_not_a_wheel(#[case] filename: &str) {
        let err = filename.parse::<WheelName>().unwrap_err();
        assert_eq!(*err, ErrorKind::NotAWheel(filename.to_string()));
    }

    #[rstest]
    #[case("foo-1.0-any.whl", 3)]
    #[case("foo-1.0-py3-any.whl", 4)]
    #[case("foo-1.0-1-2-py3-none-any.whl", 7)]
    fn test_component_count(#[case] filename: &str, #[case] found: usize) {
        let err = filename.parse::<WheelName>().unwrap_err();
        assert_eq!(*err, ErrorKind::ComponentCount { filename: filename.to_string(), found });
    }

    #[rstest]
    #[case("-1.0-py3-none-any.whl", "package")]
    #[case("foo-1.0-py3--any.whl", "abi")]
    #[case("foo-1.0--py3-none-any.whl", "build")]
    fn test_empty_component(#[case] filename: &str, #[case] component: &'static str) {
        let err = filename.parse::<WheelName>().unwrap_err();
        assert_eq!(*err, ErrorKind::EmptyComponent { filename: filename.to_string(), component });
    }
}
