use regex::Regex;
use std::sync::LazyLock;

macro_rules! regex {
    ($name:ident, $regex:expr) => {
        pub(crate) static $name: LazyLock<Regex> = LazyLock::new(|| Regex::new($regex).unwrap());
    };
}

/// File extension of a wheel, including the dot.
pub(crate) const WHEEL_EXTENSION: &str = ".whl";
/// ABI tag used by older versions of `bdist_wheel` before `none` was settled on.
pub(crate) const RETIRED_UNIVERSAL_ABI: &str = "noabi";

// PEP 503: runs of separators are equivalent to a single hyphen.
regex!(NAME_SEPARATORS_REGEX, r"[-_.]+");
