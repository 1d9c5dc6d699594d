use crate::consts::NAME_SEPARATORS_REGEX;

/// Normalise a project name the way package indexes compare them (PEP 503).
///
/// Runs of `-`, `_` and `.` collapse into a single `-`, and the result is
/// lowercased, so `Zope.Interface` and `zope_interface` name the same project.
pub fn canonicalize_name(name: impl AsRef<str>) -> String {
    NAME_SEPARATORS_REGEX.replace_all(name.as_ref(), "-").to_lowercase()
}
