//! Git version detection.

use std::fmt;
use std::sync::LazyLock;

use regex::Regex;

use crate::error::{ExecError, Result};

static VERSION_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(\d+)\.(\d+)(?:\.(\d+))?").expect("static regex must compile")
});

/// A `major.minor.patch` git version. Ordering compares numerically.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct GitVersion {
    pub major: u32,
    pub minor: u32,
    pub patch: u32,
}

impl GitVersion {
    pub const fn new(major: u32, minor: u32, patch: u32) -> Self {
        Self {
            major,
            minor,
            patch,
        }
    }

    /// Extracts the first version number from `git --version` output.
    ///
    /// A missing patch component reads as `0`.
    ///
    /// ```
    /// # use gitargs_exec::GitVersion;
    /// let v = GitVersion::parse("git version 2.39.3 (Apple Git-146)").unwrap();
    /// assert_eq!(v, GitVersion::new(2, 39, 3));
    /// assert!(v >= GitVersion::new(2, 23, 0));
    /// ```
    ///
    /// # Errors
    ///
    /// Returns [`ExecError::UnparseableVersion`] when no version is present.
    pub fn parse(text: &str) -> Result<Self> {
        let unparseable = || ExecError::UnparseableVersion(text.trim().to_string());
        let caps = VERSION_RE.captures(text).ok_or_else(unparseable)?;
        let component = |idx: usize| -> Result<u32> {
            match caps.get(idx) {
                Some(m) => m.as_str().parse().map_err(|_| unparseable()),
                None => Ok(0),
            }
        };
        Ok(Self::new(component(1)?, component(2)?, component(3)?))
    }
}

impl fmt::Display for GitVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.{}", self.major, self.minor, self.patch)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_variants() {
        assert_eq!(
            GitVersion::parse("git version 2.43.0\n").unwrap(),
            GitVersion::new(2, 43, 0)
        );
        assert_eq!(
            GitVersion::parse("git version 2.45.1.windows.1").unwrap(),
            GitVersion::new(2, 45, 1)
        );
        assert_eq!(
            GitVersion::parse("git version 3.0").unwrap(),
            GitVersion::new(3, 0, 0)
        );
    }

    #[test]
    fn test_parse_rejects_garbage() {
        let err = GitVersion::parse("not a version").unwrap_err();
        assert!(matches!(err, ExecError::UnparseableVersion(text) if text == "not a version"));
    }

    #[test]
    fn test_ordering_and_display() {
        assert!(GitVersion::new(2, 10, 0) > GitVersion::new(2, 9, 5));
        assert_eq!(GitVersion::new(2, 43, 1).to_string(), "2.43.1");
    }
}
