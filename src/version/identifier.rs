//! Version identifiers of side-by-side installed modules
//!
//! Accepted forms:
//! - `1`, `1.2`, `1.2.3` - missing components default to 0
//! - `1.2.3-rc1` - everything after the first `-` is the label
//! - `1.2.3rc1`, `1.x` - a non-numeric tail on the last component is the label

use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::path::{Path, PathBuf};
use std::str::FromStr;

use semver::Version;

use crate::version::error::VersionError;

const MAX_COMPONENTS: usize = 3;

/// A parsed `major.minor.patch[-label]` version.
///
/// Ordering, equality and compatibility only look at the numeric components.
/// The literal text is kept verbatim because it names the installation
/// directory on disk.
#[derive(Debug, Clone)]
pub struct VersionIdentifier {
    core: Version,
    label: Option<String>,
    text: String,
}

impl VersionIdentifier {
    pub fn parse(text: &str) -> Result<Self, VersionError> {
        // The text names a directory, so it must stay one path component
        if text.contains(['/', '\\']) {
            return Err(VersionError::version(text, "contains a path separator"));
        }

        let (numeric, mut label) = match text.split_once('-') {
            Some((_, "")) => return Err(VersionError::version(text, "empty label after '-'")),
            Some((numeric, label)) => (numeric, Some(label.to_string())),
            None => (text, None),
        };

        let segments: Vec<&str> = numeric.split('.').collect();
        if segments.len() > MAX_COMPONENTS {
            return Err(VersionError::version(
                text,
                format!("more than {MAX_COMPONENTS} numeric components"),
            ));
        }

        let last = segments.len() - 1;
        let mut components = [0u64; MAX_COMPONENTS];
        for (index, segment) in segments.iter().enumerate() {
            if segment.is_empty() {
                return Err(VersionError::version(text, "empty component"));
            }

            let split_at = segment
                .find(|c: char| !c.is_ascii_digit())
                .unwrap_or(segment.len());
            let (digits, tail) = segment.split_at(split_at);

            if !tail.is_empty() {
                if index == 0 && digits.is_empty() {
                    return Err(VersionError::version(text, "leading component is not numeric"));
                }
                // Only the last component may carry a label, and only one label is allowed
                if index != last || label.is_some() {
                    return Err(VersionError::version(
                        text,
                        format!("component '{segment}' is not numeric"),
                    ));
                }
                label = Some(tail.to_string());
            }

            if !digits.is_empty() {
                components[index] = digits.parse().map_err(|_| {
                    VersionError::version(text, format!("component '{digits}' is out of range"))
                })?;
            }
        }

        let [major, minor, patch] = components;
        Ok(Self {
            core: Version::new(major, minor, patch),
            label,
            text: text.to_string(),
        })
    }

    pub fn major(&self) -> u64 {
        self.core.major
    }

    pub fn minor(&self) -> u64 {
        self.core.minor
    }

    pub fn patch(&self) -> u64 {
        self.core.patch
    }

    pub fn label(&self) -> Option<&str> {
        self.label.as_deref()
    }

    /// The literal text this identifier was parsed from
    pub fn as_str(&self) -> &str {
        &self.text
    }

    /// Two versions are compatible when major and minor match; patch is ignored.
    pub fn compatible_with(&self, other: &Self) -> bool {
        self.core.major == other.core.major && self.core.minor == other.core.minor
    }

    /// Display name used in diagnostics, e.g. `foo-1.2.0`
    pub fn name(&self, module: &str) -> String {
        format!("{}-{}", module, self.text)
    }

    /// Installation directory of `module` at this version under `root`
    pub fn path_in(&self, root: &Path, module: &str) -> PathBuf {
        root.join(module).join(&self.text)
    }
}

impl PartialEq for VersionIdentifier {
    fn eq(&self, other: &Self) -> bool {
        self.core == other.core
    }
}

impl Eq for VersionIdentifier {}

impl Hash for VersionIdentifier {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.core.hash(state);
    }
}

impl PartialOrd for VersionIdentifier {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for VersionIdentifier {
    fn cmp(&self, other: &Self) -> Ordering {
        self.core.cmp(&other.core)
    }
}

impl fmt::Display for VersionIdentifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}

impl FromStr for VersionIdentifier {
    type Err = VersionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn v(text: &str) -> VersionIdentifier {
        VersionIdentifier::parse(text).unwrap()
    }

    #[rstest]
    #[case("1", (1, 0, 0), None)]
    #[case("1.2", (1, 2, 0), None)]
    #[case("1.2.3", (1, 2, 3), None)]
    #[case("1.2.3-rc1", (1, 2, 3), Some("rc1"))]
    #[case("2.0-feature-x", (2, 0, 0), Some("feature-x"))]
    #[case("1.2.3rc1", (1, 2, 3), Some("rc1"))]
    #[case("1.x", (1, 0, 0), Some("x"))]
    #[case("0.0.0", (0, 0, 0), None)]
    fn parse_accepts_valid_versions(
        #[case] text: &str,
        #[case] expected: (u64, u64, u64),
        #[case] label: Option<&str>,
    ) {
        let version = v(text);
        assert_eq!((version.major(), version.minor(), version.patch()), expected);
        assert_eq!(version.label(), label);
        assert_eq!(version.as_str(), text);
    }

    #[rstest]
    #[case("")]
    #[case("abc")]
    #[case("x.1.0")]
    #[case("1..2")]
    #[case("1.2.")]
    #[case("1.x.3")]
    #[case("1.2.3.4")]
    #[case("1.2.3-")]
    #[case("1.2.3rc1-beta")]
    #[case("99999999999999999999999")]
    #[case("1.0/x")]
    #[case("1.0.0-../../escape")]
    #[case("1.0.0-a\\b")]
    fn parse_rejects_malformed_versions(#[case] text: &str) {
        let result = VersionIdentifier::parse(text);
        assert!(
            matches!(result, Err(VersionError::InvalidVersionFormat { .. })),
            "{text} should fail, got {result:?}"
        );
    }

    #[rstest]
    #[case("1.0.0", "1.0.1", Ordering::Less)]
    #[case("1.2.0", "1.10.0", Ordering::Less)]
    #[case("2.0.0", "1.9.9", Ordering::Greater)]
    #[case("1.0", "1.0.0", Ordering::Equal)]
    #[case("1.0.0-rc1", "1.0.0", Ordering::Equal)]
    fn cmp_uses_numeric_components_only(
        #[case] a: &str,
        #[case] b: &str,
        #[case] expected: Ordering,
    ) {
        assert_eq!(v(a).cmp(&v(b)), expected);
        assert_eq!(v(b).cmp(&v(a)), expected.reverse());
    }

    #[test]
    fn cmp_is_reflexive_and_transitive() {
        let versions: Vec<VersionIdentifier> = ["0.9", "1.0.0", "1.0.1-dev", "1.1", "2"]
            .iter()
            .map(|t| v(t))
            .collect();

        for a in &versions {
            assert_eq!(a.cmp(a), Ordering::Equal);
            for b in &versions {
                for c in &versions {
                    if a < b && b < c {
                        assert!(a < c, "{a} < {b} < {c}");
                    }
                }
            }
        }
    }

    #[rstest]
    #[case("1.2.0", "1.2.9", true)]
    #[case("1.2.0-rc1", "1.2.0", true)]
    #[case("1.2.0", "1.3.0", false)]
    #[case("1.2.0", "2.2.0", false)]
    fn compatible_with_checks_major_and_minor(
        #[case] a: &str,
        #[case] b: &str,
        #[case] expected: bool,
    ) {
        assert_eq!(v(a).compatible_with(&v(b)), expected);
        assert_eq!(v(b).compatible_with(&v(a)), expected);
        assert!(v(a).compatible_with(&v(a)));
    }

    #[test]
    fn path_in_uses_literal_text() {
        let version = v("1.0-rc1");
        assert_eq!(
            version.path_in(Path::new("/repo"), "foo"),
            PathBuf::from("/repo/foo/1.0-rc1")
        );
        assert_eq!(version.name("foo"), "foo-1.0-rc1");
    }
}
