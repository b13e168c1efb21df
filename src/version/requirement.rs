//! Version requirements contributed by callers
//!
//! Supported operators:
//! - `==1.2.3` - exactly 1.2.3
//! - `!=1.2.3` - anything but 1.2.3
//! - `>1.2.3` (or `>>1.2.3`) - newer than 1.2.3
//! - `>=1.2.3` - 1.2.3 or newer
//! - `<1.2.3` (or `<<1.2.3`) - older than 1.2.3
//! - `<=1.2.3` - 1.2.3 or older

use std::fmt;

use crate::version::error::VersionError;
use crate::version::identifier::VersionIdentifier;

/// Comparison operator of a requirement
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operator {
    Eq,
    Ne,
    Gt,
    Gte,
    Lt,
    Lte,
}

impl Operator {
    /// Longest tokens first so `>=` is never read as `>`
    const TOKENS: &'static [(&'static str, Operator)] = &[
        ("==", Operator::Eq),
        ("!=", Operator::Ne),
        (">=", Operator::Gte),
        ("<=", Operator::Lte),
        (">>", Operator::Gt),
        ("<<", Operator::Lt),
        (">", Operator::Gt),
        ("<", Operator::Lt),
    ];

    /// Split a leading operator token off `text`
    fn split_prefix(text: &str) -> Option<(Operator, &str)> {
        Self::TOKENS
            .iter()
            .find_map(|(token, op)| text.strip_prefix(*token).map(|rest| (*op, rest)))
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Operator::Eq => "==",
            Operator::Ne => "!=",
            Operator::Gt => ">",
            Operator::Gte => ">=",
            Operator::Lt => "<",
            Operator::Lte => "<=",
        }
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An operator + version constraint, tagged with the caller that registered it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Requirement {
    operator: Operator,
    version: VersionIdentifier,
    origin: String,
    text: String,
}

impl Requirement {
    pub fn parse(text: &str, origin: &str) -> Result<Self, VersionError> {
        let trimmed = text.trim();
        let Some((operator, rest)) = Operator::split_prefix(trimmed) else {
            return Err(VersionError::requirement(text, "unrecognized operator"));
        };

        let rest = rest.trim();
        if rest.is_empty() {
            return Err(VersionError::requirement(text, "missing version"));
        }

        let version = VersionIdentifier::parse(rest)
            .map_err(|e| VersionError::requirement(text, e.to_string()))?;

        Ok(Self {
            operator,
            version,
            origin: origin.to_string(),
            text: trimmed.to_string(),
        })
    }

    pub fn operator(&self) -> Operator {
        self.operator
    }

    pub fn version(&self) -> &VersionIdentifier {
        &self.version
    }

    pub fn origin(&self) -> &str {
        &self.origin
    }

    /// Check whether `candidate` is acceptable.
    ///
    /// Operators read from the requirement's side: `>1.0` means the candidate
    /// must be newer than 1.0.
    pub fn is_satisfied_by(&self, candidate: &VersionIdentifier) -> bool {
        match self.operator {
            Operator::Eq => &self.version == candidate,
            Operator::Ne => &self.version != candidate,
            Operator::Gt => &self.version < candidate,
            Operator::Gte => &self.version <= candidate,
            Operator::Lt => &self.version > candidate,
            Operator::Lte => &self.version >= candidate,
        }
    }

    /// Diagnostic form, e.g. `>=1.0 (app.plugins)`
    pub fn describe(&self) -> String {
        format!("{} ({})", self.text, self.origin)
    }
}

impl fmt::Display for Requirement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn satisfied(requirement: &str, candidate: &str) -> bool {
        Requirement::parse(requirement, "tests")
            .unwrap()
            .is_satisfied_by(&VersionIdentifier::parse(candidate).unwrap())
    }

    #[rstest]
    #[case("==1.0.0", Operator::Eq, "1.0.0")]
    #[case("!=1.0.0", Operator::Ne, "1.0.0")]
    #[case(">>1.1.0", Operator::Gt, "1.1.0")]
    #[case(">1.1.0", Operator::Gt, "1.1.0")]
    #[case(">=1", Operator::Gte, "1")]
    #[case("<<2.0", Operator::Lt, "2.0")]
    #[case("<2.0", Operator::Lt, "2.0")]
    #[case("<= 1.2.3", Operator::Lte, "1.2.3")]
    #[case("==1.0-rc1", Operator::Eq, "1.0-rc1")]
    fn parse_reads_operator_and_version(
        #[case] text: &str,
        #[case] operator: Operator,
        #[case] version: &str,
    ) {
        let requirement = Requirement::parse(text, "tests").unwrap();
        assert_eq!(requirement.operator(), operator);
        assert_eq!(requirement.version().as_str(), version);
        assert_eq!(requirement.origin(), "tests");
    }

    #[rstest]
    #[case("1.0.0")]
    #[case("=1.0.0")]
    #[case("~1.0.0")]
    #[case("^1.0.0")]
    #[case("==")]
    #[case(">=")]
    #[case("==abc")]
    #[case("")]
    fn parse_rejects_invalid_requirements(#[case] text: &str) {
        let result = Requirement::parse(text, "tests");
        assert!(
            matches!(result, Err(VersionError::InvalidRequirementFormat { .. })),
            "{text} should fail, got {result:?}"
        );
    }

    #[rstest]
    #[case("==1.0.0", "1.0.0", true)]
    #[case("==1.0.0", "1.0", true)]
    #[case("==1.0.0", "1.1.0", false)]
    #[case("!=1.0.0", "1.0.0", false)]
    #[case("!=1.0.0", "1.1.0", true)]
    #[case(">>1.1.0", "1.2.0", true)]
    #[case(">1.1.0", "1.2.0", true)]
    #[case(">1.1.0", "1.1.0", false)]
    #[case(">1.1.0", "1.0.0", false)]
    #[case(">=1.1.0", "1.1.0", true)]
    #[case(">=1.1.0", "1.0.0", false)]
    #[case(">=1", "1.0.0", true)]
    #[case("<1.1.0", "1.0.0", true)]
    #[case("<1.1.0", "1.1.0", false)]
    #[case("<1.1.0", "1.2.0", false)]
    #[case("<=1.1.0", "1.1.0", true)]
    #[case("<=1.1.0", "1.2.0", false)]
    fn is_satisfied_by_evaluates_operator(
        #[case] requirement: &str,
        #[case] candidate: &str,
        #[case] expected: bool,
    ) {
        assert_eq!(satisfied(requirement, candidate), expected);
    }

    #[test]
    fn describe_includes_origin() {
        let requirement = Requirement::parse(" >=1.2 ", "app.plugins").unwrap();
        assert_eq!(requirement.describe(), ">=1.2 (app.plugins)");
        assert_eq!(requirement.to_string(), ">=1.2");
    }
}
