use std::cmp::Ordering;

use modver::version::{
    Requirement, RequirementSet, SatisfactionMode, VersionError, VersionIdentifier,
};

fn v(text: &str) -> VersionIdentifier {
    VersionIdentifier::parse(text).unwrap()
}

#[test]
fn labelled_version_parses_components_and_label() {
    let version = v("1.2.3-rc1");

    assert_eq!(version.major(), 1);
    assert_eq!(version.minor(), 2);
    assert_eq!(version.patch(), 3);
    assert_eq!(version.label(), Some("rc1"));
    assert_eq!(version.to_string(), "1.2.3-rc1");
}

#[test]
fn non_numeric_leading_segment_is_rejected() {
    assert!(matches!(
        VersionIdentifier::parse("beta.1.0"),
        Err(VersionError::InvalidVersionFormat { .. })
    ));
}

#[test]
fn ordering_is_antisymmetric_over_sample() {
    let versions: Vec<VersionIdentifier> = ["0.1", "0.10", "1.0.0", "1.0.0-dev", "1.2", "10"]
        .iter()
        .map(|text| v(text))
        .collect();

    for a in &versions {
        for b in &versions {
            assert_eq!(a.cmp(b), b.cmp(a).reverse(), "{a} vs {b}");
            if a.cmp(b) == Ordering::Equal {
                assert!(a.compatible_with(b));
            }
        }
    }
}

#[test]
fn greater_than_requirement_accepts_newer_versions_only() {
    for text in [">>1.1.0", ">1.1.0"] {
        let requirement = Requirement::parse(text, "tests").unwrap();
        assert!(requirement.is_satisfied_by(&v("1.2.0")));
        assert!(!requirement.is_satisfied_by(&v("1.0.0")));
    }
}

#[test]
fn equal_requirement_accepts_only_that_version() {
    let requirement = Requirement::parse("==1.0.0", "tests").unwrap();

    assert!(requirement.is_satisfied_by(&v("1.0.0")));
    assert!(!requirement.is_satisfied_by(&v("1.0.1")));
    assert!(!requirement.is_satisfied_by(&v("0.9")));
}

#[test]
fn requirement_set_reports_origins_in_registration_order() {
    let mut set = RequirementSet::new();
    set.add("foo", Requirement::parse(">=1.0", "app").unwrap());
    set.add("foo", Requirement::parse("!=1.3", "plugin").unwrap());

    assert_eq!(set.describe("foo"), vec![">=1.0 (app)", "!=1.3 (plugin)"]);
    assert!(set.satisfied_by("foo", &v("1.2"), SatisfactionMode::All));
    assert!(!set.satisfied_by("foo", &v("1.3"), SatisfactionMode::All));
    assert!(set.satisfied_by("foo", &v("1.3"), SatisfactionMode::Any));
}
