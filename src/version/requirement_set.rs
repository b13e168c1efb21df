//! Requirements accumulated per module across unrelated callers

use indexmap::IndexMap;
use serde::Deserialize;

use crate::version::identifier::VersionIdentifier;
use crate::version::requirement::Requirement;

/// How a module's requirements combine when a candidate version is checked
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SatisfactionMode {
    /// Every requirement must be satisfied
    #[default]
    All,
    /// A single satisfied requirement is enough
    Any,
}

impl SatisfactionMode {
    /// Evaluate `requirements` against `candidate`; an empty list accepts anything.
    pub fn evaluate<'a, I>(&self, requirements: I, candidate: &VersionIdentifier) -> bool
    where
        I: IntoIterator<Item = &'a Requirement>,
    {
        let mut requirements = requirements.into_iter().peekable();
        if requirements.peek().is_none() {
            return true;
        }

        match self {
            SatisfactionMode::All => requirements.all(|req| req.is_satisfied_by(candidate)),
            SatisfactionMode::Any => requirements.any(|req| req.is_satisfied_by(candidate)),
        }
    }
}

/// Grow-only mapping from module name to the requirements registered for it
#[derive(Debug, Default)]
pub struct RequirementSet {
    requirements: IndexMap<String, Vec<Requirement>>,
}

impl RequirementSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a requirement; duplicates are kept
    pub fn add(&mut self, module: &str, requirement: Requirement) {
        self.requirements
            .entry(module.to_string())
            .or_default()
            .push(requirement);
    }

    pub fn get(&self, module: &str) -> &[Requirement] {
        self.requirements
            .get(module)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    pub fn satisfied_by(
        &self,
        module: &str,
        candidate: &VersionIdentifier,
        mode: SatisfactionMode,
    ) -> bool {
        mode.evaluate(self.get(module), candidate)
    }

    pub fn describe(&self, module: &str) -> Vec<String> {
        self.get(module).iter().map(Requirement::describe).collect()
    }

    /// Modules with at least one requirement, in registration order
    pub fn modules(&self) -> impl Iterator<Item = &str> {
        self.requirements.keys().map(String::as_str)
    }
}
