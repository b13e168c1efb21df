//! Activated module versions
//!
//! At most one version of a module is active at a time. Once set, an
//! activation stays until the whole session is torn down.

use std::collections::HashMap;
use std::collections::hash_map::Entry;
use std::path::PathBuf;

use serde::Deserialize;

use crate::version::identifier::VersionIdentifier;

/// What to do when a module is requested at a version other than the active one
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResolveAction {
    /// Log and keep the active version
    Warn,
    /// Fail the request
    #[default]
    Abort,
}

/// When a requested version counts as the one already active
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConflictCheck {
    /// Only an equal version (labels ignored)
    #[default]
    Exact,
    /// Any version with the same major and minor
    Compatible,
}

/// A module version exposed for resolution
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Activation {
    pub module: String,
    pub version: VersionIdentifier,
    pub path: PathBuf,
}

/// Result of [`ActivationRegistry::activate`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActivationOutcome<'a> {
    Activated(&'a Activation),
    AlreadyActive(&'a Activation),
    Conflict(&'a Activation),
}

#[derive(Debug, Default)]
pub struct ActivationRegistry {
    active: HashMap<String, Activation>,
    conflict_check: ConflictCheck,
}

impl ActivationRegistry {
    pub fn new(conflict_check: ConflictCheck) -> Self {
        Self {
            active: HashMap::new(),
            conflict_check,
        }
    }

    pub fn get(&self, module: &str) -> Option<&Activation> {
        self.active.get(module)
    }

    /// Activate `module` at `version` unless the module already has an entry.
    ///
    /// `locate` produces the installation path and runs only when the module
    /// is vacant; if it fails nothing is recorded. An existing entry is never
    /// replaced.
    pub fn activate<F, E>(
        &mut self,
        module: &str,
        version: VersionIdentifier,
        locate: F,
    ) -> Result<ActivationOutcome<'_>, E>
    where
        F: FnOnce(&VersionIdentifier) -> Result<PathBuf, E>,
    {
        let conflict_check = self.conflict_check;
        match self.active.entry(module.to_string()) {
            Entry::Vacant(entry) => {
                let path = locate(&version)?;
                let activation = Activation {
                    module: module.to_string(),
                    version,
                    path,
                };
                Ok(ActivationOutcome::Activated(entry.insert(activation)))
            }
            Entry::Occupied(entry) => {
                let existing = entry.into_mut();
                if Self::versions_match(conflict_check, &existing.version, &version) {
                    Ok(ActivationOutcome::AlreadyActive(existing))
                } else {
                    Ok(ActivationOutcome::Conflict(existing))
                }
            }
        }
    }

    /// Active entries in no particular order
    pub fn iter(&self) -> impl Iterator<Item = &Activation> {
        self.active.values()
    }

    pub fn len(&self) -> usize {
        self.active.len()
    }

    pub fn is_empty(&self) -> bool {
        self.active.is_empty()
    }

    fn versions_match(
        check: ConflictCheck,
        active: &VersionIdentifier,
        requested: &VersionIdentifier,
    ) -> bool {
        match check {
            ConflictCheck::Exact => active == requested,
            ConflictCheck::Compatible => active.compatible_with(requested),
        }
    }
}
