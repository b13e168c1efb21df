//! Repository roots and installation directory lookup
//!
//! A version of a module is installed at `<root>/<module>/<version>/`.
//! Roots are consulted in order and the first existing directory wins.

use std::path::{Component, Path, PathBuf};

use tracing::debug;

use crate::session::error::SessionError;
use crate::version::identifier::VersionIdentifier;

/// Separator of the root list environment variable
pub const ROOT_LIST_SEPARATOR: char = ':';

/// Check that `module` is a single plain path component.
///
/// Module names are joined onto repository roots and onto the scratch
/// workspace, so `..`, separators and absolute paths are refused.
pub fn check_module_name(module: &str) -> Result<(), SessionError> {
    let mut components = Path::new(module).components();
    match (components.next(), components.next()) {
        (Some(Component::Normal(name)), None) if name.to_str() == Some(module) => Ok(()),
        _ => Err(SessionError::InvalidModuleName {
            module: module.to_string(),
        }),
    }
}

/// Ordered list of repository roots
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RepositoryRoots {
    roots: Vec<PathBuf>,
}

impl RepositoryRoots {
    pub fn new(roots: Vec<PathBuf>) -> Self {
        Self { roots }
    }

    /// Build from a colon-separated list, dropping empty segments
    pub fn from_list(value: &str) -> Self {
        Self::new(
            value
                .split(ROOT_LIST_SEPARATOR)
                .filter(|segment| !segment.is_empty())
                .map(PathBuf::from)
                .collect(),
        )
    }

    /// Read the list from the environment variable `name`; unset means no roots
    pub fn from_env(name: &str) -> Self {
        Self::from_env_value(std::env::var(name).ok())
    }

    fn from_env_value(value: Option<String>) -> Self {
        value.map(|v| Self::from_list(&v)).unwrap_or_default()
    }

    pub fn append(&mut self, root: impl Into<PathBuf>) {
        self.roots.push(root.into());
    }

    /// Put `root` in front of the list. Relative paths are ignored.
    ///
    /// Returns whether the root was added.
    pub fn overlay(&mut self, root: impl Into<PathBuf>) -> bool {
        let root = root.into();
        if !root.is_absolute() {
            debug!("Ignoring relative overlay root {:?}", root);
            return false;
        }
        self.roots.insert(0, root);
        true
    }

    pub fn replace(&mut self, roots: Vec<PathBuf>) {
        self.roots = roots;
    }

    pub fn as_slice(&self) -> &[PathBuf] {
        &self.roots
    }

    pub fn is_empty(&self) -> bool {
        self.roots.is_empty()
    }
}

/// First-match lookup of installation directories
#[derive(Debug, Clone, Copy, Default)]
pub struct Resolver;

impl Resolver {
    /// Find the installation directory of `module` at `version`.
    ///
    /// The directory name is the literal version text, not a normalized form.
    pub fn locate(
        &self,
        module: &str,
        version: &VersionIdentifier,
        roots: &[PathBuf],
    ) -> Result<PathBuf, SessionError> {
        for root in roots {
            let candidate = version.path_in(root, module);
            if candidate.exists() {
                debug!("Found {} at {:?}", version.name(module), candidate);
                return Ok(candidate);
            }
            debug!("{:?} does not exist", candidate);
        }

        Err(SessionError::VersionNotFound {
            module: module.to_string(),
            version: version.to_string(),
            roots: roots.to_vec(),
        })
    }
}
