//! Session façade tying requirements, activations and repository roots together

use std::path::{Path, PathBuf};

use tracing::{debug, error, info, warn};

use crate::config::{SessionConfig, ValidationMode};
use crate::session::error::SessionError;
use crate::session::registry::{Activation, ActivationOutcome, ActivationRegistry, ResolveAction};
use crate::session::resolver::{RepositoryRoots, Resolver, check_module_name};
use crate::session::workspace::{DirectoryExposer, ScratchWorkspace, SymlinkExposer};
use crate::version::identifier::VersionIdentifier;
use crate::version::requirement::Requirement;
use crate::version::requirement_set::RequirementSet;

/// One version-selection session with its own scratch workspace and roots.
///
/// Sessions are independent of each other. The workspace is removed by
/// [`SessionManager::close`] or when the session is dropped.
pub struct SessionManager<E: DirectoryExposer = SymlinkExposer> {
    config: SessionConfig,
    requirements: RequirementSet,
    registry: ActivationRegistry,
    roots: RepositoryRoots,
    resolver: Resolver,
    workspace: ScratchWorkspace,
    exposer: E,
}

impl SessionManager<SymlinkExposer> {
    /// Create a session with roots from the configured environment variable
    pub fn new(config: SessionConfig) -> Result<Self, SessionError> {
        let roots = RepositoryRoots::from_env(&config.roots_env_var);
        Self::with_roots(config, roots)
    }

    pub fn with_roots(
        config: SessionConfig,
        roots: RepositoryRoots,
    ) -> Result<Self, SessionError> {
        Self::with_exposer(config, roots, SymlinkExposer)
    }
}

impl<E: DirectoryExposer> SessionManager<E> {
    /// Build a session with a custom exposure mechanism
    pub fn with_exposer(
        config: SessionConfig,
        roots: RepositoryRoots,
        exposer: E,
    ) -> Result<Self, SessionError> {
        let workspace = ScratchWorkspace::create()?;
        debug!(
            "Initializing session at {:?} with repository roots {:?}",
            workspace.path(),
            roots.as_slice()
        );

        Ok(Self {
            registry: ActivationRegistry::new(config.conflict_check),
            config,
            requirements: RequirementSet::new(),
            roots,
            resolver: Resolver,
            workspace,
            exposer,
        })
    }

    /// Activate `module` at exactly `version`, using the configured resolve action
    pub fn use_exact_version(
        &mut self,
        module: &str,
        version: &str,
    ) -> Result<Activation, SessionError> {
        self.use_exact_version_with(module, version, self.config.resolve_action)
    }

    /// Activate `module` at exactly `version`.
    ///
    /// Returns the active entry, which under [`ResolveAction::Warn`] may be a
    /// different version than requested. On error nothing is activated.
    pub fn use_exact_version_with(
        &mut self,
        module: &str,
        version: &str,
        action: ResolveAction,
    ) -> Result<Activation, SessionError> {
        if self.workspace.is_closed() {
            return Err(SessionError::Closed);
        }

        check_module_name(module)?;
        let version = VersionIdentifier::parse(version)?;
        self.check_requirements(module, &version)?;

        let outcome = self
            .registry
            .activate(module, version.clone(), |version| -> Result<_, SessionError> {
                let path = self.resolver.locate(module, version, self.roots.as_slice())?;
                self.exposer
                    .expose(&path, &self.workspace.entry_for(module))
                    .map_err(|source| SessionError::Exposure {
                        module: module.to_string(),
                        path: path.clone(),
                        source,
                    })?;
                Ok(path)
            })?;

        match outcome {
            ActivationOutcome::Activated(active) => {
                info!(
                    "Activated {} from {:?}",
                    active.version.name(module),
                    active.path
                );
                Ok(active.clone())
            }
            ActivationOutcome::AlreadyActive(active) => {
                debug!("{} is already active", active.version.name(module));
                Ok(active.clone())
            }
            ActivationOutcome::Conflict(active) => {
                Self::resolve_conflict(module, &version, active.clone(), action)
            }
        }
    }

    /// Register a requirement on `module` on behalf of `origin`
    pub fn register_requirement(
        &mut self,
        module: &str,
        requirement: &str,
        origin: &str,
    ) -> Result<(), SessionError> {
        self.register_requirements(module, [requirement], origin)
    }

    /// Register several requirements at once.
    ///
    /// Either all of them are recorded or none is.
    pub fn register_requirements<I, S>(
        &mut self,
        module: &str,
        requirements: I,
        origin: &str,
    ) -> Result<(), SessionError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let parsed = requirements
            .into_iter()
            .map(|text| Requirement::parse(text.as_ref(), origin))
            .collect::<Result<Vec<_>, _>>()?;

        if self.config.validation == ValidationMode::Immediate {
            self.validate_against_active(module, &parsed)?;
        }

        for requirement in parsed {
            debug!("{} requires {} {}", origin, module, requirement);
            self.requirements.add(module, requirement);
        }
        Ok(())
    }

    /// Whether `version` would be compatible with the active version of `module`.
    ///
    /// Always true when nothing is active yet.
    pub fn check_compatibility(&self, module: &str, version: &str) -> Result<bool, SessionError> {
        let version = VersionIdentifier::parse(version)?;
        Ok(self
            .registry
            .get(module)
            .is_none_or(|active| active.version.compatible_with(&version)))
    }

    /// Put `path` in front of the repository roots. Relative paths are ignored.
    pub fn overlay_repository_root(&mut self, path: impl Into<PathBuf>) -> bool {
        self.roots.overlay(path)
    }

    pub fn append_repository_root(&mut self, path: impl Into<PathBuf>) {
        self.roots.append(path);
    }

    pub fn set_repository_roots(&mut self, roots: Vec<PathBuf>) {
        self.roots.replace(roots);
    }

    pub fn repository_roots(&self) -> &[PathBuf] {
        self.roots.as_slice()
    }

    pub fn active(&self, module: &str) -> Option<&Activation> {
        self.registry.get(module)
    }

    pub fn activations(&self) -> impl Iterator<Item = &Activation> {
        self.registry.iter()
    }

    pub fn requirements(&self) -> &RequirementSet {
        &self.requirements
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    /// Directory to put on the module search path
    pub fn workspace_path(&self) -> &Path {
        self.workspace.path()
    }

    pub fn is_closed(&self) -> bool {
        self.workspace.is_closed()
    }

    /// Release the scratch workspace. Safe to call more than once.
    pub fn close(&mut self) -> Result<(), SessionError> {
        self.workspace.close()?;
        Ok(())
    }

    fn check_requirements(
        &self,
        module: &str,
        version: &VersionIdentifier,
    ) -> Result<(), SessionError> {
        if self
            .requirements
            .satisfied_by(module, version, self.config.satisfaction)
        {
            return Ok(());
        }

        Err(SessionError::RequirementViolation {
            module: module.to_string(),
            version: version.to_string(),
            requirements: self.requirements.describe(module),
        })
    }

    fn validate_against_active(
        &self,
        module: &str,
        pending: &[Requirement],
    ) -> Result<(), SessionError> {
        let Some(active) = self.registry.get(module) else {
            return Ok(());
        };

        let combined = self.requirements.get(module).iter().chain(pending);
        if self.config.satisfaction.evaluate(combined, &active.version) {
            return Ok(());
        }

        Err(SessionError::RequirementViolation {
            module: module.to_string(),
            version: active.version.to_string(),
            requirements: self
                .requirements
                .get(module)
                .iter()
                .chain(pending)
                .map(Requirement::describe)
                .collect(),
        })
    }

    fn resolve_conflict(
        module: &str,
        requested: &VersionIdentifier,
        active: Activation,
        action: ResolveAction,
    ) -> Result<Activation, SessionError> {
        match action {
            ResolveAction::Warn => {
                warn!(
                    "Incompatible version, needs {}, already loaded {} ({:?})",
                    requested.name(module),
                    active.version.name(module),
                    active.path
                );
                Ok(active)
            }
            ResolveAction::Abort => {
                error!(
                    "Incompatible version, needs {}, already loaded {} ({:?})",
                    requested.name(module),
                    active.version.name(module),
                    active.path
                );
                Err(SessionError::ActivationConflict {
                    module: module.to_string(),
                    requested: requested.to_string(),
                    active: active.version.to_string(),
                    path: active.path,
                })
            }
        }
    }
}
