use std::path::PathBuf;

use thiserror::Error;

use crate::version::error::VersionError;

#[derive(Debug, Error)]
pub enum SessionError {
    #[error(transparent)]
    Version(#[from] VersionError),

    #[error("Invalid module name '{module}': must be a single path component")]
    InvalidModuleName { module: String },

    #[error("Unable to find {module}-{version} in {roots:?}")]
    VersionNotFound {
        module: String,
        version: String,
        roots: Vec<PathBuf>,
    },

    #[error("{module}-{version} is not compatible with {requirements:?}")]
    RequirementViolation {
        module: String,
        version: String,
        requirements: Vec<String>,
    },

    #[error(
        "Incompatible version, needs {module}-{requested}, already loaded {module}-{active} ({path:?})"
    )]
    ActivationConflict {
        module: String,
        requested: String,
        active: String,
        path: PathBuf,
    },

    #[error("Session is closed")]
    Closed,

    #[error("Scratch workspace error: {0}")]
    Workspace(#[from] std::io::Error),

    #[error("Failed to expose {path:?} as {module}: {source}")]
    Exposure {
        module: String,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}
