use serde::Deserialize;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::session::registry::{ConflictCheck, ResolveAction};
use crate::version::requirement_set::SatisfactionMode;

// =============================================================================
// Environment variables
// =============================================================================

/// Colon-separated list of repository roots read when a session starts
pub const DEFAULT_ROOTS_ENV_VAR: &str = "MODVER_PATH";

/// Log filter directive, e.g. `MODVER_LOG=modver=debug`
pub const LOG_ENV_VAR: &str = "MODVER_LOG";

/// Search path variable the CLI prefixes with the scratch workspace
pub const DEFAULT_PATH_VAR: &str = "MODULE_PATH";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid config file {path:?}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// When newly registered requirements are checked against active versions
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ValidationMode {
    /// Only checked when a version is next requested
    #[default]
    Deferred,
    /// Rejected right away if the active version does not satisfy them
    Immediate,
}

/// Session configuration structure
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct SessionConfig {
    pub resolve_action: ResolveAction,
    pub satisfaction: SatisfactionMode,
    pub validation: ValidationMode,
    pub conflict_check: ConflictCheck,
    /// Environment variable holding the initial repository roots
    pub roots_env_var: String,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            resolve_action: ResolveAction::default(),
            satisfaction: SatisfactionMode::default(),
            validation: ValidationMode::default(),
            conflict_check: ConflictCheck::default(),
            roots_env_var: DEFAULT_ROOTS_ENV_VAR.to_string(),
        }
    }
}

impl SessionConfig {
    /// Load a JSON config file; missing fields use their defaults
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        serde_json::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Load the default config file if it exists, otherwise use defaults
    pub fn load_default() -> Result<Self, ConfigError> {
        let path = config_path();
        if path.is_file() {
            Self::load(&path)
        } else {
            Ok(Self::default())
        }
    }
}

/// Returns the path to the config file for modver.
/// Uses $XDG_CONFIG_HOME/modver if XDG_CONFIG_HOME is set,
/// otherwise falls back to ~/.config/modver,
/// or ./modver if neither is available.
pub fn config_path() -> PathBuf {
    config_dir_with_env(std::env::var("XDG_CONFIG_HOME").ok(), dirs::home_dir())
        .join("config.json")
}

fn config_dir_with_env(xdg_config_home: Option<String>, home_dir: Option<PathBuf>) -> PathBuf {
    let config_dir = xdg_config_home
        .map(PathBuf::from)
        .or_else(|| home_dir.map(|home| home.join(".config")))
        .unwrap_or_else(|| PathBuf::from("."));

    config_dir.join("modver")
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tempfile::TempDir;

    #[test]
    fn session_config_from_partial_object_uses_defaults_for_missing_fields() {
        let result = serde_json::from_value::<SessionConfig>(json!({
            "resolveAction": "warn"
        }))
        .unwrap();

        assert_eq!(result.resolve_action, ResolveAction::Warn);
        assert_eq!(result.satisfaction, SatisfactionMode::All);
        assert_eq!(result.roots_env_var, DEFAULT_ROOTS_ENV_VAR);
    }

    #[test]
    fn session_config_from_full_object_parses_all_fields() {
        let result = serde_json::from_value::<SessionConfig>(json!({
            "resolveAction": "abort",
            "satisfaction": "any",
            "validation": "immediate",
            "conflictCheck": "compatible",
            "rootsEnvVar": "MY_REPOS"
        }))
        .unwrap();

        assert_eq!(
            result,
            SessionConfig {
                resolve_action: ResolveAction::Abort,
                satisfaction: SatisfactionMode::Any,
                validation: ValidationMode::Immediate,
                conflict_check: ConflictCheck::Compatible,
                roots_env_var: "MY_REPOS".to_string(),
            }
        );
    }

    #[test]
    fn session_config_rejects_unknown_variant() {
        let result = serde_json::from_value::<SessionConfig>(json!({
            "resolveAction": "ignore"
        }));
        assert!(result.is_err());
    }

    #[test]
    fn load_reads_json_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, r#"{ "validation": "immediate" }"#).unwrap();

        let config = SessionConfig::load(&path).unwrap();

        assert_eq!(config.validation, ValidationMode::Immediate);
    }

    #[test]
    fn load_reports_missing_and_malformed_files() {
        let dir = TempDir::new().unwrap();
        let missing = dir.path().join("missing.json");
        assert!(matches!(
            SessionConfig::load(&missing),
            Err(ConfigError::Io { .. })
        ));

        let malformed = dir.path().join("bad.json");
        std::fs::write(&malformed, "{ not json").unwrap();
        assert!(matches!(
            SessionConfig::load(&malformed),
            Err(ConfigError::Parse { .. })
        ));
    }

    #[test]
    fn config_dir_with_env_uses_xdg_config_home_when_set() {
        let path = config_dir_with_env(
            Some("/tmp/test-config".to_string()),
            Some(PathBuf::from("/home/user")),
        );

        assert_eq!(path, PathBuf::from("/tmp/test-config/modver"));
    }

    #[test]
    fn config_dir_with_env_falls_back_to_home_config() {
        let path = config_dir_with_env(None, Some(PathBuf::from("/home/user")));

        assert_eq!(path, PathBuf::from("/home/user/.config/modver"));
    }

    #[test]
    fn config_dir_with_env_falls_back_to_current_dir_when_no_dirs_available() {
        let path = config_dir_with_env(None, None);
        assert_eq!(path, PathBuf::from("./modver"));
    }
}
