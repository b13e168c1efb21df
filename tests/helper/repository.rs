//! On-disk repository fixtures

use std::path::{Path, PathBuf};

use tempfile::TempDir;

use modver::SessionConfig;
use modver::session::{RepositoryRoots, SessionManager};

/// Name of the marker file written into every installed version
pub const MARKER: &str = "VERSION";

/// A temporary repository root with `<module>/<version>/` directories
pub struct TestRepository {
    dir: TempDir,
}

impl TestRepository {
    pub fn new() -> Self {
        Self {
            dir: TempDir::new().unwrap(),
        }
    }

    /// Install `module` at `version`, writing the version text into a marker file
    pub fn with_version(self, module: &str, version: &str) -> Self {
        let path = self.dir.path().join(module).join(version);
        std::fs::create_dir_all(&path).unwrap();
        std::fs::write(path.join(MARKER), version).unwrap();
        self
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    pub fn root(&self) -> PathBuf {
        self.dir.path().to_path_buf()
    }
}

/// Session over the given repositories, searched in order
pub fn session_over(config: SessionConfig, repositories: &[&TestRepository]) -> SessionManager {
    let roots = repositories.iter().map(|repo| repo.root()).collect();
    SessionManager::with_roots(config, RepositoryRoots::new(roots)).unwrap()
}

/// Version text read through the session workspace
pub fn exposed_version(session: &SessionManager, module: &str) -> String {
    std::fs::read_to_string(session.workspace_path().join(module).join(MARKER)).unwrap()
}
