//! Scratch directory on the module search path
//!
//! Activated versions are exposed inside the workspace under the bare module
//! name, so a resolver that searches the workspace finds the chosen version.

use std::io;
use std::path::{Path, PathBuf};

#[cfg(test)]
use mockall::automock;
use tempfile::TempDir;
use tracing::{debug, info};

/// Prefix of scratch workspace directory names
pub const WORKSPACE_PREFIX: &str = "modver_";

/// Makes an installation directory visible at another location
#[cfg_attr(test, automock)]
pub trait DirectoryExposer {
    /// Expose `source` at `target`; `target` must not exist yet
    fn expose(&self, source: &Path, target: &Path) -> io::Result<()>;
}

/// Exposes directories through symbolic links
#[derive(Debug, Clone, Copy, Default)]
pub struct SymlinkExposer;

impl DirectoryExposer for SymlinkExposer {
    #[cfg(unix)]
    fn expose(&self, source: &Path, target: &Path) -> io::Result<()> {
        std::os::unix::fs::symlink(source, target)
    }

    #[cfg(windows)]
    fn expose(&self, source: &Path, target: &Path) -> io::Result<()> {
        std::os::windows::fs::symlink_dir(source, target)
    }

    #[cfg(not(any(unix, windows)))]
    fn expose(&self, source: &Path, _target: &Path) -> io::Result<()> {
        Err(io::Error::new(
            io::ErrorKind::Unsupported,
            format!("symbolic links are not supported here, cannot expose {source:?}"),
        ))
    }
}

/// A temporary directory owned by one session.
///
/// Removed by [`ScratchWorkspace::close`] or, failing that, on drop.
#[derive(Debug)]
pub struct ScratchWorkspace {
    dir: Option<TempDir>,
    path: PathBuf,
}

impl ScratchWorkspace {
    pub fn create() -> io::Result<Self> {
        let dir = tempfile::Builder::new()
            .prefix(WORKSPACE_PREFIX)
            .suffix(&format!("_{}", std::process::id()))
            .tempdir()?;
        let path = dir.path().to_path_buf();
        debug!("Initializing scratch workspace at {:?}", path);

        Ok(Self {
            dir: Some(dir),
            path,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Location a module is exposed at inside the workspace
    pub fn entry_for(&self, module: &str) -> PathBuf {
        self.path.join(module)
    }

    pub fn is_closed(&self) -> bool {
        self.dir.is_none()
    }

    /// Remove the workspace. Calling this again does nothing.
    pub fn close(&mut self) -> io::Result<()> {
        match self.dir.take() {
            Some(dir) => {
                info!("Removing scratch workspace {:?}", self.path);
                dir.close()
            }
            None => Ok(()),
        }
    }
}
