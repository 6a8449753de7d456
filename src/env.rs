use anyhow::{Context, Result};
use std::env as stdenv;
use std::path::{Path, PathBuf};

/// Per-session state shared by the dispatcher and the filesystem operations.
///
/// The environment contains:
/// - `current_dir`: the directory every relative path is resolved against. `cd` updates
///   this field instead of the process-wide working directory.
/// - `should_exit`: set once `exit` has been accepted; the session loop stops on it.
#[derive(Debug, Clone)]
pub struct Environment {
    /// The current working directory for command execution.
    pub current_dir: PathBuf,
    /// When set to true, indicates that the session loop should terminate.
    pub should_exit: bool,
}

impl Environment {
    /// Start from the directory the process was launched in.
    pub fn new() -> Result<Self> {
        let current_dir =
            stdenv::current_dir().context("unable to read the process working directory")?;
        Ok(Self::at(current_dir))
    }

    /// Start from an explicit directory.
    pub fn at(current_dir: impl Into<PathBuf>) -> Self {
        Self {
            current_dir: current_dir.into(),
            should_exit: false,
        }
    }

    /// Resolve `path` against the current directory. Absolute paths are returned as is.
    pub fn resolve(&self, path: impl AsRef<Path>) -> PathBuf {
        let path = path.as_ref();
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.current_dir.join(path)
        }
    }
}
