//! Explicit executable search-path context.
//!
//! Installing a tool can make it reachable only after a directory is added
//! to `PATH`. Instead of mutating the process environment, the pipeline
//! carries an [`EnvironmentContext`] value: lookups consult it, the
//! package-manager provisioner returns an extended copy, and every child
//! process receives the context's search path as its `PATH`.

use std::ffi::OsString;
use std::path::{Path, PathBuf};

use crate::error::{PitchError, Result};
use crate::shell::{Invocation, Platform};

/// Search path, home directory and platform used for command lookup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnvironmentContext {
    search_path: Vec<PathBuf>,
    home: Option<PathBuf>,
    platform: Platform,
}

impl EnvironmentContext {
    /// Capture the context from the running process.
    pub fn from_process() -> Self {
        Self {
            search_path: parse_system_path(),
            home: dirs::home_dir(),
            platform: Platform::current(),
        }
    }

    /// Build a context from explicit parts.
    pub fn new(search_path: Vec<PathBuf>, home: Option<PathBuf>, platform: Platform) -> Self {
        Self {
            search_path,
            home,
            platform,
        }
    }

    /// Directories searched for executables, in order.
    pub fn search_path(&self) -> &[PathBuf] {
        &self.search_path
    }

    /// The user's home directory, if known.
    pub fn home(&self) -> Option<&Path> {
        self.home.as_deref()
    }

    /// Host platform.
    pub fn platform(&self) -> Platform {
        self.platform
    }

    /// Return a copy with `dir` appended to the search path.
    ///
    /// Appending a directory that is already present is a no-op.
    pub fn with_appended_path(mut self, dir: PathBuf) -> Self {
        if !self.search_path.contains(&dir) {
            self.search_path.push(dir);
        }
        self
    }

    /// Resolve an executable by name against this context.
    pub fn resolve(&self, name: &str) -> Option<PathBuf> {
        self.platform
            .executable_names(name)
            .iter()
            .find_map(|candidate| resolve_tool_path(candidate, &self.search_path))
    }

    /// Whether an executable called `name` is reachable.
    pub fn command_exists(&self, name: &str) -> bool {
        self.resolve(name).is_some()
    }

    /// The search path joined into a `PATH` value.
    pub fn path_value(&self) -> Result<OsString> {
        std::env::join_paths(&self.search_path).map_err(|e| PitchError::Other(e.into()))
    }

    /// Give `invocation` this context's search path as its `PATH`.
    ///
    /// If the path cannot be joined (an entry contains the separator) the
    /// invocation is returned unchanged and inherits the process `PATH`.
    pub fn apply(&self, invocation: Invocation) -> Invocation {
        match self.path_value() {
            Ok(path) => invocation.env("PATH", path),
            Err(e) => {
                tracing::debug!("Not overriding PATH for child: {}", e);
                invocation
            }
        }
    }
}

/// Check whether a file has executable permission bits set.
#[cfg(unix)]
pub fn is_executable(path: &Path) -> bool {
    use std::os::unix::fs::PermissionsExt;
    path.metadata()
        .map(|m| m.permissions().mode() & 0o111 != 0)
        .unwrap_or(false)
}

/// On Windows, executability is determined by file extension, not permission bits.
#[cfg(not(unix))]
pub fn is_executable(path: &Path) -> bool {
    path.is_file()
}

/// Resolve a tool's binary path by iterating over search-path entries.
///
/// Returns the first match that exists and is executable. Does NOT use
/// the `which` command; its behaviour varies across systems.
pub fn resolve_tool_path(tool: &str, path_entries: &[PathBuf]) -> Option<PathBuf> {
    for dir in path_entries {
        let candidate = dir.join(tool);
        if candidate.is_file() && is_executable(&candidate) {
            return Some(candidate);
        }
    }
    None
}

/// Parse the system PATH environment variable into a list of directories.
pub fn parse_system_path() -> Vec<PathBuf> {
    std::env::var_os("PATH")
        .map(|path| std::env::split_paths(&path).collect())
        .unwrap_or_default()
}
