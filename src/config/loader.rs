//! Configuration file discovery and loading.
//!
//! A project config at `.pitch/config.yml` is optional; without one the
//! built-in defaults apply. An explicitly requested file must exist.

use crate::config::schema::InstallerConfig;
use crate::error::{PitchError, Result};
use std::fs;
use std::path::{Path, PathBuf};

/// Directory holding project-level settings.
pub const CONFIG_DIR: &str = ".pitch";

/// Config file name inside [`CONFIG_DIR`].
pub const CONFIG_FILE: &str = "config.yml";

/// A validated configuration and where it came from.
#[derive(Debug, Clone)]
pub struct LoadedConfig {
    /// The effective configuration.
    pub config: InstallerConfig,

    /// File it was read from, or `None` when running on defaults.
    pub source: Option<PathBuf>,
}

/// Location of the project config for `project_root`.
pub fn project_config_path(project_root: &Path) -> PathBuf {
    project_root.join(CONFIG_DIR).join(CONFIG_FILE)
}

/// Load a single config file.
///
/// # Errors
///
/// Returns `ConfigNotFound` if the file doesn't exist.
/// Returns `ConfigParseError` if the YAML is invalid.
pub fn load_config_file(path: &Path) -> Result<InstallerConfig> {
    let content = fs::read_to_string(path).map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            PitchError::ConfigNotFound {
                path: path.to_path_buf(),
            }
        } else {
            PitchError::Io(e)
        }
    })?;

    parse_config(&content, path)
}

/// Parse YAML content into an [`InstallerConfig`].
///
/// An empty (or comment-only) document yields the defaults.
pub fn parse_config(content: &str, source_path: &Path) -> Result<InstallerConfig> {
    let value: serde_yaml::Value =
        serde_yaml::from_str(content).map_err(|e| PitchError::ConfigParseError {
            path: source_path.to_path_buf(),
            message: e.to_string(),
        })?;

    if value.is_null() {
        return Ok(InstallerConfig::default());
    }

    serde_yaml::from_value(value).map_err(|e| PitchError::ConfigParseError {
        path: source_path.to_path_buf(),
        message: e.to_string(),
    })
}

/// Load config with optional path override, then validate it.
///
/// With an override only that file is read. Otherwise the project config
/// is used when present and the defaults when not.
pub fn load_config(project_root: &Path, config_override: Option<&Path>) -> Result<LoadedConfig> {
    let source = match config_override {
        Some(path) => Some(path.to_path_buf()),
        None => Some(project_config_path(project_root)).filter(|p| p.is_file()),
    };

    let config = match &source {
        Some(path) => {
            tracing::debug!("Loading config from {}", path.display());
            load_config_file(path)?
        }
        None => {
            tracing::debug!("No project config found; using defaults");
            InstallerConfig::default()
        }
    };

    config.validate()?;
    Ok(LoadedConfig { config, source })
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn write_project_config(root: &Path, content: &str) -> PathBuf {
        let path = project_config_path(root);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(&path, content).unwrap();
        path
    }

    #[test]
    fn missing_project_config_uses_defaults() {
        let temp = TempDir::new().unwrap();
        let loaded = load_config(temp.path(), None).unwrap();
        assert!(loaded.source.is_none());
        assert_eq!(loaded.config, InstallerConfig::default());
    }

    #[test]
    fn project_config_is_loaded() {
        let temp = TempDir::new().unwrap();
        let path = write_project_config(temp.path(), "app_name: Demo\n");

        let loaded = load_config(temp.path(), None).unwrap();
        assert_eq!(loaded.source, Some(path));
        assert_eq!(loaded.config.app_name, "Demo");
    }

    #[test]
    fn empty_config_file_yields_defaults() {
        let temp = TempDir::new().unwrap();
        write_project_config(temp.path(), "# nothing here\n");

        let loaded = load_config(temp.path(), None).unwrap();
        assert_eq!(loaded.config, InstallerConfig::default());
        assert!(loaded.source.is_some());
    }

    #[test]
    fn explicit_missing_path_is_not_found() {
        let temp = TempDir::new().unwrap();
        let missing = temp.path().join("nope.yml");

        let err = load_config(temp.path(), Some(&missing)).unwrap_err();
        assert!(matches!(err, PitchError::ConfigNotFound { .. }));
    }

    #[test]
    fn explicit_path_overrides_project_config() {
        let temp = TempDir::new().unwrap();
        write_project_config(temp.path(), "app_name: Project\n");
        let other = temp.path().join("other.yml");
        fs::write(&other, "app_name: Other\n").unwrap();

        let loaded = load_config(temp.path(), Some(&other)).unwrap();
        assert_eq!(loaded.config.app_name, "Other");
    }

    #[test]
    fn invalid_yaml_is_parse_error() {
        let temp = TempDir::new().unwrap();
        let path = write_project_config(temp.path(), "features: [unclosed\n");

        let err = load_config(temp.path(), None).unwrap_err();
        match err {
            PitchError::ConfigParseError { path: p, .. } => assert_eq!(p, path),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn unknown_types_are_parse_errors() {
        let temp = TempDir::new().unwrap();
        write_project_config(temp.path(), "features:\n  mcp_config: sometimes\n");
        assert!(load_config(temp.path(), None).is_err());
    }

    #[test]
    fn validation_runs_after_parse() {
        let temp = TempDir::new().unwrap();
        write_project_config(temp.path(), "app_name: \"\"\n");

        let err = load_config(temp.path(), None).unwrap_err();
        assert!(matches!(err, PitchError::ConfigValidationError { .. }));
    }
}
