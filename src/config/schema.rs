//! Configuration schema definitions for Pitch.
//!
//! This module contains the struct definitions that map to the YAML
//! configuration file format. Defaults describe a uv-managed Python 3.12
//! application with a TOML config template and an optional MCP template.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::environment::PythonVersion;
use crate::error::{PitchError, Result};
use crate::shell::Platform;

/// Root configuration structure for `.pitch/config.yml`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct InstallerConfig {
    /// Application name (for display purposes)
    pub app_name: String,

    /// Interpreter requirements
    pub python: PythonSettings,

    /// Package manager binary and how to bootstrap it
    pub package_manager: PackageManagerSettings,

    /// Isolated environment directory (relative to project root)
    pub environment_dir: PathBuf,

    /// Requirements file (relative to project root)
    pub requirements: PathBuf,

    /// Primary configuration template
    pub config_file: TemplateFile,

    /// Secondary MCP configuration template
    pub mcp_config: TemplateFile,

    /// Optional pipeline features
    pub features: Features,

    /// What the verification pass checks
    pub verification: VerificationSettings,

    /// Post-install test settings
    pub post_install: PostInstallSettings,

    /// Command shown in the final summary for running the application
    pub run_hint: String,
}

impl Default for InstallerConfig {
    fn default() -> Self {
        Self {
            app_name: "FinGenius".to_string(),
            python: PythonSettings::default(),
            package_manager: PackageManagerSettings::default(),
            environment_dir: PathBuf::from(".venv"),
            requirements: PathBuf::from("requirements.txt"),
            config_file: TemplateFile {
                template: PathBuf::from("config/config.example.toml"),
                target: PathBuf::from("config/config.toml"),
            },
            mcp_config: TemplateFile {
                template: PathBuf::from("config/mcp.example.json"),
                target: PathBuf::from("config/mcp.json"),
            },
            features: Features::default(),
            verification: VerificationSettings::default(),
            post_install: PostInstallSettings::default(),
            run_hint: "python main.py STOCK_CODE".to_string(),
        }
    }
}

impl InstallerConfig {
    /// Check values that deserialize fine but cannot work.
    pub fn validate(&self) -> Result<()> {
        let invalid = |message: &str| {
            Err(PitchError::ConfigValidationError {
                message: message.to_string(),
            })
        };

        if self.app_name.trim().is_empty() {
            return invalid("app_name must not be empty");
        }
        if self.package_manager.name.trim().is_empty() {
            return invalid("package_manager.name must not be empty");
        }
        if self.python.version.major < 3 {
            return invalid("python.version must be 3.x or newer");
        }
        if self.environment_dir.as_os_str().is_empty() {
            return invalid("environment_dir must not be empty");
        }
        if self.requirements.as_os_str().is_empty() {
            return invalid("requirements must not be empty");
        }
        for (label, file) in [("config_file", &self.config_file), ("mcp_config", &self.mcp_config)] {
            if file.template == file.target {
                return Err(PitchError::ConfigValidationError {
                    message: format!("{}: template and target must differ", label),
                });
            }
        }
        Ok(())
    }
}

/// Interpreter requirements.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct PythonSettings {
    /// Minimum `MAJOR.MINOR`, also pinned when creating the environment
    #[schemars(with = "String")]
    pub version: PythonVersion,

    /// Interpreter names to look for, in order (platform default when empty)
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub candidates: Vec<String>,
}

impl Default for PythonSettings {
    fn default() -> Self {
        Self {
            version: PythonVersion::new(3, 12),
            candidates: Vec::new(),
        }
    }
}

impl PythonSettings {
    /// Interpreter names to try on `platform`.
    pub fn candidates_for(&self, platform: Platform) -> Vec<String> {
        if self.candidates.is_empty() {
            platform.default_interpreters()
        } else {
            self.candidates.clone()
        }
    }
}

/// Package manager binary and bootstrap sources.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct PackageManagerSettings {
    /// Binary name
    pub name: String,

    /// POSIX bootstrap script (run with `sh`)
    pub install_script_url: String,

    /// Windows bootstrap script (run with PowerShell)
    pub install_script_url_windows: String,

    /// Directories (relative to home) the bootstrap script installs into
    pub fallback_dirs: Vec<PathBuf>,
}

impl Default for PackageManagerSettings {
    fn default() -> Self {
        Self {
            name: "uv".to_string(),
            install_script_url: "https://astral.sh/uv/install.sh".to_string(),
            install_script_url_windows: "https://astral.sh/uv/install.ps1".to_string(),
            fallback_dirs: vec![PathBuf::from(".local/bin"), PathBuf::from(".cargo/bin")],
        }
    }
}

/// A template copied to an active location.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct TemplateFile {
    /// Source template (relative to project root)
    pub template: PathBuf,

    /// Active file written from the template (relative to project root)
    pub target: PathBuf,
}

impl TemplateFile {
    /// Template path under `root`.
    pub fn template_in(&self, root: &Path) -> PathBuf {
        root.join(&self.template)
    }

    /// Target path under `root`.
    pub fn target_in(&self, root: &Path) -> PathBuf {
        root.join(&self.target)
    }
}

/// Optional pipeline features.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct Features {
    /// Install dependencies one at a time behind a progress bar
    pub progressive_install: bool,

    /// Materialize the MCP configuration template
    pub mcp_config: bool,

    /// Run the project's installation test script at the end
    pub post_install_tests: bool,
}

impl Default for Features {
    fn default() -> Self {
        Self {
            progressive_install: true,
            mcp_config: true,
            post_install_tests: true,
        }
    }
}

/// What the verification pass checks.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct VerificationSettings {
    /// Files that must exist (relative to project root)
    pub required_files: Vec<PathBuf>,

    /// Packages that must be importable in the environment
    pub required_packages: Vec<String>,

    /// Project modules that must import cleanly
    pub project_modules: Vec<String>,

    /// Python statement that loads the materialized configuration
    pub config_probe: String,
}

impl Default for VerificationSettings {
    fn default() -> Self {
        Self {
            required_files: [
                "main.py",
                "requirements.txt",
                "config/config.example.toml",
                "src/__init__.py",
                "src/config.py",
            ]
            .iter()
            .map(PathBuf::from)
            .collect(),
            required_packages: [
                "streamlit",
                "asyncio",
                "pydantic",
                "aiohttp",
                "openai",
                "fastmcp",
                "pandas",
                "numpy",
                "matplotlib",
                "tomli",
                "mcp",
                "tenacity",
                "loguru",
                "rich",
            ]
            .iter()
            .map(|s| s.to_string())
            .collect(),
            project_modules: [
                "src.config",
                "src.logger",
                "src.schema",
                "src.agent.base",
                "src.environment.base",
                "src.tool.base",
            ]
            .iter()
            .map(|s| s.to_string())
            .collect(),
            config_probe: "from src.config import config".to_string(),
        }
    }
}

/// Post-install test settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct PostInstallSettings {
    /// Test script run with the environment interpreter (relative to project root)
    pub test_script: PathBuf,
}

impl Default for PostInstallSettings {
    fn default() -> Self {
        Self {
            test_script: PathBuf::from("test_easy_installation.py"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_reference_application() {
        let config = InstallerConfig::default();
        assert_eq!(config.python.version, PythonVersion::new(3, 12));
        assert_eq!(config.package_manager.name, "uv");
        assert_eq!(config.environment_dir, PathBuf::from(".venv"));
        assert_eq!(config.requirements, PathBuf::from("requirements.txt"));
        assert_eq!(
            config.config_file.target,
            PathBuf::from("config/config.toml")
        );
        assert!(config.features.progressive_install);
        assert_eq!(config.verification.required_packages.len(), 14);
        assert_eq!(config.verification.project_modules.len(), 6);
    }

    #[test]
    fn defaults_validate() {
        assert!(InstallerConfig::default().validate().is_ok());
    }

    #[test]
    fn partial_yaml_keeps_other_defaults() {
        let yaml = r#"
app_name: Demo
python:
  version: "3.11"
features:
  post_install_tests: false
"#;
        let config: InstallerConfig = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(config.app_name, "Demo");
        assert_eq!(config.python.version, PythonVersion::new(3, 11));
        assert!(!config.features.post_install_tests);
        assert!(config.features.progressive_install);
        assert_eq!(config.package_manager.name, "uv");
    }

    #[test]
    fn invalid_python_version_is_a_parse_error() {
        let yaml = "python:\n  version: \"three\"\n";
        assert!(serde_yaml::from_str::<InstallerConfig>(yaml).is_err());
    }

    #[test]
    fn python_version_serializes_as_string() {
        let yaml = serde_yaml::to_string(&InstallerConfig::default()).unwrap();
        assert!(yaml.contains("version: '3.12'") || yaml.contains("version: \"3.12\""));
    }

    #[test]
    fn validate_rejects_empty_package_manager() {
        let mut config = InstallerConfig::default();
        config.package_manager.name = " ".to_string();
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("package_manager.name"));
    }

    #[test]
    fn validate_rejects_python_two() {
        let mut config = InstallerConfig::default();
        config.python.version = PythonVersion::new(2, 7);
        assert!(config.validate().is_err());
    }

    #[test]
    fn validate_rejects_template_equal_to_target() {
        let mut config = InstallerConfig::default();
        config.mcp_config.target = config.mcp_config.template.clone();
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("mcp_config"));
    }

    #[test]
    fn candidates_fall_back_to_platform_defaults() {
        let settings = PythonSettings::default();
        assert_eq!(
            settings.candidates_for(Platform::Posix),
            vec!["python3", "python"]
        );

        let custom = PythonSettings {
            candidates: vec!["python3.12".to_string()],
            ..Default::default()
        };
        assert_eq!(custom.candidates_for(Platform::Posix), vec!["python3.12"]);
    }

    #[test]
    fn template_paths_resolve_under_root() {
        let file = TemplateFile {
            template: PathBuf::from("config/a.example"),
            target: PathBuf::from("config/a"),
        };
        let root = Path::new("/proj");
        assert_eq!(file.template_in(root), PathBuf::from("/proj/config/a.example"));
        assert_eq!(file.target_in(root), PathBuf::from("/proj/config/a"));
    }

    #[test]
    fn schema_generates() {
        let schema = schemars::schema_for!(InstallerConfig);
        let json = serde_json::to_string(&schema).unwrap();
        assert!(json.contains("progressive_install"));
    }
}
