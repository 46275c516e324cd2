//! Config command implementation.
//!
//! The `pitch config` command shows the resolved configuration, or the
//! JSON Schema describing the config file.

use std::path::{Path, PathBuf};

use crate::cli::args::ConfigArgs;
use crate::config::{load_config, InstallerConfig};
use crate::error::{PitchError, Result};
use crate::ui::UserInterface;

use super::dispatcher::{Command, CommandResult};

/// The config command implementation.
pub struct ConfigCommand {
    project_root: PathBuf,
    config_override: Option<PathBuf>,
    args: ConfigArgs,
}

impl ConfigCommand {
    /// Create a new config command.
    pub fn new(project_root: &Path, config_override: Option<&Path>, args: ConfigArgs) -> Self {
        Self {
            project_root: project_root.to_path_buf(),
            config_override: config_override.map(Path::to_path_buf),
            args,
        }
    }

    /// Get the project root path.
    pub fn project_root(&self) -> &Path {
        &self.project_root
    }
}

impl Command for ConfigCommand {
    fn execute(&self, ui: &mut dyn UserInterface) -> Result<CommandResult> {
        if self.args.schema {
            let schema = schemars::schema_for!(InstallerConfig);
            let json =
                serde_json::to_string_pretty(&schema).map_err(|e| PitchError::Other(e.into()))?;
            ui.message(&json);
            return Ok(CommandResult::success());
        }

        let loaded = load_config(&self.project_root, self.config_override.as_deref())?;

        if self.args.json {
            let json = serde_json::to_string_pretty(&loaded.config)
                .map_err(|e| PitchError::Other(e.into()))?;
            ui.message(&json);
        } else {
            match &loaded.source {
                Some(path) => ui.message(&format!("# {}", path.display())),
                None => ui.message("# built-in defaults"),
            }
            let yaml =
                serde_yaml::to_string(&loaded.config).map_err(|e| PitchError::Other(e.into()))?;
            ui.message(&yaml);
        }

        Ok(CommandResult::success())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ui::MockUI;
    use std::fs;
    use tempfile::TempDir;

    fn setup_project(config: &str) -> TempDir {
        let temp = TempDir::new().unwrap();
        let pitch_dir = temp.path().join(".pitch");
        fs::create_dir_all(&pitch_dir).unwrap();
        fs::write(pitch_dir.join("config.yml"), config).unwrap();
        temp
    }

    #[test]
    fn config_command_creation() {
        let temp = TempDir::new().unwrap();
        let cmd = ConfigCommand::new(temp.path(), None, ConfigArgs::default());
        assert_eq!(cmd.project_root(), temp.path());
    }

    #[test]
    fn defaults_without_config_file() {
        let temp = TempDir::new().unwrap();
        let cmd = ConfigCommand::new(temp.path(), None, ConfigArgs::default());
        let mut ui = MockUI::new();

        let result = cmd.execute(&mut ui).unwrap();

        assert!(result.success);
        assert!(ui.has_message("# built-in defaults"));
        assert!(ui.has_message("app_name: FinGenius"));
    }

    #[test]
    fn shows_config_path_and_overrides() {
        let temp = setup_project("app_name: StockBot\nrequirements: deps.txt\n");
        let cmd = ConfigCommand::new(temp.path(), None, ConfigArgs::default());
        let mut ui = MockUI::new();

        cmd.execute(&mut ui).unwrap();

        assert!(ui.has_message(".pitch/config.yml"));
        assert!(ui.has_message("app_name: StockBot"));
        assert!(ui.has_message("requirements: deps.txt"));
    }

    #[test]
    fn config_json_output() {
        let temp = setup_project("python:\n  version: \"3.13\"\n");
        let args = ConfigArgs {
            json: true,
            schema: false,
        };
        let cmd = ConfigCommand::new(temp.path(), None, args);
        let mut ui = MockUI::new();

        cmd.execute(&mut ui).unwrap();

        let value: serde_json::Value = serde_json::from_str(&ui.messages()[0]).unwrap();
        assert_eq!(value["python"]["version"], "3.13");
        assert_eq!(value["package_manager"]["name"], "uv");
    }

    #[test]
    fn schema_output() {
        let temp = TempDir::new().unwrap();
        let args = ConfigArgs {
            json: false,
            schema: true,
        };
        let cmd = ConfigCommand::new(temp.path(), None, args);
        let mut ui = MockUI::new();

        cmd.execute(&mut ui).unwrap();

        let schema: serde_json::Value = serde_json::from_str(&ui.messages()[0]).unwrap();
        assert!(schema["properties"]["features"].is_object());
    }

    #[test]
    fn invalid_config_is_reported() {
        let temp = setup_project("environment_dir: \"\"\n");
        let cmd = ConfigCommand::new(temp.path(), None, ConfigArgs::default());
        let mut ui = MockUI::new();

        let err = cmd.execute(&mut ui).unwrap_err();
        assert!(matches!(err, PitchError::ConfigValidationError { .. }));
    }
}
