//! Init command implementation.
//!
//! The `pitch init` command writes a commented starter config to
//! `.pitch/config.yml`.

use std::fs;
use std::path::{Path, PathBuf};

use include_dir::{include_dir, Dir};

use crate::cli::args::InitArgs;
use crate::config::project_config_path;
use crate::error::{PitchError, Result};
use crate::ui::{hints, UserInterface};

use super::dispatcher::{Command, CommandResult};

static TEMPLATES_DIR: Dir<'_> = include_dir!("$CARGO_MANIFEST_DIR/templates");

/// The starter config shipped with the binary.
pub fn starter_config() -> Result<&'static str> {
    TEMPLATES_DIR
        .get_file("config.yml")
        .and_then(|f| f.contents_utf8())
        .ok_or_else(|| PitchError::Other(anyhow::anyhow!("embedded config template is missing")))
}

/// The init command implementation.
pub struct InitCommand {
    project_root: PathBuf,
    args: InitArgs,
}

impl InitCommand {
    /// Create a new init command.
    pub fn new(project_root: &Path, args: InitArgs) -> Self {
        Self {
            project_root: project_root.to_path_buf(),
            args,
        }
    }

    /// Get the project root path.
    pub fn project_root(&self) -> &Path {
        &self.project_root
    }
}

impl Command for InitCommand {
    fn execute(&self, ui: &mut dyn UserInterface) -> Result<CommandResult> {
        let path = project_config_path(&self.project_root);

        if path.exists() && !self.args.force {
            ui.error(&format!(
                "{} already exists. Use --force to overwrite it.",
                path.display()
            ));
            return Ok(CommandResult::failure(1));
        }

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&path, starter_config()?)?;
        tracing::debug!("Wrote {}", path.display());

        ui.success(&format!("Created {}", path.display()));
        ui.show_hint(hints::after_init());
        Ok(CommandResult::success())
    }
}
