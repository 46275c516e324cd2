//! Routing from parsed arguments to command implementations.

use std::path::{Path, PathBuf};

use crate::cli::args::{Cli, Commands, InstallArgs};
use crate::error::{PitchError, Result};
use crate::ui::UserInterface;

use super::completions::CompletionsCommand;
use super::config::ConfigCommand;
use super::init::InitCommand;
use super::install::InstallCommand;
use super::verify::VerifyCommand;

/// A runnable subcommand.
///
/// Commands report expected failures (an aborted install, a failed
/// check) through [`CommandResult`]. `Err` is reserved for problems that
/// stop the command from starting at all, such as an unreadable config.
pub trait Command {
    fn execute(&self, ui: &mut dyn UserInterface) -> Result<CommandResult>;
}

/// Outcome of a command, mapped to the process exit status by `main`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CommandResult {
    pub success: bool,
    pub exit_code: i32,
}

impl CommandResult {
    pub fn success() -> Self {
        Self {
            success: true,
            exit_code: 0,
        }
    }

    pub fn failure(exit_code: i32) -> Self {
        Self {
            success: false,
            exit_code,
        }
    }
}

/// Absolute project root for `--project`, or the current directory.
///
/// Child processes run with the root as their working directory, so a
/// relative root would be applied twice to the paths built from it.
pub fn resolve_project_root(project: Option<&Path>) -> Result<PathBuf> {
    let root = match project {
        Some(path) => std::path::absolute(path)?,
        None => std::env::current_dir()?,
    };
    if !root.is_dir() {
        return Err(PitchError::ProjectNotFound { path: root });
    }
    Ok(root)
}

/// Builds the command for a parsed command line and runs it.
pub struct CommandDispatcher {
    project_root: PathBuf,
    config_override: Option<PathBuf>,
}

impl CommandDispatcher {
    pub fn new(project_root: PathBuf) -> Self {
        Self {
            project_root,
            config_override: None,
        }
    }

    /// Read `path` instead of `.pitch/config.yml`. `None` keeps the default.
    pub fn with_config(mut self, path: Option<PathBuf>) -> Self {
        self.config_override = path;
        self
    }

    pub fn project_root(&self) -> &Path {
        &self.project_root
    }

    /// The command `cli` asks for. A bare `pitch` installs.
    fn command_for(&self, cli: &Cli) -> Box<dyn Command> {
        let root = self.project_root.as_path();
        let config = self.config_override.as_deref();
        match &cli.command {
            Some(Commands::Install(args)) => Box::new(InstallCommand::new(root, config, args.clone())),
            None => Box::new(InstallCommand::new(root, config, InstallArgs::default())),
            Some(Commands::Verify(args)) => Box::new(VerifyCommand::new(root, config, args.clone())),
            Some(Commands::Init(args)) => Box::new(InitCommand::new(root, args.clone())),
            Some(Commands::Config(args)) => Box::new(ConfigCommand::new(root, config, args.clone())),
            Some(Commands::Completions(args)) => Box::new(CompletionsCommand::new(args.clone())),
        }
    }

    pub fn dispatch(&self, cli: &Cli, ui: &mut dyn UserInterface) -> Result<CommandResult> {
        tracing::debug!("Project root: {}", self.project_root.display());
        self.command_for(cli).execute(ui)
    }
}
