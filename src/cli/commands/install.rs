//! Install command implementation.
//!
//! The `pitch install` command runs the installation pipeline. It is also
//! what runs when no subcommand is given.

use std::path::{Path, PathBuf};

use crate::cli::args::InstallArgs;
use crate::config::load_config;
use crate::environment::EnvironmentContext;
use crate::error::Result;
use crate::install::{InstallOptions, Installer};
use crate::shell::{ProcessRunner, SystemRunner};
use crate::ui::UserInterface;

use super::dispatcher::{Command, CommandResult};

/// The install command implementation.
pub struct InstallCommand {
    project_root: PathBuf,
    config_override: Option<PathBuf>,
    args: InstallArgs,
    runner: Box<dyn ProcessRunner>,
    context: Option<EnvironmentContext>,
}

impl InstallCommand {
    /// Create a new install command.
    pub fn new(project_root: &Path, config_override: Option<&Path>, args: InstallArgs) -> Self {
        Self {
            project_root: project_root.to_path_buf(),
            config_override: config_override.map(Path::to_path_buf),
            args,
            runner: Box::new(SystemRunner),
            context: None,
        }
    }

    /// Run subprocesses through `runner` instead of spawning them.
    pub fn with_runner(mut self, runner: Box<dyn ProcessRunner>) -> Self {
        self.runner = runner;
        self
    }

    /// Start from `context` instead of the process environment.
    pub fn with_context(mut self, context: EnvironmentContext) -> Self {
        self.context = Some(context);
        self
    }

    /// Get the command arguments.
    pub fn args(&self) -> &InstallArgs {
        &self.args
    }

    fn options(&self) -> InstallOptions {
        InstallOptions {
            no_progress: self.args.no_progress,
            skip_tests: self.args.skip_tests,
            no_mcp: self.args.no_mcp,
            force_config: self.args.force_config,
        }
    }
}

impl Command for InstallCommand {
    fn execute(&self, ui: &mut dyn UserInterface) -> Result<CommandResult> {
        let loaded = load_config(&self.project_root, self.config_override.as_deref())?;
        match &loaded.source {
            Some(path) => tracing::debug!("Using config from {}", path.display()),
            None => tracing::debug!("No config file found; using defaults"),
        }

        let context = self
            .context
            .clone()
            .unwrap_or_else(EnvironmentContext::from_process);

        let installer = Installer::new(
            &loaded.config,
            self.runner.as_ref(),
            &self.project_root,
            self.options(),
        );
        let outcome = installer.run(context, ui);

        if outcome.success() {
            Ok(CommandResult::success())
        } else {
            Ok(CommandResult::failure(outcome.exit_code()))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shell::{MockRunner, Platform};
    use crate::ui::MockUI;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn aborts_without_interpreter() {
        let temp = TempDir::new().unwrap();
        let ctx = EnvironmentContext::new(vec![], None, Platform::Posix);
        let cmd = InstallCommand::new(temp.path(), None, InstallArgs::default())
            .with_runner(Box::new(MockRunner::new()))
            .with_context(ctx);
        let mut ui = MockUI::new();

        let result = cmd.execute(&mut ui).unwrap();

        assert!(!result.success);
        assert_eq!(result.exit_code, 1);
        assert!(ui.has_error("No Python interpreter found"));
        assert_eq!(ui.stages().len(), 1);
    }

    #[test]
    fn invalid_config_is_an_error() {
        let temp = TempDir::new().unwrap();
        fs::create_dir_all(temp.path().join(".pitch")).unwrap();
        fs::write(temp.path().join(".pitch/config.yml"), "app_name: \"\"\n").unwrap();
        let cmd = InstallCommand::new(temp.path(), None, InstallArgs::default())
            .with_runner(Box::new(MockRunner::new()));
        let mut ui = MockUI::new();

        assert!(cmd.execute(&mut ui).is_err());
        assert!(ui.stages().is_empty());
    }

    #[test]
    fn flags_become_options() {
        let args = InstallArgs {
            no_progress: true,
            force_config: true,
            ..Default::default()
        };
        let cmd = InstallCommand::new(Path::new("/tmp"), None, args);
        let options = cmd.options();
        assert!(options.no_progress);
        assert!(options.force_config);
        assert!(!options.skip_tests);
    }
}
