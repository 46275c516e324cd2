//! Verify command implementation.
//!
//! The `pitch verify` command checks an existing installation without
//! changing anything. It exits 1 when any check fails.

use std::path::{Path, PathBuf};

use crate::cli::args::VerifyArgs;
use crate::config::load_config;
use crate::environment::EnvironmentContext;
use crate::error::{PitchError, Result};
use crate::shell::{ProcessRunner, SystemRunner};
use crate::ui::{hints, NonInteractiveUI, OutputMode, UserInterface};
use crate::verify::{InstallationVerifier, VerificationReport};

use super::dispatcher::{Command, CommandResult};

/// The verify command implementation.
pub struct VerifyCommand {
    project_root: PathBuf,
    config_override: Option<PathBuf>,
    args: VerifyArgs,
    runner: Box<dyn ProcessRunner>,
    context: Option<EnvironmentContext>,
}

impl VerifyCommand {
    /// Create a new verify command.
    pub fn new(project_root: &Path, config_override: Option<&Path>, args: VerifyArgs) -> Self {
        Self {
            project_root: project_root.to_path_buf(),
            config_override: config_override.map(Path::to_path_buf),
            args,
            runner: Box::new(SystemRunner),
            context: None,
        }
    }

    /// Run probes through `runner` instead of spawning them.
    pub fn with_runner(mut self, runner: Box<dyn ProcessRunner>) -> Self {
        self.runner = runner;
        self
    }

    /// Start from `context` instead of the process environment.
    pub fn with_context(mut self, context: EnvironmentContext) -> Self {
        self.context = Some(context);
        self
    }

    fn print_json(&self, report: &VerificationReport, ui: &mut dyn UserInterface) -> Result<()> {
        let json = serde_json::to_string_pretty(report).map_err(|e| PitchError::Other(e.into()))?;
        ui.message(&json);
        Ok(())
    }
}

impl Command for VerifyCommand {
    fn execute(&self, ui: &mut dyn UserInterface) -> Result<CommandResult> {
        let loaded = load_config(&self.project_root, self.config_override.as_deref())?;
        let context = self
            .context
            .clone()
            .unwrap_or_else(EnvironmentContext::from_process);
        let verifier =
            InstallationVerifier::new(&loaded.config, self.runner.as_ref(), &context, &self.project_root);

        let report = if self.args.json {
            // Keep stdout for the JSON document.
            let mut silent = NonInteractiveUI::new(OutputMode::Silent);
            verifier.verify(&mut silent)
        } else {
            ui.show_header(&format!("Verifying {} installation", loaded.config.app_name));
            verifier.verify(ui)
        };

        if self.args.json {
            self.print_json(&report, ui)?;
        } else if report.passed() {
            ui.success(&format!("All {} checks passed", report.len()));
        } else {
            ui.error(&format!(
                "{} of {} checks passed",
                report.passed_count(),
                report.len()
            ));
            ui.show_hint(hints::after_failed_verification());
        }

        if report.passed() {
            Ok(CommandResult::success())
        } else {
            Ok(CommandResult::failure(1))
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

    fn project_with_venv() -> TempDir {
        let temp = TempDir::new().unwrap();
        for file in [
            "main.py",
            "requirements.txt",
            "config/config.example.toml",
            "src/__init__.py",
            "src/config.py",
            ".venv/bin/python",
        ] {
            let path = temp.path().join(file);
            fs::create_dir_all(path.parent().unwrap()).unwrap();
            fs::write(path, "").unwrap();
        }
        temp
    }

    fn command(root: &Path, args: VerifyArgs, runner: MockRunner) -> VerifyCommand {
        VerifyCommand::new(root, None, args)
            .with_runner(Box::new(runner))
            .with_context(EnvironmentContext::new(vec![], None, Platform::Posix))
    }

    #[test]
    fn healthy_installation_exits_zero() {
        let temp = project_with_venv();
        let mut runner = MockRunner::new();
        runner.on_output(&["python", "--version"], 0, "Python 3.12.2\n", "");
        let mut ui = MockUI::new();

        let result = command(temp.path(), VerifyArgs::default(), runner)
            .execute(&mut ui)
            .unwrap();

        assert!(result.success);
        assert!(ui.has_success("All 5 checks passed"));
    }

    #[test]
    fn failed_check_exits_one() {
        let temp = project_with_venv();
        let mut runner = MockRunner::new();
        runner.on_output(&["python", "--version"], 0, "Python 3.12.2\n", "");
        runner.on(&["python", "-c", "import src.tool.base"], 1);
        let mut ui = MockUI::new();

        let result = command(temp.path(), VerifyArgs::default(), runner)
            .execute(&mut ui)
            .unwrap();

        assert!(!result.success);
        assert_eq!(result.exit_code, 1);
        assert!(ui.has_error("4 of 5 checks passed"));
        assert!(ui.has_hint("pitch verify"));
    }

    #[test]
    fn json_report() {
        let temp = project_with_venv();
        let mut runner = MockRunner::new();
        runner.on_output(&["python", "--version"], 0, "Python 3.13.0\n", "");
        let mut ui = MockUI::new();

        command(temp.path(), VerifyArgs { json: true }, runner)
            .execute(&mut ui)
            .unwrap();

        assert_eq!(ui.messages().len(), 1);
        let report: serde_json::Value = serde_json::from_str(&ui.messages()[0]).unwrap();
        assert_eq!(report["passed"], true);
        assert_eq!(report["checks"].as_array().unwrap().len(), 5);
        assert_eq!(report["checks"][0]["name"], "python-version");
    }
}
