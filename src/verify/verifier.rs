//! Post-install verification.
//!
//! Every check runs regardless of how earlier checks went, and every item
//! within a check (each package, each module) is probed in its own
//! process. The report is therefore exhaustive rather than first-failure.

use std::path::{Path, PathBuf};

use crate::config::InstallerConfig;
use crate::environment::{check_interpreter_version, find_interpreter, EnvironmentContext};
use crate::install::{exit_code_text, EnvironmentLayout};
use crate::shell::{Invocation, OutputHandling, ProcessRunner};
use crate::ui::UserInterface;

use super::check::{CheckResult, VerificationReport};

/// Check names, in run order.
pub const CHECK_NAMES: [&str; 5] = [
    "python-version",
    "required-files",
    "packages",
    "project-modules",
    "config",
];

/// Exits 0 when the module named by the first argument is importable.
/// The name is passed as an argument so it never becomes Python source.
pub const PACKAGE_CHECK_CODE: &str =
    "import importlib.util, sys; sys.exit(0 if importlib.util.find_spec(sys.argv[1]) else 1)";

/// Runs the verification checks against a project.
pub struct InstallationVerifier<'a> {
    config: &'a InstallerConfig,
    runner: &'a dyn ProcessRunner,
    ctx: &'a EnvironmentContext,
    project_root: &'a Path,
}

impl<'a> InstallationVerifier<'a> {
    pub fn new(
        config: &'a InstallerConfig,
        runner: &'a dyn ProcessRunner,
        ctx: &'a EnvironmentContext,
        project_root: &'a Path,
    ) -> Self {
        Self {
            config,
            runner,
            ctx,
            project_root,
        }
    }

    /// Interpreter the probes run with: the environment's own when it
    /// exists, otherwise the first host candidate found.
    pub fn probe_interpreter(&self) -> Option<PathBuf> {
        let layout = EnvironmentLayout::new(
            self.project_root,
            &self.config.environment_dir,
            self.ctx.platform(),
        );
        if layout.exists() {
            return Some(layout.python());
        }
        let candidates = self.config.python.candidates_for(self.ctx.platform());
        find_interpreter(self.ctx, &candidates)
    }

    /// Run all checks.
    pub fn verify(&self, ui: &mut dyn UserInterface) -> VerificationReport {
        let python = self.probe_interpreter();
        match &python {
            Some(path) => tracing::debug!("Verifying with {}", path.display()),
            None => tracing::debug!("No interpreter available for verification probes"),
        }
        let python = python.as_deref();

        let checks = vec![
            run_check(ui, "Python version", || self.check_python_version(python)),
            run_check(ui, "Required files", || self.check_required_files()),
            run_check(ui, "Packages", || self.check_packages(python)),
            run_check(ui, "Project modules", || self.check_project_modules(python)),
            run_check(ui, "Configuration", || self.check_config(python)),
        ];

        VerificationReport::new(checks)
    }

    fn check_python_version(&self, python: Option<&Path>) -> CheckResult {
        let candidates = self.config.python.candidates_for(self.ctx.platform());
        let check = check_interpreter_version(
            self.runner,
            self.ctx,
            python,
            &candidates,
            self.config.python.version,
        );
        if check.ok {
            CheckResult::pass(CHECK_NAMES[0], check.detail)
        } else {
            CheckResult::fail(CHECK_NAMES[0], check.detail)
        }
    }

    fn check_required_files(&self) -> CheckResult {
        let files = &self.config.verification.required_files;
        let missing = files
            .iter()
            .filter(|f| !self.project_root.join(f).exists())
            .map(|f| f.display().to_string())
            .collect();
        CheckResult::from_items(CHECK_NAMES[1], files.len(), "files", missing)
    }

    fn check_packages(&self, python: Option<&Path>) -> CheckResult {
        let packages = &self.config.verification.required_packages;
        let Some(python) = python else {
            return no_interpreter(CHECK_NAMES[2]);
        };

        let missing = packages
            .iter()
            .filter(|package| self.probe(python, PACKAGE_CHECK_CODE, &[package.as_str()]).is_err())
            .cloned()
            .collect();
        CheckResult::from_items(CHECK_NAMES[2], packages.len(), "packages", missing)
    }

    fn check_project_modules(&self, python: Option<&Path>) -> CheckResult {
        let modules = &self.config.verification.project_modules;
        let Some(python) = python else {
            return no_interpreter(CHECK_NAMES[3]);
        };

        let failures = modules
            .iter()
            .filter_map(|module| {
                self.probe(python, &format!("import {}", module), &[])
                    .err()
                    .map(|reason| format!("{} ({})", module, reason))
            })
            .collect();
        CheckResult::from_items(CHECK_NAMES[3], modules.len(), "modules", failures)
    }

    fn check_config(&self, python: Option<&Path>) -> CheckResult {
        let Some(python) = python else {
            return no_interpreter(CHECK_NAMES[4]);
        };
        match self.probe(python, &self.config.verification.config_probe, &[]) {
            Ok(()) => CheckResult::pass(CHECK_NAMES[4], "Configuration loads"),
            Err(reason) => CheckResult::fail(
                CHECK_NAMES[4],
                format!("Configuration failed to load: {}", reason),
            ),
        }
    }

    /// Run `python -c code args...` in the project root. `Err` carries the
    /// last line of error output.
    fn probe(&self, python: &Path, code: &str, args: &[&str]) -> Result<(), String> {
        let invocation = self.ctx.apply(
            Invocation::new(python)
                .arg("-c")
                .arg(code)
                .args(args.iter().copied())
                .cwd(self.project_root)
                .output(OutputHandling::Capture),
        );
        match self.runner.run(&invocation) {
            Ok(result) if result.success => Ok(()),
            Ok(result) => Err(result
                .last_error_line()
                .map(str::to_string)
                .unwrap_or_else(|| format!("exit code {}", exit_code_text(result.exit_code)))),
            Err(e) => Err(e.to_string()),
        }
    }
}

fn no_interpreter(name: &str) -> CheckResult {
    CheckResult::fail(name, "No Python interpreter available to run the check")
}

fn run_check(
    ui: &mut dyn UserInterface,
    title: &str,
    check: impl FnOnce() -> CheckResult,
) -> CheckResult {
    let mut spinner = ui.start_spinner(&format!("Checking {}", title.to_lowercase()));
    let result = check();
    tracing::debug!(check = %result.name, passed = result.passed, "{}", result.detail);

    if result.passed {
        spinner.finish_success(&format!("{}: {}", title, result.detail));
    } else {
        spinner.finish_error(&format!("{}: {}", title, result.detail));
        for failure in &result.failures {
            ui.message(&format!("    - {}", failure));
        }
    }
    result
}
