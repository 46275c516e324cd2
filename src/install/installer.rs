//! The installation run.
//!
//! [`Installer`] binds each [`StageKind`] to the component that performs
//! it and feeds the pipeline. State that stages hand to later stages (the
//! possibly-extended [`EnvironmentContext`] and the resolved package
//! manager) lives in a per-run `RunState` value.

use std::path::{Path, PathBuf};

use crate::config::{Features, InstallerConfig};
use crate::environment::{check_interpreter_version, EnvironmentContext};
use crate::error::PitchError;
use crate::shell::{Invocation, ProcessRunner};
use crate::ui::{hints, RunSummary, UserInterface};
use crate::verify::InstallationVerifier;

use super::config_files::{ConfigMaterializer, ExistingTarget, Materialized};
use super::dependencies::{DependencyInstaller, InstallMode};
use super::package_manager::{exit_code_text, PackageManagerProvisioner};
use super::pipeline::{InstallationOutcome, Pipeline, StageKind};
use super::venv::{EnvironmentBuilder, EnvironmentLayout};

/// Command-line adjustments to a run.
#[derive(Debug, Clone, Default)]
pub struct InstallOptions {
    /// Install dependencies in one batch instead of one by one.
    pub no_progress: bool,
    /// Leave out the post-install test stage.
    pub skip_tests: bool,
    /// Leave out the MCP config stage.
    pub no_mcp: bool,
    /// Replace existing config files without asking.
    pub force_config: bool,
}

impl InstallOptions {
    /// Apply these options on top of the configured features.
    pub fn features(&self, configured: Features) -> Features {
        Features {
            progressive_install: configured.progressive_install && !self.no_progress,
            mcp_config: configured.mcp_config && !self.no_mcp,
            post_install_tests: configured.post_install_tests && !self.skip_tests,
        }
    }
}

/// State carried from one stage to the next.
#[derive(Debug)]
struct RunState {
    ctx: EnvironmentContext,
    package_manager: Option<PathBuf>,
}

/// Runs the installation pipeline for one project.
pub struct Installer<'a> {
    config: &'a InstallerConfig,
    runner: &'a dyn ProcessRunner,
    project_root: &'a Path,
    options: InstallOptions,
}

impl<'a> Installer<'a> {
    pub fn new(
        config: &'a InstallerConfig,
        runner: &'a dyn ProcessRunner,
        project_root: &'a Path,
        options: InstallOptions,
    ) -> Self {
        Self {
            config,
            runner,
            project_root,
            options,
        }
    }

    /// Effective features for this run.
    pub fn features(&self) -> Features {
        self.options.features(self.config.features)
    }

    /// The stages this run will execute.
    pub fn pipeline(&self) -> Pipeline {
        Pipeline::from_features(self.features())
    }

    fn layout(&self, ctx: &EnvironmentContext) -> EnvironmentLayout {
        EnvironmentLayout::new(self.project_root, &self.config.environment_dir, ctx.platform())
    }

    /// Run every stage, then print the summary and, on success, next steps.
    pub fn run(&self, ctx: EnvironmentContext, ui: &mut dyn UserInterface) -> InstallationOutcome {
        ui.show_header(&format!("{} installer", self.config.app_name));
        tracing::debug!(
            root = %self.project_root.display(),
            features = ?self.features(),
            "Starting installation"
        );

        let mut state = RunState {
            ctx,
            package_manager: None,
        };
        let outcome = self
            .pipeline()
            .execute(ui, |stage, ui| self.run_stage(stage.kind, &mut state, ui));

        ui.show_summary(&RunSummary {
            app_name: self.config.app_name.clone(),
            stages: outcome.summary_lines(),
            total_duration: outcome.duration,
            success: outcome.success(),
            aborted_at: outcome.aborted_at.map(|k| k.name().to_string()),
        });

        if outcome.success() {
            self.show_next_steps(&state.ctx, ui);
        }
        outcome
    }

    fn run_stage(&self, kind: StageKind, state: &mut RunState, ui: &mut dyn UserInterface) -> bool {
        match kind {
            StageKind::Interpreter => self.check_interpreter(state, ui),
            StageKind::PackageManager => self.ensure_package_manager(state, ui),
            StageKind::Environment => self.create_environment(state, ui),
            StageKind::Activation => self.report_activation(state, ui),
            StageKind::Dependencies => self.install_dependencies(state, ui),
            StageKind::Config => self.materialize_config(ui),
            StageKind::McpConfig => self.materialize_mcp_config(ui),
            StageKind::Verification => self.verify(state, ui),
            StageKind::PostInstallTests => self.run_post_install_tests(state, ui),
        }
    }

    fn check_interpreter(&self, state: &RunState, ui: &mut dyn UserInterface) -> bool {
        let required = self.config.python.version;
        let candidates = self.config.python.candidates_for(state.ctx.platform());
        let check = check_interpreter_version(self.runner, &state.ctx, None, &candidates, required);

        if check.ok {
            ui.success(&check.detail);
        } else {
            ui.error(&check.detail);
            ui.show_hint(&hints::interpreter_too_old(required));
        }
        check.ok
    }

    fn ensure_package_manager(&self, state: &mut RunState, ui: &mut dyn UserInterface) -> bool {
        let provisioner = PackageManagerProvisioner::new(&self.config.package_manager, self.runner);
        let provisioned = provisioner.ensure(state.ctx.clone(), ui);
        let available = provisioned.available();
        state.ctx = provisioned.context;
        state.package_manager = provisioned.binary;
        available
    }

    /// The resolved package manager, or an error when an earlier stage
    /// did not provide one.
    fn package_manager<'s>(&self, state: &'s RunState, ui: &mut dyn UserInterface) -> Option<&'s Path> {
        let binary = state.package_manager.as_deref();
        if binary.is_none() {
            ui.error(&format!("{} is not available", self.config.package_manager.name));
        }
        binary
    }

    fn create_environment(&self, state: &RunState, ui: &mut dyn UserInterface) -> bool {
        let Some(pm) = self.package_manager(state, ui) else {
            return false;
        };
        let layout = self.layout(&state.ctx);
        let builder = EnvironmentBuilder::new(self.runner, &state.ctx, pm, self.project_root);
        let created = builder.create(&layout, self.config.python.version, ui);
        if !created {
            ui.show_hint(&hints::recreate_environment(&self.config.environment_dir));
        }
        created
    }

    fn report_activation(&self, state: &RunState, ui: &mut dyn UserInterface) -> bool {
        let Some(pm) = self.package_manager(state, ui) else {
            return false;
        };
        let layout = self.layout(&state.ctx);
        let ready = EnvironmentBuilder::new(self.runner, &state.ctx, pm, self.project_root)
            .report_activation(&layout, ui);
        if !ready {
            ui.show_hint(&hints::recreate_environment(&self.config.environment_dir));
        }
        ready
    }

    fn install_dependencies(&self, state: &RunState, ui: &mut dyn UserInterface) -> bool {
        let Some(pm) = self.package_manager(state, ui) else {
            return false;
        };
        let mode = InstallMode::from_progressive(self.features().progressive_install);
        let requirements = self.project_root.join(&self.config.requirements);

        let installed = DependencyInstaller::new(self.runner, &state.ctx, pm, self.project_root)
            .install(&requirements, mode, ui);
        if !installed {
            ui.show_hint(&hints::check_requirements(&self.config.requirements));
        }
        installed
    }

    fn materializer(&self) -> ConfigMaterializer {
        if self.options.force_config {
            ConfigMaterializer::new(ExistingTarget::Overwrite)
        } else {
            ConfigMaterializer::new(ExistingTarget::Ask)
        }
    }

    fn materialize_config(&self, ui: &mut dyn UserInterface) -> bool {
        let file = &self.config.config_file;
        let template = file.template_in(self.project_root);
        let target = file.target_in(self.project_root);

        match self.materializer().materialize(&template, &target, ui) {
            Ok(result) => {
                report_materialized(result, &file.target, ui);
                true
            }
            Err(PitchError::MissingFile { path }) => {
                ui.error(&format!("Template not found: {}", path.display()));
                ui.show_hint(&hints::restore_template(&file.template));
                false
            }
            Err(e) => {
                ui.error(&format!("Could not write {}: {}", file.target.display(), e));
                false
            }
        }
    }

    /// The MCP template is optional: a missing one degrades to a warning.
    fn materialize_mcp_config(&self, ui: &mut dyn UserInterface) -> bool {
        let file = &self.config.mcp_config;
        let template = file.template_in(self.project_root);
        let target = file.target_in(self.project_root);

        match self.materializer().materialize(&template, &target, ui) {
            Ok(result) => {
                report_materialized(result, &file.target, ui);
                true
            }
            Err(PitchError::MissingFile { path }) => {
                ui.warning(&format!(
                    "MCP template not found ({}); skipping MCP configuration",
                    path.display()
                ));
                true
            }
            Err(e) => {
                ui.error(&format!("Could not write {}: {}", file.target.display(), e));
                false
            }
        }
    }

    fn verify(&self, state: &RunState, ui: &mut dyn UserInterface) -> bool {
        let report =
            InstallationVerifier::new(self.config, self.runner, &state.ctx, self.project_root).verify(ui);
        if report.passed() {
            ui.success(&format!("All {} checks passed", report.len()));
        } else {
            ui.warning(&format!(
                "{} of {} checks passed",
                report.passed_count(),
                report.len()
            ));
            ui.show_hint(hints::after_failed_verification());
        }
        report.passed()
    }

    fn run_post_install_tests(&self, state: &RunState, ui: &mut dyn UserInterface) -> bool {
        let script = self.project_root.join(&self.config.post_install.test_script);
        if !script.is_file() {
            ui.warning(&format!(
                "Test script {} not found; skipping installation tests",
                self.config.post_install.test_script.display()
            ));
            return true;
        }

        let layout = self.layout(&state.ctx);
        let python = if layout.exists() {
            layout.python()
        } else {
            ui.error("The environment interpreter is missing");
            return false;
        };

        let invocation = state.ctx.apply(
            Invocation::new(python)
                .arg(self.config.post_install.test_script.display().to_string())
                .cwd(self.project_root),
        );
        match self.runner.run(&invocation) {
            Ok(result) if result.success => {
                ui.success("Installation tests passed");
                true
            }
            Ok(result) => {
                ui.warning(&format!(
                    "Installation tests failed (exit code {})",
                    exit_code_text(result.exit_code)
                ));
                false
            }
            Err(e) => {
                ui.warning(&format!("Could not run installation tests: {}", e));
                false
            }
        }
    }

    fn show_next_steps(&self, ctx: &EnvironmentContext, ui: &mut dyn UserInterface) {
        let layout = self.layout(ctx);
        ui.message("");
        ui.message("Next steps:");
        ui.message(&format!(
            "  1. Edit {} and add your API keys",
            self.config.config_file.target.display()
        ));
        ui.message(&format!(
            "  2. Activate the environment: {}",
            layout.activation_command()
        ));
        ui.message(&format!("  3. Run: {}", self.config.run_hint));
    }
}

fn report_materialized(result: Materialized, target: &Path, ui: &mut dyn UserInterface) {
    match result {
        Materialized::Created => ui.success(&format!("Created {}", target.display())),
        Materialized::Overwritten => ui.success(&format!("Replaced {} with the template", target.display())),
        Materialized::Kept => ui.success(&format!("Keeping existing {}", target.display())),
    }
}
