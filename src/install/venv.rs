//! Isolated environment creation.

use std::path::{Path, PathBuf};

use crate::environment::{EnvironmentContext, PythonVersion};
use crate::shell::{Invocation, Platform, ProcessRunner};
use crate::ui::UserInterface;

use super::package_manager::exit_code_text;

/// Where an isolated environment lives and what it contains.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnvironmentLayout {
    /// Directory as configured (relative to the project root).
    relative: PathBuf,
    /// Absolute directory.
    dir: PathBuf,
    platform: Platform,
}

impl EnvironmentLayout {
    pub fn new(project_root: &Path, env_dir: &Path, platform: Platform) -> Self {
        Self {
            relative: env_dir.to_path_buf(),
            dir: project_root.join(env_dir),
            platform,
        }
    }

    /// Environment directory.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// The environment's own interpreter.
    pub fn python(&self) -> PathBuf {
        match self.platform {
            Platform::Windows => self.dir.join("Scripts").join("python.exe"),
            Platform::Posix => self.dir.join("bin").join("python"),
        }
    }

    /// Script a user sources to activate the environment.
    pub fn activation_script(&self) -> PathBuf {
        match self.platform {
            Platform::Windows => self.dir.join("Scripts").join("activate.bat"),
            Platform::Posix => self.dir.join("bin").join("activate"),
        }
    }

    /// Command a user types, relative to the project root.
    pub fn activation_command(&self) -> String {
        let dir = self.relative.display().to_string();
        match self.platform {
            Platform::Windows => format!("{}\\Scripts\\activate.bat", dir.replace('/', "\\")),
            Platform::Posix => format!("source {}/bin/activate", dir),
        }
    }

    /// Whether the environment interpreter exists.
    pub fn exists(&self) -> bool {
        self.python().is_file()
    }
}

/// Creates the isolated environment with the package manager.
pub struct EnvironmentBuilder<'a> {
    runner: &'a dyn ProcessRunner,
    ctx: &'a EnvironmentContext,
    package_manager: &'a Path,
    project_root: &'a Path,
}

impl<'a> EnvironmentBuilder<'a> {
    pub fn new(
        runner: &'a dyn ProcessRunner,
        ctx: &'a EnvironmentContext,
        package_manager: &'a Path,
        project_root: &'a Path,
    ) -> Self {
        Self {
            runner,
            ctx,
            package_manager,
            project_root,
        }
    }

    /// Run `<pm> venv <dir> --python <version>`.
    pub fn create(
        &self,
        layout: &EnvironmentLayout,
        version: PythonVersion,
        ui: &mut dyn UserInterface,
    ) -> bool {
        let invocation = self.ctx.apply(
            Invocation::new(self.package_manager)
                .arg("venv")
                .arg(layout.relative.display().to_string())
                .arg("--python")
                .arg(version.to_string())
                .cwd(self.project_root),
        );

        match self.runner.run(&invocation) {
            Ok(result) if result.success => {
                ui.success(&format!(
                    "Created environment {} (Python {})",
                    layout.relative.display(),
                    version
                ));
                true
            }
            Ok(result) => {
                ui.error(&format!(
                    "Creating the environment failed (exit code {})",
                    exit_code_text(result.exit_code)
                ));
                if let Some(line) = result.last_error_line() {
                    ui.error(line);
                }
                false
            }
            Err(e) => {
                ui.error(&format!("Creating the environment failed: {}", e));
                false
            }
        }
    }

    /// Check the activation script exists and tell the user how to use it.
    ///
    /// A child process cannot activate an environment for its parent
    /// shell, so this only reports the command.
    pub fn report_activation(&self, layout: &EnvironmentLayout, ui: &mut dyn UserInterface) -> bool {
        let script = layout.activation_script();
        if !script.is_file() {
            ui.error(&format!("Activation script not found: {}", script.display()));
            return false;
        }

        ui.success("Environment ready");
        ui.message(&format!("Activate it with: {}", layout.activation_command()));
        true
    }
}
