//! Package manager provisioning.
//!
//! Makes sure the package manager binary is reachable, running its
//! official bootstrap script when it is not. The bootstrap is two steps:
//! fetch the script to a temporary file, then execute that file. A shell
//! pipeline is never built.
//!
//! After a bootstrap the binary usually lands in a user-local directory
//! that is not on the search path yet. Instead of touching the process
//! environment, [`PackageManagerProvisioner::ensure`] returns an extended
//! [`EnvironmentContext`] for the rest of the run.

use std::path::{Path, PathBuf};

use crate::config::PackageManagerSettings;
use crate::environment::EnvironmentContext;
use crate::error::{PitchError, Result};
use crate::shell::{Invocation, OutputHandling, Platform, ProcessRunner};
use crate::ui::{hints, UserInterface};

/// Result of [`PackageManagerProvisioner::ensure`].
#[derive(Debug, Clone)]
pub struct Provisioned {
    /// Context to use from here on (possibly with one directory appended).
    pub context: EnvironmentContext,

    /// Resolved binary, when available.
    pub binary: Option<PathBuf>,
}

impl Provisioned {
    /// Whether the package manager can be used.
    pub fn available(&self) -> bool {
        self.binary.is_some()
    }
}

/// The two commands that install the package manager.
#[derive(Debug, Clone)]
pub struct BootstrapPlan {
    /// Downloads the script to `script`.
    pub fetch: Invocation,

    /// Runs the downloaded script.
    pub execute: Invocation,

    /// Where the script is written.
    pub script: PathBuf,
}

/// Choose the bootstrap commands for the context's platform.
///
/// POSIX prefers `curl` and falls back to `wget`; Windows uses PowerShell.
/// Fails with `CommandNotFound` when no fetch tool is available.
pub fn plan_bootstrap(
    settings: &PackageManagerSettings,
    ctx: &EnvironmentContext,
    work_dir: &Path,
) -> Result<BootstrapPlan> {
    match ctx.platform() {
        Platform::Windows => {
            let script = work_dir.join("install.ps1");
            let powershell = ctx
                .resolve("powershell")
                .unwrap_or_else(|| PathBuf::from("powershell"));
            let fetch = Invocation::new(&powershell).args([
                "-NoProfile".to_string(),
                "-Command".to_string(),
                format!(
                    "Invoke-RestMethod -Uri '{}' -OutFile '{}'",
                    settings.install_script_url_windows,
                    script.display()
                ),
            ]);
            let execute = Invocation::new(&powershell).args([
                "-NoProfile".to_string(),
                "-ExecutionPolicy".to_string(),
                "ByPass".to_string(),
                "-File".to_string(),
                script.display().to_string(),
            ]);
            Ok(BootstrapPlan {
                fetch,
                execute,
                script,
            })
        }
        Platform::Posix => {
            let script = work_dir.join("install.sh");
            let url = settings.install_script_url.clone();
            let target = script.display().to_string();

            let fetch = if let Some(curl) = ctx.resolve("curl") {
                Invocation::new(curl).args(["-LsSf".to_string(), url, "-o".to_string(), target.clone()])
            } else if let Some(wget) = ctx.resolve("wget") {
                Invocation::new(wget).args(["-q".to_string(), "-O".to_string(), target.clone(), url])
            } else {
                return Err(PitchError::CommandNotFound {
                    name: "curl or wget".to_string(),
                });
            };

            let sh = ctx.resolve("sh").unwrap_or_else(|| PathBuf::from("sh"));
            let execute = Invocation::new(sh).arg(target);
            Ok(BootstrapPlan {
                fetch,
                execute,
                script,
            })
        }
    }
}

/// Ensures the package manager is installed and reachable.
pub struct PackageManagerProvisioner<'a> {
    settings: &'a PackageManagerSettings,
    runner: &'a dyn ProcessRunner,
}

impl<'a> PackageManagerProvisioner<'a> {
    pub fn new(settings: &'a PackageManagerSettings, runner: &'a dyn ProcessRunner) -> Self {
        Self { settings, runner }
    }

    /// Make the package manager available, bootstrapping it if needed.
    ///
    /// Never fails the process: an unavailable binary is reported as a
    /// warning with a manual-install hint, and the caller decides whether
    /// that is fatal.
    pub fn ensure(&self, ctx: EnvironmentContext, ui: &mut dyn UserInterface) -> Provisioned {
        let name = self.settings.name.as_str();

        if let Some(binary) = ctx.resolve(name) {
            tracing::debug!("{} found at {}", name, binary.display());
            ui.success(&format!("{} is already installed", name));
            return Provisioned {
                context: ctx,
                binary: Some(binary),
            };
        }

        ui.message(&format!("Installing {}...", name));
        if !self.bootstrap(&ctx, ui) {
            ui.show_hint(&self.manual_hint(ctx.platform()));
            return Provisioned {
                context: ctx,
                binary: None,
            };
        }

        if let Some(binary) = ctx.resolve(name) {
            ui.success(&format!("{} installed", name));
            return Provisioned {
                context: ctx,
                binary: Some(binary),
            };
        }

        if let Some(provisioned) = self.search_fallback_dirs(&ctx) {
            ui.success(&format!("{} installed", name));
            return provisioned;
        }

        let first_dir = self
            .settings
            .fallback_dirs
            .first()
            .map(|d| format!("~/{}", d.display()))
            .unwrap_or_else(|| "the install directory".to_string());
        ui.warning(&format!("{} was installed but is not on PATH", name));
        ui.warning(&format!(
            "Restart your terminal or add {} to PATH",
            first_dir
        ));
        ui.show_hint(&self.manual_hint(ctx.platform()));
        Provisioned {
            context: ctx,
            binary: None,
        }
    }

    /// Fetch and run the bootstrap script. Returns whether both steps succeeded.
    fn bootstrap(&self, ctx: &EnvironmentContext, ui: &mut dyn UserInterface) -> bool {
        let work_dir = match tempfile::Builder::new().prefix("pitch-bootstrap-").tempdir() {
            Ok(dir) => dir,
            Err(e) => {
                ui.error(&format!("Could not create a temporary directory: {}", e));
                return false;
            }
        };

        let plan = match plan_bootstrap(self.settings, ctx, work_dir.path()) {
            Ok(plan) => plan,
            Err(e) => {
                ui.error(&format!(
                    "curl or wget is required to install {} ({})",
                    self.settings.name, e
                ));
                ui.show_hint(hints::install_fetch_tool());
                return false;
            }
        };

        let fetch = ctx.apply(plan.fetch.output(OutputHandling::Capture));
        let mut spinner = ui.start_spinner(&format!("Downloading the {} installer", self.settings.name));
        match self.runner.run(&fetch) {
            Ok(result) if result.success => {
                spinner.finish_success(&format!("Downloaded the {} installer", self.settings.name));
            }
            Ok(result) => {
                let detail = result.last_error_line().unwrap_or("no output").to_string();
                spinner.finish_error(&format!(
                    "Downloading the installer failed (exit code {}): {}",
                    exit_code_text(result.exit_code),
                    detail
                ));
                return false;
            }
            Err(e) => {
                spinner.finish_error(&format!("Downloading the installer failed: {}", e));
                return false;
            }
        }

        tracing::debug!("Running bootstrap script {}", plan.script.display());
        let execute = ctx.apply(plan.execute);
        match self.runner.run(&execute) {
            Ok(result) if result.success => true,
            Ok(result) => {
                ui.error(&format!(
                    "The {} installer exited with code {}",
                    self.settings.name,
                    exit_code_text(result.exit_code)
                ));
                false
            }
            Err(e) => {
                ui.error(&format!("Running the {} installer failed: {}", self.settings.name, e));
                false
            }
        }
    }

    /// Look in the conventional install directories, appending the first
    /// one that holds the binary to the context.
    fn search_fallback_dirs(&self, ctx: &EnvironmentContext) -> Option<Provisioned> {
        let home = ctx.home()?;
        self.settings.fallback_dirs.iter().find_map(|dir| {
            let candidate = ctx.clone().with_appended_path(home.join(dir));
            let binary = candidate.resolve(&self.settings.name)?;
            tracing::debug!("{} found after adding {} to PATH", self.settings.name, dir.display());
            Some(Provisioned {
                context: candidate,
                binary: Some(binary),
            })
        })
    }

    fn manual_hint(&self, platform: Platform) -> String {
        let url = match platform {
            Platform::Windows => &self.settings.install_script_url_windows,
            Platform::Posix => &self.settings.install_script_url,
        };
        hints::install_package_manager_manually(&self.settings.name, url, platform)
    }
}

/// Render an optional exit code for messages.
pub(crate) fn exit_code_text(code: Option<i32>) -> String {
    code.map(|c| c.to_string())
        .unwrap_or_else(|| "none (terminated by signal)".to_string())
}
