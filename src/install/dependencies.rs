//! Dependency installation from a requirements file.

use std::fs;
use std::path::Path;

use crate::environment::EnvironmentContext;
use crate::error::{PitchError, Result};
use crate::shell::{Invocation, OutputHandling, ProcessRunner};
use crate::ui::{BarFormat, ProgressTracker, UserInterface};

use super::package_manager::exit_code_text;

/// Dependency specifiers from a requirements file, in file order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DependencyList(Vec<String>);

impl DependencyList {
    /// Parse requirements text.
    ///
    /// Blank lines and `#` comment lines are dropped, as are trailing
    /// ` #` comments. Everything else is kept verbatim (trimmed).
    pub fn parse(content: &str) -> Self {
        let entries = content
            .lines()
            .map(strip_inline_comment)
            .map(str::trim)
            .filter(|line| !line.is_empty() && !line.starts_with('#'))
            .map(str::to_string)
            .collect();
        Self(entries)
    }

    /// Read and parse a requirements file.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                PitchError::MissingFile {
                    path: path.to_path_buf(),
                }
            } else {
                PitchError::Io(e)
            }
        })?;
        Ok(Self::parse(&content))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }
}

fn strip_inline_comment(line: &str) -> &str {
    match line.find(" #") {
        Some(idx) => &line[..idx],
        None => line,
    }
}

/// How dependencies are installed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InstallMode {
    /// One `pip install -r` call with inherited output.
    Batch,
    /// One silent `pip install <dep>` per entry behind a progress bar.
    Progressive,
}

impl InstallMode {
    pub fn from_progressive(progressive: bool) -> Self {
        if progressive {
            Self::Progressive
        } else {
            Self::Batch
        }
    }
}

/// Installs dependencies into the environment with the package manager.
pub struct DependencyInstaller<'a> {
    runner: &'a dyn ProcessRunner,
    ctx: &'a EnvironmentContext,
    package_manager: &'a Path,
    project_root: &'a Path,
    bar: BarFormat,
}

impl<'a> DependencyInstaller<'a> {
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
            bar: BarFormat::default(),
        }
    }

    /// Use a custom progress bar appearance.
    pub fn with_bar(mut self, bar: BarFormat) -> Self {
        self.bar = bar;
        self
    }

    /// Install everything in `requirements`.
    ///
    /// A missing requirements file fails before any process is started.
    /// In progressive mode the first failing entry stops the run.
    pub fn install(&self, requirements: &Path, mode: InstallMode, ui: &mut dyn UserInterface) -> bool {
        if !requirements.is_file() {
            ui.error(&format!(
                "Requirements file not found: {}",
                requirements.display()
            ));
            return false;
        }

        match mode {
            InstallMode::Batch => self.install_batch(requirements, ui),
            InstallMode::Progressive => self.install_progressive(requirements, ui),
        }
    }

    fn pip_install(&self) -> Invocation {
        Invocation::new(self.package_manager)
            .args(["pip", "install"])
            .cwd(self.project_root)
    }

    fn install_batch(&self, requirements: &Path, ui: &mut dyn UserInterface) -> bool {
        let invocation = self.ctx.apply(
            self.pip_install()
                .arg("-r")
                .arg(requirements.display().to_string()),
        );

        match self.runner.run(&invocation) {
            Ok(result) if result.success => {
                ui.success("Dependencies installed");
                true
            }
            Ok(result) => {
                ui.error(&format!(
                    "Installing dependencies failed (exit code {})",
                    exit_code_text(result.exit_code)
                ));
                false
            }
            Err(e) => {
                ui.error(&format!("Installing dependencies failed: {}", e));
                false
            }
        }
    }

    fn install_progressive(&self, requirements: &Path, ui: &mut dyn UserInterface) -> bool {
        let dependencies = match DependencyList::from_file(requirements) {
            Ok(list) => list,
            Err(e) => {
                ui.error(&format!("Could not read {}: {}", requirements.display(), e));
                return false;
            }
        };
        tracing::debug!("Installing {} dependencies one by one", dependencies.len());

        let handling = if ui.output_mode().shows_command_output() {
            OutputHandling::Inherit
        } else {
            OutputHandling::Suppress
        };
        let mut tracker = ProgressTracker::new(dependencies.len(), self.bar.clone(), ui.progress_writer());

        for dependency in dependencies.iter() {
            let invocation = self.ctx.apply(
                self.pip_install()
                    .arg(dependency)
                    .output(handling),
            );

            let failure = match self.runner.run(&invocation) {
                Ok(result) if result.success => None,
                Ok(result) => Some(format!("exit code {}", exit_code_text(result.exit_code))),
                Err(e) => Some(e.to_string()),
            };

            if let Some(reason) = failure {
                tracker.abandon();
                ui.error(&format!("Failed to install {} ({})", dependency, reason));
                return false;
            }

            tracker.advance(None);
        }

        ui.success(&format!("{} dependencies installed", dependencies.len()));
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shell::{MockRunner, Platform};
    use crate::ui::MockUI;
    use tempfile::TempDir;

    fn setup(requirements: Option<&str>) -> (TempDir, EnvironmentContext) {
        let temp = TempDir::new().unwrap();
        if let Some(content) = requirements {
            fs::write(temp.path().join("requirements.txt"), content).unwrap();
        }
        let ctx = EnvironmentContext::new(vec![], None, Platform::Posix);
        (temp, ctx)
    }

    #[test]
    fn parse_skips_blank_and_comment_lines() {
        let list = DependencyList::parse("# core\npandas>=2.0\n\n  \nnumpy\n#numpy-extra\nrich\n");
        assert_eq!(list.iter().collect::<Vec<_>>(), vec!["pandas>=2.0", "numpy", "rich"]);
    }

    #[test]
    fn parse_strips_inline_comments_and_whitespace() {
        let list = DependencyList::parse("  openai==1.0  # pinned\nloguru\r\n");
        assert_eq!(list.iter().collect::<Vec<_>>(), vec!["openai==1.0", "loguru"]);
    }

    #[test]
    fn parse_keeps_url_fragments() {
        let list = DependencyList::parse("pkg @ git+https://example.com/repo.git#egg=pkg\n");
        assert_eq!(list.len(), 1);
        assert!(list.iter().next().unwrap().ends_with("#egg=pkg"));
    }

    #[test]
    fn from_file_missing_is_missing_file() {
        let err = DependencyList::from_file(Path::new("/nonexistent/requirements.txt")).unwrap_err();
        assert!(matches!(err, PitchError::MissingFile { .. }));
    }

    #[test]
    fn progressive_installs_each_dependency() {
        let (temp, ctx) = setup(Some("pandas\n# comment\nnumpy\nrich\n"));
        let runner = MockRunner::new();
        let mut ui = MockUI::new();
        let installer = DependencyInstaller::new(&runner, &ctx, Path::new("uv"), temp.path());

        let ok = installer.install(
            &temp.path().join("requirements.txt"),
            InstallMode::Progressive,
            &mut ui,
        );

        assert!(ok);
        assert_eq!(runner.count(&["uv", "pip", "install"]), 3);
        let args: Vec<_> = runner.calls().iter().map(|c| c.args[2].clone()).collect();
        assert_eq!(args, vec!["pandas", "numpy", "rich"]);
        assert!(runner
            .calls()
            .iter()
            .all(|c| c.output == OutputHandling::Suppress));

        let progress = ui.progress_output();
        assert_eq!(progress.matches("100.0%").count(), 1);
        assert!(progress.ends_with("100.0% complete\n"));
    }

    #[test]
    fn verbose_streams_installer_output() {
        let (temp, ctx) = setup(Some("pandas\n"));
        let runner = MockRunner::new();
        let mut ui = MockUI::with_mode(crate::ui::OutputMode::Verbose);
        let installer = DependencyInstaller::new(&runner, &ctx, Path::new("uv"), temp.path());

        assert!(installer.install(
            &temp.path().join("requirements.txt"),
            InstallMode::Progressive,
            &mut ui,
        ));
        assert_eq!(runner.calls()[0].output, OutputHandling::Inherit);
    }

    #[test]
    fn progressive_stops_at_first_failure() {
        let (temp, ctx) = setup(Some("pandas\nbroken\nrich\n"));
        let mut runner = MockRunner::new();
        runner.on(&["uv", "pip", "install", "broken"], 1);
        let mut ui = MockUI::new();
        let installer = DependencyInstaller::new(&runner, &ctx, Path::new("uv"), temp.path());

        let ok = installer.install(
            &temp.path().join("requirements.txt"),
            InstallMode::Progressive,
            &mut ui,
        );

        assert!(!ok);
        assert_eq!(runner.count(&["uv", "pip", "install"]), 2);
        assert!(!runner.was_called(&["uv", "pip", "install", "rich"]));
        assert!(ui.has_error("broken"));

        let progress = ui.progress_output();
        assert!(progress.contains("33.3%"));
        assert!(!progress.contains("66.7%"));
        assert!(progress.ends_with('\n'));
    }

    #[test]
    fn batch_uses_requirements_flag() {
        let (temp, ctx) = setup(Some("pandas\n"));
        let runner = MockRunner::new();
        let mut ui = MockUI::new();
        let installer = DependencyInstaller::new(&runner, &ctx, Path::new("uv"), temp.path());
        let requirements = temp.path().join("requirements.txt");

        assert!(installer.install(&requirements, InstallMode::Batch, &mut ui));

        let calls = runner.calls();
        assert_eq!(calls.len(), 1);
        assert_eq!(
            calls[0].args,
            vec![
                "pip".to_string(),
                "install".to_string(),
                "-r".to_string(),
                requirements.display().to_string()
            ]
        );
        assert_eq!(calls[0].output, OutputHandling::Inherit);
        assert!(ui.progress_output().is_empty());
    }

    #[test]
    fn batch_failure_reports_exit_code() {
        let (temp, ctx) = setup(Some("pandas\n"));
        let mut runner = MockRunner::new();
        runner.on(&["uv", "pip", "install", "-r"], 2);
        let mut ui = MockUI::new();
        let installer = DependencyInstaller::new(&runner, &ctx, Path::new("uv"), temp.path());

        assert!(!installer.install(&temp.path().join("requirements.txt"), InstallMode::Batch, &mut ui));
        assert!(ui.has_error("exit code 2"));
    }

    #[test]
    fn missing_requirements_runs_nothing() {
        let (temp, ctx) = setup(None);
        let runner = MockRunner::new();
        let mut ui = MockUI::new();
        let installer = DependencyInstaller::new(&runner, &ctx, Path::new("uv"), temp.path());

        for mode in [InstallMode::Batch, InstallMode::Progressive] {
            assert!(!installer.install(&temp.path().join("requirements.txt"), mode, &mut ui));
        }
        assert!(runner.calls().is_empty());
        assert!(ui.has_error("Requirements file not found"));
    }

    #[test]
    fn empty_requirements_completes_immediately() {
        let (temp, ctx) = setup(Some("# nothing yet\n"));
        let runner = MockRunner::new();
        let mut ui = MockUI::new();
        let installer = DependencyInstaller::new(&runner, &ctx, Path::new("uv"), temp.path());

        assert!(installer.install(
            &temp.path().join("requirements.txt"),
            InstallMode::Progressive,
            &mut ui
        ));
        assert!(runner.calls().is_empty());
        assert!(ui.progress_output().contains("100.0%"));
    }

    #[test]
    fn mode_from_feature_flag() {
        assert_eq!(InstallMode::from_progressive(true), InstallMode::Progressive);
        assert_eq!(InstallMode::from_progressive(false), InstallMode::Batch);
    }
}
