//! End-to-end installation runs against a scripted process runner.

use std::fs;
use std::path::{Path, PathBuf};

use pitch::config::InstallerConfig;
use pitch::environment::EnvironmentContext;
use pitch::install::{
    DependencyInstaller, FailurePolicy, InstallMode, InstallOptions, Installer,
    PackageManagerProvisioner, StageKind,
};
use pitch::shell::{MockRunner, Platform};
use pitch::ui::{MockUI, StatusKind};
use pitch::verify::InstallationVerifier;
use tempfile::TempDir;

fn executable(path: &Path) {
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, "#!/bin/sh\n").unwrap();
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        fs::set_permissions(path, fs::Permissions::from_mode(0o755)).unwrap();
    }
}

struct Project {
    temp: TempDir,
}

impl Project {
    fn new() -> Self {
        Self {
            temp: TempDir::new().unwrap(),
        }
    }

    fn root(&self) -> &Path {
        self.temp.path()
    }

    fn write(&self, rel: &str, content: &str) {
        let path = self.root().join(rel);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, content).unwrap();
    }

    fn bin(&self) -> PathBuf {
        self.root().join("host-bin")
    }

    fn home(&self) -> PathBuf {
        self.root().join("home")
    }

    fn context(&self, tools: &[&str]) -> EnvironmentContext {
        fs::create_dir_all(self.bin()).unwrap();
        for tool in tools {
            executable(&self.bin().join(tool));
        }
        EnvironmentContext::new(vec![self.bin()], Some(self.home()), Platform::Posix)
    }
}

/// A runner that behaves like a healthy host: interpreters report 3.12
/// and `uv venv` lays out an environment on disk.
fn host_runner(root: &Path) -> MockRunner {
    let mut runner = MockRunner::new();
    runner.on_output(&["python3", "--version"], 0, "Python 3.12.7\n", "");
    runner.on_output(&["python", "--version"], 0, "Python 3.12.7\n", "");
    let venv = root.join(".venv");
    runner.when_run(&["uv", "venv"], move |_| {
        executable(&venv.join("bin/python"));
        fs::write(venv.join("bin/activate"), "").unwrap();
    });
    runner
}

#[test]
fn scenario_a_progressive_install_runs_once_per_dependency() {
    let project = Project::new();
    project.write("requirements.txt", "pandas>=2.0\n# plotting\nmatplotlib\nrich\n");
    let ctx = project.context(&[]);
    let runner = MockRunner::new();
    let mut ui = MockUI::new();

    let ok = DependencyInstaller::new(&runner, &ctx, Path::new("uv"), project.root()).install(
        &project.root().join("requirements.txt"),
        InstallMode::Progressive,
        &mut ui,
    );

    assert!(ok);
    assert_eq!(runner.count(&["uv", "pip", "install"]), 3);
    assert_eq!(ui.progress_output().matches("100.0%").count(), 1);
}

#[test]
fn scenario_b_missing_template_creates_no_target() {
    let project = Project::new();
    project.write("requirements.txt", "pandas\n");
    let ctx = project.context(&["python3", "uv"]);
    let runner = host_runner(project.root());
    let config = InstallerConfig::default();
    let mut ui = MockUI::new();

    let outcome = Installer::new(&config, &runner, project.root(), InstallOptions::default())
        .run(ctx, &mut ui);

    assert_eq!(outcome.aborted_at, Some(StageKind::Config));
    assert!(!project.root().join("config/config.toml").exists());
    assert!(ui.has_hint("config/config.example.toml"));
}

#[test]
fn scenario_c_old_interpreter_aborts_before_environment_creation() {
    let project = Project::new();
    project.write("requirements.txt", "pandas\n");
    let ctx = project.context(&["python3", "uv"]);
    let mut runner = MockRunner::new();
    runner.on_output(&["python3", "--version"], 0, "Python 3.11.4\n", "");
    let config = InstallerConfig::default();
    let mut ui = MockUI::new();

    let outcome = Installer::new(&config, &runner, project.root(), InstallOptions::default())
        .run(ctx, &mut ui);

    assert!(!outcome.success());
    assert_eq!(outcome.exit_code(), 1);
    assert_eq!(outcome.aborted_at, Some(StageKind::Interpreter));
    assert!(!runner.was_called(&["uv", "venv"]));
    assert_eq!(outcome.executed().collect::<Vec<_>>(), vec![StageKind::Interpreter]);
}

#[test]
fn scenario_d_wget_bootstrap_used_exactly_once() {
    let project = Project::new();
    let ctx = project.context(&["wget", "sh"]);
    let installed = project.home().join(".local/bin/uv");
    let mut runner = MockRunner::new();
    runner.when_run(&["sh"], move |_| executable(&installed));
    let config = InstallerConfig::default();
    let mut ui = MockUI::new();

    let provisioned =
        PackageManagerProvisioner::new(&config.package_manager, &runner).ensure(ctx, &mut ui);

    assert!(provisioned.available());
    assert_eq!(runner.count(&["wget"]), 1);
    assert!(!runner.was_called(&["curl"]));
    assert!(provisioned
        .context
        .search_path()
        .contains(&project.home().join(".local/bin")));
}

#[test]
fn bootstrapped_package_manager_is_used_by_later_stages() {
    let project = Project::new();
    project.write("requirements.txt", "pandas\n");
    project.write("config/config.example.toml", "[llm]\n");
    let ctx = project.context(&["python3", "curl", "sh"]);
    let installed = project.home().join(".local/bin/uv");
    let mut runner = host_runner(project.root());
    runner.when_run(&["sh"], move |_| executable(&installed));
    let config = InstallerConfig::default();
    let mut ui = MockUI::new();

    let outcome = Installer::new(&config, &runner, project.root(), InstallOptions::default())
        .run(ctx, &mut ui);

    assert!(outcome.success(), "errors: {:?}", ui.errors());
    let venv = runner
        .calls()
        .into_iter()
        .find(|c| c.args.first().map(String::as_str) == Some("venv"))
        .unwrap();
    assert_eq!(venv.program, project.home().join(".local/bin/uv"));
    let path = venv.env.get("PATH").unwrap().to_string_lossy().into_owned();
    assert!(path.contains(".local/bin"));
}

#[test]
fn warn_stages_never_block_later_stages() {
    let project = Project::new();
    project.write("requirements.txt", "pandas\n");
    project.write("config/config.example.toml", "[llm]\n");
    project.write("test_easy_installation.py", "");
    let ctx = project.context(&["python3", "uv"]);
    let mut runner = host_runner(project.root());
    runner.on(&["python", "-c"], 1);
    runner.on(&["python", "test_easy_installation.py"], 1);
    let config = InstallerConfig::default();
    let mut ui = MockUI::new();

    let outcome = Installer::new(&config, &runner, project.root(), InstallOptions::default())
        .run(ctx, &mut ui);

    assert!(outcome.success());
    assert_eq!(outcome.exit_code(), 0);
    for result in &outcome.results {
        match result.policy {
            FailurePolicy::Abort => assert_eq!(result.status, StatusKind::Passed),
            FailurePolicy::Warn => assert_ne!(result.status, StatusKind::NotRun),
        }
    }
    assert_eq!(
        outcome.result(StageKind::PostInstallTests).unwrap().status,
        StatusKind::Warned
    );
}

#[test]
fn verification_is_exhaustive() {
    let project = Project::new();
    let ctx = project.context(&["python3"]);
    let mut runner = MockRunner::new();
    runner.on_output(&["python3", "--version"], 0, "Python 3.12.1\n", "");
    runner.on(&["python3", "-c"], 1);
    let config = InstallerConfig::default();
    let mut ui = MockUI::new();

    let report = InstallationVerifier::new(&config, &runner, &ctx, project.root()).verify(&mut ui);

    assert_eq!(report.len(), 5);
    assert!(!report.passed());
    assert!(report.checks[0].passed);
    let probes = config.verification.required_packages.len()
        + config.verification.project_modules.len()
        + 1;
    assert_eq!(runner.count(&["python3", "-c"]), probes);
    assert_eq!(
        report.passed(),
        report.checks.iter().all(|c| c.passed)
    );
}
