//! Stage sequencing and failure policy.
//!
//! A [`Pipeline`] is an ordered list of [`Stage`] definitions derived from
//! the configured [`Features`]. [`Pipeline::execute`] runs them in order:
//! a failing [`FailurePolicy::Abort`] stage stops the run and every later
//! stage is recorded as not run; a failing [`FailurePolicy::Warn`] stage
//! is reported and the run continues. Nothing is retried.

use std::fmt;
use std::time::{Duration, Instant};

use crate::config::Features;
use crate::ui::{StageLine, StatusKind, UserInterface};

/// What happens when a stage fails.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailurePolicy {
    /// Stop the pipeline.
    Abort,
    /// Report a warning and continue.
    Warn,
}

/// The stages an installation can contain, in execution order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StageKind {
    Interpreter,
    PackageManager,
    Environment,
    Activation,
    Dependencies,
    Config,
    McpConfig,
    Verification,
    PostInstallTests,
}

impl StageKind {
    /// Stable identifier used in logs and the summary.
    pub fn name(&self) -> &'static str {
        match self {
            StageKind::Interpreter => "interpreter",
            StageKind::PackageManager => "package-manager",
            StageKind::Environment => "environment",
            StageKind::Activation => "activation",
            StageKind::Dependencies => "dependencies",
            StageKind::Config => "config",
            StageKind::McpConfig => "mcp-config",
            StageKind::Verification => "verification",
            StageKind::PostInstallTests => "post-install-tests",
        }
    }

    /// Human-readable title shown when the stage starts.
    pub fn title(&self) -> &'static str {
        match self {
            StageKind::Interpreter => "Checking Python version",
            StageKind::PackageManager => "Checking package manager",
            StageKind::Environment => "Creating virtual environment",
            StageKind::Activation => "Preparing environment activation",
            StageKind::Dependencies => "Installing dependencies",
            StageKind::Config => "Setting up configuration",
            StageKind::McpConfig => "Setting up MCP configuration",
            StageKind::Verification => "Verifying installation",
            StageKind::PostInstallTests => "Running installation tests",
        }
    }

    /// Default failure policy.
    pub fn policy(&self) -> FailurePolicy {
        match self {
            StageKind::McpConfig | StageKind::Verification | StageKind::PostInstallTests => {
                FailurePolicy::Warn
            }
            _ => FailurePolicy::Abort,
        }
    }
}

impl fmt::Display for StageKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// An immutable stage definition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Stage {
    pub kind: StageKind,
    pub policy: FailurePolicy,
}

impl Stage {
    pub fn new(kind: StageKind) -> Self {
        Self {
            kind,
            policy: kind.policy(),
        }
    }
}

/// Recorded outcome of one stage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StageResult {
    pub kind: StageKind,
    pub policy: FailurePolicy,
    pub status: StatusKind,
    /// `None` when the stage never ran.
    pub duration: Option<Duration>,
}

/// Final state of a pipeline run.
#[derive(Debug, Clone)]
pub struct InstallationOutcome {
    /// One entry per stage, in pipeline order.
    pub results: Vec<StageResult>,
    /// The ABORT stage that stopped the run.
    pub aborted_at: Option<StageKind>,
    pub duration: Duration,
}

impl InstallationOutcome {
    /// True when every ABORT stage passed.
    pub fn success(&self) -> bool {
        self.aborted_at.is_none()
    }

    /// Process exit status for this outcome.
    pub fn exit_code(&self) -> i32 {
        if self.success() {
            0
        } else {
            1
        }
    }

    /// Look up a stage's result.
    pub fn result(&self, kind: StageKind) -> Option<&StageResult> {
        self.results.iter().find(|r| r.kind == kind)
    }

    /// Stages that ran, in order.
    pub fn executed(&self) -> impl Iterator<Item = StageKind> + '_ {
        self.results
            .iter()
            .filter(|r| r.status != StatusKind::NotRun)
            .map(|r| r.kind)
    }

    /// Rows for the end-of-run summary.
    pub fn summary_lines(&self) -> Vec<StageLine> {
        self.results
            .iter()
            .map(|r| StageLine {
                name: r.kind.name().to_string(),
                status: r.status,
                duration: r.duration,
            })
            .collect()
    }
}

/// Ordered stage definitions for one run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pipeline {
    stages: Vec<Stage>,
}

impl Pipeline {
    /// Build from explicit stages.
    pub fn new(stages: Vec<Stage>) -> Self {
        Self { stages }
    }

    /// The installation sequence with optional stages gated by `features`.
    ///
    /// `progressive_install` does not add a stage; it selects how the
    /// dependencies stage installs.
    pub fn from_features(features: Features) -> Self {
        let mut stages = vec![
            Stage::new(StageKind::Interpreter),
            Stage::new(StageKind::PackageManager),
            Stage::new(StageKind::Environment),
            Stage::new(StageKind::Activation),
            Stage::new(StageKind::Dependencies),
            Stage::new(StageKind::Config),
        ];
        if features.mcp_config {
            stages.push(Stage::new(StageKind::McpConfig));
        }
        stages.push(Stage::new(StageKind::Verification));
        if features.post_install_tests {
            stages.push(Stage::new(StageKind::PostInstallTests));
        }
        Self { stages }
    }

    pub fn stages(&self) -> &[Stage] {
        &self.stages
    }

    pub fn len(&self) -> usize {
        self.stages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stages.is_empty()
    }

    /// Whether the pipeline contains `kind`.
    pub fn contains(&self, kind: StageKind) -> bool {
        self.stages.iter().any(|s| s.kind == kind)
    }

    /// Run every stage through `action`, applying each stage's policy.
    ///
    /// `action` reports its own diagnostics through the UI and returns
    /// whether the stage succeeded.
    pub fn execute<F>(&self, ui: &mut dyn UserInterface, mut action: F) -> InstallationOutcome
    where
        F: FnMut(&Stage, &mut dyn UserInterface) -> bool,
    {
        let start = Instant::now();
        let total = self.stages.len();
        let mut results = Vec::with_capacity(total);
        let mut aborted_at = None;

        for (index, stage) in self.stages.iter().enumerate() {
            if aborted_at.is_some() {
                results.push(StageResult {
                    kind: stage.kind,
                    policy: stage.policy,
                    status: StatusKind::NotRun,
                    duration: None,
                });
                continue;
            }

            ui.show_stage(index + 1, total, stage.kind.title());
            tracing::debug!(stage = stage.kind.name(), "Stage starting");

            let stage_start = Instant::now();
            let passed = action(stage, ui);
            let duration = stage_start.elapsed();

            let status = match (passed, stage.policy) {
                (true, _) => StatusKind::Passed,
                (false, FailurePolicy::Warn) => {
                    ui.warning(&format!(
                        "Stage '{}' failed; continuing",
                        stage.kind.name()
                    ));
                    StatusKind::Warned
                }
                (false, FailurePolicy::Abort) => {
                    aborted_at = Some(stage.kind);
                    StatusKind::Failed
                }
            };
            tracing::debug!(
                stage = stage.kind.name(),
                status = ?status,
                elapsed_ms = duration.as_millis() as u64,
                "Stage finished"
            );

            results.push(StageResult {
                kind: stage.kind,
                policy: stage.policy,
                status,
                duration: Some(duration),
            });
        }

        if let Some(kind) = aborted_at {
            tracing::debug!("Installation aborted at stage '{}'", kind);
        }

        InstallationOutcome {
            results,
            aborted_at,
            duration: start.elapsed(),
        }
    }
}
