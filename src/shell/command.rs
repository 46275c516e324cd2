//! Subordinate process execution.

use crate::error::{PitchError, Result};
use std::collections::HashMap;
use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};
use std::time::{Duration, Instant};

/// Result of executing a subordinate process.
#[derive(Debug, Clone)]
pub struct CommandResult {
    /// Exit code (None if killed by signal).
    pub exit_code: Option<i32>,

    /// Standard output (empty unless captured).
    pub stdout: String,

    /// Standard error (empty unless captured).
    pub stderr: String,

    /// Execution duration.
    pub duration: Duration,

    /// Whether the process succeeded (exit code 0).
    pub success: bool,
}

impl CommandResult {
    /// Create a success result.
    pub fn success(stdout: String, stderr: String, duration: Duration) -> Self {
        Self {
            exit_code: Some(0),
            stdout,
            stderr,
            duration,
            success: true,
        }
    }

    /// Create a failure result.
    pub fn failure(
        exit_code: Option<i32>,
        stdout: String,
        stderr: String,
        duration: Duration,
    ) -> Self {
        Self {
            exit_code,
            stdout,
            stderr,
            duration,
            success: false,
        }
    }

    /// Last non-empty line of stderr, falling back to stdout.
    ///
    /// Python tracebacks end with the exception line, which is the only
    /// part worth repeating in a one-line diagnostic.
    pub fn last_error_line(&self) -> Option<&str> {
        last_non_empty_line(&self.stderr).or_else(|| last_non_empty_line(&self.stdout))
    }
}

fn last_non_empty_line(s: &str) -> Option<&str> {
    s.lines().map(str::trim).rfind(|l| !l.is_empty())
}

/// What to do with a child's stdout/stderr.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputHandling {
    /// Child writes straight to the parent's streams.
    #[default]
    Inherit,
    /// Child output is discarded.
    Suppress,
    /// Child output is collected into the [`CommandResult`].
    Capture,
}

/// A fully specified subordinate process call.
#[derive(Debug, Clone)]
pub struct Invocation {
    /// Program to run (bare name or resolved path).
    pub program: PathBuf,

    /// Arguments, passed verbatim.
    pub args: Vec<String>,

    /// Working directory.
    pub cwd: Option<PathBuf>,

    /// Environment overrides (merged with the inherited environment).
    pub env: HashMap<String, OsString>,

    /// Stream handling.
    pub output: OutputHandling,
}

impl Invocation {
    /// Create an invocation of `program` with no arguments.
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
            cwd: None,
            env: HashMap::new(),
            output: OutputHandling::Inherit,
        }
    }

    /// Append one argument.
    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    /// Append several arguments.
    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    /// Set the working directory.
    pub fn cwd(mut self, dir: &Path) -> Self {
        self.cwd = Some(dir.to_path_buf());
        self
    }

    /// Set an environment variable for the child.
    pub fn env(mut self, key: &str, value: impl Into<OsString>) -> Self {
        self.env.insert(key.to_string(), value.into());
        self
    }

    /// Set stream handling.
    pub fn output(mut self, output: OutputHandling) -> Self {
        self.output = output;
        self
    }

    /// Program name without directory or extension (`/usr/bin/uv.exe` -> `uv`).
    pub fn program_name(&self) -> String {
        self.program
            .file_stem()
            .map(|s| s.to_string_lossy().to_lowercase())
            .unwrap_or_default()
    }

    /// Human-readable command line for diagnostics.
    pub fn display(&self) -> String {
        let mut parts = vec![self.program_name()];
        parts.extend(self.args.iter().cloned());
        parts.join(" ")
    }
}

/// Runs subordinate processes.
///
/// Implementations block until the child exits. There is no timeout: a hung
/// child hangs the caller.
pub trait ProcessRunner {
    /// Run the invocation to completion.
    ///
    /// A non-zero exit is reported through [`CommandResult::success`], not as
    /// an `Err`. `Err` means the process could not be started at all.
    fn run(&self, invocation: &Invocation) -> Result<CommandResult>;
}

/// [`ProcessRunner`] backed by `std::process::Command`.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemRunner;

impl ProcessRunner for SystemRunner {
    fn run(&self, invocation: &Invocation) -> Result<CommandResult> {
        let start = Instant::now();
        tracing::debug!("Running: {}", invocation.display());

        let mut cmd = Command::new(&invocation.program);
        cmd.args(&invocation.args);

        if let Some(cwd) = &invocation.cwd {
            cmd.current_dir(cwd);
        }

        for (key, value) in &invocation.env {
            cmd.env(key, value);
        }

        let (stdout, stderr) = match invocation.output {
            OutputHandling::Inherit => (Stdio::inherit(), Stdio::inherit()),
            OutputHandling::Suppress => (Stdio::null(), Stdio::null()),
            OutputHandling::Capture => (Stdio::piped(), Stdio::piped()),
        };
        cmd.stdin(Stdio::inherit()).stdout(stdout).stderr(stderr);

        let output = cmd.output().map_err(|e| {
            tracing::debug!("Failed to spawn {}: {}", invocation.display(), e);
            PitchError::CommandFailed {
                command: invocation.display(),
                code: None,
            }
        })?;

        let duration = start.elapsed();
        let stdout = String::from_utf8_lossy(&output.stdout).to_string();
        let stderr = String::from_utf8_lossy(&output.stderr).to_string();

        tracing::debug!(
            "{} exited with {:?} after {:?}",
            invocation.display(),
            output.status.code(),
            duration
        );

        if output.status.success() {
            Ok(CommandResult::success(stdout, stderr, duration))
        } else {
            Ok(CommandResult::failure(
                output.status.code(),
                stdout,
                stderr,
                duration,
            ))
        }
    }
}
