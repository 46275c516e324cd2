//! Interpreter version probing and executable lookup.
//!
//! The interpreter is an external program here, so "reading the version"
//! means resolving it on the search path and running `<python> --version`.
//! [`check_interpreter_version`] never returns an error: an interpreter that
//! cannot be found or whose output cannot be parsed is a failed comparison.

use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::shell::{Invocation, OutputHandling, ProcessRunner};

use super::context::EnvironmentContext;

static VERSION_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(\d+)\.(\d+)(?:\.(\d+))?").unwrap());

/// A `major.minor` Python version, used as a minimum and as the pin for
/// environment creation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct PythonVersion {
    pub major: u32,
    pub minor: u32,
}

impl PythonVersion {
    /// Create a version.
    pub const fn new(major: u32, minor: u32) -> Self {
        Self { major, minor }
    }
}

impl fmt::Display for PythonVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.major, self.minor)
    }
}

impl FromStr for PythonVersion {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (major, minor) = s
            .trim()
            .split_once('.')
            .ok_or_else(|| format!("expected MAJOR.MINOR, got '{}'", s))?;
        let major = major
            .parse()
            .map_err(|_| format!("invalid major version in '{}'", s))?;
        let minor = minor
            .parse()
            .map_err(|_| format!("invalid minor version in '{}'", s))?;
        Ok(Self { major, minor })
    }
}

impl TryFrom<String> for PythonVersion {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<PythonVersion> for String {
    fn from(value: PythonVersion) -> Self {
        value.to_string()
    }
}

/// The version reported by an interpreter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InterpreterVersion {
    pub major: u32,
    pub minor: u32,
    pub patch: Option<u32>,
}

impl InterpreterVersion {
    /// Extract the first `major.minor[.patch]` triple from `--version` output.
    pub fn parse(output: &str) -> Option<Self> {
        let caps = VERSION_REGEX.captures(output)?;
        Some(Self {
            major: caps.get(1)?.as_str().parse().ok()?,
            minor: caps.get(2)?.as_str().parse().ok()?,
            patch: caps.get(3).and_then(|m| m.as_str().parse().ok()),
        })
    }

    /// Lexicographic `(major, minor) >= (required.major, required.minor)`.
    pub fn satisfies(&self, required: PythonVersion) -> bool {
        (self.major, self.minor) >= (required.major, required.minor)
    }
}

impl fmt::Display for InterpreterVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.patch {
            Some(patch) => write!(f, "{}.{}.{}", self.major, self.minor, patch),
            None => write!(f, "{}.{}", self.major, self.minor),
        }
    }
}

/// Outcome of an interpreter version check.
#[derive(Debug, Clone)]
pub struct VersionCheck {
    /// Whether the interpreter meets the minimum.
    pub ok: bool,
    /// The interpreter that was asked.
    pub interpreter: Option<PathBuf>,
    /// The version it reported, if any.
    pub actual: Option<InterpreterVersion>,
    /// One-line explanation.
    pub detail: String,
}

/// Whether an executable called `name` is reachable through `ctx`.
pub fn command_exists(name: &str, ctx: &EnvironmentContext) -> bool {
    ctx.command_exists(name)
}

/// Resolve the first available interpreter among `candidates`.
pub fn find_interpreter(ctx: &EnvironmentContext, candidates: &[String]) -> Option<PathBuf> {
    candidates.iter().find_map(|name| ctx.resolve(name))
}

/// Ask `interpreter` for its version.
pub fn interpreter_version(
    runner: &dyn ProcessRunner,
    ctx: &EnvironmentContext,
    interpreter: &Path,
) -> Option<InterpreterVersion> {
    let invocation = ctx.apply(
        Invocation::new(interpreter)
            .arg("--version")
            .output(OutputHandling::Capture),
    );
    let result = runner.run(&invocation).ok()?;
    if !result.success {
        tracing::debug!(
            "{} --version exited with {:?}",
            interpreter.display(),
            result.exit_code
        );
        return None;
    }
    // Python 2 printed its version on stderr.
    InterpreterVersion::parse(&result.stdout).or_else(|| InterpreterVersion::parse(&result.stderr))
}

/// Compare `interpreter` (or the first of `candidates` found) against `required`.
pub fn check_interpreter_version(
    runner: &dyn ProcessRunner,
    ctx: &EnvironmentContext,
    interpreter: Option<&Path>,
    candidates: &[String],
    required: PythonVersion,
) -> VersionCheck {
    let interpreter = interpreter
        .map(Path::to_path_buf)
        .or_else(|| find_interpreter(ctx, candidates));

    let Some(path) = interpreter else {
        return VersionCheck {
            ok: false,
            interpreter: None,
            actual: None,
            detail: format!(
                "No Python interpreter found on PATH (looked for {})",
                candidates.join(", ")
            ),
        };
    };

    let Some(actual) = interpreter_version(runner, ctx, &path) else {
        return VersionCheck {
            ok: false,
            interpreter: Some(path.clone()),
            actual: None,
            detail: format!("Could not read the version of {}", path.display()),
        };
    };

    let ok = actual.satisfies(required);
    tracing::debug!(
        "Interpreter {} is {} (required >= {}): {}",
        path.display(),
        actual,
        required,
        ok
    );

    let detail = if ok {
        format!("Python {} is compatible", actual)
    } else {
        format!("Python {} is too old; {} or newer is required", actual, required)
    };

    VersionCheck {
        ok,
        interpreter: Some(path),
        actual: Some(actual),
        detail,
    }
}
