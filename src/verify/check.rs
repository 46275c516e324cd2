//! Verification check results.

use serde::Serialize;

/// Outcome of one verification check.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CheckResult {
    /// Check name, e.g. "packages".
    pub name: String,

    /// Whether the check passed.
    pub passed: bool,

    /// One-line explanation.
    pub detail: String,

    /// Individual items that failed (missing files, packages, modules).
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub failures: Vec<String>,
}

impl CheckResult {
    pub fn pass(name: &str, detail: impl Into<String>) -> Self {
        Self {
            name: name.to_string(),
            passed: true,
            detail: detail.into(),
            failures: Vec::new(),
        }
    }

    pub fn fail(name: &str, detail: impl Into<String>) -> Self {
        Self {
            name: name.to_string(),
            passed: false,
            detail: detail.into(),
            failures: Vec::new(),
        }
    }

    /// Build a result from the items that failed out of `checked`.
    ///
    /// Passes only when `failures` is empty.
    pub fn from_items(name: &str, checked: usize, noun: &str, failures: Vec<String>) -> Self {
        if failures.is_empty() {
            return Self::pass(name, format!("All {} {} passed", checked, noun));
        }
        Self {
            name: name.to_string(),
            passed: false,
            detail: format!("{} of {} {} failed", failures.len(), checked, noun),
            failures,
        }
    }
}

/// All check results of one verification run, in check order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct VerificationReport {
    /// Aggregate result: every check passed.
    pub passed: bool,
    pub checks: Vec<CheckResult>,
}

impl VerificationReport {
    pub fn new(checks: Vec<CheckResult>) -> Self {
        Self {
            passed: checks.iter().all(|c| c.passed),
            checks,
        }
    }

    /// Whether every check passed.
    pub fn passed(&self) -> bool {
        self.passed
    }

    /// Checks that failed.
    pub fn failed(&self) -> impl Iterator<Item = &CheckResult> {
        self.checks.iter().filter(|c| !c.passed)
    }

    /// Number of checks that passed.
    pub fn passed_count(&self) -> usize {
        self.checks.iter().filter(|c| c.passed).count()
    }

    pub fn len(&self) -> usize {
        self.checks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.checks.is_empty()
    }
}
