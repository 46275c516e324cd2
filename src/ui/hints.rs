//! Remediation hints printed after a failure.
//!
//! Every fatal stage failure ends with one of these so the operator knows
//! what to fix before re-running.

use std::path::Path;

use crate::environment::PythonVersion;
use crate::shell::Platform;

/// No interpreter, or one that is too old.
pub fn interpreter_too_old(required: PythonVersion) -> String {
    format!(
        "Install Python {} or newer (https://www.python.org/downloads/) and re-run `pitch install`.",
        required
    )
}

/// The package manager could not be made available.
pub fn install_package_manager_manually(name: &str, script_url: &str, platform: Platform) -> String {
    match platform {
        Platform::Windows => format!(
            "Install {} manually: powershell -ExecutionPolicy ByPass -c \"irm {} | iex\"",
            name, script_url
        ),
        Platform::Posix => format!(
            "Install {} manually: curl -LsSf {} | sh",
            name, script_url
        ),
    }
}

/// Neither curl nor wget is available on POSIX.
pub fn install_fetch_tool() -> &'static str {
    "Install curl or wget and re-run `pitch install`."
}

/// Environment creation failed.
pub fn recreate_environment(env_dir: &Path) -> String {
    format!(
        "Remove {} and re-run `pitch install`.",
        env_dir.display()
    )
}

/// Dependency installation failed.
pub fn check_requirements(requirements: &Path) -> String {
    format!(
        "Check your network connection and the entries in {}, then re-run `pitch install`.",
        requirements.display()
    )
}

/// A required template file is missing.
pub fn restore_template(template: &Path) -> String {
    format!(
        "Restore {} (for example from version control) and re-run `pitch install`.",
        template.display()
    )
}

/// Verification reported failures.
pub fn after_failed_verification() -> &'static str {
    "Fix the failed checks above, then run `pitch verify`."
}

/// A project config was written by `pitch init`.
pub fn after_init() -> &'static str {
    "Edit .pitch/config.yml if needed, then run `pitch install`."
}
