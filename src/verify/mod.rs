//! Post-install verification.
//!
//! - [`check`] - Per-check results and the aggregate report
//! - [`verifier`] - The checks themselves

pub mod check;
pub mod verifier;

pub use check::{CheckResult, VerificationReport};
pub use verifier::{InstallationVerifier, CHECK_NAMES, PACKAGE_CHECK_CODE};
