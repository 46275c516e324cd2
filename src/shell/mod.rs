//! Subordinate process execution and platform detection.
//!
//! Every external tool (package manager, fetch tools, interpreters) is run
//! through the [`ProcessRunner`] trait with an explicit argument vector.
//! Nothing is routed through a shell, so pipelines and quoting never leak
//! into failure attribution.

pub mod command;
pub mod mock;
pub mod platform;

pub use command::{CommandResult, Invocation, OutputHandling, ProcessRunner, SystemRunner};
pub use mock::MockRunner;
pub use platform::{is_ci, Platform};
