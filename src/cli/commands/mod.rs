//! CLI command implementations.
//!
//! Each command implements the [`Command`] trait, which provides a uniform
//! interface for executing commands and reporting results.
//!
//! Commands are dispatched via [`CommandDispatcher`], which routes CLI
//! subcommands to their implementations. Running `pitch` with no
//! subcommand is the same as `pitch install`.

pub mod completions;
pub mod config;
pub mod dispatcher;
pub mod init;
pub mod install;
pub mod verify;

pub use dispatcher::{resolve_project_root, Command, CommandDispatcher, CommandResult};
