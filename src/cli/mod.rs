//! Command-line interface for Pitch.
//!
//! - [`args`] - Argument definitions using clap derive macros
//! - [`commands`] - Command implementations

pub mod args;
pub mod commands;

pub use args::{
    Cli, Commands, CompletionsArgs, ConfigArgs, InitArgs, InstallArgs, VerifyArgs,
};
pub use commands::{resolve_project_root, Command, CommandDispatcher, CommandResult};
