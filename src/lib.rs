//! Pitch - Bootstrap installer and post-install verifier for Python applications.
//!
//! Pitch takes a freshly cloned Python project to a runnable state: it
//! checks the interpreter, provisions the `uv` package manager, creates a
//! virtual environment, installs requirements, copies configuration
//! templates into place and then verifies the result.
//!
//! # Modules
//!
//! - [`cli`] - Command-line interface and argument parsing
//! - [`config`] - Installer configuration loading and validation
//! - [`environment`] - Search-path context and interpreter probing
//! - [`error`] - Error types and result aliases
//! - [`install`] - Installation stages and the pipeline that runs them
//! - [`shell`] - Subordinate process execution
//! - [`ui`] - Prompts, spinners, progress bar and terminal output
//! - [`verify`] - Post-install verification checks
//!
//! # Example
//!
//! ```
//! use pitch::config::Features;
//! use pitch::install::{Pipeline, StageKind};
//!
//! let pipeline = Pipeline::from_features(Features {
//!     progressive_install: true,
//!     mcp_config: false,
//!     post_install_tests: false,
//! });
//! assert_eq!(pipeline.stages()[0].kind, StageKind::Interpreter);
//! assert!(!pipeline.contains(StageKind::McpConfig));
//! ```

pub mod cli;
pub mod config;
pub mod environment;
pub mod error;
pub mod install;
pub mod shell;
pub mod ui;
pub mod verify;

pub use error::{PitchError, Result};
