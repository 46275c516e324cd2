//! Error types for Pitch operations.
//!
//! This module defines [`PitchError`], the primary error type used throughout
//! the application, and a [`Result`] type alias for convenience.
//!
//! # Error Handling Strategy
//!
//! - Stage actions never let a `PitchError` escape: they convert it into a
//!   boolean outcome plus a printed diagnostic
//! - Use `PitchError` for setup failures (config, terminal) that reach `main`
//! - Use `anyhow::Error` (via `PitchError::Other`) for unexpected errors

use std::path::PathBuf;
use thiserror::Error;

/// Core error type for Pitch operations.
#[derive(Debug, Error)]
pub enum PitchError {
    /// Configuration file not found at expected location.
    #[error("Configuration not found: {path}")]
    ConfigNotFound { path: PathBuf },

    /// Failed to parse configuration file.
    #[error("Failed to parse config at {path}: {message}")]
    ConfigParseError { path: PathBuf, message: String },

    /// Invalid configuration structure or values.
    #[error("Invalid configuration: {message}")]
    ConfigValidationError { message: String },

    /// External command exited non-zero or could not be spawned.
    #[error("Command failed with exit code {code:?}: {command}")]
    CommandFailed { command: String, code: Option<i32> },

    /// A required executable is not on the search path.
    #[error("Command not found: {name}")]
    CommandNotFound { name: String },

    /// The `--project` directory does not exist.
    #[error("Project directory not found: {path}")]
    ProjectNotFound { path: PathBuf },

    /// A required input file does not exist.
    #[error("Required file missing: {path}")]
    MissingFile { path: PathBuf },

    /// IO error wrapper.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Generic wrapped error for anyhow interop.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Result type alias for Pitch operations.
pub type Result<T> = std::result::Result<T, PitchError>;
