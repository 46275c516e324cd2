//! Host environment probing.
//!
//! - [`context`] - Explicit search-path context threaded through the pipeline
//! - [`probe`] - Interpreter version checks and executable lookup

pub mod context;
pub mod probe;

pub use context::{is_executable, parse_system_path, resolve_tool_path, EnvironmentContext};
pub use probe::{
    check_interpreter_version, command_exists, find_interpreter, interpreter_version,
    InterpreterVersion, PythonVersion, VersionCheck,
};
