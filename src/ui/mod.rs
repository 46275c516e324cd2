//! User interface components.
//!
//! This module provides:
//! - [`UserInterface`] trait for UI abstraction
//! - [`TerminalUI`] for interactive terminal usage
//! - [`NonInteractiveUI`] for CI/headless environments
//! - [`MockUI`] for tests
//! - Prompts, spinners and the dependency [`ProgressTracker`]
//!
//! # Example
//!
//! ```
//! use pitch::ui::{create_ui, OutputMode};
//!
//! let mut ui = create_ui(false, OutputMode::Silent);
//! ui.show_header("FinGenius");
//! ui.success("Setup complete!");
//! ```

pub mod hints;
pub mod mock;
pub mod non_interactive;
pub mod output;
pub mod progress;
pub mod prompts;
pub mod spinner;
pub mod terminal;
pub mod theme;

pub use mock::{MockSpinner, MockUI, SpinnerStatus};
pub use non_interactive::NonInteractiveUI;
pub use output::OutputMode;
pub use progress::{format_duration, render_line, BarFormat, ProgressTracker};
pub use prompts::{parse_answer, prompt_confirm};
pub use spinner::ProgressSpinner;
pub use terminal::{create_ui, TerminalUI};
pub use theme::{should_use_colors, PitchTheme};

use std::io::Write;
use std::time::Duration;

use crate::error::Result;

/// Trait for user interface interactions.
///
/// This trait allows mocking the UI in tests.
pub trait UserInterface {
    /// Get the current output mode.
    fn output_mode(&self) -> OutputMode;

    /// Display a message to the user.
    fn message(&mut self, msg: &str);

    /// Display a success message.
    fn success(&mut self, msg: &str);

    /// Display a warning message.
    fn warning(&mut self, msg: &str);

    /// Display an error message. Always shown, even in silent mode.
    fn error(&mut self, msg: &str);

    /// Ask a yes/no question.
    fn confirm(&mut self, prompt: &Prompt) -> Result<bool>;

    /// Start a spinner for an operation.
    fn start_spinner(&mut self, message: &str) -> Box<dyn SpinnerHandle>;

    /// Show a header/banner.
    fn show_header(&mut self, title: &str);

    /// Announce a pipeline stage (e.g., "[3/9] Creating environment").
    fn show_stage(&mut self, index: usize, total: usize, title: &str);

    /// Show a remediation or next-step hint.
    fn show_hint(&mut self, hint: &str);

    /// Show the end-of-run stage table.
    fn show_summary(&mut self, summary: &RunSummary);

    /// Writer that a [`ProgressTracker`] draws on.
    fn progress_writer(&mut self) -> Box<dyn Write>;

    /// Check if running in interactive mode.
    fn is_interactive(&self) -> bool;
}

/// Handle for controlling a spinner.
pub trait SpinnerHandle {
    /// Update the spinner message.
    fn set_message(&mut self, msg: &str);

    /// Mark the operation as successful.
    fn finish_success(&mut self, msg: &str);

    /// Mark the operation as failed.
    fn finish_error(&mut self, msg: &str);

    /// Remove the spinner without a final line.
    fn finish_clear(&mut self);
}

/// A yes/no question.
#[derive(Debug, Clone)]
pub struct Prompt {
    /// Unique key (used for `PITCH_PROMPT_<KEY>` overrides and mocks).
    pub key: String,
    /// The question to display.
    pub question: String,
    /// Answer used when the user just presses enter, or when nobody can answer.
    pub default: bool,
}

impl Prompt {
    /// Create a confirm prompt.
    pub fn confirm(key: &str, question: &str, default: bool) -> Self {
        Self {
            key: key.to_string(),
            question: question.to_string(),
            default,
        }
    }
}

/// Outcome of one stage, as shown in the summary.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusKind {
    /// Stage succeeded.
    Passed,
    /// Stage failed and stopped the run.
    Failed,
    /// Stage failed but the run continued.
    Warned,
    /// Stage never ran because the run stopped earlier.
    NotRun,
}

impl StatusKind {
    /// Plain glyph for this status.
    pub fn icon(&self) -> &'static str {
        match self {
            StatusKind::Passed => "✓",
            StatusKind::Failed => "✗",
            StatusKind::Warned => "⚠",
            StatusKind::NotRun => "○",
        }
    }

    /// Glyph styled with `theme`.
    pub fn styled(&self, theme: &PitchTheme) -> String {
        let style = match self {
            StatusKind::Passed => &theme.success,
            StatusKind::Failed => &theme.error,
            StatusKind::Warned => &theme.warning,
            StatusKind::NotRun => &theme.dim,
        };
        style.apply_to(self.icon()).to_string()
    }
}

/// One row of the summary table.
#[derive(Debug, Clone)]
pub struct StageLine {
    pub name: String,
    pub status: StatusKind,
    pub duration: Option<Duration>,
}

/// End-of-run summary.
#[derive(Debug, Clone)]
pub struct RunSummary {
    pub app_name: String,
    pub stages: Vec<StageLine>,
    pub total_duration: Duration,
    pub success: bool,
    /// Stage that stopped the run, if any.
    pub aborted_at: Option<String>,
}

impl RunSummary {
    /// Title, one row per stage, then the total. Trailing status line
    /// is left to the caller since it goes to a different stream on failure.
    pub fn table(&self, theme: &PitchTheme) -> Vec<String> {
        let mut lines = Vec::with_capacity(self.stages.len() + 2);
        lines.push(
            theme
                .header
                .apply_to(format!("{} installation summary", self.app_name))
                .to_string(),
        );
        for stage in &self.stages {
            let row = match stage.duration {
                Some(d) => format!(
                    "  {} {:<20} {}",
                    stage.status.styled(theme),
                    stage.name,
                    theme.dim.apply_to(format_duration(d))
                ),
                None => format!("  {} {}", stage.status.styled(theme), stage.name),
            };
            lines.push(row);
        }
        lines.push(format!(
            "  {}",
            theme
                .dim
                .apply_to(format!("Total: {}", format_duration(self.total_duration)))
        ));
        lines
    }
}
