//! Interactive terminal UI.

use console::Term;
use std::io::{self, Write};

use crate::error::Result;

use super::{
    prompt_confirm, NonInteractiveUI, OutputMode, PitchTheme, ProgressSpinner, Prompt,
    RunSummary, SpinnerHandle, UserInterface,
};

/// Interactive terminal UI implementation.
pub struct TerminalUI {
    term: Term,
    theme: PitchTheme,
    mode: OutputMode,
}

impl TerminalUI {
    /// Create a new terminal UI.
    pub fn new(mode: OutputMode) -> Self {
        Self {
            term: Term::stdout(),
            theme: PitchTheme::for_terminal(),
            mode,
        }
    }
}

impl UserInterface for TerminalUI {
    fn output_mode(&self) -> OutputMode {
        self.mode
    }

    fn message(&mut self, msg: &str) {
        if self.mode.shows_status() {
            writeln!(self.term, "{}", msg).ok();
        }
    }

    fn success(&mut self, msg: &str) {
        if self.mode.shows_status() {
            writeln!(self.term, "{}", self.theme.format_success(msg)).ok();
        }
    }

    fn warning(&mut self, msg: &str) {
        if self.mode.shows_status() {
            writeln!(self.term, "{}", self.theme.format_warning(msg)).ok();
        }
    }

    fn error(&mut self, msg: &str) {
        writeln!(self.term, "{}", self.theme.format_error(msg)).ok();
    }

    fn confirm(&mut self, prompt: &Prompt) -> Result<bool> {
        prompt_confirm(prompt, &self.term)
    }

    fn start_spinner(&mut self, message: &str) -> Box<dyn SpinnerHandle> {
        if self.mode.shows_progress() {
            Box::new(ProgressSpinner::new(message))
        } else {
            Box::new(ProgressSpinner::hidden())
        }
    }

    fn show_header(&mut self, title: &str) {
        if self.mode.shows_status() {
            writeln!(self.term, "\n{}\n", self.theme.format_header(title)).ok();
        }
    }

    fn show_stage(&mut self, index: usize, total: usize, title: &str) {
        if self.mode.shows_status() {
            writeln!(self.term, "{}", self.theme.format_stage(index, total, title)).ok();
        }
    }

    fn show_hint(&mut self, hint: &str) {
        if self.mode.shows_status() {
            writeln!(self.term, "  {}", self.theme.hint.apply_to(hint)).ok();
        }
    }

    fn show_summary(&mut self, summary: &RunSummary) {
        if !self.mode.shows_status() {
            return;
        }

        writeln!(self.term).ok();
        for line in summary.table(&self.theme) {
            writeln!(self.term, "{}", line).ok();
        }

        if summary.success {
            writeln!(self.term, "{}", self.theme.format_success("Installation complete!")).ok();
        } else if let Some(stage) = &summary.aborted_at {
            writeln!(
                self.term,
                "{}",
                self.theme
                    .format_error(&format!("Installation aborted at stage '{}'", stage))
            )
            .ok();
        }
    }

    fn progress_writer(&mut self) -> Box<dyn Write> {
        if self.mode.shows_progress() {
            Box::new(io::stdout())
        } else {
            Box::new(io::sink())
        }
    }

    fn is_interactive(&self) -> bool {
        self.term.is_term()
    }
}

/// Create the appropriate UI based on context.
pub fn create_ui(interactive: bool, mode: OutputMode) -> Box<dyn UserInterface> {
    if interactive && Term::stdout().is_term() {
        Box::new(TerminalUI::new(mode))
    } else {
        Box::new(NonInteractiveUI::new(mode))
    }
}
