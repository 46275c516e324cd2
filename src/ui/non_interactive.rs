//! Non-interactive UI for CI/headless environments.

use std::collections::HashMap;
use std::io::{self, Write};

use crate::error::Result;

use super::{parse_answer, OutputMode, PitchTheme, Prompt, RunSummary, SpinnerHandle, UserInterface};

/// UI implementation for non-interactive mode.
///
/// Prompts are answered from `PITCH_PROMPT_<KEY>` environment variables,
/// falling back to the prompt's default. In CI the progress bar is
/// suppressed since carriage-return redraws make log output noisy.
pub struct NonInteractiveUI {
    mode: OutputMode,
    env_overrides: HashMap<String, String>,
    is_ci: bool,
}

impl NonInteractiveUI {
    /// Create a new non-interactive UI.
    pub fn new(mode: OutputMode) -> Self {
        let env_overrides: HashMap<String, String> = std::env::vars()
            .filter(|(k, _)| k.starts_with("PITCH_PROMPT_"))
            .collect();

        Self {
            mode,
            env_overrides,
            is_ci: crate::shell::is_ci(),
        }
    }

    /// Create with explicit overrides (for testing).
    pub fn with_overrides(mode: OutputMode, overrides: HashMap<String, String>) -> Self {
        Self {
            mode,
            env_overrides: overrides,
            is_ci: false,
        }
    }

    fn answer_for(&self, prompt: &Prompt) -> bool {
        let env_key = format!("PITCH_PROMPT_{}", prompt.key.to_uppercase());
        match self.env_overrides.get(&env_key) {
            Some(value) => parse_answer(value).unwrap_or_else(|| {
                tracing::debug!("Ignoring unrecognised {}={}", env_key, value);
                prompt.default
            }),
            None => prompt.default,
        }
    }
}

impl UserInterface for NonInteractiveUI {
    fn output_mode(&self) -> OutputMode {
        self.mode
    }

    fn message(&mut self, msg: &str) {
        if self.mode.shows_status() {
            println!("{}", msg);
        }
    }

    fn success(&mut self, msg: &str) {
        if self.mode.shows_status() {
            println!("✓ {}", msg);
        }
    }

    fn warning(&mut self, msg: &str) {
        if self.mode.shows_status() {
            eprintln!("⚠ {}", msg);
        }
    }

    fn error(&mut self, msg: &str) {
        eprintln!("✗ {}", msg);
    }

    fn confirm(&mut self, prompt: &Prompt) -> Result<bool> {
        Ok(self.answer_for(prompt))
    }

    fn start_spinner(&mut self, message: &str) -> Box<dyn SpinnerHandle> {
        if self.mode.shows_progress() {
            println!("  {}", message);
        }
        Box::new(PlainSpinner {
            show: self.mode.shows_status(),
        })
    }

    fn show_header(&mut self, title: &str) {
        if self.mode.shows_status() {
            println!("\n{}\n", title);
        }
    }

    fn show_stage(&mut self, index: usize, total: usize, title: &str) {
        if self.mode.shows_status() {
            println!("[{}/{}] {}", index, total, title);
        }
    }

    fn show_hint(&mut self, hint: &str) {
        if self.mode.shows_status() {
            println!("  Hint: {}", hint);
        }
    }

    fn show_summary(&mut self, summary: &RunSummary) {
        if !self.mode.shows_status() {
            return;
        }

        println!();
        for line in summary.table(&PitchTheme::plain()) {
            println!("{}", line);
        }

        if summary.success {
            println!("✓ Installation complete!");
        } else if let Some(stage) = &summary.aborted_at {
            eprintln!("✗ Installation aborted at stage '{}'", stage);
        }
    }

    fn progress_writer(&mut self) -> Box<dyn Write> {
        if self.is_ci || !self.mode.shows_progress() {
            Box::new(io::sink())
        } else {
            Box::new(io::stdout())
        }
    }

    fn is_interactive(&self) -> bool {
        false
    }
}

/// Spinner stand-in that prints only the final line.
struct PlainSpinner {
    show: bool,
}

impl SpinnerHandle for PlainSpinner {
    fn set_message(&mut self, _msg: &str) {}

    fn finish_success(&mut self, msg: &str) {
        if self.show {
            println!("✓ {}", msg);
        }
    }

    fn finish_error(&mut self, msg: &str) {
        eprintln!("✗ {}", msg);
    }

    fn finish_clear(&mut self) {}
}

#[cfg(test)]
mod tests {
    use super::*;

    fn overrides(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn confirm_uses_default() {
        let mut ui = NonInteractiveUI::with_overrides(OutputMode::Silent, HashMap::new());
        let prompt = Prompt::confirm("overwrite_config", "Overwrite?", false);
        assert!(!ui.confirm(&prompt).unwrap());
    }

    #[test]
    fn confirm_uses_env_override() {
        let mut ui = NonInteractiveUI::with_overrides(
            OutputMode::Silent,
            overrides(&[("PITCH_PROMPT_OVERWRITE_CONFIG", "yes")]),
        );
        let prompt = Prompt::confirm("overwrite_config", "Overwrite?", false);
        assert!(ui.confirm(&prompt).unwrap());
    }

    #[test]
    fn unrecognised_override_falls_back_to_default() {
        let mut ui = NonInteractiveUI::with_overrides(
            OutputMode::Silent,
            overrides(&[("PITCH_PROMPT_OVERWRITE_CONFIG", "perhaps")]),
        );
        let prompt = Prompt::confirm("overwrite_config", "Overwrite?", true);
        assert!(ui.confirm(&prompt).unwrap());
    }

    #[test]
    fn never_interactive() {
        let ui = NonInteractiveUI::with_overrides(OutputMode::Normal, HashMap::new());
        assert!(!ui.is_interactive());
    }

    #[test]
    fn silent_mode_output_does_not_panic() {
        let mut ui = NonInteractiveUI::with_overrides(OutputMode::Silent, HashMap::new());
        ui.message("hidden");
        ui.show_stage(1, 9, "Checking Python");
        let mut spinner = ui.start_spinner("Working");
        spinner.finish_success("done");
        ui.progress_writer().write_all(b"\rbar").unwrap();
    }
}
