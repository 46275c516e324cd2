//! Interactive prompts.

use console::Term;
use dialoguer::Confirm;

use crate::error::{PitchError, Result};

use super::Prompt;

/// Convert dialoguer errors to PitchError.
fn map_dialoguer_err(e: dialoguer::Error) -> PitchError {
    PitchError::Io(e.into())
}

/// Ask a yes/no question on `term`.
pub fn prompt_confirm(prompt: &Prompt, term: &Term) -> Result<bool> {
    Confirm::new()
        .with_prompt(&prompt.question)
        .default(prompt.default)
        .interact_on(term)
        .map_err(map_dialoguer_err)
}

/// Interpret a yes/no answer given as text (env override, flag value).
pub fn parse_answer(value: &str) -> Option<bool> {
    match value.trim().to_lowercase().as_str() {
        "y" | "yes" | "true" | "1" => Some(true),
        "n" | "no" | "false" | "0" => Some(false),
        _ => None,
    }
}
