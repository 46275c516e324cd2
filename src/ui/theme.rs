//! Visual theme and styling.

use console::Style;

/// Styles for installer output. Stage counters and durations are dimmed
/// so the stage titles and status glyphs stand out.
#[derive(Debug, Clone)]
pub struct PitchTheme {
    pub success: Style,
    pub warning: Style,
    pub error: Style,
    pub dim: Style,
    pub highlight: Style,
    pub header: Style,
    pub stage_number: Style,
    pub hint: Style,
}

impl Default for PitchTheme {
    fn default() -> Self {
        Self::new()
    }
}

impl PitchTheme {
    pub fn new() -> Self {
        Self {
            success: Style::new().green(),
            warning: Style::new().yellow(),
            error: Style::new().red().bold(),
            dim: Style::new().dim(),
            highlight: Style::new().bold(),
            header: Style::new().bold().cyan(),
            stage_number: Style::new().dim(),
            hint: Style::new().cyan().dim(),
        }
    }

    /// No styling at all, for pipes and `NO_COLOR`.
    pub fn plain() -> Self {
        let none = Style::new();
        Self {
            success: none.clone(),
            warning: none.clone(),
            error: none.clone(),
            dim: none.clone(),
            highlight: none.clone(),
            header: none.clone(),
            stage_number: none.clone(),
            hint: none,
        }
    }

    /// [`new`](Self::new) on a color terminal, otherwise [`plain`](Self::plain).
    pub fn for_terminal() -> Self {
        if should_use_colors() {
            Self::new()
        } else {
            Self::plain()
        }
    }

    pub fn format_success(&self, msg: &str) -> String {
        format!("{}", self.success.apply_to(format!("✓ {}", msg)))
    }

    pub fn format_warning(&self, msg: &str) -> String {
        format!("{}", self.warning.apply_to(format!("⚠ {}", msg)))
    }

    pub fn format_error(&self, msg: &str) -> String {
        format!("{}", self.error.apply_to(format!("✗ {}", msg)))
    }

    /// `[3/9] Creating virtual environment`
    pub fn format_stage(&self, index: usize, total: usize, title: &str) -> String {
        format!(
            "{} {}",
            self.stage_number.apply_to(format!("[{}/{}]", index, total)),
            self.highlight.apply_to(title)
        )
    }

    pub fn format_header(&self, title: &str) -> String {
        format!(
            "{} {}",
            self.header.apply_to("▶"),
            self.highlight.apply_to(title)
        )
    }
}

/// Colors are used on a terminal unless `NO_COLOR` is set (https://no-color.org/).
pub fn should_use_colors() -> bool {
    std::env::var_os("NO_COLOR").is_none() && console::Term::stdout().is_term()
}
