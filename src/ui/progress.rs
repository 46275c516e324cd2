//! Counter-based progress bar.
//!
//! [`ProgressTracker`] draws a single-line bar that is redrawn in place
//! with a carriage return. Rendering is a pure function of
//! `(current, total)` so the same state always produces the same line.
//! The final render (current == total) ends with a newline, which fixes
//! the completed bar in the output stream.

use std::io::Write;
use std::time::Duration;

/// Appearance of a [`ProgressTracker`] line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BarFormat {
    /// Text before the bar.
    pub prefix: String,
    /// Text after the percentage.
    pub suffix: String,
    /// Decimal places in the percentage.
    pub decimals: usize,
    /// Bar width in characters.
    pub width: usize,
    /// Character for completed cells.
    pub fill: char,
    /// Character for remaining cells.
    pub empty: char,
}

impl Default for BarFormat {
    fn default() -> Self {
        Self {
            prefix: "Installing:".to_string(),
            suffix: "complete".to_string(),
            decimals: 1,
            width: 50,
            fill: '█',
            empty: '-',
        }
    }
}

/// Render the line for `current` of `total`, without the leading `\r`
/// or trailing newline.
///
/// `total == 0` renders a completed bar.
pub fn render_line(current: usize, total: usize, format: &BarFormat) -> String {
    let (percent, filled) = if total == 0 {
        (100.0, format.width)
    } else {
        let current = current.min(total);
        (
            100.0 * current as f64 / total as f64,
            format.width * current / total,
        )
    };

    let bar: String = std::iter::repeat_n(format.fill, filled)
        .chain(std::iter::repeat_n(format.empty, format.width - filled))
        .collect();

    format!(
        "{} |{}| {:.*}% {}",
        format.prefix, bar, format.decimals, percent, format.suffix
    )
}

/// Stateful progress bar writing to `W`.
///
/// Construction renders the initial line. `current` never moves
/// backwards and never exceeds `total`. Write errors are ignored.
pub struct ProgressTracker<W: Write> {
    current: usize,
    total: usize,
    format: BarFormat,
    out: W,
    finished: bool,
}

impl<W: Write> ProgressTracker<W> {
    /// Create a tracker and draw its first line.
    pub fn new(total: usize, format: BarFormat, out: W) -> Self {
        let mut tracker = Self {
            current: 0,
            total,
            format,
            out,
            finished: false,
        };
        tracker.render();
        tracker
    }

    /// Move to `to` (or one step further when `None`) and redraw.
    ///
    /// Once the bar has completed further calls draw nothing.
    pub fn advance(&mut self, to: Option<usize>) {
        if self.finished {
            return;
        }
        let next = to.unwrap_or(self.current + 1);
        self.current = next.clamp(self.current, self.total);
        self.render();
    }

    /// End the current line without completing the bar.
    ///
    /// Used when the tracked operation fails part way, so later output
    /// starts on a fresh line below the partial bar.
    pub fn abandon(&mut self) {
        if self.finished {
            return;
        }
        self.finished = true;
        writeln!(self.out).ok();
        self.out.flush().ok();
    }

    /// Current position.
    pub fn current(&self) -> usize {
        self.current
    }

    /// Total number of units.
    pub fn total(&self) -> usize {
        self.total
    }

    /// Whether the bar reached `total` (or was abandoned).
    pub fn is_finished(&self) -> bool {
        self.finished
    }

    fn render(&mut self) {
        let line = render_line(self.current, self.total, &self.format);
        write!(self.out, "\r{}", line).ok();
        if self.current >= self.total {
            self.finished = true;
            writeln!(self.out).ok();
        }
        self.out.flush().ok();
    }
}

/// Format a duration for display.
pub fn format_duration(d: Duration) -> String {
    let secs = d.as_secs_f64();
    if secs < 1.0 {
        format!("{}ms", d.as_millis())
    } else if secs < 60.0 {
        format!("{:.1}s", secs)
    } else {
        let mins = secs / 60.0;
        format!("{:.1}m", mins)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn narrow() -> BarFormat {
        BarFormat {
            width: 10,
            ..Default::default()
        }
    }

    fn output(tracker: ProgressTracker<Vec<u8>>) -> String {
        String::from_utf8(tracker.out).unwrap()
    }

    #[test]
    fn renders_empty_bar() {
        insta::assert_snapshot!(render_line(0, 4, &narrow()), @"Installing: |----------| 0.0% complete");
    }

    #[test]
    fn renders_partial_bar() {
        insta::assert_snapshot!(render_line(1, 3, &narrow()), @"Installing: |███-------| 33.3% complete");
    }

    #[test]
    fn renders_full_bar() {
        insta::assert_snapshot!(render_line(3, 3, &narrow()), @"Installing: |██████████| 100.0% complete");
    }

    #[test]
    fn filled_length_is_floored() {
        // 10 * 2 / 3 = 6.67
        let line = render_line(2, 3, &narrow());
        assert_eq!(line.matches('█').count(), 6);
        assert!(line.contains("66.7%"));
    }

    #[test]
    fn percentage_respects_decimals() {
        let format = BarFormat {
            decimals: 3,
            ..narrow()
        };
        assert!(render_line(1, 3, &format).contains("33.333%"));

        let format = BarFormat {
            decimals: 0,
            ..narrow()
        };
        assert!(render_line(1, 3, &format).contains(" 33% "));
    }

    #[test]
    fn zero_total_renders_complete() {
        insta::assert_snapshot!(render_line(0, 0, &narrow()), @"Installing: |██████████| 100.0% complete");
    }

    #[test]
    fn default_format_is_fifty_wide() {
        let line = render_line(25, 50, &BarFormat::default());
        assert_eq!(line.matches('█').count(), 25);
        assert_eq!(line.matches('-').count(), 25);
    }

    #[test]
    fn new_draws_initial_line() {
        let tracker = ProgressTracker::new(4, narrow(), Vec::new());
        assert_eq!(output(tracker), "\rInstalling: |----------| 0.0% complete");
    }

    #[test]
    fn final_render_ends_with_newline() {
        let mut tracker = ProgressTracker::new(2, narrow(), Vec::new());
        tracker.advance(None);
        assert!(!tracker.is_finished());
        tracker.advance(None);
        assert!(tracker.is_finished());

        let out = output(tracker);
        assert!(out.ends_with("100.0% complete\n"));
        assert_eq!(out.matches('\n').count(), 1);
        assert_eq!(out.matches('\r').count(), 3);
    }

    #[test]
    fn zero_total_completes_on_creation() {
        let tracker = ProgressTracker::new(0, narrow(), Vec::new());
        assert!(tracker.is_finished());
        assert!(output(tracker).ends_with("100.0% complete\n"));
    }

    #[test]
    fn advance_to_explicit_position() {
        let mut tracker = ProgressTracker::new(10, narrow(), Vec::new());
        tracker.advance(Some(7));
        assert_eq!(tracker.current(), 7);
    }

    #[test]
    fn advance_never_moves_backwards() {
        let mut tracker = ProgressTracker::new(10, narrow(), Vec::new());
        tracker.advance(Some(5));
        tracker.advance(Some(2));
        assert_eq!(tracker.current(), 5);
    }

    #[test]
    fn advance_never_exceeds_total() {
        let mut tracker = ProgressTracker::new(3, narrow(), Vec::new());
        tracker.advance(Some(99));
        assert_eq!(tracker.current(), 3);
        tracker.advance(None);
        assert_eq!(tracker.current(), 3);

        // Completion newline is written once.
        assert_eq!(output(tracker).matches('\n').count(), 1);
    }

    #[test]
    fn abandon_terminates_partial_line() {
        let mut tracker = ProgressTracker::new(3, narrow(), Vec::new());
        tracker.advance(None);
        tracker.abandon();
        tracker.abandon();

        assert_eq!(tracker.current(), 1);
        let out = output(tracker);
        assert!(out.ends_with("33.3% complete\n"));
        assert_eq!(out.matches('\n').count(), 1);
    }

    #[test]
    fn format_duration_milliseconds() {
        assert_eq!(format_duration(Duration::from_millis(500)), "500ms");
    }

    #[test]
    fn format_duration_seconds() {
        assert_eq!(format_duration(Duration::from_secs_f64(5.3)), "5.3s");
    }

    #[test]
    fn format_duration_minutes() {
        assert_eq!(format_duration(Duration::from_secs(90)), "1.5m");
    }
}
