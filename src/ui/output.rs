//! Output verbosity.

/// How much the UI prints.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputMode {
    /// Everything, including the output of per-package installs.
    Verbose,
    #[default]
    Normal,
    /// Status lines only; no spinners or progress bars.
    Quiet,
    /// Errors only. Used while a command reserves stdout for JSON.
    Silent,
}

impl OutputMode {
    /// `--quiet` beats `--verbose`.
    pub fn from_flags(verbose: bool, quiet: bool) -> Self {
        if quiet {
            Self::Quiet
        } else if verbose {
            Self::Verbose
        } else {
            Self::Normal
        }
    }

    /// Whether subprocess output that is normally discarded is streamed.
    pub fn shows_command_output(&self) -> bool {
        matches!(self, Self::Verbose)
    }

    pub fn shows_progress(&self) -> bool {
        matches!(self, Self::Verbose | Self::Normal)
    }

    pub fn shows_status(&self) -> bool {
        !matches!(self, Self::Silent)
    }
}
