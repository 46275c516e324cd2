//! `pitch completions <shell>` prints a completion script to stdout.

use std::io::Write;

use clap::CommandFactory;
use clap_complete::Shell;

use crate::cli::args::{Cli, CompletionsArgs};
use crate::error::Result;
use crate::ui::UserInterface;

use super::dispatcher::{Command, CommandResult};

const BIN_NAME: &str = "pitch";

/// Write the completion script for `shell` into `out`.
pub fn write_completions(shell: Shell, out: &mut dyn Write) {
    let mut cmd = Cli::command();
    clap_complete::generate(shell, &mut cmd, BIN_NAME, out);
}

pub struct CompletionsCommand {
    args: CompletionsArgs,
}

impl CompletionsCommand {
    pub fn new(args: CompletionsArgs) -> Self {
        Self { args }
    }
}

impl Command for CompletionsCommand {
    fn execute(&self, _ui: &mut dyn UserInterface) -> Result<CommandResult> {
        let mut stdout = std::io::stdout().lock();
        write_completions(self.args.shell, &mut stdout);
        stdout.flush()?;
        Ok(CommandResult::success())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn script(shell: Shell) -> String {
        let mut buf = Vec::new();
        write_completions(shell, &mut buf);
        String::from_utf8(buf).unwrap()
    }

    #[test]
    fn bash_script_lists_subcommands() {
        let output = script(Shell::Bash);
        assert!(output.contains("complete"));
        for sub in ["install", "verify", "init", "config"] {
            assert!(output.contains(sub), "missing {sub}");
        }
    }

    #[test]
    fn install_flags_are_completed() {
        let output = script(Shell::Zsh);
        assert!(output.contains("--skip-tests"));
        assert!(output.contains("--force-config"));
    }

    #[test]
    fn fish_script_names_binary() {
        assert!(script(Shell::Fish).contains("complete -c pitch"));
    }
}
