//! Mock process runner for testing.
//!
//! `MockRunner` implements [`ProcessRunner`] without spawning anything. It
//! records every invocation for later assertion and answers with scripted
//! exit codes. Hooks let a test simulate side effects of a command, such as
//! a bootstrap script dropping a binary into a directory.
//!
//! # Example
//!
//! ```
//! use pitch::shell::{Invocation, MockRunner, ProcessRunner};
//!
//! let mut runner = MockRunner::new();
//! runner.on(&["uv", "venv"], 2);
//!
//! let result = runner.run(&Invocation::new("uv").args(["venv", "--python", "3.12"])).unwrap();
//! assert_eq!(result.exit_code, Some(2));
//! assert_eq!(runner.count(&["uv", "venv"]), 1);
//! ```

use std::cell::RefCell;
use std::time::Duration;

use crate::error::{PitchError, Result};

use super::command::{CommandResult, Invocation, ProcessRunner};

type Hook = Box<dyn Fn(&Invocation)>;

/// Scripted response for a matching invocation.
#[derive(Debug, Clone)]
enum Response {
    Exit {
        code: i32,
        stdout: String,
        stderr: String,
    },
    SpawnError,
}

/// Mock [`ProcessRunner`].
///
/// Patterns are token lists: the first token is compared against
/// [`Invocation::program_name`], the rest must be a prefix of the
/// arguments. The most recently registered matching pattern wins, so a
/// broad default can be narrowed later. Unmatched invocations exit 0.
#[derive(Default)]
pub struct MockRunner {
    responses: Vec<(Vec<String>, Response)>,
    hooks: Vec<(Vec<String>, Hook)>,
    calls: RefCell<Vec<Invocation>>,
}

impl MockRunner {
    /// Create a runner where every command succeeds silently.
    pub fn new() -> Self {
        Self::default()
    }

    /// Exit with `code` for invocations matching `pattern`.
    pub fn on(&mut self, pattern: &[&str], code: i32) -> &mut Self {
        self.on_output(pattern, code, "", "")
    }

    /// Exit with `code` and the given output for invocations matching `pattern`.
    pub fn on_output(
        &mut self,
        pattern: &[&str],
        code: i32,
        stdout: &str,
        stderr: &str,
    ) -> &mut Self {
        self.responses.push((
            to_tokens(pattern),
            Response::Exit {
                code,
                stdout: stdout.to_string(),
                stderr: stderr.to_string(),
            },
        ));
        self
    }

    /// Fail to spawn invocations matching `pattern`.
    pub fn on_spawn_error(&mut self, pattern: &[&str]) -> &mut Self {
        self.responses
            .push((to_tokens(pattern), Response::SpawnError));
        self
    }

    /// Run `hook` before answering invocations matching `pattern`.
    pub fn when_run(&mut self, pattern: &[&str], hook: impl Fn(&Invocation) + 'static) -> &mut Self {
        self.hooks.push((to_tokens(pattern), Box::new(hook)));
        self
    }

    /// All invocations, in call order.
    pub fn calls(&self) -> Vec<Invocation> {
        self.calls.borrow().clone()
    }

    /// Number of invocations matching `pattern`.
    pub fn count(&self, pattern: &[&str]) -> usize {
        let tokens = to_tokens(pattern);
        self.calls
            .borrow()
            .iter()
            .filter(|inv| matches(&tokens, inv))
            .count()
    }

    /// Whether any invocation matched `pattern`.
    pub fn was_called(&self, pattern: &[&str]) -> bool {
        self.count(pattern) > 0
    }
}

impl ProcessRunner for MockRunner {
    fn run(&self, invocation: &Invocation) -> Result<CommandResult> {
        self.calls.borrow_mut().push(invocation.clone());

        for (pattern, hook) in &self.hooks {
            if matches(pattern, invocation) {
                hook(invocation);
            }
        }

        let response = self
            .responses
            .iter()
            .rev()
            .find(|(pattern, _)| matches(pattern, invocation))
            .map(|(_, r)| r.clone());

        match response {
            None => Ok(CommandResult::success(
                String::new(),
                String::new(),
                Duration::ZERO,
            )),
            Some(Response::SpawnError) => Err(PitchError::CommandFailed {
                command: invocation.display(),
                code: None,
            }),
            Some(Response::Exit {
                code: 0,
                stdout,
                stderr,
            }) => Ok(CommandResult::success(stdout, stderr, Duration::ZERO)),
            Some(Response::Exit {
                code,
                stdout,
                stderr,
            }) => Ok(CommandResult::failure(
                Some(code),
                stdout,
                stderr,
                Duration::ZERO,
            )),
        }
    }
}

fn to_tokens(pattern: &[&str]) -> Vec<String> {
    pattern.iter().map(|s| s.to_string()).collect()
}

fn matches(pattern: &[String], invocation: &Invocation) -> bool {
    let Some((program, args)) = pattern.split_first() else {
        return true;
    };
    *program == invocation.program_name()
        && args.len() <= invocation.args.len()
        && args.iter().zip(&invocation.args).all(|(a, b)| a == b)
}
