//! I/O boundary traits for testability
//!
//! These traits abstract external I/O operations, allowing services
//! to be tested with mock implementations.

use std::io::{self, BufRead, Write};
use std::process::{Child, Command, ExitStatus, Output, Stdio};

/// External command runner abstraction.
pub trait CommandRunner: Send + Sync {
    /// Run a command and capture stdout and stderr.
    fn run(&self, cmd: &str, args: &[String]) -> io::Result<Output>;

    /// Run a command fed with `stdin`; stdout and stderr stay on the terminal.
    fn run_with_stdin(&self, cmd: &str, args: &[String], stdin: &str) -> io::Result<ExitStatus>;

    /// Run a command attached to all three standard streams.
    fn run_interactive(&self, cmd: &str, args: &[String]) -> io::Result<ExitStatus>;
}

/// Line-oriented question to the user.
pub trait Prompt: Send + Sync {
    /// Show `question` and return the answer without its line ending.
    /// `None` means the input was closed.
    fn ask(&self, question: &str) -> io::Result<Option<String>>;
}

// ============================================================
// REAL IMPLEMENTATIONS
// ============================================================

/// Real command runner implementation.
#[derive(Debug, Default)]
pub struct RealCommandRunner;

impl CommandRunner for RealCommandRunner {
    fn run(&self, cmd: &str, args: &[String]) -> io::Result<Output> {
        Command::new(cmd).args(args).output()
    }

    fn run_with_stdin(&self, cmd: &str, args: &[String], stdin: &str) -> io::Result<ExitStatus> {
        let mut child = Command::new(cmd)
            .args(args)
            .stdin(Stdio::piped())
            .spawn()?;
        feed_and_wait(&mut child, stdin)
    }

    fn run_interactive(&self, cmd: &str, args: &[String]) -> io::Result<ExitStatus> {
        Command::new(cmd).args(args).status()
    }
}

/// Write `input` to the child's stdin, close it and wait.
///
/// A failed write kills and reaps the child before the error is returned.
fn feed_and_wait(child: &mut Child, input: &str) -> io::Result<ExitStatus> {
    if let Some(mut child_stdin) = child.stdin.take() {
        if let Err(e) = child_stdin.write_all(input.as_bytes()) {
            drop(child_stdin);
            let _ = child.kill();
            let _ = child.wait();
            return Err(e);
        }
    }
    child.wait()
}

/// Prompt on stderr, answer from stdin.
#[derive(Debug, Default)]
pub struct TerminalPrompt;

impl Prompt for TerminalPrompt {
    fn ask(&self, question: &str) -> io::Result<Option<String>> {
        let mut stderr = io::stderr();
        write!(stderr, "{question}")?;
        stderr.flush()?;

        let mut answer = String::new();
        if io::stdin().lock().read_line(&mut answer)? == 0 {
            return Ok(None);
        }
        Ok(Some(answer.trim_end_matches(['\n', '\r']).to_string()))
    }
}
