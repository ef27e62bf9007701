//! Child process execution for the wrapped executable
//!
//! Two modes:
//! - attached: the child shares the terminal, optionally with its stdout
//!   piped into a second filter process (`jq`, `yq`)
//! - line filtered: the child's stdout is read line by line and passed
//!   through in-process [`LineFilter`]s

use std::io::{self, BufRead, BufReader, Read, Write};
use std::process::{Child, Command, Stdio};

use tracing::{debug, instrument, warn};

use crate::domain::{apply_filters, FilterCommand, LineFilter};
use crate::exitcode;
use crate::infrastructure::error::FilterFailure;
use crate::infrastructure::{InfraError, InfraResult};

/// Result of an attached run. The reported exit code is always the primary's.
#[derive(Debug)]
pub enum PipelineOutcome {
    Success,
    PrimaryFailed { exit_code: i32 },
    FilterFailed { failure: FilterFailure },
    BothFailed { exit_code: i32, failure: FilterFailure },
}

impl PipelineOutcome {
    /// Combine the primary's exit code with the filter's result.
    pub fn fold(exit_code: i32, filter: Result<(), FilterFailure>) -> Self {
        match (exit_code, filter) {
            (exitcode::OK, Ok(())) => PipelineOutcome::Success,
            (exit_code, Ok(())) => PipelineOutcome::PrimaryFailed { exit_code },
            (exitcode::OK, Err(failure)) => PipelineOutcome::FilterFailed { failure },
            (exit_code, Err(failure)) => PipelineOutcome::BothFailed { exit_code, failure },
        }
    }

    pub fn exit_code(&self) -> i32 {
        match self {
            PipelineOutcome::Success | PipelineOutcome::FilterFailed { .. } => exitcode::OK,
            PipelineOutcome::PrimaryFailed { exit_code }
            | PipelineOutcome::BothFailed { exit_code, .. } => *exit_code,
        }
    }

    pub fn filter_failure(&self) -> Option<&FilterFailure> {
        match self {
            PipelineOutcome::FilterFailed { failure }
            | PipelineOutcome::BothFailed { failure, .. } => Some(failure),
            _ => None,
        }
    }

    /// Give up the filter failure, keeping the exit code.
    pub fn into_parts(self) -> (i32, Option<FilterFailure>) {
        let exit_code = self.exit_code();
        match self {
            PipelineOutcome::FilterFailed { failure }
            | PipelineOutcome::BothFailed { failure, .. } => (exit_code, Some(failure)),
            _ => (exit_code, None),
        }
    }
}

/// Run `exe` attached to the terminal.
///
/// With a `filter`, the filter process is started first and the primary's
/// stdout is connected to the filter's stdin.
#[instrument(level = "debug", skip(args))]
pub fn run_attached(
    exe: &str,
    args: &[String],
    filter: Option<&FilterCommand>,
) -> InfraResult<PipelineOutcome> {
    debug!("run_attached: {} {}", exe, args.join(" "));
    let Some(filter) = filter else {
        let mut primary = Command::new(exe)
            .args(args)
            .spawn()
            .map_err(|e| InfraError::spawn(exe, args, e))?;
        let status = primary.wait().map_err(|e| InfraError::wait(exe, e))?;
        return Ok(PipelineOutcome::fold(exitcode::from_status(&status), Ok(())));
    };

    debug!("run_attached: filter {} {}", filter.program, filter.args.join(" "));
    let mut secondary = Command::new(&filter.program)
        .args(&filter.args)
        .stdin(Stdio::piped())
        .spawn()
        .map_err(|e| InfraError::spawn(&filter.program, &filter.args, e))?;

    let Some(pipe) = secondary.stdin.take() else {
        reap(&mut secondary);
        return Err(InfraError::stream(
            format!("stdin of {}", filter.program),
            io::Error::new(io::ErrorKind::BrokenPipe, "pipe not available"),
        ));
    };

    // the Command holding the write end is dropped here, so the filter sees
    // EOF once the primary exits
    let spawned = Command::new(exe)
        .args(args)
        .stdout(Stdio::from(pipe))
        .spawn();
    let mut primary = match spawned {
        Ok(child) => child,
        Err(e) => {
            reap(&mut secondary);
            return Err(InfraError::spawn(exe, args, e));
        }
    };

    let status = match primary.wait() {
        Ok(status) => status,
        Err(e) => {
            reap(&mut secondary);
            return Err(InfraError::wait(exe, e));
        }
    };
    let exit_code = exitcode::from_status(&status);

    let filtered = match secondary.wait() {
        Ok(status) if status.success() => Ok(()),
        Ok(status) => Err(FilterFailure::Exited {
            program: filter.program.clone(),
            exit_code: exitcode::from_status(&status),
        }),
        Err(source) => Err(FilterFailure::Wait {
            program: filter.program.clone(),
            source,
        }),
    };
    Ok(PipelineOutcome::fold(exit_code, filtered))
}

/// Run `exe` and print its stdout through `filters`.
pub fn run_and_filter(exe: &str, args: &[String], filters: &[&dyn LineFilter]) -> InfraResult<i32> {
    let stdout = io::stdout();
    let mut out = stdout.lock();
    run_and_filter_into(exe, args, filters, &mut out)
}

/// Run `exe` and write its filtered stdout to `out`; returns the child's exit code.
#[instrument(level = "debug", skip(args, filters, out))]
pub fn run_and_filter_into<W: Write>(
    exe: &str,
    args: &[String],
    filters: &[&dyn LineFilter],
    out: &mut W,
) -> InfraResult<i32> {
    debug!("run_and_filter: {} {}", exe, args.join(" "));
    let mut child = Command::new(exe)
        .args(args)
        .stdout(Stdio::piped())
        .spawn()
        .map_err(|e| InfraError::spawn(exe, args, e))?;

    let Some(stdout) = child.stdout.take() else {
        reap(&mut child);
        return Err(InfraError::stream(
            format!("stdout of {}", exe),
            io::Error::new(io::ErrorKind::BrokenPipe, "pipe not available"),
        ));
    };

    if let Err(e) = copy_lines(exe, stdout, filters, out) {
        reap(&mut child);
        return Err(e);
    }

    let status = child.wait().map_err(|e| InfraError::wait(exe, e))?;
    Ok(exitcode::from_status(&status))
}

/// Copy lines from `reader` to `out`, dropping those a filter vetoes.
pub fn copy_lines<R: Read, W: Write>(
    exe: &str,
    reader: R,
    filters: &[&dyn LineFilter],
    out: &mut W,
) -> InfraResult<()> {
    let mut reader = BufReader::new(reader);
    let mut buf = Vec::new();
    loop {
        buf.clear();
        let n = reader
            .read_until(b'\n', &mut buf)
            .map_err(|e| InfraError::stream(format!("read output of {}", exe), e))?;
        if n == 0 {
            break;
        }
        let decoded = String::from_utf8_lossy(&buf);
        let mut line: &str = &decoded;
        line = line.strip_suffix('\n').unwrap_or(line);
        line = line.strip_suffix('\r').unwrap_or(line);

        if let Some(kept) = apply_filters(filters, line.to_string()) {
            writeln!(out, "{}", kept)
                .map_err(|e| InfraError::stream(format!("write output of {}", exe), e))?;
        }
    }
    out.flush()
        .map_err(|e| InfraError::stream(format!("write output of {}", exe), e))
}

/// Kill and reap a child we no longer need.
fn reap(child: &mut Child) {
    if let Err(e) = child.kill() {
        debug!("kill {}: {}", child.id(), e);
    }
    if let Err(e) = child.wait() {
        warn!("cannot reap child {}: {}", child.id(), e);
    }
}
