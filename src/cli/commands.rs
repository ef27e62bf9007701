//! Command dispatch: rewrite the arguments, classify them, route them
//!
//! Words koi implements itself are handled here; every other invocation is
//! passed to the wrapped executable.

use std::io::{self, IsTerminal};

use clap::Parser;
use tracing::{debug, instrument, level_filters::LevelFilter};

use crate::application::services::{export_manifests, ContainerQuery};
use crate::cli::args::{ContainersArgs, ShellArgs};
use crate::cli::output;
use crate::cli::{CliError, CliResult};
use crate::config::Settings;
use crate::domain::events::{events_arguments, has_explicit_output};
use crate::domain::shell::default_pod_name;
use crate::domain::{
    command_word, extract_bool, rewrite, without_command_word, CompletionRename, FilterCommand,
    FlagDescriptor, NormalEventFilter, ShellInvocation,
};
use crate::exitcode;
use crate::infrastructure::di::ServiceContainer;
use crate::infrastructure::process::{run_and_filter, run_attached};
use crate::infrastructure::traits::Prompt;
use crate::infrastructure::{InfraError, PipelineOutcome};

/// Commit the binary was built from, set at build time.
pub const KOI_COMMIT: &str = match option_env!("KOI_COMMIT") {
    Some(commit) => commit,
    None => "unset-commit",
};

const SHELL_DEBUG: FlagDescriptor = FlagDescriptor::new(&["--debug"]);

/// Subcommands koi implements instead of the wrapped executable.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KoiCommand {
    Events,
    Fish,
    Version,
    Export,
    Shell,
    Containers,
}

impl KoiCommand {
    pub fn from_word(word: &str) -> Option<Self> {
        match word {
            "events" => Some(KoiCommand::Events),
            "fish" => Some(KoiCommand::Fish),
            "version" => Some(KoiCommand::Version),
            "export" => Some(KoiCommand::Export),
            "shell" => Some(KoiCommand::Shell),
            "containers" => Some(KoiCommand::Containers),
            _ => None,
        }
    }
}

/// Log level for this invocation: `koi shell --debug` raises it to trace.
pub fn log_level_for(settings: &Settings, args: &[String]) -> Option<LevelFilter> {
    if command_word(args) == Some("shell") && extract_bool(args, &SHELL_DEBUG) {
        return Some(LevelFilter::TRACE);
    }
    settings.log_level_filter()
}

/// Run one koi invocation and return the exit code to report.
pub fn execute_command(container: &ServiceContainer, args: Vec<String>) -> CliResult<i32> {
    let settings = &container.settings;
    let rewritten = rewrite(&args, &settings.filter_environment());
    debug!("rewritten: {:?}", rewritten.args);

    let filter = rewritten.filter.as_ref().map(|spec| spec.command());
    let exe = settings.kubectl_exe.as_str();
    let args = rewritten.args;

    match command_word(&args).and_then(KoiCommand::from_word) {
        Some(KoiCommand::Events) => _events(exe, &args, filter.as_ref()),
        Some(KoiCommand::Fish) => _fish(exe),
        Some(KoiCommand::Version) => _version(exe, &args, filter.as_ref()),
        Some(KoiCommand::Export) => _export(),
        Some(KoiCommand::Shell) => _shell(container, &args),
        Some(KoiCommand::Containers) => _containers(container, &args),
        None => _passthrough(exe, &args, filter.as_ref()),
    }
}

/// Map a pipeline outcome to an exit code, surfacing filter failures.
fn finish(outcome: PipelineOutcome) -> CliResult<i32> {
    match outcome.into_parts() {
        (exit_code, None) => Ok(exit_code),
        (exit_code, Some(failure)) => Err(CliError::Filter { exit_code, failure }),
    }
}

#[instrument(level = "debug", skip(args))]
fn _passthrough(exe: &str, args: &[String], filter: Option<&FilterCommand>) -> CliResult<i32> {
    finish(run_attached(exe, args, filter)?)
}

#[instrument(level = "debug", skip(args))]
fn _events(exe: &str, args: &[String], filter: Option<&FilterCommand>) -> CliResult<i32> {
    let events = events_arguments(args);
    if filter.is_some() {
        return finish(run_attached(exe, &events, filter)?);
    }
    if has_explicit_output(args) {
        return Ok(run_and_filter(exe, &events, &[])?);
    }
    let normal = NormalEventFilter::new()?;
    Ok(run_and_filter(exe, &events, &[&normal])?)
}

fn _fish(exe: &str) -> CliResult<i32> {
    let args = ["completion", "fish"].map(String::from);
    let rename = CompletionRename::new("kubectl", "koi");
    Ok(run_and_filter(exe, &args, &[&rename])?)
}

fn _version(exe: &str, args: &[String], filter: Option<&FilterCommand>) -> CliResult<i32> {
    output::info(&format!(
        "Koi version: {} ({})",
        env!("CARGO_PKG_VERSION"),
        KOI_COMMIT
    ));
    _passthrough(exe, args, filter)
}

fn _export() -> CliResult<i32> {
    export_manifests(io::stdin().lock(), io::stdout().lock())?;
    Ok(exitcode::OK)
}

#[instrument(level = "debug", skip(container))]
fn _containers(container: &ServiceContainer, args: &[String]) -> CliResult<i32> {
    let parsed = ContainersArgs::try_parse_from(without_command_word(args))?;
    let query = ContainerQuery {
        context: parsed.context,
        namespace: parsed.namespace,
        all_namespaces: parsed.all_namespaces,
    };
    let rows = container.containers_service().list(&query)?;

    let color = parsed
        .color
        .unwrap_or_else(|| io::stdout().is_terminal());
    output::info(&output::containers_table(&rows, color));
    Ok(exitcode::OK)
}

#[instrument(level = "debug", skip(container))]
fn _shell(container: &ServiceContainer, args: &[String]) -> CliResult<i32> {
    let parsed = ShellArgs::try_parse_from(without_command_word(args))?;
    let shell = &container.settings.shell;

    let reason = match parsed.reason.filter(|r| !r.trim().is_empty()) {
        Some(reason) => reason,
        None => ask_reason(container.prompt.as_ref())?,
    };
    let name = parsed
        .name
        .or_else(|| shell.name.clone())
        .unwrap_or_else(|| default_pod_name(&shell.name_prefix));
    let command = if parsed.command.is_empty() {
        ShellInvocation::default_command(shell.vi_mode)
    } else {
        parsed.command
    };

    let invocation = ShellInvocation {
        name,
        namespace: parsed.namespace,
        context: parsed.context,
        image: parsed.image.unwrap_or_else(|| shell.image.clone()),
        reason,
        timeout: parsed.timeout.unwrap_or_else(|| shell.timeout.clone()),
        command,
    };
    debug!("invocation: {:?}", invocation);
    Ok(container.shell_service().run(&invocation)?)
}

/// Ask until a non-empty reason is given.
fn ask_reason(prompt: &dyn Prompt) -> CliResult<String> {
    loop {
        output::warning("You must provide a reason for the shell");
        let answer = prompt
            .ask(&output::prompt_text("Enter a reason for this shell:"))
            .map_err(|e| InfraError::io("read shell reason", e))?;
        match answer {
            Some(reason) if !reason.trim().is_empty() => return Ok(reason.trim().to_string()),
            Some(_) => continue,
            None => {
                return Err(CliError::InvalidArgs(
                    "no reason given for the shell".to_string(),
                ))
            }
        }
    }
}
