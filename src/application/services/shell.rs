//! Ephemeral shell pod service
//!
//! Creates a pod, waits for it to become ready, attaches an interactive
//! session and deletes the pod when the session ends, whatever the outcome.

use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::application::{ApplicationError, ApplicationResult, IoResultExt};
use crate::config::Settings;
use crate::domain::shell::SHELL_CONTAINER;
use crate::domain::ShellInvocation;
use crate::exitcode;
use crate::infrastructure::traits::CommandRunner;

/// Runs shell sessions through the wrapped kubectl.
pub struct ShellService {
    cmd: Arc<dyn CommandRunner>,
    settings: Arc<Settings>,
}

impl ShellService {
    pub fn new(cmd: Arc<dyn CommandRunner>, settings: Arc<Settings>) -> Self {
        Self { cmd, settings }
    }

    /// Run one session and return the exit code of the attached command.
    ///
    /// Once the pod has been submitted it is deleted on every path out of
    /// this function.
    pub fn run(&self, invocation: &ShellInvocation) -> ApplicationResult<i32> {
        let exe = self.settings.kubectl_exe.as_str();
        let scope = invocation.scope_args();
        let manifest = invocation.manifest()?;

        info!("Creating shell pod {}", invocation.name);
        let apply = with_scope(&scope, &["apply", "-f", "-"]);
        let status = self
            .cmd
            .run_with_stdin(exe, &apply, &manifest)
            .with_command_context("create shell pod", exe)?;
        if !status.success() {
            return Err(failed(exe, &apply, exitcode::from_status(&status)));
        }

        let _cleanup = PodCleanup {
            cmd: Arc::clone(&self.cmd),
            exe: exe.to_string(),
            args: with_scope(&scope, &["delete", "--wait=false", "pod", &invocation.name]),
        };

        info!("Waiting for shell pod to be ready...");
        let timeout = format!("--timeout={}", invocation.timeout);
        let wait = with_scope(
            &scope,
            &["wait", "--for=condition=ready", &timeout, "pod", &invocation.name],
        );
        let status = self
            .cmd
            .run_interactive(exe, &wait)
            .with_command_context("wait for shell pod", exe)?;
        if !status.success() {
            return Err(failed(exe, &wait, exitcode::from_status(&status)));
        }

        let target = format!("pod/{}", invocation.name);
        let mut exec = with_scope(&scope, &["exec", "-it", "-c", SHELL_CONTAINER, &target, "--"]);
        exec.extend(invocation.command.iter().cloned());
        debug!("run: {} {}", exe, exec.join(" "));
        let status = self
            .cmd
            .run_interactive(exe, &exec)
            .with_command_context("attach to shell pod", exe)?;
        Ok(exitcode::from_status(&status))
    }
}

fn with_scope(scope: &[String], args: &[&str]) -> Vec<String> {
    scope
        .iter()
        .cloned()
        .chain(args.iter().map(|a| a.to_string()))
        .collect()
}

fn failed(exe: &str, args: &[String], exit_code: i32) -> ApplicationError {
    ApplicationError::CommandFailed {
        program: exe.to_string(),
        args: args.join(" "),
        exit_code,
        stderr: String::new(),
    }
}

/// Deletes the shell pod when dropped.
struct PodCleanup {
    cmd: Arc<dyn CommandRunner>,
    exe: String,
    args: Vec<String>,
}

impl Drop for PodCleanup {
    fn drop(&mut self) {
        info!("Deleting shell pod");
        match self.cmd.run_interactive(&self.exe, &self.args) {
            Ok(status) if status.success() => {}
            Ok(status) => warn!(
                "pod cleanup exited with code {}: {} {}",
                exitcode::from_status(&status),
                self.exe,
                self.args.join(" ")
            ),
            Err(e) => warn!("pod cleanup failed: {}", e),
        }
    }
}
