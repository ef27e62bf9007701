//! Container listing service
//!
//! Lists every container of every pod in scope, init containers included,
//! from `kubectl get pods -o json`.

use std::sync::Arc;

use tracing::debug;

use crate::application::{ApplicationError, ApplicationResult, IoResultExt};
use crate::config::Settings;
use crate::domain::containers::{container_rows, ContainerRow, PodList};
use crate::exitcode;
use crate::infrastructure::traits::CommandRunner;

/// Scope of a container listing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ContainerQuery {
    pub context: Option<String>,
    /// `None` lists every namespace.
    pub namespace: Option<String>,
    /// Clears `namespace`.
    pub all_namespaces: bool,
}

impl ContainerQuery {
    pub fn kubectl_args(&self) -> Vec<String> {
        let mut args = Vec::new();
        if let Some(context) = &self.context {
            args.extend(["--context".to_string(), context.clone()]);
        }
        args.extend(["get", "pods", "--output", "json"].map(String::from));
        match &self.namespace {
            Some(namespace) if !self.all_namespaces => {
                args.extend(["--namespace".to_string(), namespace.clone()])
            }
            _ => args.push("--all-namespaces".to_string()),
        }
        args
    }
}

/// Lists containers through the wrapped kubectl.
pub struct ContainersService {
    cmd: Arc<dyn CommandRunner>,
    settings: Arc<Settings>,
}

impl ContainersService {
    pub fn new(cmd: Arc<dyn CommandRunner>, settings: Arc<Settings>) -> Self {
        Self { cmd, settings }
    }

    /// One row per container, in pod order.
    pub fn list(&self, query: &ContainerQuery) -> ApplicationResult<Vec<ContainerRow>> {
        let exe = &self.settings.kubectl_exe;
        let args = query.kubectl_args();
        debug!("list: {} {}", exe, args.join(" "));

        let output = self.cmd.run(exe, &args).with_command_context("list pods", exe)?;
        if !output.status.success() {
            return Err(ApplicationError::CommandFailed {
                program: exe.clone(),
                args: args.join(" "),
                exit_code: output.status.code().unwrap_or(exitcode::FAILURE),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }

        let pods: PodList =
            serde_json::from_slice(&output.stdout).map_err(|e| ApplicationError::OperationFailed {
                context: "parse pod list".to_string(),
                source: Box::new(e),
            })?;
        let rows = container_rows(&pods.items);
        debug!("list: {} pods, {} containers", pods.items.len(), rows.len());
        Ok(rows)
    }
}
