//! Ephemeral shell pod: invocation and manifest

use serde_json::json;

use super::error::DomainError;

/// Annotation recording why a shell pod was started.
pub const REASON_ANNOTATION: &str = "admission.stackrox.io/break-glass";

/// Name of the container inside the shell pod.
pub const SHELL_CONTAINER: &str = "shell";

const KEEPALIVE: &[&str] = &["/bin/sh", "-c", "sleep 1000000"];

/// Everything needed to run one shell session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShellInvocation {
    pub name: String,
    pub namespace: Option<String>,
    pub context: Option<String>,
    pub image: String,
    pub reason: String,
    /// kubectl duration, e.g. `2m`
    pub timeout: String,
    pub command: Vec<String>,
}

impl ShellInvocation {
    /// Login shell, bash preferred.
    pub fn default_command(vi_mode: bool) -> Vec<String> {
        let script = if vi_mode {
            "bash -o vi -l || sh -l"
        } else {
            "bash -l || sh -l"
        };
        vec!["sh".to_string(), "-c".to_string(), script.to_string()]
    }

    /// Pod manifest as pretty JSON, suitable for `kubectl apply -f -`.
    pub fn manifest(&self) -> Result<String, DomainError> {
        let pod = json!({
            "apiVersion": "v1",
            "kind": "Pod",
            "metadata": {
                "name": self.name,
                "annotations": {
                    REASON_ANNOTATION: self.reason,
                },
            },
            "spec": {
                "containers": [{
                    "name": SHELL_CONTAINER,
                    "image": self.image,
                    "command": KEEPALIVE,
                }],
            },
        });
        Ok(serde_json::to_string_pretty(&pod)?)
    }

    /// Scoping flags shared by every kubectl call of the session.
    pub fn scope_args(&self) -> Vec<String> {
        let mut args = Vec::new();
        if let Some(context) = &self.context {
            args.extend(["--context".to_string(), context.clone()]);
        }
        if let Some(namespace) = &self.namespace {
            args.extend(["--namespace".to_string(), namespace.clone()]);
        }
        args
    }
}

/// `<prefix>-shell-<n>` with n below 1000.
pub fn default_pod_name(prefix: &str) -> String {
    let n = uuid::Uuid::new_v4().as_u128() % 1000;
    format!("{prefix}-shell-{n}")
}
