//! Pod listing records and per-container state for `koi containers`

use std::collections::HashMap;
use std::fmt;

use serde::de::IgnoredAny;
use serde::Deserialize;

/// `kubectl get pods -o json` document.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct PodList {
    pub items: Vec<Pod>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Pod {
    pub metadata: PodMetadata,
    pub spec: PodSpec,
    pub status: PodStatus,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct PodMetadata {
    pub name: String,
    pub namespace: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct PodSpec {
    pub containers: Vec<ContainerSpec>,
    pub init_containers: Vec<ContainerSpec>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ContainerSpec {
    pub name: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct PodStatus {
    pub container_statuses: Vec<ContainerStatus>,
    pub init_container_statuses: Vec<ContainerStatus>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ContainerStatus {
    pub name: String,
    pub ready: bool,
    pub state: ContainerState,
}

/// Only the presence of each state matters.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ContainerState {
    pub running: Option<IgnoredAny>,
    pub terminated: Option<IgnoredAny>,
    pub waiting: Option<IgnoredAny>,
}

/// Display state of one container.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContainerPhase {
    Ready,
    Running,
    Terminated,
    Waiting,
    Unknown,
}

impl ContainerPhase {
    /// Readiness wins over the raw state; running, terminated, waiting follow.
    pub fn of(status: &ContainerStatus) -> Self {
        if status.ready {
            ContainerPhase::Ready
        } else if status.state.running.is_some() {
            ContainerPhase::Running
        } else if status.state.terminated.is_some() {
            ContainerPhase::Terminated
        } else if status.state.waiting.is_some() {
            ContainerPhase::Waiting
        } else {
            ContainerPhase::Unknown
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ContainerPhase::Ready => "ready",
            ContainerPhase::Running => "running",
            ContainerPhase::Terminated => "terminated",
            ContainerPhase::Waiting => "waiting",
            ContainerPhase::Unknown => "unknown",
        }
    }
}

impl fmt::Display for ContainerPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One line of the containers table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContainerRow {
    pub namespace: String,
    pub pod: String,
    pub container: String,
    pub init: bool,
    pub phase: ContainerPhase,
}

/// Flatten pods into rows, init containers before regular ones.
pub fn container_rows(pods: &[Pod]) -> Vec<ContainerRow> {
    let mut rows = Vec::new();
    for pod in pods {
        let phases: HashMap<&str, ContainerPhase> = pod
            .status
            .init_container_statuses
            .iter()
            .chain(&pod.status.container_statuses)
            .map(|s| (s.name.as_str(), ContainerPhase::of(s)))
            .collect();

        let specs = pod
            .spec
            .init_containers
            .iter()
            .map(|c| (c, true))
            .chain(pod.spec.containers.iter().map(|c| (c, false)));

        for (container, init) in specs {
            rows.push(ContainerRow {
                namespace: pod.metadata.namespace.clone(),
                pod: pod.metadata.name.clone(),
                container: container.name.clone(),
                init,
                phase: phases
                    .get(container.name.as_str())
                    .copied()
                    .unwrap_or(ContainerPhase::Unknown),
            });
        }
    }
    rows
}
