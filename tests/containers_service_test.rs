//! Tests for ContainersService
#![cfg(unix)]

use std::io;
use std::os::unix::process::ExitStatusExt;
use std::process::{ExitStatus, Output};
use std::sync::{Arc, Mutex};

use koi::application::services::{ContainerQuery, ContainersService};
use koi::application::ApplicationError;
use koi::config::Settings;
use koi::domain::containers::ContainerPhase;
use koi::infrastructure::traits::CommandRunner;

const PODS: &str = r#"{
  "items": [
    {
      "metadata": {"name": "api-0", "namespace": "web"},
      "spec": {
        "initContainers": [{"name": "migrate"}],
        "containers": [{"name": "api"}, {"name": "sidecar"}]
      },
      "status": {
        "initContainerStatuses": [
          {"name": "migrate", "ready": false, "state": {"terminated": {"exitCode": 0}}}
        ],
        "containerStatuses": [
          {"name": "api", "ready": true, "state": {"running": {"startedAt": "2024-01-01T00:00:00Z"}}},
          {"name": "sidecar", "ready": false, "state": {"waiting": {"reason": "CrashLoopBackOff"}}}
        ]
      }
    },
    {
      "metadata": {"name": "pending-0", "namespace": "web"},
      "spec": {"containers": [{"name": "app"}]},
      "status": {}
    }
  ]
}"#;

/// Replies to `run` with canned output and remembers the arguments.
struct CannedRunner {
    stdout: &'static str,
    stderr: &'static str,
    code: i32,
    seen: Mutex<Vec<Vec<String>>>,
}

impl CannedRunner {
    fn new(stdout: &'static str, stderr: &'static str, code: i32) -> Self {
        Self {
            stdout,
            stderr,
            code,
            seen: Mutex::new(Vec::new()),
        }
    }
}

impl CommandRunner for CannedRunner {
    fn run(&self, _cmd: &str, args: &[String]) -> io::Result<Output> {
        self.seen.lock().unwrap().push(args.to_vec());
        Ok(Output {
            status: ExitStatus::from_raw(self.code << 8),
            stdout: self.stdout.as_bytes().to_vec(),
            stderr: self.stderr.as_bytes().to_vec(),
        })
    }

    fn run_with_stdin(&self, _cmd: &str, _args: &[String], _stdin: &str) -> io::Result<ExitStatus> {
        unreachable!("containers never feeds stdin")
    }

    fn run_interactive(&self, _cmd: &str, _args: &[String]) -> io::Result<ExitStatus> {
        unreachable!("containers never runs interactively")
    }
}

#[test]
fn given_pod_list_when_listing_then_one_row_per_container_init_first() {
    // Arrange
    let runner = Arc::new(CannedRunner::new(PODS, "", 0));
    let service = ContainersService::new(runner.clone(), Arc::new(Settings::default()));
    let query = ContainerQuery {
        namespace: Some("web".to_string()),
        ..Default::default()
    };

    // Act
    let rows = service.list(&query).unwrap();

    // Assert
    let summary: Vec<(&str, &str, bool, ContainerPhase)> = rows
        .iter()
        .map(|r| (r.pod.as_str(), r.container.as_str(), r.init, r.phase))
        .collect();
    assert_eq!(
        summary,
        vec![
            ("api-0", "migrate", true, ContainerPhase::Terminated),
            ("api-0", "api", false, ContainerPhase::Ready),
            ("api-0", "sidecar", false, ContainerPhase::Waiting),
            ("pending-0", "app", false, ContainerPhase::Unknown),
        ]
    );
    assert_eq!(
        runner.seen.lock().unwrap()[0],
        vec!["get", "pods", "--output", "json", "--namespace", "web"]
    );
}

#[test]
fn given_kubectl_fails_when_listing_then_command_failed_with_stderr() {
    let runner = Arc::new(CannedRunner::new("", "error: context \"nope\" not found\n", 1));
    let service = ContainersService::new(runner, Arc::new(Settings::default()));

    let result = service.list(&ContainerQuery::default());

    match result {
        Err(ApplicationError::CommandFailed {
            exit_code, stderr, ..
        }) => {
            assert_eq!(exit_code, 1);
            assert_eq!(stderr, "error: context \"nope\" not found");
        }
        other => panic!("expected CommandFailed, got {:?}", other),
    }
}

#[test]
fn given_garbage_output_when_listing_then_parse_error() {
    let runner = Arc::new(CannedRunner::new("not json", "", 0));
    let service = ContainersService::new(runner, Arc::new(Settings::default()));

    let result = service.list(&ContainerQuery::default());

    assert!(matches!(
        result,
        Err(ApplicationError::OperationFailed { .. })
    ));
}
