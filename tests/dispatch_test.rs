//! Tests for top-level dispatch: rewrite, classify, route into the services
#![cfg(unix)]

use std::io;
use std::os::unix::process::ExitStatusExt;
use std::process::{ExitStatus, Output};
use std::sync::{Arc, Mutex};

use rstest::rstest;

use koi::cli::execute_command;
use koi::config::Settings;
use koi::infrastructure::di::ServiceContainer;
use koi::infrastructure::traits::{CommandRunner, Prompt};

const EMPTY_POD_LIST: &str = r#"{"items": []}"#;

/// Records every call and answers with success and an empty pod list.
#[derive(Default)]
struct RecordingRunner {
    calls: Mutex<Vec<Vec<String>>>,
}

impl RecordingRunner {
    fn calls(&self) -> Vec<Vec<String>> {
        self.calls.lock().unwrap().clone()
    }
}

impl CommandRunner for RecordingRunner {
    fn run(&self, _cmd: &str, args: &[String]) -> io::Result<Output> {
        self.calls.lock().unwrap().push(args.to_vec());
        Ok(Output {
            status: ExitStatus::from_raw(0),
            stdout: EMPTY_POD_LIST.as_bytes().to_vec(),
            stderr: Vec::new(),
        })
    }

    fn run_with_stdin(&self, _cmd: &str, args: &[String], _stdin: &str) -> io::Result<ExitStatus> {
        self.calls.lock().unwrap().push(args.to_vec());
        Ok(ExitStatus::from_raw(0))
    }

    fn run_interactive(&self, _cmd: &str, args: &[String]) -> io::Result<ExitStatus> {
        self.calls.lock().unwrap().push(args.to_vec());
        Ok(ExitStatus::from_raw(0))
    }
}

struct NoPrompt;

impl Prompt for NoPrompt {
    fn ask(&self, question: &str) -> io::Result<Option<String>> {
        panic!("unexpected prompt: {question}")
    }
}

fn container(context: Option<&str>, namespace: Option<&str>) -> (ServiceContainer, Arc<RecordingRunner>) {
    let settings = Settings {
        context: context.map(String::from),
        namespace: namespace.map(String::from),
        ..Settings::default()
    };
    let runner = Arc::new(RecordingRunner::default());
    let container = ServiceContainer::with_deps(settings, runner.clone(), Arc::new(NoPrompt));
    (container, runner)
}

fn argv(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

// ============================================================
// containers
// ============================================================

#[rstest]
#[case::short_c(&["containers", "-c", "prod"])]
#[case::short_x(&["containers", "-x", "prod"])]
#[case::long(&["containers", "--context", "prod"])]
#[case::inline(&["containers", "--context=prod"])]
fn given_context_default_and_explicit_context_when_listing_then_explicit_wins(
    #[case] args: &[&str],
) {
    // Arrange
    let (container, runner) = container(Some("koi"), None);

    // Act
    let code = execute_command(&container, argv(args)).unwrap();

    // Assert
    assert_eq!(code, 0);
    assert_eq!(
        runner.calls(),
        vec![argv(&[
            "--context",
            "prod",
            "get",
            "pods",
            "--output",
            "json",
            "--all-namespaces"
        ])]
    );
}

#[test]
fn given_env_defaults_when_listing_then_defaults_scope_the_listing() {
    let (container, runner) = container(Some("koi"), Some("tools"));

    execute_command(&container, argv(&["containers"])).unwrap();

    assert_eq!(
        runner.calls(),
        vec![argv(&[
            "--context",
            "koi",
            "get",
            "pods",
            "--output",
            "json",
            "--namespace",
            "tools"
        ])]
    );
}

#[test]
fn given_namespace_default_and_all_namespaces_when_listing_then_every_namespace() {
    let (container, runner) = container(None, Some("tools"));

    execute_command(&container, argv(&["containers", "-A"])).unwrap();

    assert_eq!(
        runner.calls(),
        vec![argv(&["get", "pods", "--output", "json", "--all-namespaces"])]
    );
}

#[test]
fn given_unknown_containers_flag_when_dispatching_then_usage_error() {
    let (container, runner) = container(None, None);

    let err = execute_command(&container, argv(&["containers", "--bogus"])).unwrap_err();

    assert_eq!(err.exit_code(), koi::exitcode::USAGE);
    assert!(runner.calls().is_empty());
}

// ============================================================
// shell
// ============================================================

#[test]
fn given_env_defaults_when_starting_shell_then_every_step_is_scoped() {
    // Arrange
    let (container, runner) = container(Some("koi"), Some("tools"));

    // Act
    let code = execute_command(
        &container,
        argv(&["shell", "-r", "dns", "--name", "dbg", "--", "nslookup", "svc"]),
    )
    .unwrap();

    // Assert
    assert_eq!(code, 0);
    let calls = runner.calls();
    assert_eq!(calls.len(), 4);
    for call in &calls {
        assert_eq!(&call[..4], &argv(&["--context", "koi", "--namespace", "tools"])[..]);
    }
    assert_eq!(&calls[0][4..], &argv(&["apply", "-f", "-"])[..]);
    assert_eq!(
        &calls[2][4..],
        &argv(&["exec", "-it", "-c", "shell", "pod/dbg", "--", "nslookup", "svc"])[..]
    );
}

#[test]
fn given_explicit_namespace_when_starting_shell_then_default_not_added() {
    let (container, runner) = container(None, Some("tools"));

    execute_command(&container, argv(&["shell", "-n", "ops", "-r", "dns", "--name", "dbg"])).unwrap();

    let apply = &runner.calls()[0];
    assert_eq!(apply, &argv(&["--namespace", "ops", "apply", "-f", "-"]));
}
