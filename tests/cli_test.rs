//! End-to-end tests of the koi binary against stand-in kubectl and jq/yq scripts
#![cfg(unix)]

use std::fs;
use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};
use std::sync::Mutex;

use tempfile::TempDir;

// Writing an executable while another thread forks can leave it busy.
static SERIAL: Mutex<()> = Mutex::new(());

const EVENTS: &str = "LAST SEEN   TYPE      REASON\n\
1m          Normal    Pulled\n\
2m          Warning   BackOff\n";

/// Stand-in kubectl: records its arguments, prints fixed events, exits with
/// `$FAKE_EXIT`.
const FAKE_KUBECTL: &str = r#"#!/bin/sh
printf '%s\n' "$@" > "$(dirname "$0")/kubectl.args"
printf 'LAST SEEN   TYPE      REASON\n1m          Normal    Pulled\n2m          Warning   BackOff\n'
exit "${FAKE_EXIT:-0}"
"#;

/// Stand-in filter: announces its arguments, then copies stdin.
const FAKE_FILTER: &str = "#!/bin/sh\necho \"filter:$*\"\ncat\n";

struct Sandbox {
    dir: TempDir,
}

impl Sandbox {
    fn new() -> Self {
        let dir = TempDir::new().unwrap();
        let sandbox = Self { dir };
        sandbox.script("kubectl", FAKE_KUBECTL);
        sandbox.script("jq", FAKE_FILTER);
        sandbox.script("yq", FAKE_FILTER);
        sandbox
    }

    fn path(&self) -> &Path {
        self.dir.path()
    }

    fn script(&self, name: &str, body: &str) -> PathBuf {
        let path = self.path().join(name);
        fs::write(&path, body).unwrap();
        fs::set_permissions(&path, fs::Permissions::from_mode(0o755)).unwrap();
        path
    }

    fn koi(&self, args: &[&str], env: &[(&str, &str)]) -> Output {
        let path = format!(
            "{}:{}",
            self.path().display(),
            std::env::var("PATH").unwrap_or_default()
        );
        let mut cmd = Command::new(env!("CARGO_BIN_EXE_koi"));
        cmd.args(args)
            .env_clear()
            .env("PATH", path)
            .env("HOME", self.path())
            .env("XDG_CONFIG_HOME", self.path())
            .env("KOI_KUBECTL_EXE", self.path().join("kubectl"));
        for (key, value) in env {
            cmd.env(key, value);
        }
        cmd.output().unwrap()
    }

    fn kubectl_args(&self) -> Vec<String> {
        fs::read_to_string(self.path().join("kubectl.args"))
            .unwrap()
            .lines()
            .map(String::from)
            .collect()
    }
}

fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).into_owned()
}

#[test]
fn given_namespace_before_events_when_running_then_normal_events_dropped() {
    // Arrange
    let _serial = SERIAL.lock().unwrap_or_else(|e| e.into_inner());
    let sandbox = Sandbox::new();

    // Act
    let output = sandbox.koi(&["-n", "koi", "events"], &[]);

    // Assert
    assert_eq!(output.status.code(), Some(0));
    assert_eq!(
        stdout(&output),
        "LAST SEEN   TYPE      REASON\n2m          Warning   BackOff\n"
    );
    assert_eq!(
        sandbox.kubectl_args(),
        vec![
            "get",
            "events",
            "--sort-by=.metadata.creationTimestamp",
            "--namespace",
            "koi"
        ]
    );
}

#[test]
fn given_events_with_explicit_output_when_running_then_lines_untouched() {
    let _serial = SERIAL.lock().unwrap_or_else(|e| e.into_inner());
    let sandbox = Sandbox::new();

    let output = sandbox.koi(&["events", "-o", "wide"], &[]);

    assert_eq!(stdout(&output), EVENTS);
}

#[test]
fn given_events_with_jq_when_running_then_output_goes_through_filter() {
    // Arrange
    let _serial = SERIAL.lock().unwrap_or_else(|e| e.into_inner());
    let sandbox = Sandbox::new();

    // Act
    let output = sandbox.koi(&["events", "--jq", ".items"], &[]);

    // Assert
    assert_eq!(output.status.code(), Some(0));
    assert_eq!(stdout(&output), format!("filter:-r .items\n{EVENTS}"));
    let args = sandbox.kubectl_args();
    assert_eq!(&args[..2], &["get", "events"]);
    assert!(args.ends_with(&["--output".to_string(), "json".to_string()]));
}

#[test]
fn given_non_koi_word_with_yq_output_when_running_then_passed_through_filtered() {
    // Arrange
    let _serial = SERIAL.lock().unwrap_or_else(|e| e.into_inner());
    let sandbox = Sandbox::new();

    // Act
    let output = sandbox.koi(&["get", "pods", "-o", "yq"], &[("KOI_CTX", "prod")]);

    // Assert
    assert_eq!(stdout(&output), format!("filter:-P .\n{EVENTS}"));
    assert_eq!(
        sandbox.kubectl_args(),
        vec!["get", "pods", "--output=json", "--context", "prod"]
    );
}

#[test]
fn given_wrapped_command_fails_when_passing_through_then_exit_code_mirrored() {
    let _serial = SERIAL.lock().unwrap_or_else(|e| e.into_inner());
    let sandbox = Sandbox::new();

    let output = sandbox.koi(&["get", "nodes"], &[("FAKE_EXIT", "3")]);

    assert_eq!(output.status.code(), Some(3));
    assert_eq!(sandbox.kubectl_args(), vec!["get", "nodes"]);
}

#[test]
fn given_boundary_when_passing_through_then_defaults_land_before_it() {
    let _serial = SERIAL.lock().unwrap_or_else(|e| e.into_inner());
    let sandbox = Sandbox::new();

    sandbox.koi(&["exec", "web-0", "--", "ls", "-n"], &[("KOI_NS", "tools")]);

    assert_eq!(
        sandbox.kubectl_args(),
        vec!["exec", "web-0", "--namespace", "tools", "--", "ls", "-n"]
    );
}
