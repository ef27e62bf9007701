//! Tests for child process execution, driven by `sh`
#![cfg(unix)]

use koi::domain::{FilterCommand, LineFilter, NormalEventFilter};
use koi::infrastructure::process::{run_and_filter_into, run_attached};
use koi::infrastructure::{FilterFailure, InfraError, PipelineOutcome};
use koi::util::testing;

fn sh(script: &str) -> Vec<String> {
    vec!["-c".to_string(), script.to_string()]
}

fn filter(script: &str) -> FilterCommand {
    FilterCommand {
        program: "sh".to_string(),
        args: sh(script),
    }
}

// ============================================================
// run_and_filter_into()
// ============================================================

#[test]
fn given_normal_and_warning_events_when_filtering_then_only_warning_printed() {
    // Arrange
    testing::init_test_setup();
    let normal = NormalEventFilter::new().unwrap();
    let mut out = Vec::new();

    // Act
    let code = run_and_filter_into(
        "sh",
        &sh("printf 'Normal event\\nWarning event\\n'"),
        &[&normal],
        &mut out,
    )
    .unwrap();

    // Assert
    assert_eq!(code, 0);
    assert_eq!(String::from_utf8(out).unwrap(), "Warning event\n");
}

#[test]
fn given_rewriting_filter_when_filtering_then_lines_changed_in_order() {
    let upper = |line: String| Some(line.to_uppercase());
    let mut out = Vec::new();

    run_and_filter_into("sh", &sh("printf 'a\\nb\\nc'"), &[&upper], &mut out).unwrap();

    assert_eq!(String::from_utf8(out).unwrap(), "A\nB\nC\n");
}

#[test]
fn given_veto_first_when_chaining_then_later_filters_not_consulted() {
    // Arrange
    let drop_all = |_: String| -> Option<String> { None };
    let calls = std::cell::Cell::new(0);
    let count = |line: String| {
        calls.set(calls.get() + 1);
        Some(line)
    };
    let filters: [&dyn LineFilter; 2] = [&drop_all, &count];
    let mut out = Vec::new();

    // Act
    run_and_filter_into("sh", &sh("echo one; echo two"), &filters, &mut out).unwrap();

    // Assert
    assert!(out.is_empty());
    assert_eq!(calls.get(), 0);
}

#[test]
fn given_failing_child_when_filtering_then_exit_code_returned() {
    let mut out = Vec::new();
    let code = run_and_filter_into("sh", &sh("echo partial; exit 4"), &[], &mut out).unwrap();
    assert_eq!(code, 4);
    assert_eq!(String::from_utf8(out).unwrap(), "partial\n");
}

#[test]
fn given_missing_program_when_filtering_then_spawn_error() {
    let mut out = Vec::new();
    let result = run_and_filter_into("/nonexistent/koi-test-binary", &[], &[], &mut out);
    assert!(matches!(result, Err(InfraError::Spawn { .. })));
}

// ============================================================
// run_attached()
// ============================================================

#[test]
fn given_no_filter_when_running_attached_then_exit_code_mirrored() {
    let outcome = run_attached("sh", &sh("exit 3"), None).unwrap();
    assert!(matches!(outcome, PipelineOutcome::PrimaryFailed { exit_code: 3 }));
}

#[test]
fn given_primary_fails_and_filter_succeeds_when_running_then_primary_code_reported() {
    // Act
    let outcome = run_attached(
        "sh",
        &sh("echo '{}'; exit 2"),
        Some(&filter("cat >/dev/null")),
    )
    .unwrap();

    // Assert
    assert_eq!(outcome.exit_code(), 2);
    assert!(outcome.filter_failure().is_none());
}

#[test]
fn given_filter_fails_when_running_then_filter_failure_with_primary_code() {
    let outcome = run_attached("sh", &sh("true"), Some(&filter("cat >/dev/null; exit 5"))).unwrap();

    assert_eq!(outcome.exit_code(), 0);
    assert!(matches!(
        outcome.filter_failure(),
        Some(FilterFailure::Exited { exit_code: 5, .. })
    ));
}

#[test]
fn given_filter_reads_to_eof_when_primary_exits_then_pipeline_finishes() {
    // the filter only exits once the primary's end of the pipe is closed
    let outcome = run_attached(
        "sh",
        &sh("printf 'x\\ny\\n'"),
        Some(&filter("n=$(wc -l); test \"$n\" -eq 2")),
    )
    .unwrap();

    assert!(matches!(outcome, PipelineOutcome::Success));
}

#[test]
fn given_missing_primary_when_running_with_filter_then_spawn_error() {
    let result = run_attached(
        "/nonexistent/koi-test-binary",
        &[],
        Some(&filter("cat >/dev/null")),
    );
    assert!(matches!(result, Err(InfraError::Spawn { .. })));
}

#[test]
fn given_missing_filter_when_running_then_spawn_error() {
    let missing = FilterCommand {
        program: "/nonexistent/koi-test-filter".to_string(),
        args: vec![],
    };
    let result = run_attached("sh", &sh("true"), Some(&missing));
    assert!(matches!(result, Err(InfraError::Spawn { program, .. }) if program.ends_with("koi-test-filter")));
}
