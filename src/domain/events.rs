//! `koi events`: recent cluster events, oldest first

use super::args::{copy_flags, extract_value, ALL_NAMESPACES, CONTEXT, NAMESPACE, OUTPUT, WATCH};

const EVENTS_BASE: &[&str] = &["get", "events", "--sort-by=.metadata.creationTimestamp"];

/// Arguments for `kubectl get events` carrying the user's scoping flags.
pub fn events_arguments(args: &[String]) -> Vec<String> {
    let mut out: Vec<String> = EVENTS_BASE.iter().map(|s| s.to_string()).collect();
    copy_flags(
        args,
        &mut out,
        &[NAMESPACE, OUTPUT, CONTEXT],
        &[ALL_NAMESPACES, WATCH],
    );
    out
}

/// Structured output is machine-consumed and must reach stdout untouched.
pub fn has_explicit_output(args: &[String]) -> bool {
    extract_value(args, &OUTPUT).is_some_and(|v| !v.is_empty())
}
