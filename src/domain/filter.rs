//! In-process line filters
//!
//! A filter may rewrite a line or veto it. Filters run in order and the first
//! veto drops the line without consulting the rest.

use regex::Regex;

use super::error::DomainError;

/// One step of a line filter chain.
pub trait LineFilter {
    /// Returns the (possibly rewritten) line, or `None` to drop it.
    fn apply(&self, line: String) -> Option<String>;
}

impl<F> LineFilter for F
where
    F: Fn(String) -> Option<String>,
{
    fn apply(&self, line: String) -> Option<String> {
        self(line)
    }
}

/// Run `line` through `filters`, stopping at the first veto.
pub fn apply_filters(filters: &[&dyn LineFilter], line: String) -> Option<String> {
    filters
        .iter()
        .try_fold(line, |line, filter| filter.apply(line))
}

/// Drops event lines of type `Normal`.
#[derive(Debug, Clone)]
pub struct NormalEventFilter {
    pattern: Regex,
}

impl NormalEventFilter {
    pub fn new() -> Result<Self, DomainError> {
        let pattern = Regex::new(r"\bNormal\b")?;
        Ok(Self { pattern })
    }
}

impl LineFilter for NormalEventFilter {
    fn apply(&self, line: String) -> Option<String> {
        if self.pattern.is_match(&line) {
            None
        } else {
            Some(line)
        }
    }
}

/// Re-targets shell completion registrations from one command to another.
#[derive(Debug, Clone)]
pub struct CompletionRename {
    from: String,
    to: String,
}

impl CompletionRename {
    pub fn new(from: impl Into<String>, to: impl Into<String>) -> Self {
        Self {
            from: from.into(),
            to: to.into(),
        }
    }
}

impl LineFilter for CompletionRename {
    fn apply(&self, line: String) -> Option<String> {
        let needle = format!("-c {}", self.from);
        if !line.contains(&needle) {
            return Some(line);
        }
        let mut out = String::with_capacity(line.len());
        let mut rest = line.as_str();
        while let Some(pos) = rest.find(&needle) {
            let after = &rest[pos + needle.len()..];
            out.push_str(&rest[..pos]);
            // only whole command names, `-c kubectl-foo` stays
            if after.is_empty() || after.starts_with(char::is_whitespace) {
                out.push_str("-c ");
                out.push_str(&self.to);
            } else {
                out.push_str(&needle);
            }
            rest = after;
        }
        out.push_str(rest);
        Some(out)
    }
}
