//! Flag lookup primitives over raw argument vectors
//!
//! Everything at or after the first `--` belongs to the wrapped command and is
//! never matched, rewritten or moved.

use tracing::warn;

/// Marker after which tokens are passed through verbatim.
pub const BOUNDARY: &str = "--";

/// Short and long spellings of one logical flag.
///
/// The first alias is the canonical spelling used whenever koi inserts the
/// flag itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FlagDescriptor {
    aliases: &'static [&'static str],
}

pub const CONTEXT: FlagDescriptor = FlagDescriptor::new(&["--context", "-x"]);
/// `koi containers` also accepts `-c` for the context.
pub const CONTAINERS_CONTEXT: FlagDescriptor = FlagDescriptor::new(&["--context", "-x", "-c"]);
pub const NAMESPACE: FlagDescriptor = FlagDescriptor::new(&["--namespace", "-n"]);
pub const OUTPUT: FlagDescriptor = FlagDescriptor::new(&["--output", "-o"]);
pub const ALL_NAMESPACES: FlagDescriptor = FlagDescriptor::new(&["--all-namespaces", "-A"]);
pub const WATCH: FlagDescriptor = FlagDescriptor::new(&["--watch", "-w"]);

/// How a token matched a flag alias.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlagMatch<'a> {
    /// `--flag`; a value, if any, is the next token.
    Bare,
    /// `--flag=value`
    Inline(&'a str),
}

impl FlagMatch<'_> {
    /// Render the same match under another flag name.
    pub fn with_name(&self, name: &str) -> String {
        match self {
            FlagMatch::Bare => name.to_string(),
            FlagMatch::Inline(value) => format!("{name}={value}"),
        }
    }
}

/// Match `token` against a single alias, exact or `alias=value`.
pub fn match_alias<'a>(token: &'a str, alias: &str) -> Option<FlagMatch<'a>> {
    if token == alias {
        return Some(FlagMatch::Bare);
    }
    token
        .strip_prefix(alias)
        .and_then(|rest| rest.strip_prefix('='))
        .map(FlagMatch::Inline)
}

impl FlagDescriptor {
    pub const fn new(aliases: &'static [&'static str]) -> Self {
        Self { aliases }
    }

    pub fn canonical(&self) -> &'static str {
        self.aliases[0]
    }

    pub fn aliases(&self) -> &'static [&'static str] {
        self.aliases
    }

    /// First alias matching `token`, in alias order.
    pub fn matches<'a>(&self, token: &'a str) -> Option<FlagMatch<'a>> {
        self.aliases
            .iter()
            .find_map(|alias| match_alias(token, alias))
    }
}

/// Tokens before the first `--`.
pub fn before_boundary(args: &[String]) -> &[String] {
    let end = boundary_index(args).unwrap_or(args.len());
    &args[..end]
}

/// Position of the first `--`, if any.
pub fn boundary_index(args: &[String]) -> Option<usize> {
    args.iter().position(|a| a == BOUNDARY)
}

/// Value of the first occurrence of `flag` before the boundary.
///
/// `--flag value` yields the next token, `--flag=value` the text after the
/// first `=`. A bare flag with nothing usable after it is skipped.
pub fn extract_value<'a>(args: &'a [String], flag: &FlagDescriptor) -> Option<&'a str> {
    let head = before_boundary(args);
    for (i, token) in head.iter().enumerate() {
        match flag.matches(token) {
            Some(FlagMatch::Inline(value)) => return Some(value),
            Some(FlagMatch::Bare) => {
                if let Some(next) = head.get(i + 1) {
                    return Some(next.as_str());
                }
            }
            None => {}
        }
    }
    None
}

/// Whether a boolean `flag` is set before the boundary.
///
/// A malformed `--flag=value` is logged and ignored.
pub fn extract_bool(args: &[String], flag: &FlagDescriptor) -> bool {
    for token in before_boundary(args) {
        match flag.matches(token) {
            Some(FlagMatch::Bare) => return true,
            Some(FlagMatch::Inline(value)) => match parse_bool_literal(value) {
                Some(parsed) => return parsed,
                None => warn!(
                    "cannot parse {:?} as a boolean for {:?}, ignoring it",
                    value,
                    flag.aliases()
                ),
            },
            None => {}
        }
    }
    false
}

/// Boolean literals as kubectl accepts them.
pub fn parse_bool_literal(value: &str) -> Option<bool> {
    match value {
        "1" | "t" | "T" | "true" | "TRUE" | "True" => Some(true),
        "0" | "f" | "F" | "false" | "FALSE" | "False" => Some(false),
        _ => None,
    }
}

/// Insert `flag` (and `value` when non-empty) right before the first `--`,
/// or at the end when there is no boundary.
pub fn append_argument(args: &mut Vec<String>, flag: &str, value: &str) {
    let at = boundary_index(args).unwrap_or(args.len());
    if value.is_empty() {
        args.insert(at, flag.to_string());
    } else {
        args.splice(at..at, [flag.to_string(), value.to_string()]);
    }
}

/// Carry selected flags from `from` over to `into`, canonical spelling.
pub fn copy_flags(
    from: &[String],
    into: &mut Vec<String>,
    value_flags: &[FlagDescriptor],
    bool_flags: &[FlagDescriptor],
) {
    for flag in value_flags {
        if let Some(value) = extract_value(from, flag).filter(|v| !v.is_empty()) {
            append_argument(into, flag.canonical(), value);
        }
    }
    for flag in bool_flags {
        if extract_bool(from, flag) {
            append_argument(into, flag.canonical(), "");
        }
    }
}
