//! Argument rewriting applied before anything is handed to kubectl
//!
//! One left-to-right pass over the tokens before `--`:
//! - shorthands become their long form (first occurrence only)
//! - flags that have an environment default are noted as already given
//! - `-o jq`/`-o yq[=EXPR]` and `--jq`/`--yq` turn into `--output=json` plus a
//!   filter request
//!
//! Missing defaults are then inserted right before the boundary.

use std::collections::HashSet;

use super::args::{
    append_argument, match_alias, FlagDescriptor, FlagMatch, BOUNDARY, CONTAINERS_CONTEXT, CONTEXT,
    NAMESPACE, OUTPUT,
};
use super::classify::command_word;

/// Output format requested from kubectl whenever a filter is active.
pub const JSON_OUTPUT: &str = "--output=json";

/// Filter expression used when none is given.
pub const IDENTITY_EXPRESSION: &str = ".";

/// A koi-only shorthand and the kubectl flag it stands for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Shorthand {
    pub short: &'static str,
    pub long: &'static str,
}

pub const SHORTHANDS: &[Shorthand] = &[Shorthand {
    short: "-x",
    long: "--context",
}];

/// Environment-derived defaults, read once at startup.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterEnvironment {
    pub context: Option<String>,
    pub namespace: Option<String>,
}

/// External program reshaping structured output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FilterKind {
    Jq,
    Yq,
}

impl FilterKind {
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "jq" => Some(FilterKind::Jq),
            "yq" => Some(FilterKind::Yq),
            _ => None,
        }
    }

    pub fn program(&self) -> &'static str {
        match self {
            FilterKind::Jq => "jq",
            FilterKind::Yq => "yq",
        }
    }

    /// jq prints raw strings, yq pretty-prints.
    pub fn format_flag(&self) -> &'static str {
        match self {
            FilterKind::Jq => "-r",
            FilterKind::Yq => "-P",
        }
    }
}

/// Requested post-processing of kubectl's JSON output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterSpec {
    pub kind: FilterKind,
    pub expression: String,
}

impl FilterSpec {
    pub fn new(kind: FilterKind, expression: impl Into<String>) -> Self {
        let expression = expression.into();
        let expression = if expression.is_empty() {
            IDENTITY_EXPRESSION.to_string()
        } else {
            expression
        };
        Self { kind, expression }
    }

    /// Parse an output format value: `jq`, `yq`, `jq=EXPR` or `yq=EXPR`.
    pub fn from_output_format(format: &str) -> Option<Self> {
        let (name, expression) = match format.split_once('=') {
            Some((name, expression)) => (name, expression),
            None => (format, ""),
        };
        FilterKind::from_name(name).map(|kind| Self::new(kind, expression))
    }

    pub fn command(&self) -> FilterCommand {
        FilterCommand {
            program: self.kind.program().to_string(),
            args: vec![
                self.kind.format_flag().to_string(),
                self.expression.clone(),
            ],
        }
    }
}

/// Concrete invocation of a filter process.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterCommand {
    pub program: String,
    pub args: Vec<String>,
}

/// Rewritten arguments plus the filter they imply, if any.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RewriteResult {
    pub args: Vec<String>,
    pub filter: Option<FilterSpec>,
}

struct DefaultValue<'a> {
    flag: FlagDescriptor,
    value: Option<&'a str>,
}

/// Table-driven rewriter for one invocation.
pub struct ArgRewriter<'a> {
    shorthands: &'static [Shorthand],
    defaults: Vec<DefaultValue<'a>>,
}

impl<'a> ArgRewriter<'a> {
    pub fn new(env: &'a FilterEnvironment) -> Self {
        Self::with_context_flag(env, CONTEXT)
    }

    /// Rewriter for the given command word; some koi subcommands accept
    /// extra context spellings that must also suppress the default.
    pub fn for_command(env: &'a FilterEnvironment, word: Option<&str>) -> Self {
        match word {
            Some("containers") => Self::with_context_flag(env, CONTAINERS_CONTEXT),
            _ => Self::new(env),
        }
    }

    fn with_context_flag(env: &'a FilterEnvironment, context: FlagDescriptor) -> Self {
        // Insertion order follows this list: context before namespace.
        let defaults = vec![
            DefaultValue {
                flag: context,
                value: env.context.as_deref(),
            },
            DefaultValue {
                flag: NAMESPACE,
                value: env.namespace.as_deref(),
            },
        ];
        Self {
            shorthands: SHORTHANDS,
            defaults,
        }
    }

    pub fn rewrite(&self, args: &[String]) -> RewriteResult {
        let mut out: Vec<String> = Vec::with_capacity(args.len() + 4);
        let mut filter = None;
        let mut replaced: HashSet<&'static str> = HashSet::new();
        let mut satisfied = vec![false; self.defaults.len()];

        let mut i = 0;
        while i < args.len() {
            if args[i] == BOUNDARY {
                out.extend(args[i..].iter().cloned());
                break;
            }

            let token = self.expand_shorthand(&args[i], &mut replaced);

            for (seen, default) in satisfied.iter_mut().zip(&self.defaults) {
                if default.flag.matches(&token).is_some() {
                    *seen = true;
                }
            }

            if let Some(m) = OUTPUT.matches(&token) {
                let format = match m {
                    FlagMatch::Inline(value) => Some(value.to_string()),
                    FlagMatch::Bare => match args.get(i + 1) {
                        Some(next) if next != BOUNDARY => {
                            i += 1;
                            Some(next.clone())
                        }
                        _ => None,
                    },
                };
                match format {
                    Some(format) => match FilterSpec::from_output_format(&format) {
                        Some(spec) => {
                            filter = Some(spec);
                            out.push(JSON_OUTPUT.to_string());
                        }
                        None => out.push(format!("--output={format}")),
                    },
                    None => out.push(token),
                }
                i += 1;
                continue;
            }

            if let Some(kind) = explicit_filter_flag(&token) {
                let expression = match args.get(i + 1) {
                    Some(next) if !next.is_empty() && next != BOUNDARY => {
                        i += 1;
                        next.clone()
                    }
                    _ => String::new(),
                };
                filter = Some(FilterSpec::new(kind, expression));
                out.push(JSON_OUTPUT.to_string());
                i += 1;
                continue;
            }

            if let Some(spec) = inline_filter_flag(&token) {
                filter = Some(spec);
                out.push(JSON_OUTPUT.to_string());
                i += 1;
                continue;
            }

            out.push(token);
            i += 1;
        }

        for (seen, default) in satisfied.iter().zip(&self.defaults) {
            match default.value {
                Some(value) if !seen && !value.is_empty() => {
                    append_argument(&mut out, default.flag.canonical(), value)
                }
                _ => {}
            }
        }

        RewriteResult { args: out, filter }
    }

    fn expand_shorthand(&self, token: &str, replaced: &mut HashSet<&'static str>) -> String {
        for shorthand in self.shorthands {
            if replaced.contains(shorthand.short) {
                continue;
            }
            if let Some(m) = match_alias(token, shorthand.short) {
                replaced.insert(shorthand.short);
                return m.with_name(shorthand.long);
            }
        }
        token.to_string()
    }
}

/// `--jq` / `--yq`
fn explicit_filter_flag(token: &str) -> Option<FilterKind> {
    token.strip_prefix("--").and_then(FilterKind::from_name)
}

/// `--jq=EXPR` / `--yq=EXPR`
fn inline_filter_flag(token: &str) -> Option<FilterSpec> {
    let (name, expression) = token.strip_prefix("--")?.split_once('=')?;
    FilterKind::from_name(name).map(|kind| FilterSpec::new(kind, expression))
}

/// Rewrite `args` against the given defaults.
pub fn rewrite(args: &[String], env: &FilterEnvironment) -> RewriteResult {
    ArgRewriter::for_command(env, command_word(args)).rewrite(args)
}
