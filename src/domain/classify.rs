//! Command word detection
//!
//! kubectl global flags are allowed before the subcommand, so the first
//! positional token is only found after skipping flags and the values they
//! consume.

use super::args::{match_alias, BOUNDARY};

/// Global flags that consume the following token.
const VALUE_FLAGS: &[&str] = &[
    "--as",
    "--as-group",
    "--as-uid",
    "--cache-dir",
    "--certificate-authority",
    "--client-certificate",
    "--client-key",
    "--cluster",
    "--context",
    "--kubeconfig",
    "--log-backtrace-at",
    "--log-dir",
    "--log-file",
    "--log-file-max-size",
    "--log-flush-frequency",
    "-n",
    "--namespace",
    "--password",
    "--profile",
    "--profile-output",
    "--request-timeout",
    "-s",
    "--server",
    "--stderrthreshold",
    "--tls-server-name",
    "--token",
    "--user",
    "--username",
    "-v",
    "--v",
    "--vmodule",
    "-x",
];

/// Global flags that stand alone.
const BOOL_FLAGS: &[&str] = &[
    "--add-dir-header",
    "--alsologtostderr",
    "--disable-compression",
    "--insecure-skip-tls-verify",
    "--logtostderr",
    "--match-server-version",
    "--one-output",
    "--skip-headers",
    "--skip-log-headers",
    "--warnings-as-errors",
];

enum TokenKind {
    /// Flag whose value is the next token.
    ValueFlag,
    /// Flag carrying nothing further (boolean, or `flag=value`).
    StandaloneFlag,
    Word,
    OtherDash,
}

fn kind_of(token: &str) -> TokenKind {
    for flag in VALUE_FLAGS {
        if token == *flag {
            return TokenKind::ValueFlag;
        }
        if match_alias(token, flag).is_some() {
            return TokenKind::StandaloneFlag;
        }
    }
    if BOOL_FLAGS.iter().any(|flag| match_alias(token, flag).is_some()) {
        return TokenKind::StandaloneFlag;
    }
    if token.starts_with('-') {
        TokenKind::OtherDash
    } else {
        TokenKind::Word
    }
}

/// Position of the first token that is neither a flag nor a flag's value.
///
/// Scanning stops at `--`: whatever follows belongs to the inner command.
pub fn command_index(args: &[String]) -> Option<usize> {
    let mut tokens = args.iter().enumerate();
    while let Some((i, token)) = tokens.next() {
        if token == BOUNDARY {
            return None;
        }
        match kind_of(token) {
            TokenKind::ValueFlag => {
                tokens.next();
            }
            TokenKind::StandaloneFlag | TokenKind::OtherDash => {}
            TokenKind::Word => return Some(i),
        }
    }
    None
}

/// The command word, e.g. `get` in `-n koi get pods`.
pub fn command_word(args: &[String]) -> Option<&str> {
    command_index(args).map(|i| args[i].as_str())
}

/// Everything except the command word, for parsing a subcommand's own flags.
pub fn without_command_word(args: &[String]) -> Vec<String> {
    let mut out = args.to_vec();
    if let Some(i) = command_index(args) {
        out.remove(i);
    }
    out
}
