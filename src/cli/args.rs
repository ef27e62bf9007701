//! CLI argument definitions for koi's own subcommands using clap
//!
//! Everything else on the command line belongs to the wrapped executable and
//! is never parsed by clap.

use clap::Parser;

/// List every container of every pod with its state
#[derive(Parser, Debug, Clone, PartialEq, Eq)]
#[command(name = "koi containers", no_binary_name = true)]
pub struct ContainersArgs {
    /// Kubeconfig context to use
    #[arg(short = 'x', long, visible_short_alias = 'c')]
    pub context: Option<String>,

    /// Namespace to list (default: all namespaces)
    #[arg(short, long)]
    pub namespace: Option<String>,

    /// List pods across all namespaces, ignoring --namespace
    #[arg(short = 'A', long)]
    pub all_namespaces: bool,

    /// Colorize the status column (default: when stdout is a terminal)
    #[arg(long, num_args = 0..=1, default_missing_value = "true", value_name = "BOOL")]
    pub color: Option<bool>,
}

/// Start an ephemeral pod and attach a shell to it
#[derive(Parser, Debug, Clone, PartialEq, Eq)]
#[command(name = "koi shell", no_binary_name = true)]
pub struct ShellArgs {
    /// Namespace for the shell pod
    #[arg(short, long)]
    pub namespace: Option<String>,

    /// Kubeconfig context to use
    #[arg(short = 'x', long)]
    pub context: Option<String>,

    /// Container image (default: shell.image setting)
    #[arg(short, long)]
    pub image: Option<String>,

    /// Why the shell is needed; asked for when missing
    #[arg(short, long)]
    pub reason: Option<String>,

    /// Pod name (default: KSHELL_NAME or <user>-shell-<n>)
    #[arg(long)]
    pub name: Option<String>,

    /// Trace logging
    #[arg(long)]
    pub debug: bool,

    /// Startup timeout as a kubectl duration, e.g. 90s (default: shell.timeout setting, 2m)
    #[arg(short, long)]
    pub timeout: Option<String>,

    /// Command to run in the pod instead of a login shell
    #[arg(last = true)]
    pub command: Vec<String>,
}
