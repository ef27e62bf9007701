//! Domain layer: argument rewriting, classification and subcommand logic
//!
//! This layer is independent of external concerns (no process spawning, no
//! config loading).

pub mod args;
pub mod classify;
pub mod containers;
pub mod error;
pub mod events;
pub mod export;
pub mod filter;
pub mod rewrite;
pub mod shell;

pub use args::{append_argument, extract_bool, extract_value, FlagDescriptor, BOUNDARY};
pub use classify::{command_index, command_word, without_command_word};
pub use error::DomainError;
pub use filter::{apply_filters, CompletionRename, LineFilter, NormalEventFilter};
pub use rewrite::{
    rewrite, ArgRewriter, FilterCommand, FilterEnvironment, FilterKind, FilterSpec, RewriteResult,
};
pub use shell::ShellInvocation;
