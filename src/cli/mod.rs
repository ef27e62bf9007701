//! CLI layer: argument parsing, command dispatch and terminal output

pub mod args;
pub mod commands;
pub mod error;
pub mod output;

pub use args::{ContainersArgs, ShellArgs};
pub use commands::{execute_command, log_level_for, KoiCommand};
pub use error::{CliError, CliResult};
