//! koi: a kubectl wrapper
//!
//! Rewrites the argument vector (shorthands, environment defaults, `jq`/`yq`
//! output filters), delegates to the wrapped executable and adds a few
//! subcommands of its own.

pub mod application;
pub mod cli;
pub mod config;
pub mod domain;
pub mod exitcode;
pub mod infrastructure;
pub mod util;
