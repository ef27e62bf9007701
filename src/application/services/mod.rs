//! Application services
//!
//! Services implementing koi's own subcommands.

pub mod containers;
pub mod export;
pub mod shell;

pub use containers::{ContainerQuery, ContainersService};
pub use export::export_manifests;
pub use shell::ShellService;
