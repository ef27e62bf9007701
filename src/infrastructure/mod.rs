//! Infrastructure layer: I/O implementations and DI container
//!
//! This layer implements I/O boundary traits, runs child processes and
//! wires up services.

pub mod di;
pub mod error;
pub mod process;
pub mod traits;

pub use error::{FilterFailure, InfraError, InfraResult};
pub use process::PipelineOutcome;
