//! Error conversion helpers for external command and stream operations
//!
//! Provides extension traits for cleaner error handling with context.

use std::io;

use crate::application::{ApplicationError, ApplicationResult};

/// Extension trait for converting `io::Result` to `ApplicationResult` with context.
pub trait IoResultExt<T> {
    /// Add the action and the program involved to an I/O error.
    ///
    /// # Example
    /// ```ignore
    /// cmd.run("kubectl", &args)
    ///     .with_command_context("list pods", "kubectl")?;
    /// ```
    fn with_command_context(self, action: &str, program: &str) -> ApplicationResult<T>;

    /// Add a plain description to an I/O error.
    fn with_context(self, action: &str) -> ApplicationResult<T>;
}

impl<T> IoResultExt<T> for io::Result<T> {
    fn with_command_context(self, action: &str, program: &str) -> ApplicationResult<T> {
        self.map_err(|e| ApplicationError::OperationFailed {
            context: format!("{}: {}", action, program),
            source: Box::new(e),
        })
    }

    fn with_context(self, action: &str) -> ApplicationResult<T> {
        self.map_err(|e| ApplicationError::OperationFailed {
            context: action.to_string(),
            source: Box::new(e),
        })
    }
}
