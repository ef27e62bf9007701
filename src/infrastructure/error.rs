//! Infrastructure-level errors (wraps application errors)

use thiserror::Error;

use crate::application::ApplicationError;

/// Infrastructure errors wrap application errors and add I/O-level concerns.
#[derive(Error, Debug)]
pub enum InfraError {
    #[error("{0}")]
    Application(#[from] ApplicationError),

    #[error("I/O error: {context}")]
    Io {
        context: String,
        #[source]
        source: std::io::Error,
    },

    #[error("cannot start {program} {args}")]
    Spawn {
        program: String,
        args: String,
        #[source]
        source: std::io::Error,
    },

    #[error("stream failure: {context}")]
    Stream {
        context: String,
        #[source]
        source: std::io::Error,
    },

    #[error("cannot wait for {program}")]
    Wait {
        program: String,
        #[source]
        source: std::io::Error,
    },
}

impl InfraError {
    /// Create an I/O error with context.
    pub fn io(context: impl Into<String>, source: std::io::Error) -> Self {
        Self::Io {
            context: context.into(),
            source,
        }
    }

    pub fn spawn(program: &str, args: &[String], source: std::io::Error) -> Self {
        Self::Spawn {
            program: program.to_string(),
            args: args.join(" "),
            source,
        }
    }

    pub fn stream(context: impl Into<String>, source: std::io::Error) -> Self {
        Self::Stream {
            context: context.into(),
            source,
        }
    }

    pub fn wait(program: &str, source: std::io::Error) -> Self {
        Self::Wait {
            program: program.to_string(),
            source,
        }
    }
}

/// The secondary (filter) process of a pipeline did not finish cleanly.
#[derive(Error, Debug)]
pub enum FilterFailure {
    #[error("filter {program} exited with code {exit_code}")]
    Exited { program: String, exit_code: i32 },

    #[error("cannot wait for filter {program}")]
    Wait {
        program: String,
        #[source]
        source: std::io::Error,
    },
}

/// Result type for infrastructure layer operations.
pub type InfraResult<T> = Result<T, InfraError>;
