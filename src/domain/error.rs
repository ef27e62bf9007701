//! Domain-level errors (no I/O concerns)

use thiserror::Error;

#[derive(Error, Debug)]
pub enum DomainError {
    #[error("invalid line filter pattern: {0}")]
    Pattern(#[from] regex::Error),

    #[error("cannot render pod manifest: {0}")]
    Manifest(#[from] serde_json::Error),

    #[error("cannot parse manifest: {0}")]
    InvalidManifest(#[from] serde_yaml::Error),

    #[error("no input")]
    EmptyInput,
}
