//! Startup error types for the runtime.

use daybreak_core::error::DomainError;
use thiserror::Error;

/// Errors that stop a session before it starts.
#[derive(Debug, Error)]
pub enum AppError {
    /// An environment variable holds an unusable value.
    #[error("configuration error: {0}")]
    Config(String),

    /// The content file is not valid content YAML.
    #[error("content error: {0}")]
    Content(#[source] serde_yaml::Error),

    /// The content parses but is inconsistent.
    #[error("invalid content: {0}")]
    InvalidContent(#[from] DomainError),

    /// The input script is not valid script YAML.
    #[error("script error: {0}")]
    Script(#[source] serde_yaml::Error),

    /// A content or script file could not be read.
    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),
}
