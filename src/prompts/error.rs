//! Error types for prompt loading and rendering.

use std::path::PathBuf;

/// Errors produced while loading or rendering a prompt template.
#[derive(Debug, thiserror::Error)]
pub enum PromptError {
    #[error("prompt template '{name}' not found at {}", .path.display())]
    NotFound { name: String, path: PathBuf },

    #[error("invalid prompt name: {0:?}")]
    InvalidName(String),

    #[error("failed to read prompt template {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("missing required key: {0}")]
    MissingKey(String),

    #[error("malformed template at byte {position}: {reason}")]
    Malformed { position: usize, reason: &'static str },
}

/// Result type for prompt operations.
pub type PromptResult<T> = std::result::Result<T, PromptError>;
