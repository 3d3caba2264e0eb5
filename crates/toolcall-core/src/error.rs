//! Error Types

use thiserror::Error;

/// Result type alias for turn operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error types shared across the loop and dispatch layers
#[derive(Error, Debug)]
pub enum Error {
    /// Model invocation port failed (vendor adapter error)
    #[error("Invocation error: {0}")]
    Invocation(String),

    /// A tool raised an undeclared failure; the turn is aborted
    #[error("Tool '{tool}' failed: {source}")]
    ToolFailure {
        tool: String,
        #[source]
        source: anyhow::Error,
    },

    /// Two tools with the same name were given to one toolbox
    #[error("Duplicate tool name: {0}")]
    DuplicateTool(String),

    /// The model kept requesting tools past the round-trip limit
    #[error("Exceeded repeated tool calls limit ({0})")]
    LimitExceeded(u32),

    /// The final content could not be decoded into the requested shape
    #[error("Decode error: {0}")]
    Decode(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Realtime session error
    #[error("Session error: {0}")]
    Session(String),

    /// JSON serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl Error {
    /// Create an invocation error from a vendor adapter message
    pub fn invocation(message: impl Into<String>) -> Self {
        Self::Invocation(message.into())
    }

    /// Create a session error
    pub fn session(message: impl Into<String>) -> Self {
        Self::Session(message.into())
    }
}
