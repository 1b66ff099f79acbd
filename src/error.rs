//! Crate-wide error taxonomy.

use thiserror::Error;

pub type Result<T> = std::result::Result<T, AlmanacError>;

/// Everything that can go wrong across the session.
///
/// Display strings on the prompt-resolution variants are user-facing and
/// printed verbatim by the REPL.
#[derive(Debug, Error)]
pub enum AlmanacError {
    /// The tool registry could not be built or refreshed.
    #[error("tool registry unavailable: {0}")]
    RegistryUnavailable(String),

    /// The prompt catalog could not be listed or rendered.
    #[error("prompt catalog unavailable: {0}")]
    CatalogUnavailable(String),

    /// A `/prompt` invocation named a prompt the server does not have.
    #[error("Prompt '{name}' not found.")]
    PromptNotFound { name: String },

    /// A `/prompt` invocation supplied the wrong number of arguments.
    #[error("Expected {expected} arguments: {}", arguments.join(", "))]
    ArgumentCountMismatch {
        expected: usize,
        actual: usize,
        arguments: Vec<String>,
    },

    /// A tool invocation failed on the server side.
    #[error("Error calling tool {tool_name}: {message}")]
    ToolExecution { tool_name: String, message: String },

    /// Missing or rejected API credentials.
    #[error("authentication failed: {0}")]
    Authentication(String),

    /// Non-success response from the completion API.
    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// A malformed command line. The message is the usage text.
    #[error("{0}")]
    Usage(String),

    #[error("configuration error: {0}")]
    Configuration(String),
}

impl AlmanacError {
    pub fn api(status: u16, message: impl Into<String>) -> Self {
        Self::Api {
            status,
            message: message.into(),
        }
    }

    /// Whether the session can keep accepting input after this error.
    ///
    /// Only a dead MCP connection ends the session; everything else is
    /// reported and the loop continues.
    pub fn is_recoverable(&self) -> bool {
        !matches!(self, Self::RegistryUnavailable(_))
    }
}
