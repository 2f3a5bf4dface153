//! CLI error types.

use maximumsats_mcp::ToolError;
use thiserror::Error;

/// CLI result type.
pub type CliResult<T> = Result<T, CliError>;

/// CLI error enum wrapping all crate errors.
#[derive(Debug, Error)]
pub enum CliError {
    /// User-facing error with actionable message.
    #[error("{0}")]
    User(String),

    /// The tool ran but reported an error.
    #[error("{0}")]
    ToolFailed(String),

    /// Tool dispatch error.
    #[error("{0}")]
    Tool(#[from] ToolError),

    /// MCP server error.
    #[error("MCP server error: {0}")]
    Server(String),

    /// JSON serialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl CliError {
    /// Create a user-facing error.
    pub fn user(msg: impl Into<String>) -> Self {
        Self::User(msg.into())
    }

    /// Get the exit code for this error.
    pub fn exit_code(&self) -> i32 {
        match self {
            // User errors and failed tool results: 1
            Self::User(_) | Self::ToolFailed(_) => 1,
            // Host misuse (unknown tool, bad arguments): 2
            Self::Tool(e) if e.is_protocol_error() => 2,
            // Upstream and dispatch errors: 5
            Self::Tool(_) | Self::Server(_) => 5,
            // JSON/format errors: 10
            Self::Json(_) => 10,
        }
    }

    /// Short machine-readable code shown next to the message.
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::User(_) => "USAGE",
            Self::ToolFailed(_) => "TOOL_FAILED",
            Self::Tool(e) => e.error_code(),
            Self::Server(_) => "SERVER",
            Self::Json(_) => "JSON",
        }
    }

    /// Recovery hint, when one applies.
    pub fn suggestion(&self) -> Option<&str> {
        match self {
            Self::Tool(e) => Some(e.suggestion()),
            Self::User(_) => Some("Run 'maximumsats --help' for usage"),
            Self::Json(_) => Some("Pass --args as a JSON object, e.g. '{\"pubkey\": \"<hex>\"}'"),
            _ => None,
        }
    }
}
