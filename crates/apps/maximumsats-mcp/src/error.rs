//! Error types for the MCP server.

use maximumsats_l402::L402Error;
use rmcp::ErrorData;
use serde_json::json;
use thiserror::Error;

/// Result type for MCP tool operations.
pub type ToolResult<T> = Result<T, ToolError>;

/// Error types for tool dispatch and execution.
#[derive(Debug, Error)]
pub enum ToolError {
    /// No tool with this name is registered.
    #[error("unknown tool: {0}")]
    UnknownTool(String),

    /// Arguments failed schema validation.
    #[error("invalid arguments for {tool}: {reason}")]
    InvalidArguments {
        /// Tool being invoked.
        tool: String,
        /// What failed to validate.
        reason: String,
    },

    /// Two descriptors share a name.
    #[error("tool registered twice: {0}")]
    DuplicateTool(String),

    /// The host cancelled the call before the upstream answered.
    #[error("tool call cancelled")]
    Cancelled,

    /// Upstream call failed.
    #[error("{0}")]
    Upstream(#[from] L402Error),
}

impl ToolError {
    /// Create an invalid-arguments error.
    pub fn invalid_arguments(tool: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidArguments {
            tool: tool.into(),
            reason: reason.into(),
        }
    }

    /// Stable machine-readable code for this error.
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::UnknownTool(_) => "UNKNOWN_TOOL",
            Self::InvalidArguments { .. } => "INVALID_ARGUMENTS",
            Self::DuplicateTool(_) => "DUPLICATE_TOOL",
            Self::Cancelled => "CANCELLED",
            Self::Upstream(e) => e.error_code(),
        }
    }

    /// Returns a user-friendly suggestion for recovering from this error.
    pub fn suggestion(&self) -> &str {
        match self {
            Self::UnknownTool(_) => "List the available tools and call one of them by name",
            Self::InvalidArguments { .. } => "Check the tool's input schema for required fields and types",
            Self::DuplicateTool(_) => "Give every tool descriptor a unique name",
            Self::Cancelled => "Call the tool again if the result is still needed",
            Self::Upstream(e) => e.suggestion(),
        }
    }

    /// Returns true if this error indicates host/client misuse rather than a
    /// runtime condition; such errors surface as protocol errors.
    pub fn is_protocol_error(&self) -> bool {
        matches!(self, Self::UnknownTool(_) | Self::InvalidArguments { .. })
    }

    /// Convert into an MCP protocol error.
    pub fn to_error_data(&self) -> ErrorData {
        match self {
            Self::UnknownTool(name) => {
                ErrorData::invalid_params(self.to_string(), Some(json!({ "tool": name })))
            }
            Self::InvalidArguments { tool, reason } => ErrorData::invalid_params(
                self.to_string(),
                Some(json!({ "tool": tool, "reason": reason })),
            ),
            _ => ErrorData::internal_error(self.to_string(), None),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_protocol_errors() {
        assert!(ToolError::UnknownTool("nope".into()).is_protocol_error());
        assert!(ToolError::invalid_arguments("wot_score", "missing field `pubkey`").is_protocol_error());
        assert!(!ToolError::Cancelled.is_protocol_error());
        assert!(!ToolError::Upstream(L402Error::malformed("bad")).is_protocol_error());
    }

    #[test]
    fn test_error_codes() {
        assert_eq!(ToolError::UnknownTool("x".into()).error_code(), "UNKNOWN_TOOL");
        assert_eq!(
            ToolError::Upstream(L402Error::malformed("bad")).error_code(),
            "MALFORMED_UPSTREAM_RESPONSE"
        );
    }

    #[test]
    fn test_invalid_arguments_message() {
        let err = ToolError::invalid_arguments("wot_score", "missing field `pubkey`");
        assert_eq!(
            err.to_string(),
            "invalid arguments for wot_score: missing field `pubkey`"
        );
        assert!(!err.suggestion().is_empty());
    }
}
