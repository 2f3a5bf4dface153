//! MCP server command implementation.
//!
//! Starts an MCP server on stdio for AI assistant integration.

use std::time::Duration;

use maximumsats_mcp::{run_server, McpServerConfig};
use tracing::info;

use crate::error::{CliError, CliResult};

/// Build the server configuration from CLI arguments.
pub fn server_config(timeout_secs: u64) -> McpServerConfig {
    McpServerConfig {
        request_timeout: Duration::from_secs(timeout_secs),
        ..McpServerConfig::default()
    }
}

/// Start the MCP server.
///
/// Blocks until the host disconnects. Nothing is printed to stdout on
/// return, since stdout carried the protocol.
pub async fn mcp_server(timeout_secs: u64) -> CliResult<String> {
    info!(timeout_secs = timeout_secs, "Starting MCP server");

    run_server(server_config(timeout_secs))
        .await
        .map_err(|e| CliError::Server(e.to_string()))?;

    Ok(String::new())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_server_config_overrides_timeout_only() {
        let config = server_config(5);
        assert_eq!(config.request_timeout, Duration::from_secs(5));
        assert_eq!(config.api_base, McpServerConfig::default().api_base);
        assert_eq!(config.wot_base, McpServerConfig::default().wot_base);
    }
}
