//! MCP server implementation for MaximumSats.
//!
//! Uses the RMCP SDK to expose the MaximumSats tool catalog to AI assistants
//! over stdio.

use std::sync::Arc;
use std::time::Duration;

use maximumsats_l402::{HttpTransport, L402Client, Transport, API_BASE, DEFAULT_TIMEOUT, WOT_BASE};
use rmcp::{
    model::*,
    service::{RequestContext, RoleServer},
    ErrorData as McpError,
};
use tracing::{debug, info};

use crate::catalog::{self, tool_error, Upstream};
use crate::error::{ToolError, ToolResult};
use crate::registry::ToolRegistry;

/// Configuration for the MCP server.
#[derive(Debug, Clone)]
pub struct McpServerConfig {
    /// Base URL of the MaximumSats API (paid actions).
    pub api_base: String,
    /// Base URL of the Web-of-Trust API (lookups).
    pub wot_base: String,
    /// Per-request upstream timeout.
    pub request_timeout: Duration,
}

impl Default for McpServerConfig {
    fn default() -> Self {
        Self {
            api_base: API_BASE.to_string(),
            wot_base: WOT_BASE.to_string(),
            request_timeout: DEFAULT_TIMEOUT,
        }
    }
}

/// MaximumSats MCP server.
#[derive(Debug, Clone)]
pub struct MaximumSatsServer {
    registry: Arc<ToolRegistry>,
}

impl MaximumSatsServer {
    /// Create a server that talks to the upstream over HTTP.
    pub fn new(config: McpServerConfig) -> ToolResult<Self> {
        let transport = HttpTransport::new(config.request_timeout)?;
        Self::with_transport(config, Arc::new(transport))
    }

    /// Create a server over an arbitrary transport.
    pub fn with_transport(
        config: McpServerConfig,
        transport: Arc<dyn Transport>,
    ) -> ToolResult<Self> {
        let upstream = Upstream::new(L402Client::new(transport), config.api_base, config.wot_base);
        let registry = ToolRegistry::new(catalog::tools(Arc::new(upstream)))?;

        info!(tools = registry.len(), "MaximumSats tool catalog registered");

        Ok(Self {
            registry: Arc::new(registry),
        })
    }

    /// The registered tools.
    pub fn registry(&self) -> &ToolRegistry {
        &self.registry
    }

    /// Dispatch one tool call, mapping failures to the MCP surface.
    ///
    /// Misuse by the host (unknown tool, bad arguments) is a protocol error.
    /// Everything else is an error-flagged tool result.
    pub async fn dispatch(
        &self,
        name: &str,
        arguments: Option<JsonObject>,
    ) -> Result<CallToolResult, McpError> {
        match self.registry.call(name, arguments).await {
            Ok(result) => Ok(result),
            Err(e) if e.is_protocol_error() => {
                debug!(tool = name, error = %e, "Rejected tool call");
                Err(e.to_error_data())
            }
            Err(e) => Ok(tool_error(&e)),
        }
    }

    /// Dispatch one tool call, abandoning it when `cancelled` resolves first.
    ///
    /// A cancelled call drops the in-flight upstream request and yields an
    /// error-flagged `CANCELLED` result.
    pub async fn dispatch_until(
        &self,
        name: &str,
        arguments: Option<JsonObject>,
        cancelled: impl std::future::Future<Output = ()>,
    ) -> Result<CallToolResult, McpError> {
        tokio::select! {
            result = self.dispatch(name, arguments) => result,
            _ = cancelled => {
                info!(tool = name, "Tool call cancelled by host");
                Ok(tool_error(&ToolError::Cancelled))
            }
        }
    }
}

impl rmcp::ServerHandler for MaximumSatsServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            protocol_version: ProtocolVersion::LATEST,
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            server_info: Implementation::from_build_env(),
            instructions: Some(
                "MaximumSats MCP Server - Bitcoin AI, image generation, and Nostr Web of Trust \
                 tools paid with Lightning via L402. Paid tools first return a Lightning invoice \
                 and a payment_hash; pay the invoice, then call the same tool again with the \
                 payment_hash. Web of Trust lookups are free until the daily quota runs out."
                    .into(),
            ),
        }
    }

    #[allow(clippy::manual_async_fn)]
    fn list_tools(
        &self,
        _request: Option<PaginatedRequestParam>,
        _context: RequestContext<RoleServer>,
    ) -> impl std::future::Future<Output = Result<ListToolsResult, McpError>> + Send + '_ {
        async move { Ok(ListToolsResult::with_all_items(self.registry.list())) }
    }

    #[allow(clippy::manual_async_fn)]
    fn call_tool(
        &self,
        request: CallToolRequestParam,
        context: RequestContext<RoleServer>,
    ) -> impl std::future::Future<Output = Result<CallToolResult, McpError>> + Send + '_ {
        async move {
            self.dispatch_until(&request.name, request.arguments, context.ct.cancelled())
                .await
        }
    }
}

/// Run the MCP server on stdio transport.
pub async fn run_server(
    config: McpServerConfig,
) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    use rmcp::{transport::stdio, ServiceExt};

    info!(
        api_base = %config.api_base,
        wot_base = %config.wot_base,
        "Starting MaximumSats MCP server"
    );

    let server = MaximumSatsServer::new(config)?;

    // A transport that fails during setup (stdin already closed) is a clean exit.
    let service = match server.serve(stdio()).await {
        Ok(s) => s,
        Err(e) => {
            info!("MCP transport closed during setup: {}", e);
            return Ok(());
        }
    };

    // Client disconnect and stdin EOF end the session normally.
    if let Err(e) = service.waiting().await {
        info!("MCP transport closed: {}", e);
    }

    info!("MCP server stopped");
    Ok(())
}
