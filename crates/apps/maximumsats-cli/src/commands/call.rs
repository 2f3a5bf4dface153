//! Invoke a single tool from the command line.

use maximumsats_mcp::MaximumSatsServer;
use rmcp::model::{CallToolResult, JsonObject, RawContent, RawTextContent};
use serde_json::Value;
use tracing::debug;

use super::mcp_server::server_config;
use crate::error::{CliError, CliResult};
use crate::output::{CallOutput, OutputFormat, Render};

/// Execute the call command against the live upstream.
pub async fn call(
    tool: &str,
    args: Option<&str>,
    timeout_secs: u64,
    format: OutputFormat,
) -> CliResult<String> {
    let server = MaximumSatsServer::new(server_config(timeout_secs))?;
    call_with(&server, tool, args, format).await
}

/// Execute the call command on an existing server.
///
/// An error-flagged tool result becomes `CliError::ToolFailed`.
pub async fn call_with(
    server: &MaximumSatsServer,
    tool: &str,
    args: Option<&str>,
    format: OutputFormat,
) -> CliResult<String> {
    let arguments = parse_args(args)?;
    debug!(tool = tool, "Calling tool");

    let result = server.registry().call(tool, arguments).await?;
    let output = CallOutput {
        tool: tool.to_string(),
        is_error: result.is_error.unwrap_or(false),
        text: result_text(&result),
    };

    if output.is_error {
        return Err(CliError::ToolFailed(output.text));
    }
    Ok(output.render(format))
}

fn parse_args(args: Option<&str>) -> CliResult<Option<JsonObject>> {
    let Some(raw) = args else {
        return Ok(None);
    };
    match serde_json::from_str::<Value>(raw)? {
        Value::Object(map) => Ok(Some(map)),
        other => Err(CliError::user(format!(
            "--args must be a JSON object, got {}",
            other
        ))),
    }
}

fn result_text(result: &CallToolResult) -> String {
    result
        .content
        .iter()
        .filter_map(|content| match &content.raw {
            RawContent::Text(RawTextContent { text, .. }) => Some(text.as_str()),
            _ => None,
        })
        .collect::<Vec<_>>()
        .join("\n")
}
