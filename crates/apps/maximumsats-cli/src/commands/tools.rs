//! List the tool catalog.

use maximumsats_mcp::{MaximumSatsServer, McpServerConfig, ToolDescriptor};

use crate::error::CliResult;
use crate::output::{OutputFormat, Render, ToolListOutput, ToolSummary};

/// Execute the tools command.
pub fn tools(format: OutputFormat) -> CliResult<String> {
    let server = MaximumSatsServer::new(McpServerConfig::default())?;
    Ok(catalog_output(server.registry().descriptors()).render(format))
}

fn catalog_output(descriptors: &[ToolDescriptor]) -> ToolListOutput {
    let tools = descriptors
        .iter()
        .map(|tool| ToolSummary {
            name: tool.name().to_string(),
            description: tool.description().to_string(),
            required: tool
                .input_schema()
                .get("required")
                .and_then(|r| r.as_array())
                .map(|fields| {
                    fields
                        .iter()
                        .filter_map(|f| f.as_str().map(str::to_string))
                        .collect()
                })
                .unwrap_or_default(),
        })
        .collect();

    ToolListOutput { tools }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tools_json_lists_catalog() {
        let text = tools(OutputFormat::Json).unwrap();
        let value: serde_json::Value = serde_json::from_str(&text).unwrap();
        let tools = value["tools"].as_array().unwrap();

        assert_eq!(tools.len(), 17);
        assert_eq!(tools[0]["name"], "ask_bitcoin");
        assert_eq!(tools[0]["required"], serde_json::json!(["prompt"]));

        let top = tools.iter().find(|t| t["name"] == "wot_top").unwrap();
        assert_eq!(top["required"], serde_json::json!([]));
    }
}
