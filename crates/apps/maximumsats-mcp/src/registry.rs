//! Tool registry.
//!
//! A [`ToolRegistry`] is built once from an explicit list of
//! [`ToolDescriptor`]s and then only read. Dispatch validates the caller's
//! arguments against the tool's typed input before the handler runs, so a
//! handler never sees malformed input.

use std::future::Future;
use std::sync::Arc;

use futures::future::BoxFuture;
use rmcp::model::{CallToolResult, JsonObject, Tool};
use rmcp::schemars;
use rmcp::schemars::JsonSchema;
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::debug;

use crate::error::{ToolError, ToolResult};

/// Type-erased handler: validates raw arguments, then yields the call.
type ErasedHandler =
    Arc<dyn Fn(JsonObject) -> Result<BoxFuture<'static, CallToolResult>, String> + Send + Sync>;

/// A single invocable tool.
#[derive(Clone)]
pub struct ToolDescriptor {
    name: &'static str,
    description: &'static str,
    input_schema: Arc<JsonObject>,
    handler: ErasedHandler,
}

impl ToolDescriptor {
    /// Declare a tool whose arguments deserialize into `I`.
    ///
    /// The input schema is generated from `I`, and `handler` only ever
    /// receives a value that deserialized successfully.
    pub fn new<I, F, Fut>(name: &'static str, description: &'static str, handler: F) -> Self
    where
        I: DeserializeOwned + JsonSchema + Send + 'static,
        F: Fn(I) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = CallToolResult> + Send + 'static,
    {
        let handler: ErasedHandler = Arc::new(
            move |arguments: JsonObject| -> Result<BoxFuture<'static, CallToolResult>, String> {
                let input: I = serde_json::from_value(Value::Object(arguments))
                    .map_err(|e| e.to_string())?;
                Ok(Box::pin(handler(input)))
            },
        );

        Self {
            name,
            description,
            input_schema: input_schema::<I>(),
            handler,
        }
    }

    /// Tool name.
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Human-readable description used by the host for tool selection.
    pub fn description(&self) -> &'static str {
        self.description
    }

    /// JSON Schema of the tool's arguments.
    pub fn input_schema(&self) -> &JsonObject {
        &self.input_schema
    }

    /// MCP tool listing entry.
    pub fn to_tool(&self) -> Tool {
        Tool::new(self.name, self.description, self.input_schema.clone())
    }
}

impl std::fmt::Debug for ToolDescriptor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ToolDescriptor")
            .field("name", &self.name)
            .finish_non_exhaustive()
    }
}

/// Immutable set of tools, in registration order.
#[derive(Debug, Clone)]
pub struct ToolRegistry {
    tools: Vec<ToolDescriptor>,
}

impl ToolRegistry {
    /// Build a registry, rejecting duplicate names.
    pub fn new(tools: Vec<ToolDescriptor>) -> ToolResult<Self> {
        for (i, tool) in tools.iter().enumerate() {
            if tools[..i].iter().any(|t| t.name == tool.name) {
                return Err(ToolError::DuplicateTool(tool.name.to_string()));
            }
        }
        Ok(Self { tools })
    }

    /// All descriptors.
    pub fn descriptors(&self) -> &[ToolDescriptor] {
        &self.tools
    }

    /// MCP listing of all tools.
    pub fn list(&self) -> Vec<Tool> {
        self.tools.iter().map(ToolDescriptor::to_tool).collect()
    }

    /// Look up a descriptor by name.
    pub fn get(&self, name: &str) -> Option<&ToolDescriptor> {
        self.tools.iter().find(|t| t.name == name)
    }

    /// Number of registered tools.
    pub fn len(&self) -> usize {
        self.tools.len()
    }

    /// Returns true if no tools are registered.
    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }

    /// Validate arguments and run the named tool.
    ///
    /// Missing arguments are treated as an empty object. Fails with
    /// `UnknownTool` or `InvalidArguments` before any handler work.
    pub async fn call(
        &self,
        name: &str,
        arguments: Option<JsonObject>,
    ) -> ToolResult<CallToolResult> {
        let tool = self
            .get(name)
            .ok_or_else(|| ToolError::UnknownTool(name.to_string()))?;

        let call = (tool.handler)(arguments.unwrap_or_default())
            .map_err(|reason| ToolError::invalid_arguments(name, reason))?;

        debug!(tool = name, "Dispatching tool call");
        Ok(call.await)
    }
}

fn input_schema<I: JsonSchema>() -> Arc<JsonObject> {
    let schema = schemars::schema_for!(I);
    match serde_json::to_value(schema) {
        Ok(Value::Object(object)) => Arc::new(object),
        _ => Arc::new(JsonObject::new()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rmcp::model::{Content, RawContent, RawTextContent};
    use serde::Deserialize;
    use serde_json::json;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[derive(Debug, Deserialize, JsonSchema)]
    struct EchoInput {
        /// Text to echo.
        text: String,
        #[serde(default)]
        times: Option<u32>,
    }

    fn echo_tool(calls: Arc<AtomicUsize>) -> ToolDescriptor {
        ToolDescriptor::new("echo", "Echo text back.", move |input: EchoInput| {
            calls.fetch_add(1, Ordering::SeqCst);
            async move {
                let times = input.times.unwrap_or(1) as usize;
                CallToolResult::success(vec![Content::text(input.text.repeat(times))])
            }
        })
    }

    fn text_of(result: &CallToolResult) -> String {
        match &result.content[0].raw {
            RawContent::Text(RawTextContent { text, .. }) => text.clone(),
            other => panic!("expected text content, got {:?}", other),
        }
    }

    fn args(value: serde_json::Value) -> Option<JsonObject> {
        value.as_object().cloned()
    }

    #[tokio::test]
    async fn test_call_valid_arguments() {
        let calls = Arc::new(AtomicUsize::new(0));
        let registry = ToolRegistry::new(vec![echo_tool(calls.clone())]).unwrap();

        let result = registry
            .call("echo", args(json!({ "text": "ab", "times": 2 })))
            .await
            .unwrap();
        assert_eq!(text_of(&result), "abab");
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_missing_field_never_reaches_handler() {
        let calls = Arc::new(AtomicUsize::new(0));
        let registry = ToolRegistry::new(vec![echo_tool(calls.clone())]).unwrap();

        let err = registry.call("echo", None).await.unwrap_err();
        assert!(matches!(err, ToolError::InvalidArguments { ref tool, .. } if tool == "echo"));
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_wrong_type_never_reaches_handler() {
        let calls = Arc::new(AtomicUsize::new(0));
        let registry = ToolRegistry::new(vec![echo_tool(calls.clone())]).unwrap();

        let err = registry
            .call("echo", args(json!({ "text": 7 })))
            .await
            .unwrap_err();
        assert!(matches!(err, ToolError::InvalidArguments { .. }));
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_unknown_tool() {
        let registry = ToolRegistry::new(vec![]).unwrap();
        let err = registry.call("nope", None).await.unwrap_err();
        assert!(matches!(err, ToolError::UnknownTool(ref name) if name == "nope"));
    }

    #[test]
    fn test_duplicate_names_rejected() {
        let calls = Arc::new(AtomicUsize::new(0));
        let err = ToolRegistry::new(vec![echo_tool(calls.clone()), echo_tool(calls)]).unwrap_err();
        assert!(matches!(err, ToolError::DuplicateTool(ref name) if name == "echo"));
    }

    #[test]
    fn test_schema_lists_required_fields() {
        let calls = Arc::new(AtomicUsize::new(0));
        let tool = echo_tool(calls);
        let schema = tool.input_schema();

        assert_eq!(schema["type"], "object");
        assert_eq!(schema["required"], json!(["text"]));
        assert!(schema["properties"]["times"].is_object());
    }

    #[test]
    fn test_listing_preserves_order() {
        let calls = Arc::new(AtomicUsize::new(0));
        let other = ToolDescriptor::new("other", "Other.", |_: EchoInput| async {
            CallToolResult::success(vec![])
        });
        let registry = ToolRegistry::new(vec![echo_tool(calls), other]).unwrap();

        let names: Vec<_> = registry.list().into_iter().map(|t| t.name).collect();
        assert_eq!(names, vec!["echo", "other"]);
        assert_eq!(registry.len(), 2);
    }
}
