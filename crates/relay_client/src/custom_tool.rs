use futures::future::BoxFuture;
use relay_core::ExternalToolSchema;
use serde_json::Value;

/// A tool implemented by the caller rather than an MCP server.
///
/// Checked before the MCP routing table on every dispatch, so a custom tool
/// can shadow an MCP tool of the same name.
pub struct CustomTool {
    pub schema: ExternalToolSchema,
    executor: Box<dyn Fn(Value) -> BoxFuture<'static, Result<Value, String>> + Send + Sync>,
}

impl CustomTool {
    pub fn new<F>(schema: ExternalToolSchema, executor: F) -> Self
    where
        F: Fn(Value) -> BoxFuture<'static, Result<Value, String>> + Send + Sync + 'static,
    {
        Self {
            schema,
            executor: Box::new(executor),
        }
    }

    pub fn name(&self) -> &str {
        &self.schema.function.name
    }

    pub async fn execute(&self, arguments: Value) -> Result<Value, String> {
        (self.executor)(arguments).await
    }
}
