use agora_llm::Tool;
use anyhow::{anyhow, Result};
use async_trait::async_trait;
use futures::future::BoxFuture;
use serde_json::Value;
use std::sync::Arc;

/// Trait for executing tool calls on behalf of an agent.
///
/// `schemas()` is what the model sees; `execute()` is called with the
/// arguments the model produced, already parsed as JSON.
#[async_trait]
pub trait ToolExecutor: Send + Sync {
    /// Execute a tool call and return the result as a string.
    async fn execute(&self, tool_name: &str, arguments: Value) -> Result<String>;

    /// Tool definitions advertised to the model.
    fn schemas(&self) -> Vec<Tool>;
}

type ToolHandler = Arc<dyn Fn(Value) -> BoxFuture<'static, Result<String>> + Send + Sync>;

/// Registry of named async functions exposed to the model as tools.
///
/// Registration order is preserved in `schemas()`.
pub struct FunctionToolbox {
    tools: Vec<(Tool, ToolHandler)>,
}

impl FunctionToolbox {
    pub fn new() -> Self {
        Self { tools: Vec::new() }
    }

    /// Register a handler under the given tool definition.
    pub fn register<F, Fut>(mut self, tool: Tool, handler: F) -> Self
    where
        F: Fn(Value) -> Fut + Send + Sync + 'static,
        Fut: std::future::Future<Output = Result<String>> + Send + 'static,
    {
        let handler: ToolHandler = Arc::new(move |args| Box::pin(handler(args)));
        self.tools.push((tool, handler));
        self
    }

    pub fn len(&self) -> usize {
        self.tools.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }
}

impl Default for FunctionToolbox {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ToolExecutor for FunctionToolbox {
    async fn execute(&self, tool_name: &str, arguments: Value) -> Result<String> {
        let handler = self
            .tools
            .iter()
            .find(|(tool, _)| tool.function.name == tool_name)
            .map(|(_, handler)| Arc::clone(handler))
            .ok_or_else(|| anyhow!("Unknown tool: {}", tool_name))?;

        handler(arguments).await
    }

    fn schemas(&self) -> Vec<Tool> {
        self.tools.iter().map(|(tool, _)| tool.clone()).collect()
    }
}
