//! Tool registry - maps tool names to capabilities
//!
//! The agent loop only depends on `(name, input) -> Result<String, String>`.
//! Anything implementing [`Tool`] can be registered, so a sandboxed or
//! allow-listed shell can replace the default without touching the loop.

use async_trait::async_trait;
use std::collections::BTreeMap;
use std::sync::Arc;

use crate::core::config::ToolsConfig;
use crate::core::{AgentError, Result};
use crate::tools::shell::ShellTool;

/// A capability the model can invoke by name
#[async_trait]
pub trait Tool: Send + Sync {
    /// Name the model uses in action steps
    fn name(&self) -> &str;

    /// One-line description for the system instruction
    fn description(&self) -> &str;

    /// Invoke the tool. `Err` carries the message shown to the model.
    async fn invoke(&self, input: &str) -> std::result::Result<String, String>;
}

/// Registry of available tools, fixed before the loop starts
#[derive(Clone, Default)]
pub struct ToolRegistry {
    tools: BTreeMap<String, Arc<dyn Tool>>,
}

impl ToolRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a registry with the built-in shell tool
    pub fn with_defaults(config: &ToolsConfig) -> Self {
        let mut registry = Self::new();
        registry.register(Arc::new(ShellTool::from_config(config)));
        registry
    }

    /// Register a tool, replacing any tool with the same name
    pub fn register(&mut self, tool: Arc<dyn Tool>) {
        self.tools.insert(tool.name().to_string(), tool);
    }

    /// Check whether a tool is registered
    pub fn contains(&self, name: &str) -> bool {
        self.tools.contains_key(name)
    }

    /// Registered tool names, sorted
    pub fn names(&self) -> Vec<&str> {
        self.tools.keys().map(String::as_str).collect()
    }

    pub fn len(&self) -> usize {
        self.tools.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }

    /// Render the tool list for the system instruction
    pub fn describe(&self) -> String {
        self.tools
            .values()
            .map(|tool| format!("- {}(input): {}", tool.name(), tool.description()))
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// Execute a tool by name.
    ///
    /// Unregistered names are an `UnknownTool` error; a tool that fails is a
    /// `ToolExecution` error carrying the tool's message.
    pub async fn execute(&self, name: &str, input: &str) -> Result<String> {
        let tool = self
            .tools
            .get(name)
            .ok_or_else(|| AgentError::UnknownTool(name.to_string()))?;

        tool.invoke(input).await.map_err(|message| {
            tracing::warn!(tool = name, "tool failed: {}", message);
            AgentError::tool(message)
        })
    }
}

impl std::fmt::Debug for ToolRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ToolRegistry")
            .field("tools", &self.names())
            .finish()
    }
}
