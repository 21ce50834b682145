//! Tool registry - manages and dispatches tool calls
//!
//! Central hub for registering tools and routing executions to them.

use std::collections::HashMap;
use std::sync::Arc;

use serde_json::Value;

use crate::core::{ToolDefinition, ToolResult};
use crate::tools::analysis::{GasOptimizationTool, SecurityAuditTool};
use crate::tools::templates::{OpenZeppelinTool, SolidityDocsTool};
use crate::tools::tool::Tool;

/// Registry of available tools
#[derive(Clone, Default)]
pub struct ToolRegistry {
    /// Tools indexed by name
    tools: HashMap<String, Arc<dyn Tool>>,
}

impl ToolRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self {
            tools: HashMap::new(),
        }
    }

    /// Create a registry with the built-in tools
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        registry.register(OpenZeppelinTool::new());
        registry.register(SolidityDocsTool::new());
        registry.register(SecurityAuditTool::new());
        registry.register(GasOptimizationTool::new());
        registry
    }

    /// Register a tool. A tool with the same name is replaced (last write wins).
    pub fn register<T: Tool + 'static>(&mut self, tool: T) {
        self.register_shared(Arc::new(tool));
    }

    /// Register an already shared tool
    pub fn register_shared(&mut self, tool: Arc<dyn Tool>) {
        let name = tool.name().to_string();
        if self.tools.insert(name.clone(), tool).is_some() {
            tracing::warn!(tool = %name, "replaced previously registered tool");
        }
    }

    /// Look up a tool by name
    pub fn get(&self, name: &str) -> Option<Arc<dyn Tool>> {
        self.tools.get(name).cloned()
    }

    /// Check whether a name is registered
    pub fn contains(&self, name: &str) -> bool {
        self.tools.contains_key(name)
    }

    /// Registered tool names, sorted
    pub fn list(&self) -> Vec<String> {
        let mut names: Vec<String> = self.tools.keys().cloned().collect();
        names.sort();
        names
    }

    /// Definitions of all registered tools, sorted by name
    pub fn definitions(&self) -> Vec<ToolDefinition> {
        let mut definitions: Vec<ToolDefinition> =
            self.tools.values().map(|tool| tool.definition()).collect();
        definitions.sort_by(|a, b| a.name.cmp(&b.name));
        definitions
    }

    /// Number of registered tools
    pub fn len(&self) -> usize {
        self.tools.len()
    }

    /// Whether no tools are registered
    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }

    /// Execute a tool by name. Unknown names yield a failed result.
    pub fn execute(&self, name: &str, params: &Value) -> ToolResult {
        match self.tools.get(name) {
            Some(tool) => {
                tracing::debug!(tool = %name, "executing tool");
                tool.execute(params)
            }
            None => ToolResult::failure(format!("tool not found: {}", name)),
        }
    }
}
