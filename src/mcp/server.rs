//! MCP server implementation
//!
//! Manages tool registration and provides the server identity announced
//! during `initialize`.

use std::sync::Arc;

use crate::mcp::registry::{ToolContext, ToolRegistry, ToolResult, ToolSchema};
use crate::mcp::tools::{SendWebhookTool, Tool};

/// Server name announced to MCP clients
pub const SERVER_NAME: &str = "webhook-sender";

/// MCP server for managing and executing tools
#[derive(Debug)]
pub struct McpServer {
    /// Tool registry
    registry: ToolRegistry,
    /// Server name
    name: String,
    /// Server version
    version: String,
}

impl McpServer {
    /// Create a new MCP server with the builtin tools
    pub fn new() -> Self {
        let mut server = Self {
            registry: ToolRegistry::new(),
            name: SERVER_NAME.to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        };

        server.register_builtin_tools();

        server
    }

    /// Create a new MCP server with custom name and version
    pub fn with_info(name: impl Into<String>, version: impl Into<String>) -> Self {
        let mut server = Self {
            registry: ToolRegistry::new(),
            name: name.into(),
            version: version.into(),
        };

        server.register_builtin_tools();

        server
    }

    /// Register all built-in tools
    fn register_builtin_tools(&mut self) {
        self.registry.register(SendWebhookTool::new());
    }

    /// Get the server name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Get the server version
    pub fn version(&self) -> &str {
        &self.version
    }

    /// Register a custom tool
    pub fn register<T: Tool + 'static>(&mut self, tool: T) {
        self.registry.register(tool);
    }

    /// Get a tool by name
    pub fn get_tool(&self, name: &str) -> Option<Arc<dyn Tool>> {
        self.registry.get(name)
    }

    /// Check if a tool exists
    pub fn has_tool(&self, name: &str) -> bool {
        self.registry.contains(name)
    }

    /// Get all tool names
    pub fn tool_names(&self) -> Vec<&str> {
        self.registry.names()
    }

    /// Get the number of registered tools
    pub fn tool_count(&self) -> usize {
        self.registry.len()
    }

    /// Get all tool schemas
    pub fn tool_schemas(&self) -> Vec<ToolSchema> {
        self.registry.schemas()
    }

    /// Execute a tool by name
    pub async fn execute(
        &self,
        name: &str,
        input: serde_json::Value,
        context: &ToolContext,
    ) -> ToolResult {
        self.registry.execute(name, input, context).await
    }
}

impl Default for McpServer {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    use crate::mcp::tools::MISSING_URL_MESSAGE;
    use crate::types::ServerConfig;

    #[test]
    fn test_server_new() {
        let server = McpServer::new();
        assert_eq!(server.name(), SERVER_NAME);
        assert!(!server.version().is_empty());

        assert!(server.has_tool("send_webhook"));
        assert_eq!(server.tool_count(), 1);
    }

    #[test]
    fn test_server_with_info() {
        let server = McpServer::with_info("custom-server", "1.0.0");
        assert_eq!(server.name(), "custom-server");
        assert_eq!(server.version(), "1.0.0");
        assert!(server.has_tool("send_webhook"));
    }

    #[test]
    fn test_tool_schemas() {
        let server = McpServer::new();
        let schemas = server.tool_schemas();

        assert_eq!(schemas.len(), 1);
        assert_eq!(schemas[0].name, "send_webhook");
        assert!(!schemas[0].description.is_empty());
        assert!(schemas[0].input_schema.is_object());
    }

    #[tokio::test]
    async fn test_execute_unknown_tool() {
        let server = McpServer::new();
        let context = ToolContext::new("test", Arc::new(ServerConfig::default()));

        let result = server.execute("UnknownTool", json!({}), &context).await;

        assert!(result.is_error);
        assert!(result.content.contains("not found"));
    }

    #[tokio::test]
    async fn test_execute_send_webhook_without_destination() {
        let server = McpServer::new();
        let context = ToolContext::new("test", Arc::new(ServerConfig::default()));

        let result = server
            .execute("send_webhook", json!({"titulo": "t", "texto": "x"}), &context)
            .await;

        assert!(!result.is_error);
        assert_eq!(result.content, MISSING_URL_MESSAGE);
    }
}
