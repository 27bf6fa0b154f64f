//! JSON-RPC plumbing shared by the stdio and sse transports
//!
//! `McpHandler` is the transport-agnostic dispatcher: both transports feed
//! it raw JSON-RPC messages and forward whatever response it produces.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

use crate::mcp::{McpServer, ToolContext};
use crate::types::{ErrorCode, ServerConfig};

/// MCP protocol revision announced during initialize
pub const PROTOCOL_VERSION: &str = "2024-11-05";

// ─── JSON-RPC wire types ────────────────────────────────────────────────────

/// An incoming JSON-RPC request or notification
#[derive(Debug, Deserialize)]
pub struct JsonRpcRequest {
    #[allow(dead_code)]
    jsonrpc: Option<String>,
    /// Method name
    pub method: String,
    /// Method parameters
    #[serde(default)]
    pub params: Value,
    /// Request id; absent for notifications
    #[serde(default)]
    pub id: Option<Value>,
}

/// An outgoing JSON-RPC response
#[derive(Debug, Serialize)]
pub struct JsonRpcResponse {
    jsonrpc: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    result: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<JsonRpcError>,
    id: Value,
}

#[derive(Debug, Serialize)]
struct JsonRpcError {
    code: i32,
    message: String,
}

impl JsonRpcResponse {
    /// Build a success response
    pub fn ok(id: Value, result: Value) -> Self {
        Self {
            jsonrpc: "2.0",
            result: Some(result),
            error: None,
            id,
        }
    }

    /// Build an error response
    pub fn err(id: Value, code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            jsonrpc: "2.0",
            result: None,
            error: Some(JsonRpcError {
                code: code.code(),
                message: message.into(),
            }),
            id,
        }
    }

    /// Whether this response carries an error
    pub fn is_error(&self) -> bool {
        self.error.is_some()
    }
}

// ─── Request dispatch ───────────────────────────────────────────────────────

/// Transport-agnostic MCP request handler
pub struct McpHandler {
    server: McpServer,
    config: Arc<ServerConfig>,
}

impl std::fmt::Debug for McpHandler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("McpHandler")
            .field("server", &self.server.name())
            .field("config", &self.config)
            .finish()
    }
}

impl McpHandler {
    /// Create a handler serving the builtin tools with the given configuration
    pub fn new(config: Arc<ServerConfig>) -> Self {
        Self {
            server: McpServer::new(),
            config,
        }
    }

    /// Get the underlying MCP server
    pub fn server(&self) -> &McpServer {
        &self.server
    }

    /// Handle one raw JSON-RPC message
    ///
    /// Returns `None` for notifications, which expect no response.
    pub async fn handle_message(&self, raw: &str, session_id: &str) -> Option<JsonRpcResponse> {
        let request: JsonRpcRequest = match serde_json::from_str(raw) {
            Ok(r) => r,
            Err(e) => {
                return Some(JsonRpcResponse::err(
                    Value::Null,
                    ErrorCode::ParseError,
                    format!("Parse error: {}", e),
                ));
            }
        };
        self.handle_request(request, session_id).await
    }

    /// Handle a parsed JSON-RPC request
    pub async fn handle_request(
        &self,
        request: JsonRpcRequest,
        session_id: &str,
    ) -> Option<JsonRpcResponse> {
        let Some(id) = request.id else {
            // Notification (e.g. notifications/initialized): nothing to answer
            tracing::debug!(method = %request.method, "Ignoring notification");
            return None;
        };

        let response = match request.method.as_str() {
            "initialize" => self.handle_initialize(id, &request.params),
            "ping" => JsonRpcResponse::ok(id, json!({})),
            "tools/list" => self.handle_tools_list(id),
            "tools/call" => self.handle_tools_call(id, request.params, session_id).await,
            other => {
                tracing::warn!(method = %other, "Received unknown method");
                JsonRpcResponse::err(
                    id,
                    ErrorCode::MethodNotFound,
                    format!("Unknown method: {}", other),
                )
            }
        };

        Some(response)
    }

    fn handle_initialize(&self, id: Value, params: &Value) -> JsonRpcResponse {
        let client = params
            .get("clientInfo")
            .and_then(|c| c.get("name"))
            .and_then(|n| n.as_str())
            .unwrap_or("unknown");
        tracing::info!(client = %client, "Received initialize request");

        JsonRpcResponse::ok(
            id,
            json!({
                "protocolVersion": PROTOCOL_VERSION,
                "capabilities": {
                    "tools": {}
                },
                "serverInfo": {
                    "name": self.server.name(),
                    "version": self.server.version(),
                },
            }),
        )
    }

    fn handle_tools_list(&self, id: Value) -> JsonRpcResponse {
        JsonRpcResponse::ok(id, json!({ "tools": self.server.tool_schemas() }))
    }

    async fn handle_tools_call(&self, id: Value, params: Value, session_id: &str) -> JsonRpcResponse {
        #[derive(Debug, Deserialize)]
        struct ToolCallParams {
            name: String,
            #[serde(default = "empty_arguments")]
            arguments: Value,
        }

        fn empty_arguments() -> Value {
            json!({})
        }

        let params: ToolCallParams = match serde_json::from_value(params) {
            Ok(p) => p,
            Err(e) => {
                return JsonRpcResponse::err(
                    id,
                    ErrorCode::InvalidParams,
                    format!("Invalid params: {}", e),
                );
            }
        };

        if !self.server.has_tool(&params.name) {
            return JsonRpcResponse::err(
                id,
                ErrorCode::InvalidParams,
                format!("Unknown tool: {}", params.name),
            );
        }

        let context = ToolContext::new(session_id, self.config.clone());
        let result = self
            .server
            .execute(&params.name, params.arguments, &context)
            .await;

        JsonRpcResponse::ok(
            id,
            json!({
                "content": [{
                    "type": "text",
                    "text": result.content,
                }],
                "isError": result.is_error,
            }),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    use crate::mcp::SERVER_NAME;
    use crate::mcp::tools::MISSING_URL_MESSAGE;

    fn handler() -> McpHandler {
        McpHandler::new(Arc::new(ServerConfig::default()))
    }

    fn result_of(response: JsonRpcResponse) -> Value {
        let value = serde_json::to_value(&response).unwrap();
        value["result"].clone()
    }

    #[tokio::test]
    async fn test_initialize() {
        let response = handler()
            .handle_message(
                r#"{"jsonrpc":"2.0","id":1,"method":"initialize","params":{"protocolVersion":"2024-11-05","clientInfo":{"name":"test-client"}}}"#,
                "stdio",
            )
            .await
            .unwrap();

        assert!(!response.is_error());
        let result = result_of(response);
        assert_eq!(result["protocolVersion"], json!(PROTOCOL_VERSION));
        assert_eq!(result["serverInfo"]["name"], json!(SERVER_NAME));
        assert!(result["capabilities"]["tools"].is_object());
    }

    #[tokio::test]
    async fn test_ping() {
        let response = handler()
            .handle_message(r#"{"jsonrpc":"2.0","id":7,"method":"ping"}"#, "stdio")
            .await
            .unwrap();

        assert!(!response.is_error());
        assert_eq!(result_of(response), json!({}));
    }

    #[tokio::test]
    async fn test_tools_list() {
        let response = handler()
            .handle_message(r#"{"jsonrpc":"2.0","id":2,"method":"tools/list"}"#, "stdio")
            .await
            .unwrap();

        let result = result_of(response);
        let tools = result["tools"].as_array().unwrap();
        assert_eq!(tools.len(), 1);
        assert_eq!(tools[0]["name"], json!("send_webhook"));
        assert!(tools[0]["inputSchema"].is_object());
    }

    #[tokio::test]
    async fn test_unknown_method() {
        let response = handler()
            .handle_message(r#"{"jsonrpc":"2.0","id":3,"method":"resources/list"}"#, "stdio")
            .await
            .unwrap();

        assert!(response.is_error());
        let value = serde_json::to_value(&response).unwrap();
        assert_eq!(value["error"]["code"], json!(-32601));
    }

    #[tokio::test]
    async fn test_parse_error() {
        let response = handler().handle_message("{not json", "stdio").await.unwrap();

        assert!(response.is_error());
        let value = serde_json::to_value(&response).unwrap();
        assert_eq!(value["error"]["code"], json!(-32700));
        assert_eq!(value["id"], Value::Null);
    }

    #[tokio::test]
    async fn test_notification_gets_no_response() {
        let response = handler()
            .handle_message(
                r#"{"jsonrpc":"2.0","method":"notifications/initialized"}"#,
                "stdio",
            )
            .await;

        assert!(response.is_none());
    }

    #[tokio::test]
    async fn test_tools_call_unknown_tool() {
        let response = handler()
            .handle_message(
                r#"{"jsonrpc":"2.0","id":4,"method":"tools/call","params":{"name":"nope","arguments":{}}}"#,
                "stdio",
            )
            .await
            .unwrap();

        assert!(response.is_error());
        let value = serde_json::to_value(&response).unwrap();
        assert_eq!(value["error"]["code"], json!(-32602));
    }

    #[tokio::test]
    async fn test_tools_call_without_destination() {
        let response = handler()
            .handle_message(
                r#"{"jsonrpc":"2.0","id":5,"method":"tools/call","params":{"name":"send_webhook","arguments":{"titulo":"t","texto":"x"}}}"#,
                "stdio",
            )
            .await
            .unwrap();

        assert!(!response.is_error());
        let result = result_of(response);
        assert_eq!(result["isError"], json!(false));
        assert_eq!(result["content"][0]["type"], json!("text"));
        assert_eq!(result["content"][0]["text"], json!(MISSING_URL_MESSAGE));
    }

    #[tokio::test]
    async fn test_tools_call_missing_arguments_defaults_to_empty() {
        let response = handler()
            .handle_message(
                r#"{"jsonrpc":"2.0","id":6,"method":"tools/call","params":{"name":"send_webhook"}}"#,
                "stdio",
            )
            .await
            .unwrap();

        // Empty arguments fail input validation inside the tool
        let result = result_of(response);
        assert_eq!(result["isError"], json!(true));
    }
}
