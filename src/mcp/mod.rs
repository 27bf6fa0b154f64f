//! MCP (Model Context Protocol) server surface
//!
//! The tool registry and the builtin `send_webhook` tool. The protocol
//! plumbing and transports live in [`crate::server`]; everything here is
//! transport-agnostic.

mod registry;
mod server;
pub mod tools;

pub use registry::{ToolContext, ToolRegistry, ToolResult, ToolSchema, ToolStatus};
pub use server::{McpServer, SERVER_NAME};
pub use tools::Tool;
