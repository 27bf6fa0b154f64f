//! Serving the MCP protocol
//!
//! The JSON-RPC handler plus the two transports that can deliver it:
//! stdio for local agent hosts and sse for remote deployments.

pub mod protocol;
mod runner;
pub mod sse;
pub mod stdio;

pub use protocol::{JsonRpcRequest, JsonRpcResponse, McpHandler, PROTOCOL_VERSION};
pub use runner::{run_server, run_server_with_cli};
