//! MCP Webhook Sender
//!
//! A Rust implementation of an MCP (Model Context Protocol) server exposing
//! a single `send_webhook` tool, plus a Claude Code "Stop" hook binary that
//! performs the same delivery from lifecycle event metadata.
//!
//! ## Features
//!
//! - MCP protocol over stdio (default) or sse
//! - One tool: `send_webhook` — build a notification payload, POST it once,
//!   report the outcome as text
//! - Standalone Stop hook that never blocks its invoking host
//! - No retries, no queuing, no persistence: a thin request/response utility
//!
//! ## Quick Start
//!
//! ```no_run
//! use mcp_webhook::{NotificationBuilder, WebhookSender};
//!
//! #[tokio::main]
//! async fn main() -> mcp_webhook::Result<()> {
//!     let notification = NotificationBuilder::new("Build finished", "All tests passed").build();
//!     let outcome = WebhookSender::new()
//!         .deliver("https://example.test/hook", &notification.fields, None)
//!         .await?;
//!     println!("delivered with status {}", outcome.status);
//!     Ok(())
//! }
//! ```
//!
//! ## Environment Variables
//!
//! - `WEBHOOK_URL`: default destination for both the tool and the hook
//! - `MCP_TRANSPORT`: `stdio` (default) or `sse`
//! - `PORT` / `MCP_SERVER_PORT`: listening port in sse mode (default: 8000)
//! - `HOST`: bind address in sse mode (default: `0.0.0.0`)
//!
//! Configuration is read once at startup into [`ServerConfig`] /
//! [`HookConfig`] and passed explicitly to the entry points; the payload and
//! delivery layers never touch the environment or any transport.

pub mod cli;
pub mod delivery;
pub mod hooks;
pub mod mcp;
pub mod payload;
pub mod server;
pub mod types;

pub use cli::Cli;
pub use delivery::{DeliveryOutcome, WebhookSender};
pub use mcp::{McpServer, Tool, ToolContext, ToolRegistry, ToolResult};
pub use payload::{Notification, NotificationBuilder};
pub use server::{McpHandler, run_server, run_server_with_cli};
pub use types::{HookConfig, Result, ServerConfig, TransportMode, WebhookError};
