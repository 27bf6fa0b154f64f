//! stdio transport
//!
//! Line-delimited JSON-RPC over stdin/stdout. stdout carries protocol
//! messages only; all logging goes to stderr or the diagnostic file.

use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};

use crate::server::protocol::McpHandler;
use crate::types::Result;

/// Session id reported to tools for stdio invocations
const STDIO_SESSION_ID: &str = "stdio";

/// Serve MCP over stdin/stdout until stdin closes
pub async fn serve(handler: McpHandler) -> Result<()> {
    let stdin = tokio::io::stdin();
    let mut stdout = tokio::io::stdout();
    let mut lines = BufReader::new(stdin).lines();

    tracing::info!("Waiting for MCP messages on stdin");

    while let Some(line) = lines.next_line().await? {
        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }

        let Some(response) = handler.handle_message(trimmed, STDIO_SESSION_ID).await else {
            continue;
        };

        let serialized = serde_json::to_string(&response)?;
        stdout.write_all(serialized.as_bytes()).await?;
        stdout.write_all(b"\n").await?;
        stdout.flush().await?;
    }

    tracing::info!("stdin closed, stdio transport shutting down");
    Ok(())
}
