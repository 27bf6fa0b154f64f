//! Configuration from environment variables
//!
//! Environment lookup happens only here, at the composition boundary. The
//! resulting structs are passed explicitly to the transports and the tool.

use crate::cli::Cli;

/// Default listening port for the sse transport
pub const DEFAULT_PORT: u16 = 8000;

/// Default bind address for the sse transport
pub const DEFAULT_HOST: &str = "0.0.0.0";

/// Transport used to serve the MCP protocol
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TransportMode {
    /// JSON-RPC over stdin/stdout (local agent hosts)
    #[default]
    Stdio,
    /// Server-Sent Events over HTTP (remote deployments)
    Sse,
}

impl TransportMode {
    /// Parse a transport name. Anything other than `sse` selects stdio,
    /// which is the default for local agent hosts.
    pub fn parse(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "sse" => TransportMode::Sse,
            _ => TransportMode::Stdio,
        }
    }
}

impl std::fmt::Display for TransportMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TransportMode::Stdio => write!(f, "stdio"),
            TransportMode::Sse => write!(f, "sse"),
        }
    }
}

/// Server configuration, built once at startup
///
/// Reads the following environment variables:
/// - `WEBHOOK_URL`: default destination when the tool call omits `url`
/// - `MCP_TRANSPORT`: `stdio` (default) or `sse`
/// - `PORT` (preferred) or `MCP_SERVER_PORT`: listening port in sse mode
/// - `HOST`: bind address in sse mode
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Default webhook destination URL
    pub webhook_url: Option<String>,
    /// Transport used to serve MCP
    pub transport: TransportMode,
    /// Bind address for the sse transport
    pub host: String,
    /// Listening port for the sse transport
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            webhook_url: None,
            transport: TransportMode::default(),
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
        }
    }
}

impl ServerConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> Self {
        let webhook_url = std::env::var("WEBHOOK_URL").ok().filter(|u| !u.is_empty());

        let transport = std::env::var("MCP_TRANSPORT")
            .map(|v| TransportMode::parse(&v))
            .unwrap_or_default();

        // PORT takes priority over MCP_SERVER_PORT
        let port = std::env::var("PORT")
            .ok()
            .or_else(|| std::env::var("MCP_SERVER_PORT").ok())
            .and_then(|v| v.parse().ok())
            .unwrap_or(DEFAULT_PORT);

        let host = std::env::var("HOST")
            .ok()
            .filter(|h| !h.is_empty())
            .unwrap_or_else(|| DEFAULT_HOST.to_string());

        Self {
            webhook_url,
            transport,
            host,
            port,
        }
    }

    /// Resolve configuration from CLI arguments, falling back to the
    /// environment for anything the command line leaves unset
    pub fn from_cli(cli: &Cli) -> Self {
        let env = Self::from_env();

        Self {
            webhook_url: cli
                .webhook_url
                .clone()
                .filter(|u| !u.is_empty())
                .or(env.webhook_url),
            transport: cli
                .transport
                .as_deref()
                .map(TransportMode::parse)
                .unwrap_or(env.transport),
            host: cli.host.clone().unwrap_or(env.host),
            port: cli.port.unwrap_or(env.port),
        }
    }
}

/// Hook-side configuration: only the destination URL matters
#[derive(Debug, Clone, Default)]
pub struct HookConfig {
    /// Webhook destination URL from `WEBHOOK_URL`
    pub webhook_url: Option<String>,
}

impl HookConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> Self {
        Self {
            webhook_url: std::env::var("WEBHOOK_URL").ok().filter(|u| !u.is_empty()),
        }
    }
}
