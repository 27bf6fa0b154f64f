//! Server runner
//!
//! Entry point for running the MCP webhook server: logging setup,
//! configuration resolution and transport dispatch.

use std::sync::Arc;

use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

use crate::cli::Cli;
use crate::server::protocol::McpHandler;
use crate::server::{sse, stdio};
use crate::types::{ServerConfig, TransportMode};

/// Build an EnvFilter based on CLI args and the RUST_LOG environment variable
///
/// Priority: RUST_LOG environment variable > CLI arguments (-v, -vv, -q)
fn build_env_filter(cli: &Cli) -> tracing_subscriber::EnvFilter {
    if let Ok(rust_log) = std::env::var("RUST_LOG") {
        if !rust_log.is_empty() {
            return tracing_subscriber::EnvFilter::new(rust_log);
        }
    }

    let level = cli.log_level();
    tracing_subscriber::EnvFilter::from_default_env().add_directive(level.into())
}

/// Initialize logging with file output (diagnostic mode)
fn init_logging_to_file(cli: &Cli) -> anyhow::Result<()> {
    let filter = build_env_filter(cli);

    let log_path = cli.log_path();

    if let Some(parent) = log_path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    let file = std::fs::File::create(&log_path)?;

    // Log file location goes to stderr; the user needs to know where to look
    eprintln!("Diagnostic mode: logging to {}", log_path.display());

    let fmt_layer = tracing_subscriber::fmt::layer()
        .with_writer(std::sync::Mutex::new(file))
        .with_ansi(false);

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt_layer)
        .init();

    Ok(())
}

/// Initialize logging with stderr output (normal mode)
///
/// stdout is never used for logs: on the stdio transport it carries the
/// protocol messages.
fn init_logging_to_stderr(cli: &Cli) {
    let filter = build_env_filter(cli);

    let fmt_layer = tracing_subscriber::fmt::layer()
        .with_writer(std::io::stderr)
        .with_ansi(false);

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt_layer)
        .init();
}

/// Initialize logging based on CLI arguments
fn init_logging(cli: &Cli) -> anyhow::Result<()> {
    if cli.is_diagnostic() {
        init_logging_to_file(cli)
    } else {
        init_logging_to_stderr(cli);
        Ok(())
    }
}

/// Run the MCP webhook server with CLI arguments
///
/// This is the main entry point when using CLI argument parsing. It
/// initializes logging, resolves the configuration and serves the
/// selected transport until the client disconnects.
pub async fn run_server_with_cli(cli: &Cli) -> anyhow::Result<()> {
    init_logging(cli)?;

    let config = Arc::new(ServerConfig::from_cli(cli));
    let is_tty = atty::is(atty::Stream::Stdin);

    tracing::info!(
        "================================================================"
    );
    tracing::info!("  MCP Webhook Server - Starting");
    tracing::info!(
        "----------------------------------------------------------------"
    );
    tracing::info!("  Version:     {}", env!("CARGO_PKG_VERSION"));
    tracing::info!("  PID:         {}", std::process::id());
    tracing::info!("  Transport:   {}", config.transport);
    tracing::info!(
        "  Destination: {}",
        if config.webhook_url.is_some() {
            "configured"
        } else {
            "unset (per-call 'url' parameter required)"
        }
    );
    tracing::info!(
        "  TTY Mode:    {}",
        if is_tty { "interactive" } else { "subprocess" }
    );
    tracing::info!(
        "================================================================"
    );

    let handler = McpHandler::new(config.clone());

    match config.transport {
        TransportMode::Stdio => {
            if is_tty {
                eprintln!("MCP Webhook Server is running in interactive mode.");
                eprintln!("This server communicates via MCP protocol over stdin/stdout.");
                eprintln!("To use it, configure your agent host to run this binary.");
                eprintln!("(Press Ctrl+C to exit)");
            }
            stdio::serve(handler).await?;
        }
        TransportMode::Sse => {
            sse::serve(handler, &config.host, config.port).await?;
        }
    }

    Ok(())
}

/// Run the MCP webhook server with default settings
///
/// Initializes tracing at INFO level to stderr and reads all configuration
/// from the environment. For CLI usage with argument parsing, use
/// [`run_server_with_cli`] instead.
pub async fn run_server() -> anyhow::Result<()> {
    run_server_with_cli(&Cli::default()).await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_env_filter_respects_cli_level() {
        // RUST_LOG may leak in from the caller's environment; only assert
        // the CLI-derived path when it is unset.
        if std::env::var("RUST_LOG").is_ok() {
            return;
        }

        let cli = Cli {
            verbose: 1,
            ..Default::default()
        };
        let filter = build_env_filter(&cli);
        assert!(filter.to_string().contains("debug"));

        let cli = Cli {
            quiet: true,
            ..Default::default()
        };
        let filter = build_env_filter(&cli);
        assert!(filter.to_string().contains("error"));
    }
}
