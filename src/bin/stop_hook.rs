//! Claude Code Stop hook binary
//!
//! Configure as a "Stop" hook to get a webhook notification whenever the
//! agent finishes a task. The event context arrives as JSON on stdin.
//!
//! Configuration: `WEBHOOK_URL` environment variable.
//!
//! This process always exits with code 0 — a failing hook must never block
//! the invoking host.

use mcp_webhook::hooks;
use mcp_webhook::types::HookConfig;

fn main() {
    let result = std::panic::catch_unwind(|| {
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()?;
        runtime.block_on(hooks::stop::run(&HookConfig::from_env()));
        Ok::<(), std::io::Error>(())
    });

    match result {
        Ok(Ok(())) => {}
        Ok(Err(e)) => eprintln!("Error en hook: {e}"),
        Err(_) => eprintln!("Error en hook: fallo inesperado"),
    }

    std::process::exit(0);
}
