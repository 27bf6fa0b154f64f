//! Stop hook implementation
//!
//! Posts the fixed task-completion notification when the agent host fires
//! its Stop lifecycle event. The event context arrives as JSON on stdin.
//! Everything here is infallible by contract: a hook must never block or
//! fail its invoking host, so every outcome ends as a line on stderr.

use serde_json::{Value, json};
use tokio::io::AsyncReadExt;

use crate::delivery::{HOOK_USER_AGENT, WebhookSender};
use crate::payload::{HOOK_AUTHOR, HOOK_SOURCE, HOOK_TEXT, HOOK_TITLE, NotificationBuilder};
use crate::types::{HookConfig, WebhookError};

/// Run the Stop hook once
///
/// Without a configured destination this is a silent skip (warning on
/// stderr, no network call). Delivery status is reported as a single
/// stderr line; stdout is never written.
pub async fn run(config: &HookConfig) {
    let Some(webhook_url) = config.webhook_url.as_deref() else {
        eprintln!("⚠️  WEBHOOK_URL no está configurada. Saltando notificación.");
        return;
    };

    let event = read_event().await;

    let notification = NotificationBuilder::new(HOOK_TITLE, HOOK_TEXT)
        .author(HOOK_AUTHOR)
        .source(HOOK_SOURCE)
        .event(event)
        .build();

    let sender = WebhookSender::with_user_agent(HOOK_USER_AGENT);
    match sender.deliver(webhook_url, &notification.fields, None).await {
        Ok(outcome) if outcome.success => {
            eprintln!("✅ Hook: Notificación enviada ({})", outcome.status);
        }
        Ok(outcome) => {
            eprintln!("❌ Hook: Error al enviar ({})", outcome.status);
        }
        Err(WebhookError::Connection(msg)) => {
            eprintln!("❌ Hook: Error de conexión - {msg}");
        }
        Err(e) => {
            eprintln!("❌ Hook: Error de conexión - {e}");
        }
    }
}

/// Read the event context from stdin
///
/// An interactive terminal or an unreadable stream both count as an empty
/// event object.
async fn read_event() -> Value {
    if atty::is(atty::Stream::Stdin) {
        return json!({});
    }

    let mut raw = String::new();
    if tokio::io::stdin().read_to_string(&mut raw).await.is_err() {
        return json!({});
    }

    parse_event(&raw)
}

/// Parse the stdin text as JSON, wrapping anything unparsable under `raw`
pub(crate) fn parse_event(raw: &str) -> Value {
    match serde_json::from_str(raw) {
        Ok(value) => value,
        Err(_) => json!({ "raw": raw }),
    }
}
