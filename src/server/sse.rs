//! sse transport
//!
//! MCP over Server-Sent Events for remote deployments. A client opens
//! `GET /sse` and receives an `endpoint` event naming the message URL for
//! its session; it then POSTs JSON-RPC requests there and reads responses
//! as `message` events on the stream. `GET /health` reports server status.

use std::convert::Infallible;
use std::sync::Arc;

use axum::Router;
use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::response::sse::{Event, KeepAlive, Sse};
use axum::routing::{get, post};
use dashmap::DashMap;
use futures::Stream;
use serde::Deserialize;
use serde_json::json;
use tokio::sync::mpsc;
use uuid::Uuid;

use crate::server::protocol::McpHandler;
use crate::types::{Result, WebhookError};

type SessionMap = Arc<DashMap<String, mpsc::UnboundedSender<Event>>>;

#[derive(Clone)]
struct SseState {
    handler: Arc<McpHandler>,
    sessions: SessionMap,
}

/// Serve MCP over sse on `host:port`
pub async fn serve(handler: McpHandler, host: &str, port: u16) -> Result<()> {
    let state = SseState {
        handler: Arc::new(handler),
        sessions: Arc::new(DashMap::new()),
    };

    let app = router(state);

    let addr = format!("{host}:{port}");
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|e| WebhookError::transport(format!("failed to bind {addr}: {e}")))?;

    tracing::info!(addr = %addr, "Serving MCP over sse");

    axum::serve(listener, app)
        .await
        .map_err(|e| WebhookError::transport(e.to_string()))?;

    Ok(())
}

fn router(state: SseState) -> Router {
    Router::new()
        .route("/sse", get(open_session))
        .route("/messages", post(post_message))
        .route("/health", get(health))
        .with_state(state)
}

/// Removes the session entry when the client drops the event stream
struct SessionGuard {
    sessions: SessionMap,
    session_id: String,
}

impl Drop for SessionGuard {
    fn drop(&mut self) {
        self.sessions.remove(&self.session_id);
        tracing::info!(session_id = %self.session_id, "sse session closed");
    }
}

async fn open_session(
    State(state): State<SseState>,
) -> Sse<impl Stream<Item = std::result::Result<Event, Infallible>>> {
    let session_id = Uuid::new_v4().to_string();
    let (tx, rx) = mpsc::unbounded_channel();

    // First event tells the client where to POST its requests
    let endpoint = Event::default()
        .event("endpoint")
        .data(format!("/messages?session_id={session_id}"));
    let _ = tx.send(endpoint);

    state.sessions.insert(session_id.clone(), tx);
    tracing::info!(session_id = %session_id, "sse session opened");

    let guard = SessionGuard {
        sessions: state.sessions.clone(),
        session_id,
    };
    let stream = futures::stream::unfold((rx, guard), |(mut rx, guard)| async move {
        rx.recv()
            .await
            .map(|event| (Ok::<_, Infallible>(event), (rx, guard)))
    });

    Sse::new(stream).keep_alive(KeepAlive::default())
}

#[derive(Debug, Deserialize)]
struct MessageParams {
    session_id: String,
}

async fn post_message(
    State(state): State<SseState>,
    Query(params): Query<MessageParams>,
    body: String,
) -> impl IntoResponse {
    let Some(tx) = state
        .sessions
        .get(&params.session_id)
        .map(|entry| entry.value().clone())
    else {
        return (StatusCode::NOT_FOUND, "Unknown session".to_string());
    };

    if let Some(response) = state
        .handler
        .handle_message(&body, &params.session_id)
        .await
    {
        match serde_json::to_string(&response) {
            Ok(serialized) => {
                let _ = tx.send(Event::default().event("message").data(serialized));
            }
            Err(e) => tracing::error!(error = %e, "Failed to serialize JSON-RPC response"),
        }
    }

    (StatusCode::ACCEPTED, "Accepted".to_string())
}

async fn health(State(state): State<SseState>) -> impl IntoResponse {
    axum::Json(json!({
        "status": "ok",
        "server": state.handler.server().name(),
        "version": state.handler.server().version(),
        "active_sessions": state.sessions.len(),
        "timestamp": chrono::Local::now().to_rfc3339(),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    use serde_json::Value;

    use crate::mcp::SERVER_NAME;
    use crate::types::ServerConfig;

    async fn spawn_sse_server() -> String {
        let state = SseState {
            handler: Arc::new(McpHandler::new(Arc::new(ServerConfig::default()))),
            sessions: Arc::new(DashMap::new()),
        };
        let app = router(state);

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        format!("http://{addr}")
    }

    /// Read from the response stream until `needle` shows up
    async fn read_until(response: &mut reqwest::Response, needle: &str) -> String {
        let mut collected = String::new();
        let deadline = Duration::from_secs(5);
        tokio::time::timeout(deadline, async {
            loop {
                let chunk = response.chunk().await.unwrap().expect("stream ended");
                collected.push_str(&String::from_utf8_lossy(&chunk));
                if collected.contains(needle) {
                    break;
                }
            }
        })
        .await
        .expect("timed out waiting for sse event");
        collected
    }

    #[tokio::test]
    async fn test_health_endpoint() {
        let base = spawn_sse_server().await;

        let body: Value = reqwest::get(format!("{base}/health"))
            .await
            .unwrap()
            .json()
            .await
            .unwrap();

        assert_eq!(body["status"], json!("ok"));
        assert_eq!(body["server"], json!(SERVER_NAME));
        assert_eq!(body["active_sessions"], json!(0));
        assert!(body["timestamp"].is_string());
    }

    #[tokio::test]
    async fn test_post_to_unknown_session() {
        let base = spawn_sse_server().await;

        let response = reqwest::Client::new()
            .post(format!("{base}/messages?session_id=nope"))
            .body(r#"{"jsonrpc":"2.0","id":1,"method":"ping"}"#)
            .send()
            .await
            .unwrap();

        assert_eq!(response.status().as_u16(), 404);
    }

    #[tokio::test]
    async fn test_session_flow() {
        let base = spawn_sse_server().await;

        // Open the event stream and learn the message endpoint. The first
        // event is complete once the blank line separator arrives.
        let mut stream = reqwest::get(format!("{base}/sse")).await.unwrap();
        let opening = read_until(&mut stream, "\n\n").await;

        let session_id = opening
            .split("session_id=")
            .nth(1)
            .unwrap()
            .split_whitespace()
            .next()
            .unwrap()
            .to_string();
        assert!(!session_id.is_empty());

        // Initialize over the message endpoint; the response arrives as an sse event
        let post = reqwest::Client::new()
            .post(format!("{base}/messages?session_id={session_id}"))
            .body(r#"{"jsonrpc":"2.0","id":1,"method":"initialize","params":{}}"#)
            .send()
            .await
            .unwrap();
        assert_eq!(post.status().as_u16(), 202);

        let initialized = read_until(&mut stream, "serverInfo").await;
        assert!(initialized.contains(SERVER_NAME));

        // tools/list also round-trips through the stream
        let post = reqwest::Client::new()
            .post(format!("{base}/messages?session_id={session_id}"))
            .body(r#"{"jsonrpc":"2.0","id":2,"method":"tools/list"}"#)
            .send()
            .await
            .unwrap();
        assert_eq!(post.status().as_u16(), 202);

        let listed = read_until(&mut stream, "send_webhook").await;
        assert!(listed.contains("inputSchema"));
    }
}
