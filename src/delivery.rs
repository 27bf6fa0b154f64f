//! HTTP delivery of notification payloads
//!
//! Performs exactly one POST per call. There is no retry, no queuing and no
//! timeout override beyond the HTTP client's defaults. Transport failures
//! surface as [`WebhookError::Connection`]; an HTTP response outside the
//! success range is a regular [`DeliveryOutcome`], not an error.

use std::collections::HashMap;

use reqwest::header::{CONTENT_TYPE, HeaderMap, HeaderName, HeaderValue, USER_AGENT};
use serde_json::{Map, Value};

use crate::types::{Result, WebhookError};

/// User agent for tool-initiated deliveries
pub const SERVER_USER_AGENT: &str = "MCP-Webhook-Server/1.0";

/// User agent for hook-initiated deliveries
pub const HOOK_USER_AGENT: &str = "MCP-Webhook-Hook/1.0";

/// Display text when the destination answers with an empty body
pub const EMPTY_RESPONSE_PLACEHOLDER: &str = "(sin contenido en respuesta)";

/// Maximum response length kept for display
pub const RESPONSE_DISPLAY_LIMIT: usize = 500;

/// Classified result of one delivery attempt
#[derive(Debug, Clone)]
pub struct DeliveryOutcome {
    /// HTTP status code returned by the destination
    pub status: u16,
    /// Response body in display form (truncated, placeholder when empty)
    pub body: String,
    /// Whether the status is in the 2xx range
    pub success: bool,
}

/// Posts notification payloads as JSON to a webhook destination
#[derive(Debug, Clone)]
pub struct WebhookSender {
    client: reqwest::Client,
    user_agent: &'static str,
}

impl WebhookSender {
    /// Create a sender with the server user agent
    pub fn new() -> Self {
        Self::with_user_agent(SERVER_USER_AGENT)
    }

    /// Create a sender with a specific user agent
    pub fn with_user_agent(user_agent: &'static str) -> Self {
        Self {
            client: reqwest::Client::new(),
            user_agent,
        }
    }

    /// POST the payload to `url` and classify the response
    ///
    /// `extra_headers` are merged on top of the defaults and may override
    /// them. Invalid header names or values are skipped with a warning.
    pub async fn deliver(
        &self,
        url: &str,
        payload: &Map<String, Value>,
        extra_headers: Option<&HashMap<String, String>>,
    ) -> Result<DeliveryOutcome> {
        let headers = self.build_headers(extra_headers);

        let response = self
            .client
            .post(url)
            .headers(headers)
            .json(payload)
            .send()
            .await
            .map_err(|e| WebhookError::Connection(e.to_string()))?;

        let status = response.status();
        let text = response.text().await.unwrap_or_default();

        Ok(DeliveryOutcome {
            status: status.as_u16(),
            body: display_body(&text),
            success: status.is_success(),
        })
    }

    fn build_headers(&self, extra: Option<&HashMap<String, String>>) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        headers.insert(USER_AGENT, HeaderValue::from_static(self.user_agent));

        if let Some(extra) = extra {
            for (name, value) in extra {
                match (
                    HeaderName::from_bytes(name.as_bytes()),
                    HeaderValue::from_str(value),
                ) {
                    (Ok(name), Ok(value)) => {
                        headers.insert(name, value);
                    }
                    _ => {
                        tracing::warn!(header = %name, "Skipping invalid request header");
                    }
                }
            }
        }

        headers
    }
}

impl Default for WebhookSender {
    fn default() -> Self {
        Self::new()
    }
}

/// Convert a raw response body to its display form: empty bodies become the
/// placeholder, longer bodies are cut to [`RESPONSE_DISPLAY_LIMIT`] chars
pub fn display_body(text: &str) -> String {
    if text.is_empty() {
        return EMPTY_RESPONSE_PLACEHOLDER.to_string();
    }
    text.chars().take(RESPONSE_DISPLAY_LIMIT).collect()
}
