//! Error types for the MCP webhook sender

use thiserror::Error;

/// JSON-RPC error codes used by the MCP protocol layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCode {
    /// Parse error: Invalid JSON
    ParseError = -32700,
    /// Invalid request: Not a valid request object
    InvalidRequest = -32600,
    /// Method not found
    MethodNotFound = -32601,
    /// Invalid params
    InvalidParams = -32602,
    /// Internal error
    InternalError = -32603,
}

impl ErrorCode {
    /// Get the error code value
    pub fn code(self) -> i32 {
        self as i32
    }
}

/// Main error type for the webhook sender
#[derive(Debug, Error)]
pub enum WebhookError {
    /// Transport-level failure while delivering the webhook (DNS, TCP, TLS, timeout)
    #[error("Connection error: {0}")]
    Connection(String),

    /// Failure binding or serving an MCP transport
    #[error("Transport error: {0}")]
    Transport(String),

    /// JSON error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),
}

/// Result type for the webhook sender
pub type Result<T> = std::result::Result<T, WebhookError>;

impl WebhookError {
    /// Get the JSON-RPC error code for this error
    pub fn error_code(&self) -> ErrorCode {
        match self {
            WebhookError::Json(_) => ErrorCode::ParseError,
            WebhookError::Connection(_)
            | WebhookError::Transport(_)
            | WebhookError::Io(_)
            | WebhookError::Internal(_) => ErrorCode::InternalError,
        }
    }

    // === Constructor helpers ===

    /// Create a connection error
    pub fn connection(msg: impl Into<String>) -> Self {
        WebhookError::Connection(msg.into())
    }

    /// Create a transport error
    pub fn transport(msg: impl Into<String>) -> Self {
        WebhookError::Transport(msg.into())
    }

    /// Create an internal error
    pub fn internal(msg: impl Into<String>) -> Self {
        WebhookError::Internal(msg.into())
    }
}
