//! Public types for the MCP webhook sender
//!
//! This module contains the shared configuration and error types used
//! across the crate.

mod config;
mod error;

pub use config::{DEFAULT_HOST, DEFAULT_PORT, HookConfig, ServerConfig, TransportMode};
pub use error::{ErrorCode, Result, WebhookError};
