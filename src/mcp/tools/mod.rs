//! Tool definitions and implementations

mod base;
mod send_webhook;

pub use base::Tool;
pub use send_webhook::{MISSING_URL_MESSAGE, SendWebhookTool};
