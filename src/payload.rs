//! Notification payload construction
//!
//! Builds the flat JSON body posted to the webhook destination. Field names
//! are part of the wire contract with downstream receivers and must not be
//! renamed. The clock is sampled exactly once per build, so `fecha`, `hora`
//! and `timestamp` always describe the same instant.

use chrono::{DateTime, Local};
use serde_json::{Map, Value};

/// Default `autor` field for tool-initiated notifications
pub const DEFAULT_AUTHOR: &str = "Claude Code";

/// Default `fuente` field for tool-initiated notifications
pub const DEFAULT_SOURCE: &str = "MCP Webhook Server";

/// Fixed `titulo` used by the Stop hook
pub const HOOK_TITLE: &str = "Tarea Completada - Claude Code";

/// Fixed `texto` used by the Stop hook
pub const HOOK_TEXT: &str = "Claude Code ha finalizado una tarea automáticamente.";

/// Fixed `autor` used by the Stop hook
pub const HOOK_AUTHOR: &str = "Claude Code (Hook Automático)";

/// Fixed `fuente` used by the Stop hook
pub const HOOK_SOURCE: &str = "Claude Code - Hook Stop";

const DATE_FORMAT: &str = "%d/%m/%Y";
const TIME_FORMAT: &str = "%H:%M:%S";
const TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.6f";

/// A built notification: the full field map plus the formatted clock
/// representations it was stamped with
///
/// `fecha`/`hora`/`timestamp` are kept separately from `fields` so entry
/// points can render them even when a caller-supplied extra field shadows
/// the corresponding payload key.
#[derive(Debug, Clone)]
pub struct Notification {
    /// Local date, `DD/MM/YYYY`
    pub fecha: String,
    /// Local time, `HH:MM:SS`
    pub hora: String,
    /// Machine-readable date-time of the same clock sample
    pub timestamp: String,
    /// The complete payload to serialize as the POST body
    pub fields: Map<String, Value>,
}

/// Builder for [`Notification`]
///
/// Fixed fields are inserted first, then the hook event (if any) under
/// `evento`, then caller-supplied extras. Extras may shadow any fixed
/// field; last write wins.
#[derive(Debug, Clone)]
pub struct NotificationBuilder {
    titulo: String,
    texto: String,
    autor: Option<String>,
    fuente: Option<String>,
    webhook_url: Option<String>,
    event: Option<Value>,
    extra_fields: Option<Map<String, Value>>,
}

impl NotificationBuilder {
    /// Create a builder with the required title and body text
    pub fn new(titulo: impl Into<String>, texto: impl Into<String>) -> Self {
        Self {
            titulo: titulo.into(),
            texto: texto.into(),
            autor: None,
            fuente: None,
            webhook_url: None,
            event: None,
            extra_fields: None,
        }
    }

    /// Set the `autor` field (defaults to [`DEFAULT_AUTHOR`])
    pub fn author(mut self, autor: impl Into<String>) -> Self {
        self.autor = Some(autor.into());
        self
    }

    /// Set the `fuente` field (defaults to [`DEFAULT_SOURCE`])
    pub fn source(mut self, fuente: impl Into<String>) -> Self {
        self.fuente = Some(fuente.into());
        self
    }

    /// Include the destination under the `webhook_url` field (tool path)
    pub fn webhook_url(mut self, url: impl Into<String>) -> Self {
        self.webhook_url = Some(url.into());
        self
    }

    /// Attach event context under the `evento` field (hook path)
    pub fn event(mut self, event: Value) -> Self {
        self.event = Some(event);
        self
    }

    /// Merge caller-supplied extra fields after the fixed ones
    pub fn extra_fields(mut self, extra: Map<String, Value>) -> Self {
        self.extra_fields = Some(extra);
        self
    }

    /// Build the notification, stamping it with the current local time
    pub fn build(self) -> Notification {
        self.build_at(Local::now())
    }

    /// Build the notification for a given instant
    pub(crate) fn build_at(self, now: DateTime<Local>) -> Notification {
        let fecha = now.format(DATE_FORMAT).to_string();
        let hora = now.format(TIME_FORMAT).to_string();
        let timestamp = now.format(TIMESTAMP_FORMAT).to_string();

        let mut fields = Map::new();
        if let Some(url) = self.webhook_url {
            fields.insert("webhook_url".to_string(), Value::String(url));
        }
        fields.insert("titulo".to_string(), Value::String(self.titulo));
        fields.insert("texto".to_string(), Value::String(self.texto));
        fields.insert("fecha".to_string(), Value::String(fecha.clone()));
        fields.insert("hora".to_string(), Value::String(hora.clone()));
        fields.insert(
            "autor".to_string(),
            Value::String(self.autor.unwrap_or_else(|| DEFAULT_AUTHOR.to_string())),
        );
        fields.insert(
            "fuente".to_string(),
            Value::String(self.fuente.unwrap_or_else(|| DEFAULT_SOURCE.to_string())),
        );
        fields.insert("timestamp".to_string(), Value::String(timestamp.clone()));

        if let Some(event) = self.event {
            fields.insert("evento".to_string(), event);
        }

        // Last write wins: extras may shadow fixed fields, including timestamp
        if let Some(extra) = self.extra_fields {
            for (key, value) in extra {
                fields.insert(key, value);
            }
        }

        Notification {
            fecha,
            hora,
            timestamp,
            fields,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn fixed_instant() -> DateTime<Local> {
        Local.with_ymd_and_hms(2024, 3, 7, 15, 4, 5).unwrap()
    }

    #[test]
    fn test_fixed_fields_and_order() {
        let notification = NotificationBuilder::new("Build finished", "All tests passed")
            .webhook_url("https://example.test/hook")
            .build_at(fixed_instant());

        let keys: Vec<&str> = notification.fields.keys().map(String::as_str).collect();
        assert_eq!(
            keys,
            vec![
                "webhook_url",
                "titulo",
                "texto",
                "fecha",
                "hora",
                "autor",
                "fuente",
                "timestamp",
            ]
        );
        assert_eq!(notification.fields["titulo"], json!("Build finished"));
        assert_eq!(notification.fields["texto"], json!("All tests passed"));
        assert_eq!(notification.fields["autor"], json!(DEFAULT_AUTHOR));
        assert_eq!(notification.fields["fuente"], json!(DEFAULT_SOURCE));
    }

    #[test]
    fn test_no_webhook_url_field_unless_set() {
        let notification =
            NotificationBuilder::new("t", "x").build_at(fixed_instant());
        assert!(!notification.fields.contains_key("webhook_url"));
    }

    #[test]
    fn test_date_time_formats() {
        let notification = NotificationBuilder::new("t", "x").build_at(fixed_instant());

        assert_eq!(notification.fecha, "07/03/2024");
        assert_eq!(notification.hora, "15:04:05");
        assert_eq!(notification.timestamp, "2024-03-07T15:04:05.000000");
        assert_eq!(notification.fields["fecha"], json!("07/03/2024"));
        assert_eq!(notification.fields["hora"], json!("15:04:05"));
        assert_eq!(notification.fields["timestamp"], json!("2024-03-07T15:04:05.000000"));
    }

    #[test]
    fn test_single_clock_sample() {
        // All three representations must come from the same instant
        let notification = NotificationBuilder::new("t", "x").build();

        let parsed =
            chrono::NaiveDateTime::parse_from_str(&notification.timestamp, "%Y-%m-%dT%H:%M:%S%.6f")
                .unwrap();
        assert_eq!(parsed.format("%d/%m/%Y").to_string(), notification.fecha);
        assert_eq!(parsed.format("%H:%M:%S").to_string(), notification.hora);
    }

    #[test]
    fn test_custom_author_and_source() {
        let notification = NotificationBuilder::new("t", "x")
            .author("CI Bot")
            .source("pipeline")
            .build_at(fixed_instant());

        assert_eq!(notification.fields["autor"], json!("CI Bot"));
        assert_eq!(notification.fields["fuente"], json!("pipeline"));
    }

    #[test]
    fn test_extra_fields_merge_and_shadow() {
        let mut extra = Map::new();
        extra.insert("proyecto".to_string(), json!("bitfinApp"));
        extra.insert("timestamp".to_string(), json!("overridden"));

        let notification = NotificationBuilder::new("t", "x")
            .extra_fields(extra)
            .build_at(fixed_instant());

        assert_eq!(notification.fields["proyecto"], json!("bitfinApp"));
        // Shadowing is permitted, last write wins
        assert_eq!(notification.fields["timestamp"], json!("overridden"));
        // The stamped representation survives for display purposes
        assert_eq!(notification.timestamp, "2024-03-07T15:04:05.000000");
    }

    #[test]
    fn test_event_field() {
        let notification = NotificationBuilder::new(HOOK_TITLE, HOOK_TEXT)
            .author(HOOK_AUTHOR)
            .source(HOOK_SOURCE)
            .event(json!({"session_id": "abc"}))
            .build_at(fixed_instant());

        assert_eq!(notification.fields["evento"], json!({"session_id": "abc"}));
        assert_eq!(notification.fields["autor"], json!(HOOK_AUTHOR));
        assert_eq!(notification.fields["fuente"], json!(HOOK_SOURCE));
        let keys: Vec<&str> = notification.fields.keys().map(String::as_str).collect();
        assert_eq!(keys.last(), Some(&"evento"));
    }
}
