//! The send_webhook tool
//!
//! Builds a notification payload from the call arguments and posts it to the
//! resolved destination. All outcomes come back as formatted text; nothing
//! propagates past the MCP boundary as a fault.

use std::collections::HashMap;

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::{Map, Value, json};

use super::base::Tool;
use crate::delivery::WebhookSender;
use crate::mcp::registry::{ToolContext, ToolResult};
use crate::payload::{DEFAULT_AUTHOR, DEFAULT_SOURCE, NotificationBuilder};
use crate::types::WebhookError;

/// Returned when neither the `url` parameter nor `WEBHOOK_URL` is set
pub const MISSING_URL_MESSAGE: &str = "❌ No se proporcionó URL del webhook. Opciones: (1) parámetro 'url', (2) variable de entorno WEBHOOK_URL.";

/// Input parameters for send_webhook
#[derive(Debug, Deserialize)]
struct SendWebhookInput {
    /// Título o nombre de la tarea/evento
    titulo: String,
    /// Descripción o resumen del contenido/tarea realizada
    texto: String,
    /// URL del webhook destino (fallback: WEBHOOK_URL)
    #[serde(default)]
    url: Option<String>,
    #[serde(default)]
    autor: Option<String>,
    #[serde(default)]
    fuente: Option<String>,
    /// Campos adicionales, pueden sombrear los campos fijos
    #[serde(default)]
    campos_extra: Option<Map<String, Value>>,
    /// Headers HTTP adicionales
    #[serde(default)]
    headers: Option<HashMap<String, String>>,
}

/// Tool that posts a notification payload to a webhook destination
#[derive(Debug, Default)]
pub struct SendWebhookTool {
    sender: WebhookSender,
}

impl SendWebhookTool {
    /// Create a new send_webhook tool
    pub fn new() -> Self {
        Self {
            sender: WebhookSender::new(),
        }
    }
}

#[async_trait]
impl Tool for SendWebhookTool {
    fn name(&self) -> &str {
        "send_webhook"
    }

    fn description(&self) -> &str {
        "Envía datos a un webhook via HTTP POST. Incluye campos predeterminados como \
         título, texto, fecha, hora, autor y fuente. También acepta campos personalizados \
         adicionales. Usa esta herramienta al finalizar una tarea para notificar resultados."
    }

    fn input_schema(&self) -> Value {
        json!({
            "type": "object",
            "required": ["titulo", "texto"],
            "properties": {
                "titulo": {
                    "type": "string",
                    "description": "Título o nombre de la tarea/evento"
                },
                "texto": {
                    "type": "string",
                    "description": "Descripción o resumen del contenido/tarea realizada"
                },
                "url": {
                    "type": "string",
                    "format": "uri",
                    "description": "URL del webhook destino. Si no se proporciona, usa la variable de entorno WEBHOOK_URL."
                },
                "autor": {
                    "type": "string",
                    "description": "Autor o responsable de la acción (default: Claude Code)"
                },
                "fuente": {
                    "type": "string",
                    "description": "Fuente u origen de la notificación (default: MCP Webhook Server)"
                },
                "campos_extra": {
                    "type": "object",
                    "description": "Campos adicionales personalizados como objeto clave-valor. Ej: { 'proyecto': 'bitfinApp', 'rama': 'main' }"
                },
                "headers": {
                    "type": "object",
                    "additionalProperties": {"type": "string"},
                    "description": "Headers HTTP adicionales para la petición (opcional)"
                }
            }
        })
    }

    async fn execute(&self, input: Value, context: &ToolContext) -> ToolResult {
        let params: SendWebhookInput = match serde_json::from_value(input) {
            Ok(p) => p,
            Err(e) => return ToolResult::error(format!("Invalid input: {}", e)),
        };

        // Resolution order: explicit parameter, then configured default.
        // Without either, report how to configure one and skip the network.
        let webhook_url = params
            .url
            .filter(|u| !u.is_empty())
            .or_else(|| context.config().webhook_url.clone());
        let Some(webhook_url) = webhook_url else {
            return ToolResult::success(MISSING_URL_MESSAGE);
        };

        let autor = params.autor.unwrap_or_else(|| DEFAULT_AUTHOR.to_string());
        let fuente = params.fuente.unwrap_or_else(|| DEFAULT_SOURCE.to_string());

        let mut builder = NotificationBuilder::new(params.titulo.clone(), params.texto)
            .author(autor.clone())
            .source(fuente.clone())
            .webhook_url(webhook_url.clone());
        if let Some(extra) = params.campos_extra {
            builder = builder.extra_fields(extra);
        }
        let notification = builder.build();

        tracing::debug!(
            url = %webhook_url,
            titulo = %params.titulo,
            session_id = %context.session_id,
            "Sending webhook notification"
        );

        match self
            .sender
            .deliver(&webhook_url, &notification.fields, params.headers.as_ref())
            .await
        {
            Ok(outcome) if outcome.success => {
                let datos = serde_json::to_string_pretty(&notification.fields)
                    .unwrap_or_else(|_| "{}".to_string());
                ToolResult::success(format!(
                    "✅ Webhook enviado exitosamente\n\n\
                     📡 URL: {url}\n\
                     📊 Status: {status}\n\
                     📅 Fecha: {fecha}\n\
                     🕐 Hora: {hora}\n\
                     📝 Título: {titulo}\n\
                     👤 Autor: {autor}\n\
                     📌 Fuente: {fuente}\n\n\
                     📨 Datos enviados:\n{datos}\n\n\
                     📥 Respuesta del servidor:\n{respuesta}",
                    url = webhook_url,
                    status = outcome.status,
                    fecha = notification.fecha,
                    hora = notification.hora,
                    titulo = params.titulo,
                    autor = autor,
                    fuente = fuente,
                    datos = datos,
                    respuesta = outcome.body,
                ))
                .with_metadata(json!({"status": outcome.status, "url": webhook_url}))
            }
            Ok(outcome) => ToolResult::success(format!(
                "❌ Error al enviar webhook\n\n\
                 📡 URL: {url}\n\
                 📊 Status: {status}\n\n\
                 📥 Respuesta del servidor:\n{respuesta}",
                url = webhook_url,
                status = outcome.status,
                respuesta = outcome.body,
            )),
            Err(e) => {
                tracing::error!(url = %webhook_url, error = %e, "Webhook connection error");
                let detail = match &e {
                    WebhookError::Connection(msg) => msg.clone(),
                    other => other.to_string(),
                };
                ToolResult::success(format!(
                    "❌ Error de conexión al webhook\n\n📡 URL: {url}\n🔥 Error: {detail}",
                    url = webhook_url,
                    detail = detail,
                ))
            }
        }
    }
}
