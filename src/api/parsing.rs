use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use serde_json::Value;

use crate::core::events::WebhookEvent;
use crate::errors::HookError;

/// The webhook body of a Lambda event.
///
/// API Gateway delivers the body as a (possibly base64-encoded) JSON string;
/// a direct invocation passes the webhook object itself.
pub fn extract_body(payload: &Value) -> Result<Value, HookError> {
    let Some(body) = payload.get("body") else {
        if payload.get("event").is_some() {
            return Ok(payload.clone());
        }
        return Err(HookError::InvalidEvent("Missing body".to_string()));
    };

    match body {
        Value::String(raw) => {
            let is_base64 = payload
                .get("isBase64Encoded")
                .and_then(Value::as_bool)
                .unwrap_or(false);
            let text = if is_base64 {
                let bytes = STANDARD
                    .decode(raw)
                    .map_err(|e| HookError::InvalidEvent(format!("Invalid base64 body: {e}")))?;
                String::from_utf8(bytes)
                    .map_err(|e| HookError::InvalidEvent(format!("Body is not UTF-8: {e}")))?
            } else {
                raw.clone()
            };
            serde_json::from_str(&text)
                .map_err(|e| HookError::InvalidEvent(format!("Body is not JSON: {e}")))
        }
        Value::Object(_) => Ok(body.clone()),
        _ => Err(HookError::InvalidEvent("Invalid body format".to_string())),
    }
}

/// Validate the webhook carried by a Lambda event.
pub fn parse_webhook_event(payload: &Value) -> Result<WebhookEvent, HookError> {
    WebhookEvent::from_body(&extract_body(payload)?)
}
