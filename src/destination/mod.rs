//! Relay an enriched result to a user-configured URL.

use reqwest::Client as HttpClient;
use serde::Serialize;
use serde_json::{Map, Value};
use tracing::{error, info};

use crate::core::config::DestinationEncoding;
use crate::core::events::EventKind;
use crate::core::models::EnrichedResult;
use crate::errors::HookError;

/// What the destination answered.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ForwardOutcome {
    pub status: u16,
    /// The response body, parsed as JSON when possible.
    pub body: Value,
}

/// Form fields for a payload: one field per top-level key, nested values as
/// JSON text.
#[must_use]
pub fn form_fields(payload: &Map<String, Value>) -> Vec<(String, String)> {
    payload
        .iter()
        .map(|(key, value)| {
            let text = match value {
                Value::String(s) => s.clone(),
                other => other.to_string(),
            };
            (key.clone(), text)
        })
        .collect()
}

/// POST the enriched result, tagged with `event_name`, to `destination_url`.
///
/// # Errors
///
/// Returns [`HookError::DeliveryError`] on transport failure or a non-success
/// status.
#[tracing::instrument(level = "info", skip(http_client, result))]
pub async fn forward(
    http_client: &HttpClient,
    destination_url: &str,
    encoding: DestinationEncoding,
    event: EventKind,
    result: &EnrichedResult,
) -> Result<ForwardOutcome, HookError> {
    let payload = result
        .to_payload(event)
        .map_err(|e| HookError::DeliveryError(format!("failed to serialize payload: {e}")))?;

    let request = http_client.post(destination_url);
    let request = match encoding {
        DestinationEncoding::Json => request.json(&payload),
        DestinationEncoding::Form => request.form(&form_fields(&payload)),
    };

    let resp = request
        .send()
        .await
        .map_err(|e| HookError::delivery(destination_url, e))?;

    let status = resp.status();
    let body_text = resp
        .text()
        .await
        .unwrap_or_else(|_| "<failed to read body>".to_string());

    if !status.is_success() {
        error!(
            "Destination POST failed: status={} body={}",
            status, body_text
        );
        return Err(HookError::delivery(
            destination_url,
            format!("status {status}"),
        ));
    }

    info!(status = %status, "Forwarded enriched payload");
    let body = serde_json::from_str(&body_text).unwrap_or(Value::String(body_text));
    Ok(ForwardOutcome {
        status: status.as_u16(),
        body,
    })
}
