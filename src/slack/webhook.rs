use reqwest::Client as HttpClient;
use reqwest::header::{CONTENT_TYPE, HeaderMap, HeaderValue};
use tracing::{error, info};

use super::message_builder::SlackPayload;
use crate::errors::HookError;

/// POST a message to a Slack incoming webhook and return Slack's reply text.
///
/// # Errors
///
/// Returns [`HookError::DeliveryError`] if the request cannot be sent or Slack
/// answers with a non-success status.
pub async fn post_to_slack(
    http_client: &HttpClient,
    webhook_url: &str,
    payload: &SlackPayload,
) -> Result<String, HookError> {
    let mut headers = HeaderMap::new();
    headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
    let resp = http_client
        .post(webhook_url)
        .headers(headers)
        .json(payload)
        .send()
        .await
        .map_err(|e| HookError::delivery(webhook_url, e))?;

    let status = resp.status();
    let body_text = resp
        .text()
        .await
        .unwrap_or_else(|_| "<failed to read body>".to_string());

    if !status.is_success() {
        error!(
            "Slack webhook POST failed: status={} body={}",
            status, body_text
        );
        return Err(HookError::delivery(webhook_url, format!("status {status}")));
    }

    info!(status = %status, "Posted message to Slack");
    Ok(body_text)
}
