use lambda_runtime::{Error, LambdaEvent};
use reqwest::Client as HttpClient;
use serde_json::{Value, json};
use tracing::{error, info};

use super::{helpers, parsing};
use crate::clients::{ModeClient, build_http_client};
use crate::core::config::AppConfig;
use crate::destination;
use crate::enrich::Enricher;
use crate::errors::HookError;

pub use self::function_handler as handler;

/// Lambda handler: enrich the webhook and forward it to `DESTINATION_URL`.
#[tracing::instrument(level = "info", skip(event))]
pub async fn function_handler(event: LambdaEvent<Value>) -> Result<Value, Error> {
    let config = AppConfig::from_env().map_err(|e| {
        error!("Config error: {}", e);
        Error::from(e)
    })?;
    info!("Destination Lambda received payload: {:?}", event.payload);

    let http_client = build_http_client(&config);
    helpers::respond(process(&config, &http_client, &event.payload).await)
}

/// Run one forwarding invocation and return the destination's status and response.
pub async fn process(
    config: &AppConfig,
    http_client: &HttpClient,
    payload: &Value,
) -> Result<Value, HookError> {
    let webhook = parsing::parse_webhook_event(payload)?;
    let destination_url = config.require_destination_url()?;

    let enricher = Enricher::new(ModeClient::new(config, http_client.clone()));
    let enriched = enricher.enrich(&webhook).await?;

    let outcome = destination::forward(
        http_client,
        destination_url,
        config.destination_encoding,
        webhook.event,
        &enriched,
    )
    .await?;

    Ok(json!({ "status": outcome.status, "response": outcome.body }))
}
