use lambda_runtime::{Error, LambdaEvent};
use reqwest::Client as HttpClient;
use serde_json::Value;
use tracing::{error, info};

use super::{helpers, parsing};
use crate::clients::{ModeClient, build_http_client};
use crate::core::config::AppConfig;
use crate::enrich::Enricher;
use crate::errors::HookError;
use crate::slack::{MessageBuilder, post_to_slack};

pub use self::function_handler as handler;

/// Lambda handler: enrich the webhook and post a notification to Slack.
#[tracing::instrument(level = "info", skip(event))]
pub async fn function_handler(event: LambdaEvent<Value>) -> Result<Value, Error> {
    let config = AppConfig::from_env().map_err(|e| {
        error!("Config error: {}", e);
        Error::from(e)
    })?;
    info!("Slack Lambda received payload: {:?}", event.payload);

    let http_client = build_http_client(&config);
    helpers::respond(process(&config, &http_client, &event.payload).await)
}

/// Run one Slack invocation and return Slack's reply.
pub async fn process(
    config: &AppConfig,
    http_client: &HttpClient,
    payload: &Value,
) -> Result<Value, HookError> {
    let webhook = parsing::parse_webhook_event(payload)?;
    if !MessageBuilder::supports(webhook.event) {
        return Err(HookError::InvalidEvent(format!(
            "Unsupported event type: {}",
            webhook.event
        )));
    }
    let webhook_url = config.require_slack_webhook_url()?;

    let enricher = Enricher::new(ModeClient::new(config, http_client.clone()));
    let enriched = enricher.enrich(&webhook).await?;

    let message = MessageBuilder::new(enricher.client().base_url(), config.alert.as_ref())
        .build(webhook.event, &enriched)?;
    let reply = post_to_slack(http_client, webhook_url, &message).await?;

    Ok(Value::String(reply))
}
