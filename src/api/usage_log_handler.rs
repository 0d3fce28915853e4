use lambda_runtime::{Error, LambdaEvent};
use reqwest::Client as HttpClient;
use serde_json::{Value, json};
use tracing::{error, info};

use super::{helpers, parsing};
use crate::clients::{ModeClient, build_http_client};
use crate::core::config::AppConfig;
use crate::core::events::EventKind;
use crate::errors::HookError;
use crate::usage_log;

pub use self::function_handler as handler;

/// Lambda handler: append the query runs of a completed report run to the CSV log.
#[tracing::instrument(level = "info", skip(event))]
pub async fn function_handler(event: LambdaEvent<Value>) -> Result<Value, Error> {
    let config = AppConfig::from_env().map_err(|e| {
        error!("Config error: {}", e);
        Error::from(e)
    })?;
    info!("Usage log Lambda received payload: {:?}", event.payload);

    let http_client = build_http_client(&config);
    helpers::respond(process(&config, &http_client, &event.payload).await)
}

/// Run one logging invocation. Events other than `report_run_completed` are
/// acknowledged without side effects.
pub async fn process(
    config: &AppConfig,
    http_client: &HttpClient,
    payload: &Value,
) -> Result<Value, HookError> {
    let webhook = parsing::parse_webhook_event(payload)?;
    if webhook.event != EventKind::ReportRunCompleted {
        info!(event = %webhook.event, "Ignoring event for usage log");
        return Ok(json!({ "skipped": webhook.event }));
    }

    let client = ModeClient::new(config, http_client.clone());
    let rows_written =
        usage_log::log_report_run(&client, &webhook.resource_url, &config.usage_log_path).await?;

    Ok(json!({ "rows_written": rows_written }))
}
