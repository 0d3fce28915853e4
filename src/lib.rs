/// hookrich - enrich analytics platform webhooks and forward them elsewhere.
///
/// The crate backs three independent Lambda functions, each triggered once
/// per incoming webhook:
/// 1. A destination function that enriches the event and POSTs it to a configured URL
/// 2. A Slack function that enriches the event and posts a notification to Slack
/// 3. A usage-log function that appends a completed run's query runs to a CSV file
///
/// # Architecture
///
/// Every invocation is linear: the webhook body is validated into a
/// [`core::WebhookEvent`], the [`enrich::Enricher`] follows the event's resource
/// URL through the platform API into a [`core::EnrichedResult`], and a
/// formatter or forwarder turns that into exactly one outbound side effect.
///
/// # Example
///
/// ```no_run
/// use hookrich::clients::{ModeClient, build_http_client};
/// use hookrich::core::{WebhookEvent, config::AppConfig};
/// use hookrich::enrich::Enricher;
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     hookrich::setup_logging();
///
///     let config = AppConfig::from_env()?;
///     let http = build_http_client(&config);
///     let enricher = Enricher::new(ModeClient::new(&config, http));
///
///     let event = WebhookEvent::from_json(
///         r#"{"event": "report_run_completed",
///             "report_run_url": "https://modeanalytics.com/api/acme/reports/abc/runs/def"}"#,
///     )?;
///     let enriched = enricher.enrich(&event).await?;
///     println!("{}", serde_json::to_string_pretty(&enriched)?);
///     Ok(())
/// }
/// ```
// Module declarations
pub mod api;
pub mod clients;
pub mod core;
pub mod destination;
pub mod enrich;
pub mod errors;
pub mod slack;
pub mod usage_log;

pub use errors::HookError;

/// Configure structured logging with JSON format for AWS Lambda environments.
///
/// This function sets up tracing-subscriber with a JSON formatter suitable for
/// `CloudWatch` Logs integration, filtered by `RUST_LOG` (default `info`). It
/// should be called once at the start of each Lambda binary; later calls are
/// no-ops.
///
/// # Example
///
/// ```
/// hookrich::setup_logging();
/// ```
pub fn setup_logging() {
    use tracing_subscriber::EnvFilter;
    use tracing_subscriber::prelude::*;

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let fmt_layer = tracing_subscriber::fmt::layer().json().with_target(true);

    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(fmt_layer)
        .try_init();
}
