use std::env;
use std::path::PathBuf;
use std::str::FromStr;

use serde_json::Number;

use crate::errors::HookError;

pub const DEFAULT_BASE_URL: &str = "https://modeanalytics.com/";
pub const DEFAULT_USAGE_LOG_PATH: &str = "/tmp/report_query_runs.csv";
pub const DEFAULT_HTTP_TIMEOUT_SECS: u64 = 30;

/// How the forwarder encodes the enriched payload.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum DestinationEncoding {
    #[default]
    Json,
    Form,
}

impl FromStr for DestinationEncoding {
    type Err = HookError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "json" => Ok(Self::Json),
            "form" => Ok(Self::Form),
            other => Err(HookError::ConfigError(format!(
                "DESTINATION_ENCODING: expected `json` or `form`, got `{other}`"
            ))),
        }
    }
}

/// Raise a Slack warning when a row of the given report's results has
/// `field` above `threshold`.
#[derive(Debug, Clone, PartialEq)]
pub struct AlertRule {
    pub report_id: i64,
    pub field: String,
    /// Echoed verbatim in the alert's "Threshold Value" field.
    pub threshold: Number,
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub api_token: String,
    pub api_password: String,
    pub base_url: String,
    pub destination_url: Option<String>,
    pub destination_encoding: DestinationEncoding,
    pub slack_webhook_url: Option<String>,
    pub usage_log_path: PathBuf,
    pub alert: Option<AlertRule>,
    pub http_timeout_secs: u64,
}

impl AppConfig {
    pub fn from_env() -> Result<Self, HookError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build the config from an arbitrary key lookup. Empty values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, HookError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let require = |key: &str| {
            get(key).ok_or_else(|| HookError::ConfigError(format!("{key} is not set")))
        };

        let mut base_url = get("MODE_BASE_URL").unwrap_or_else(|| DEFAULT_BASE_URL.to_string());
        if !base_url.ends_with('/') {
            base_url.push('/');
        }

        let destination_encoding = get("DESTINATION_ENCODING")
            .map(|v| v.parse::<DestinationEncoding>())
            .transpose()?
            .unwrap_or_default();

        let http_timeout_secs = get("HTTP_TIMEOUT_SECS")
            .map(|v| parse_var::<u64>("HTTP_TIMEOUT_SECS", &v))
            .transpose()?
            .unwrap_or(DEFAULT_HTTP_TIMEOUT_SECS);

        let alert = match (
            get("ALERT_REPORT_ID"),
            get("ALERT_FIELD"),
            get("ALERT_THRESHOLD"),
        ) {
            (None, None, None) => None,
            (Some(report_id), Some(field), Some(threshold)) => Some(AlertRule {
                report_id: parse_var("ALERT_REPORT_ID", &report_id)?,
                field,
                threshold: parse_var::<Number>("ALERT_THRESHOLD", &threshold)?,
            }),
            _ => {
                return Err(HookError::ConfigError(
                    "ALERT_REPORT_ID, ALERT_FIELD and ALERT_THRESHOLD must be set together"
                        .to_string(),
                ));
            }
        };

        Ok(Self {
            api_token: require("MODE_API_TOKEN")?,
            api_password: require("MODE_API_PASSWORD")?,
            base_url,
            destination_url: get("DESTINATION_URL"),
            destination_encoding,
            slack_webhook_url: get("SLACK_WEBHOOK_URL"),
            usage_log_path: get("USAGE_LOG_PATH")
                .map_or_else(|| PathBuf::from(DEFAULT_USAGE_LOG_PATH), PathBuf::from),
            alert,
            http_timeout_secs,
        })
    }

    pub fn require_destination_url(&self) -> Result<&str, HookError> {
        self.destination_url
            .as_deref()
            .ok_or_else(|| HookError::ConfigError("DESTINATION_URL is not set".to_string()))
    }

    pub fn require_slack_webhook_url(&self) -> Result<&str, HookError> {
        self.slack_webhook_url
            .as_deref()
            .ok_or_else(|| HookError::ConfigError("SLACK_WEBHOOK_URL is not set".to_string()))
    }
}

fn parse_var<T>(key: &str, raw: &str) -> Result<T, HookError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    raw.trim()
        .parse()
        .map_err(|e| HookError::ConfigError(format!("{key}: {e}")))
}
