//! Client modules for external API interactions

pub mod mode_client;

pub use mode_client::ModeClient;

use reqwest::Client;
use std::time::Duration;
use tracing::warn;

use crate::core::config::AppConfig;

/// Shared HTTP client for one invocation, honouring the configured timeout.
#[must_use]
pub fn build_http_client(config: &AppConfig) -> Client {
    Client::builder()
        .timeout(Duration::from_secs(config.http_timeout_secs))
        .build()
        .unwrap_or_else(|e| {
            warn!("Failed to build HTTP client, using defaults: {}", e);
            Client::new()
        })
}
