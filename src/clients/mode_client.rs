//! Analytics platform REST API client
//!
//! Every enrichment fetch goes through [`ModeClient::get_json`]: one
//! authenticated GET, no retry.

use reqwest::Client;
use reqwest::header::ACCEPT;
use serde::de::DeserializeOwned;
use tracing::{debug, error};

use crate::core::config::AppConfig;
use crate::errors::HookError;

const HAL_JSON: &str = "application/hal+json";

/// Read-only client for the platform API, authenticated with an API token
/// and password over HTTP basic auth.
#[derive(Debug, Clone)]
pub struct ModeClient {
    http: Client,
    base_url: String,
    api_token: String,
    api_password: String,
}

impl ModeClient {
    #[must_use]
    pub fn new(config: &AppConfig, http: Client) -> Self {
        Self {
            http,
            base_url: config.base_url.clone(),
            api_token: config.api_token.clone(),
            api_password: config.api_password.clone(),
        }
    }

    /// Platform base URL, always ending in `/`.
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// `<base>/api/<path>`
    #[must_use]
    pub fn api_url(&self, path: &str) -> String {
        format!("{}api/{}", self.base_url, path.trim_start_matches('/'))
    }

    /// Resolve a server-relative `href` such as `/api/acme/reports/abc`.
    #[must_use]
    pub fn absolute_url(&self, href: &str) -> String {
        if href.starts_with("http://") || href.starts_with("https://") {
            return href.to_string();
        }
        format!("{}{}", self.base_url, href.trim_start_matches('/'))
    }

    /// Web (non-API) URL for a resource given its API `href`.
    #[must_use]
    pub fn web_url(&self, api_href: &str) -> String {
        format!("{}{}", self.base_url, strip_api_prefix(api_href))
    }

    /// GET `url` and decode the JSON body.
    ///
    /// # Errors
    ///
    /// Returns [`HookError::UpstreamError`] on transport failure, a
    /// non-success status, or a body that does not decode into `T`.
    pub async fn get_json<T: DeserializeOwned>(&self, url: &str) -> Result<T, HookError> {
        debug!(url = %url, "Fetching upstream resource");
        let resp = self
            .http
            .get(url)
            .basic_auth(&self.api_token, Some(&self.api_password))
            .header(ACCEPT, HAL_JSON)
            .send()
            .await
            .map_err(|e| HookError::upstream(url, e))?;

        let status = resp.status();
        if !status.is_success() {
            let body_text = resp
                .text()
                .await
                .unwrap_or_else(|_| "<failed to read body>".to_string());
            error!("Upstream GET failed: url={} status={} body={}", url, status, body_text);
            return Err(HookError::upstream(url, format!("status {status}")));
        }

        let bytes = resp.bytes().await.map_err(|e| HookError::upstream(url, e))?;
        serde_json::from_slice(&bytes)
            .map_err(|e| HookError::upstream(url, format!("malformed body: {e}")))
    }
}

/// `/api/acme/reports/abc` -> `acme/reports/abc`
#[must_use]
pub fn strip_api_prefix(href: &str) -> &str {
    let trimmed = href.trim_start_matches('/');
    trimmed.strip_prefix("api/").unwrap_or(trimmed)
}

/// Account name from an account link such as `/api/jdoe`.
#[must_use]
pub fn account_name(href: &str) -> &str {
    strip_api_prefix(href).split('/').next().unwrap_or_default()
}
