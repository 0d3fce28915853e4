use thiserror::Error;

#[derive(Debug, Error)]
pub enum HookError {
    #[error("Invalid webhook event: {0}")]
    InvalidEvent(String),

    #[error("Failed to fetch upstream resource: {0}")]
    UpstreamError(String),

    #[error("Failed to deliver message: {0}")]
    DeliveryError(String),

    #[error("Failed to format message: {0}")]
    FormatError(String),

    #[error("Missing or invalid configuration: {0}")]
    ConfigError(String),
}

impl HookError {
    /// Whether the error comes from the caller's payload rather than from
    /// this function or a system it talks to.
    #[must_use]
    pub fn is_client_error(&self) -> bool {
        matches!(self, HookError::InvalidEvent(_))
    }

    pub(crate) fn upstream(url: &str, error: impl std::fmt::Display) -> Self {
        HookError::UpstreamError(format!("GET {url}: {error}"))
    }

    pub(crate) fn delivery(url: &str, error: impl std::fmt::Display) -> Self {
        HookError::DeliveryError(format!("POST {url}: {error}"))
    }

    pub(crate) fn missing_field(kind: &str, field: &str) -> Self {
        HookError::FormatError(format!("{kind} is missing `{field}`"))
    }
}
