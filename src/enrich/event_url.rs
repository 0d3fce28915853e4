use url::Url;

use crate::errors::HookError;

/// A parsed webhook resource URL such as
/// `https://modeanalytics.com/api/acme/reports/abc/runs/def`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EventUrl {
    raw: String,
    url: Url,
}

impl EventUrl {
    pub fn parse(raw: &str) -> Result<Self, HookError> {
        let url = Url::parse(raw)
            .map_err(|e| HookError::InvalidEvent(format!("invalid resource URL `{raw}`: {e}")))?;
        Ok(Self {
            raw: raw.to_string(),
            url,
        })
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.raw
    }

    fn segments(&self) -> Vec<&str> {
        self.url
            .path_segments()
            .map(|s| s.filter(|seg| !seg.is_empty()).collect())
            .unwrap_or_default()
    }

    /// Organization the resource lives in (the segment following `api`).
    pub fn org(&self) -> Result<String, HookError> {
        let segments = self.segments();
        segments
            .iter()
            .position(|seg| *seg == "api")
            .and_then(|idx| segments.get(idx + 1))
            .map(|org| (*org).to_string())
            .ok_or_else(|| {
                HookError::InvalidEvent(format!("no organization in resource URL `{}`", self.raw))
            })
    }

    /// URL of the report a run belongs to.
    #[must_use]
    pub fn report_url(&self) -> &str {
        self.raw
            .split("/runs/")
            .next()
            .unwrap_or(&self.raw)
    }

    /// Membership token; any `embed[...]` query is dropped.
    pub fn member_token(&self) -> Result<String, HookError> {
        let segments = self.segments();
        segments
            .iter()
            .position(|seg| *seg == "memberships")
            .and_then(|idx| segments.get(idx + 1))
            .map(|token| (*token).to_string())
            .ok_or_else(|| {
                HookError::InvalidEvent(format!("no membership token in `{}`", self.raw))
            })
    }

    /// Web URL of a data connection.
    #[must_use]
    pub fn connection_url(&self) -> String {
        self.raw.replacen("/api/", "/organizations/", 1)
    }

    /// Append a sub-resource path, e.g. `/results/content.json`.
    #[must_use]
    pub fn join(&self, suffix: &str) -> String {
        join_path(&self.raw, suffix)
    }
}

pub(crate) fn join_path(base: &str, suffix: &str) -> String {
    format!(
        "{}/{}",
        base.trim_end_matches('/'),
        suffix.trim_start_matches('/')
    )
}
