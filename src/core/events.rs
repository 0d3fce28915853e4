//! Inbound webhook events and the catalog that maps each event to the
//! resource chain it needs.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

use crate::errors::HookError;

/// Every event the analytics platform can deliver to these functions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventKind {
    ReportCreated,
    ReportRunStarted,
    ReportRunCompleted,
    DefinitionCreated,
    DefinitionUpdated,
    NewDatabaseConnection,
    MemberJoinedOrganization,
}

/// The family of resources an event is about. Decides the fetch chain and the
/// resource kinds present in the enriched result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Scope {
    Report,
    ReportRun,
    Definition,
    Connection,
    Membership,
}

impl EventKind {
    pub const ALL: [EventKind; 7] = [
        EventKind::ReportCreated,
        EventKind::ReportRunStarted,
        EventKind::ReportRunCompleted,
        EventKind::DefinitionCreated,
        EventKind::DefinitionUpdated,
        EventKind::NewDatabaseConnection,
        EventKind::MemberJoinedOrganization,
    ];

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            EventKind::ReportCreated => "report_created",
            EventKind::ReportRunStarted => "report_run_started",
            EventKind::ReportRunCompleted => "report_run_completed",
            EventKind::DefinitionCreated => "definition_created",
            EventKind::DefinitionUpdated => "definition_updated",
            EventKind::NewDatabaseConnection => "new_database_connection",
            EventKind::MemberJoinedOrganization => "member_joined_organization",
        }
    }

    /// Name of the body field carrying the resource URL for this event.
    #[must_use]
    pub fn url_field(self) -> &'static str {
        match self {
            EventKind::ReportCreated => "report_url",
            EventKind::ReportRunStarted | EventKind::ReportRunCompleted => "report_run_url",
            EventKind::DefinitionCreated | EventKind::DefinitionUpdated => "definition_url",
            EventKind::NewDatabaseConnection => "connection_url",
            EventKind::MemberJoinedOrganization => "member_url",
        }
    }

    #[must_use]
    pub fn scope(self) -> Scope {
        match self {
            EventKind::ReportCreated => Scope::Report,
            EventKind::ReportRunStarted | EventKind::ReportRunCompleted => Scope::ReportRun,
            EventKind::DefinitionCreated | EventKind::DefinitionUpdated => Scope::Definition,
            EventKind::NewDatabaseConnection => Scope::Connection,
            EventKind::MemberJoinedOrganization => Scope::Membership,
        }
    }

    #[must_use]
    pub fn parse(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.as_str() == name)
    }
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Scope {
    /// Top-level keys of an enriched result for this scope, in fetch order.
    #[must_use]
    pub fn resource_kinds(self) -> &'static [&'static str] {
        match self {
            Scope::Report => &["report", "space"],
            Scope::ReportRun => &["report_run", "report", "space"],
            Scope::Definition => &["definition"],
            Scope::Connection => &["connection"],
            Scope::Membership => &["membership", "user", "organization"],
        }
    }
}

/// A validated inbound webhook: the event and the URL of the resource it
/// refers to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WebhookEvent {
    pub event: EventKind,
    pub resource_url: String,
}

impl WebhookEvent {
    #[must_use]
    pub fn new(event: EventKind, resource_url: impl Into<String>) -> Self {
        Self {
            event,
            resource_url: resource_url.into(),
        }
    }

    /// Validate a decoded webhook body.
    ///
    /// # Errors
    ///
    /// Returns [`HookError::InvalidEvent`] when `event` is missing or unknown,
    /// or when the URL field that event requires is absent.
    pub fn from_body(body: &Value) -> Result<Self, HookError> {
        let name = body
            .get("event")
            .and_then(Value::as_str)
            .ok_or_else(|| HookError::InvalidEvent("missing `event` field".to_string()))?;

        let event = EventKind::parse(name)
            .ok_or_else(|| HookError::InvalidEvent(format!("Unsupported event type: {name}")))?;

        let resource_url = body
            .get(event.url_field())
            .and_then(Value::as_str)
            .filter(|url| !url.is_empty())
            .ok_or_else(|| {
                HookError::InvalidEvent(format!(
                    "`{event}` event is missing `{}`",
                    event.url_field()
                ))
            })?;

        Ok(Self::new(event, resource_url))
    }

    /// Parse a raw JSON request body.
    pub fn from_json(raw: &str) -> Result<Self, HookError> {
        let body: Value = serde_json::from_str(raw)
            .map_err(|e| HookError::InvalidEvent(format!("body is not JSON: {e}")))?;
        Self::from_body(&body)
    }

    #[must_use]
    pub fn scope(&self) -> Scope {
        self.event.scope()
    }
}
