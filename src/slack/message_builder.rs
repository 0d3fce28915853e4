//! Slack notifications for enriched webhook events.
//!
//! Everything here is pure: the same enriched result and alert rule always
//! produce the same payload.

use serde::Serialize;
use serde_json::Value;

use crate::core::config::AlertRule;
use crate::core::events::EventKind;
use crate::core::models::{
    Connection, Definition, EnrichedResult, Organization, Report, ReportRun, Space, User,
};
use crate::errors::HookError;

pub const AUTHOR_NAME: &str = "Mode";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum AttachmentColor {
    Good,
    Warning,
    Danger,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AttachmentField {
    pub title: String,
    pub value: Value,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Attachment {
    pub fallback: String,
    pub color: AttachmentColor,
    pub author_name: String,
    pub author_link: String,
    pub title: String,
    pub text: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub fields: Vec<AttachmentField>,
}

/// Body POSTed to a Slack incoming webhook.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SlackPayload {
    pub username: String,
    pub attachments: Vec<Attachment>,
}

/// Builds attachments that link back to the platform at `author_link`.
#[derive(Debug, Clone)]
pub struct MessageBuilder<'a> {
    author_link: &'a str,
    alert: Option<&'a AlertRule>,
}

impl<'a> MessageBuilder<'a> {
    #[must_use]
    pub fn new(author_link: &'a str, alert: Option<&'a AlertRule>) -> Self {
        Self { author_link, alert }
    }

    /// Whether the event has a Slack message at all.
    #[must_use]
    pub fn supports(event: EventKind) -> bool {
        !matches!(event, EventKind::ReportRunStarted)
    }

    /// Build the Slack payload for an event.
    ///
    /// # Errors
    ///
    /// Returns [`HookError::FormatError`] if the event has no Slack message,
    /// the result was enriched for a different scope, or a field the message
    /// needs is missing.
    pub fn build(
        &self,
        event: EventKind,
        result: &EnrichedResult,
    ) -> Result<SlackPayload, HookError> {
        let attachment = match (event, result) {
            (
                EventKind::ReportRunCompleted,
                EnrichedResult::ReportRun {
                    report_run,
                    report,
                    space,
                },
            ) => self.report_run_completed(report_run, report, space)?,
            (EventKind::ReportCreated, EnrichedResult::Report { report, space }) => {
                self.report_created(report, space)
            }
            (
                EventKind::MemberJoinedOrganization,
                EnrichedResult::Membership {
                    user, organization, ..
                },
            ) => self.member_joined(user, organization),
            (EventKind::DefinitionCreated, EnrichedResult::Definition { definition }) => {
                self.definition_created(definition)
            }
            (EventKind::DefinitionUpdated, EnrichedResult::Definition { definition }) => {
                self.definition_updated(definition)
            }
            (EventKind::NewDatabaseConnection, EnrichedResult::Connection { connection }) => {
                self.new_connection(connection)?
            }
            (EventKind::ReportRunStarted, _) => {
                return Err(HookError::FormatError(format!(
                    "no Slack message for `{event}` events"
                )));
            }
            (event, result) => {
                return Err(HookError::FormatError(format!(
                    "`{event}` event cannot be formatted from a {:?} result",
                    result.scope()
                )));
            }
        };

        Ok(SlackPayload {
            username: AUTHOR_NAME.to_string(),
            attachments: vec![attachment],
        })
    }

    fn attachment(&self, color: AttachmentColor, title: &str, text: String) -> Attachment {
        Attachment {
            fallback: text.clone(),
            color,
            author_name: AUTHOR_NAME.to_string(),
            author_link: self.author_link.to_string(),
            title: title.to_string(),
            text,
            fields: Vec::new(),
        }
    }

    fn report_run_completed(
        &self,
        run: &ReportRun,
        report: &Report,
        space: &Space,
    ) -> Result<Attachment, HookError> {
        let who = &run.executed_by;
        let report_link = slack_link(&report.url, &report.attributes.name);
        let space_link = slack_link(&space.url, &space.attributes.name);

        match run.state.as_str() {
            "succeeded" => {
                if let Some((rule, observed)) = self.threshold_breach(run, report) {
                    let text = format!(
                        "Heads up! {who} just ran the {report_link} report in the {space_link} space and it succeeded, but the {} field exceeded the alert threshold.",
                        rule.field
                    );
                    let mut attachment = self.attachment(
                        AttachmentColor::Warning,
                        "Threshold Alert :heavy_exclamation_mark:",
                        text,
                    );
                    attachment.fields = vec![
                        AttachmentField {
                            title: "Observed Value".to_string(),
                            value: observed,
                        },
                        AttachmentField {
                            title: "Threshold Value".to_string(),
                            value: Value::Number(rule.threshold.clone()),
                        },
                    ];
                    return Ok(attachment);
                }

                let duration = run
                    .execution_duration
                    .ok_or_else(|| HookError::missing_field("report_run", "execution_duration"))?;
                let text = format!(
                    "Good news! {who} just ran the {report_link} report in the {space_link} space and it succeeded. It took {duration} seconds to run."
                );
                Ok(self.attachment(
                    AttachmentColor::Good,
                    "Successful Report Run :success:",
                    text,
                ))
            }
            "failed" => {
                let failures = report.consecutive_run_failures;
                let text = format!(
                    "Oh no! {who} just ran the {report_link} report in the {space_link} space and it failed. It has failed the last {failures} run(s)."
                );
                Ok(self.attachment(
                    AttachmentColor::Danger,
                    "Failed Report Run :sad-error:",
                    text,
                ))
            }
            other => Err(HookError::FormatError(format!(
                "no Slack message for report run state `{other}`"
            ))),
        }
    }

    /// First result row whose alert field exceeds the configured threshold.
    fn threshold_breach(
        &self,
        run: &ReportRun,
        report: &Report,
    ) -> Option<(&'a AlertRule, Value)> {
        let rule = self.alert.filter(|r| r.report_id == report.attributes.id)?;
        let threshold = rule.threshold.as_f64()?;
        run.results
            .as_array()?
            .iter()
            .filter_map(|row| row.get(&rule.field))
            .find(|value| value.as_f64().is_some_and(|v| v > threshold))
            .map(|value| (rule, value.clone()))
    }

    fn report_created(&self, report: &Report, space: &Space) -> Attachment {
        let text = format!(
            "{} just created the {} report in the {} space.",
            report.creator,
            slack_link(&report.url, &report.attributes.name),
            slack_link(&space.url, &space.attributes.name)
        );
        self.attachment(AttachmentColor::Good, "New Report Created :plus1:", text)
    }

    fn member_joined(&self, user: &User, organization: &Organization) -> Attachment {
        let text = format!(
            "Say hi! {} just joined the {} organization.",
            slack_link(&user.url, &user.attributes.name),
            slack_link(&organization.url, &organization.attributes.name)
        );
        self.attachment(AttachmentColor::Good, "New Org Member :wave:", text)
    }

    fn definition_created(&self, definition: &Definition) -> Attachment {
        let text = format!(
            "{} just created the {} definition.",
            definition.creator,
            slack_link(&definition.url, &definition.attributes.name)
        );
        self.attachment(AttachmentColor::Good, "New Definition :plus1:", text)
    }

    fn definition_updated(&self, definition: &Definition) -> Attachment {
        let text = format!(
            "The {} definition was just updated.",
            slack_link(&definition.url, &definition.attributes.name)
        );
        self.attachment(
            AttachmentColor::Warning,
            "Definition Updated :heavy_exclamation_mark:",
            text,
        )
    }

    fn new_connection(&self, connection: &Connection) -> Result<Attachment, HookError> {
        let vendor = connection
            .attributes
            .vendor
            .as_deref()
            .ok_or_else(|| HookError::missing_field("connection", "vendor"))?;
        let provider = connection
            .attributes
            .provider
            .as_deref()
            .ok_or_else(|| HookError::missing_field("connection", "provider"))?;

        let text = format!(
            "The {} data source was just connected.",
            slack_link(&connection.url, &connection.attributes.name)
        );
        let mut attachment =
            self.attachment(AttachmentColor::Good, "New Data Source :plus1:", text);
        attachment.fields = vec![
            AttachmentField {
                title: "Vendor".to_string(),
                value: Value::from(vendor),
            },
            AttachmentField {
                title: "Provider".to_string(),
                value: Value::from(provider),
            },
        ];
        Ok(attachment)
    }
}

/// `<url|label>` link markup.
#[must_use]
pub fn slack_link(url: &str, label: &str) -> String {
    format!("<{url}|{label}>")
}
