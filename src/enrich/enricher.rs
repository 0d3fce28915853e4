use serde_json::Value;
use tracing::info;

use super::event_url::{EventUrl, join_path};
use super::resources::{
    ApiConnection, ApiDefinition, ApiMembership, ApiOrganization, ApiReport, ApiReportRun,
    ApiSpace, ApiUser,
};
use super::run_stats::{consecutive_run_failures, execution_duration};
use crate::clients::ModeClient;
use crate::clients::mode_client::{account_name, strip_api_prefix};
use crate::core::events::{Scope, WebhookEvent};
use crate::core::models::{
    Connection, Definition, EnrichedResult, Membership, Organization, Report, ReportRun, Space,
    User,
};
use crate::errors::HookError;

const RUN_SUCCEEDED: &str = "succeeded";

/// Gathers the resources a webhook event refers to.
pub struct Enricher {
    client: ModeClient,
}

impl Enricher {
    #[must_use]
    pub fn new(client: ModeClient) -> Self {
        Self { client }
    }

    #[must_use]
    pub fn client(&self) -> &ModeClient {
        &self.client
    }

    /// Fetch the resource chain for the event's scope.
    ///
    /// # Errors
    ///
    /// Returns [`HookError::UpstreamError`] as soon as any fetch in the chain
    /// fails; nothing partial is returned.
    #[tracing::instrument(
        level = "info",
        skip(self, event),
        fields(event = %event.event, url = %event.resource_url)
    )]
    pub async fn enrich(&self, event: &WebhookEvent) -> Result<EnrichedResult, HookError> {
        let url = EventUrl::parse(&event.resource_url)?;

        let result = match event.scope() {
            Scope::ReportRun => {
                let report_run = self.report_run(&url).await?;
                let report = self.report(url.report_url()).await?;
                let space = self.space(&url.org()?, &report.attributes.space_token).await?;
                EnrichedResult::ReportRun {
                    report_run,
                    report,
                    space,
                }
            }
            Scope::Report => {
                let report = self.report(url.as_str()).await?;
                let space = self.space(&url.org()?, &report.attributes.space_token).await?;
                EnrichedResult::Report { report, space }
            }
            Scope::Definition => EnrichedResult::Definition {
                definition: self.definition(&url).await?,
            },
            Scope::Connection => EnrichedResult::Connection {
                connection: self.connection(&url).await?,
            },
            Scope::Membership => self.membership(&url).await?,
        };

        info!(scope = ?result.scope(), "Enriched webhook event");
        Ok(result)
    }

    async fn report_run(&self, url: &EventUrl) -> Result<ReportRun, HookError> {
        let run: ApiReportRun = self.client.get_json(url.as_str()).await?;

        let results = if run.state == RUN_SUCCEEDED {
            self.client
                .get_json(&url.join("results/content.json"))
                .await?
        } else {
            Value::Null
        };

        let execution_duration =
            execution_duration(run.created_at.as_deref(), run.completed_at.as_deref())?;
        let web_url = run
            .links
            .web_external_url
            .href
            .split('?')
            .next()
            .unwrap_or_default()
            .to_string();

        Ok(ReportRun {
            executed_by: account_name(&run.links.executed_by.href).to_string(),
            account: run.links.account,
            share: run.links.share,
            report: run.links.report,
            query_runs: run.links.query_runs,
            python_cell_runs: run.links.python_cell_runs,
            state: run.state,
            parameters: run.parameters,
            python_state: run.python_state,
            created_at: run.created_at,
            completed_at: run.completed_at,
            form_fields: run.form_fields,
            execution_duration,
            token: run.token,
            results,
            url: web_url,
        })
    }

    async fn report(&self, report_url: &str) -> Result<Report, HookError> {
        let report: ApiReport = self.client.get_json(report_url).await?;
        let consecutive_run_failures = consecutive_run_failures(&self.client, report_url).await?;

        Ok(Report {
            creator: account_name(&report.links.creator.href).to_string(),
            url: self.client.web_url(&report.links.self_link.href),
            report_schedules: report.links.report_schedules,
            report_subscriptions: report.links.report_subscriptions,
            consecutive_run_failures,
            attributes: report.attributes,
        })
    }

    async fn space(&self, org: &str, space_token: &str) -> Result<Space, HookError> {
        let space_url = self.client.api_url(&format!("{org}/spaces/{space_token}"));
        let space: ApiSpace = self.client.get_json(&space_url).await?;

        Ok(Space {
            url: self.client.web_url(&space.links.self_link.href),
            attributes: space.attributes,
        })
    }

    async fn definition(&self, url: &EventUrl) -> Result<Definition, HookError> {
        let definition: ApiDefinition = self.client.get_json(url.as_str()).await?;
        let web_url = join_path(
            self.client.base_url(),
            &format!(
                "editor/{}/definitions/{}",
                url.org()?,
                definition.attributes.token
            ),
        );

        Ok(Definition {
            creator: strip_api_prefix(&definition.links.creator.href).to_string(),
            url: web_url,
            attributes: definition.attributes,
        })
    }

    async fn connection(&self, url: &EventUrl) -> Result<Connection, HookError> {
        let attributes: ApiConnection = self.client.get_json(url.as_str()).await?;
        Ok(Connection {
            attributes,
            url: url.connection_url(),
        })
    }

    async fn membership(&self, url: &EventUrl) -> Result<EnrichedResult, HookError> {
        let membership_url = self.client.api_url(&format!(
            "{}/memberships/{}",
            url.org()?,
            url.member_token()?
        ));
        let membership: ApiMembership = self.client.get_json(&membership_url).await?;

        let token = membership
            .links
            .self_link
            .href
            .split("/memberships/")
            .nth(1)
            .map(|t| t.split('?').next().unwrap_or(t).to_string())
            .ok_or_else(|| {
                HookError::UpstreamError(format!(
                    "membership self link `{}` has no token",
                    membership.links.self_link.href
                ))
            })?;

        let username = strip_api_prefix(&membership.links.user.href).to_string();
        let organization = strip_api_prefix(&membership.links.organization.href).to_string();

        let user = self.user(&username).await?;
        let organization = self.organization(&organization).await?;

        Ok(EnrichedResult::Membership {
            membership: Membership {
                admin: membership.admin,
                limited: membership.limited,
                token,
            },
            user,
            organization,
        })
    }

    async fn user(&self, username: &str) -> Result<User, HookError> {
        let attributes: ApiUser = self.client.get_json(&self.client.api_url(username)).await?;
        Ok(User {
            attributes,
            url: join_path(self.client.base_url(), username),
        })
    }

    async fn organization(&self, org: &str) -> Result<Organization, HookError> {
        let attributes: ApiOrganization = self.client.get_json(&self.client.api_url(org)).await?;
        Ok(Organization {
            attributes,
            url: join_path(self.client.base_url(), org),
        })
    }
}
