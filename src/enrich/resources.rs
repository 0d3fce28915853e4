//! Response shapes of the platform API, as far as enrichment reads them.

use serde::Deserialize;
use serde_json::Value;

use crate::core::models::{
    ConnectionAttributes, DefinitionAttributes, Link, OrganizationAttributes, ReportAttributes,
    SpaceAttributes, UserAttributes,
};

#[derive(Debug, Deserialize)]
pub struct ApiReportRun {
    pub token: String,
    pub state: String,
    #[serde(default)]
    pub parameters: Value,
    pub python_state: Option<String>,
    pub created_at: Option<String>,
    pub completed_at: Option<String>,
    #[serde(default)]
    pub form_fields: Value,
    #[serde(rename = "_links")]
    pub links: ReportRunLinks,
}

#[derive(Debug, Deserialize)]
pub struct ReportRunLinks {
    pub executed_by: Link,
    pub account: Option<Link>,
    pub share: Option<Link>,
    pub report: Option<Link>,
    pub query_runs: Option<Link>,
    pub python_cell_runs: Option<Link>,
    pub web_external_url: Link,
}

#[derive(Debug, Deserialize)]
pub struct ApiReport {
    #[serde(flatten)]
    pub attributes: ReportAttributes,
    #[serde(rename = "_links")]
    pub links: ReportLinks,
}

#[derive(Debug, Deserialize)]
pub struct ReportLinks {
    #[serde(rename = "self")]
    pub self_link: Link,
    pub creator: Link,
    pub report_schedules: Option<Link>,
    pub report_subscriptions: Option<Link>,
}

#[derive(Debug, Deserialize)]
pub struct ApiSpace {
    #[serde(flatten)]
    pub attributes: SpaceAttributes,
    #[serde(rename = "_links")]
    pub links: SelfLinks,
}

#[derive(Debug, Deserialize)]
pub struct SelfLinks {
    #[serde(rename = "self")]
    pub self_link: Link,
}

#[derive(Debug, Deserialize)]
pub struct ApiDefinition {
    #[serde(flatten)]
    pub attributes: DefinitionAttributes,
    #[serde(rename = "_links")]
    pub links: DefinitionLinks,
}

#[derive(Debug, Deserialize)]
pub struct DefinitionLinks {
    pub creator: Link,
}

pub type ApiConnection = ConnectionAttributes;
pub type ApiUser = UserAttributes;
pub type ApiOrganization = OrganizationAttributes;

#[derive(Debug, Deserialize)]
pub struct ApiMembership {
    pub admin: bool,
    pub limited: bool,
    #[serde(rename = "_links")]
    pub links: MembershipLinks,
}

#[derive(Debug, Deserialize)]
pub struct MembershipLinks {
    #[serde(rename = "self")]
    pub self_link: Link,
    pub organization: Link,
    pub user: Link,
}

/// One page of a report's run history, newest first.
#[derive(Debug, Deserialize)]
pub struct ReportRunsPage {
    #[serde(default)]
    pub pagination: Pagination,
    #[serde(rename = "_embedded")]
    pub embedded: EmbeddedReportRuns,
    #[serde(rename = "_links", default)]
    pub links: PageLinks,
}

#[derive(Debug, Deserialize)]
pub struct Pagination {
    pub page: u32,
    pub total_pages: u32,
}

impl Default for Pagination {
    fn default() -> Self {
        Self {
            page: 1,
            total_pages: 1,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct PageLinks {
    pub next_page: Option<Link>,
}

#[derive(Debug, Deserialize)]
pub struct EmbeddedReportRuns {
    pub report_runs: Vec<RunSummary>,
}

#[derive(Debug, Deserialize)]
pub struct RunSummary {
    pub state: String,
}

/// Query runs of one report run, as listed under `<run>/query_runs`.
#[derive(Debug, Deserialize)]
pub struct QueryRunsPage {
    #[serde(rename = "_embedded")]
    pub embedded: EmbeddedQueryRuns,
}

#[derive(Debug, Deserialize)]
pub struct EmbeddedQueryRuns {
    pub query_runs: Vec<QueryRun>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct QueryRun {
    pub query_token: Option<String>,
    pub state: Option<String>,
    pub created_at: Option<String>,
    pub completed_at: Option<String>,
    pub raw_source: Option<String>,
    pub parameters: Option<Value>,
}
