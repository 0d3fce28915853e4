//! Enriched resource records.
//!
//! Each record is what the enricher hands to a formatter or forwarder: the
//! fields the platform API returned for that resource plus the few values
//! derived from its links (account names, web URLs, run statistics).

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::events::{EventKind, Scope};

/// A hypermedia link as it appears under `_links` in API responses.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Link {
    pub href: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportRun {
    pub executed_by: String,
    pub account: Option<Link>,
    pub share: Option<Link>,
    pub report: Option<Link>,
    pub query_runs: Option<Link>,
    pub python_cell_runs: Option<Link>,
    pub state: String,
    pub parameters: Value,
    pub python_state: Option<String>,
    pub created_at: Option<String>,
    pub completed_at: Option<String>,
    pub form_fields: Value,
    /// Seconds from `created_at` to `completed_at`; absent until the run finishes.
    pub execution_duration: Option<i64>,
    pub token: String,
    /// Result rows, only fetched for succeeded runs.
    pub results: Value,
    pub url: String,
}

/// Report fields passed through from the API unchanged.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportAttributes {
    pub id: i64,
    pub name: String,
    pub created_at: Option<String>,
    pub edited_at: Option<String>,
    pub theme_id: Option<i64>,
    pub archived: Option<bool>,
    pub account_id: Option<i64>,
    pub account_username: Option<String>,
    pub full_width: Option<bool>,
    pub manual_run_disabled: Option<bool>,
    pub run_privately: Option<bool>,
    pub is_embedded: Option<bool>,
    pub is_signed: Option<bool>,
    pub shared: Option<bool>,
    pub last_successfully_run_at: Option<String>,
    pub last_successful_run_token: Option<String>,
    pub last_run_at: Option<String>,
    pub description: Option<String>,
    pub public: Option<bool>,
    pub space_token: String,
    pub web_preview_image: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Report {
    #[serde(flatten)]
    pub attributes: ReportAttributes,
    pub creator: String,
    pub consecutive_run_failures: u64,
    pub report_schedules: Option<Link>,
    pub report_subscriptions: Option<Link>,
    pub url: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpaceAttributes {
    pub id: i64,
    pub name: String,
    pub space_type: Option<String>,
    pub description: Option<String>,
    pub state: Option<String>,
    pub restricted: Option<bool>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Space {
    #[serde(flatten)]
    pub attributes: SpaceAttributes,
    pub url: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DefinitionAttributes {
    pub id: i64,
    pub name: String,
    pub created_at: Option<String>,
    pub data_source_id: Option<i64>,
    pub description: Option<String>,
    pub source: Option<String>,
    pub token: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Definition {
    #[serde(flatten)]
    pub attributes: DefinitionAttributes,
    pub creator: String,
    pub url: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConnectionAttributes {
    pub id: i64,
    pub name: String,
    pub token: String,
    pub account_id: Option<i64>,
    pub account_username: Option<String>,
    pub adapter: Option<String>,
    pub asleep: Option<bool>,
    pub bridged: Option<bool>,
    pub created_at: Option<String>,
    pub custom_attributes: Option<Value>,
    pub database: Option<String>,
    pub default: Option<bool>,
    pub default_for_organization_id: Option<i64>,
    pub description: Option<String>,
    pub display_name: Option<String>,
    pub has_expensive_schema_updates: Option<bool>,
    pub host: Option<String>,
    pub ldap: Option<bool>,
    pub organization_token: Option<String>,
    pub port: Option<i64>,
    pub provider: Option<String>,
    pub public: Option<bool>,
    pub queryable: Option<bool>,
    pub ssl: Option<bool>,
    pub updated_at: Option<String>,
    pub username: Option<String>,
    pub vendor: Option<String>,
    pub warehouse: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Connection {
    #[serde(flatten)]
    pub attributes: ConnectionAttributes,
    pub url: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Membership {
    pub admin: bool,
    pub limited: bool,
    pub token: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserAttributes {
    pub id: i64,
    pub name: String,
    pub token: String,
    pub username: String,
    pub user: Option<bool>,
    pub email: Option<String>,
    pub email_verified: Option<bool>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    #[serde(flatten)]
    pub attributes: UserAttributes,
    pub url: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrganizationAttributes {
    pub id: i64,
    pub name: String,
    pub token: String,
    pub username: String,
    pub user: Option<bool>,
    pub plan_code: Option<String>,
    pub private_definition_count: Option<i64>,
    pub private_definition_limit: Option<i64>,
    pub space_count: Option<i64>,
    pub trial_state: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Organization {
    #[serde(flatten)]
    pub attributes: OrganizationAttributes,
    pub url: String,
}

/// Resources gathered for one webhook event, keyed by resource kind.
///
/// Serializes as an object whose top-level keys are exactly
/// [`Scope::resource_kinds`] for the variant's scope.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum EnrichedResult {
    ReportRun {
        report_run: ReportRun,
        report: Report,
        space: Space,
    },
    Report {
        report: Report,
        space: Space,
    },
    Definition {
        definition: Definition,
    },
    Connection {
        connection: Connection,
    },
    Membership {
        membership: Membership,
        user: User,
        organization: Organization,
    },
}

impl EnrichedResult {
    #[must_use]
    pub fn scope(&self) -> Scope {
        match self {
            EnrichedResult::ReportRun { .. } => Scope::ReportRun,
            EnrichedResult::Report { .. } => Scope::Report,
            EnrichedResult::Definition { .. } => Scope::Definition,
            EnrichedResult::Connection { .. } => Scope::Connection,
            EnrichedResult::Membership { .. } => Scope::Membership,
        }
    }

    /// The forwardable payload: the enriched resources plus `event_name`.
    ///
    /// # Errors
    ///
    /// Fails only if a resource holds a value `serde_json` cannot represent.
    pub fn to_payload(&self, event: EventKind) -> Result<Map<String, Value>, serde_json::Error> {
        use serde_json::to_value;

        let resources = match self {
            EnrichedResult::ReportRun {
                report_run,
                report,
                space,
            } => vec![
                ("report_run", to_value(report_run)?),
                ("report", to_value(report)?),
                ("space", to_value(space)?),
            ],
            EnrichedResult::Report { report, space } => {
                vec![("report", to_value(report)?), ("space", to_value(space)?)]
            }
            EnrichedResult::Definition { definition } => {
                vec![("definition", to_value(definition)?)]
            }
            EnrichedResult::Connection { connection } => {
                vec![("connection", to_value(connection)?)]
            }
            EnrichedResult::Membership {
                membership,
                user,
                organization,
            } => vec![
                ("membership", to_value(membership)?),
                ("user", to_value(user)?),
                ("organization", to_value(organization)?),
            ],
        };

        let mut payload: Map<String, Value> = resources
            .into_iter()
            .map(|(kind, value)| (kind.to_string(), value))
            .collect();
        payload.insert(
            "event_name".to_string(),
            Value::String(event.as_str().to_string()),
        );
        Ok(payload)
    }
}
