#![allow(dead_code)]

use hookrich::core::config::AppConfig;
use hookrich::core::models::{
    Connection, Definition, EnrichedResult, Membership, Organization, Report, ReportRun, Space,
    User,
};
use serde_json::{Value, json};
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

pub const RUN_PATH: &str = "/api/acme/reports/REPORT1/runs/RUN123";
pub const REPORT_PATH: &str = "/api/acme/reports/REPORT1";
pub const SPACE_PATH: &str = "/api/acme/spaces/SPACE1";

/// Config pointing the platform API at `base_url`, plus any extra variables.
pub fn test_config(base_url: &str, extra: &[(&str, &str)]) -> AppConfig {
    let mut vars: Vec<(String, String)> = vec![
        ("MODE_API_TOKEN".into(), "token".into()),
        ("MODE_API_PASSWORD".into(), "secret".into()),
        ("MODE_BASE_URL".into(), base_url.into()),
    ];
    vars.extend(extra.iter().map(|(k, v)| ((*k).to_string(), (*v).to_string())));
    AppConfig::from_lookup(|key| {
        vars.iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.clone())
    })
    .expect("test config")
}

pub async fn mount_json(server: &MockServer, at: &str, body: Value) {
    Mock::given(method("GET"))
        .and(path(at))
        .respond_with(ResponseTemplate::new(200).set_body_json(body))
        .mount(server)
        .await;
}

pub fn report_run_body(state: &str) -> Value {
    json!({
        "token": "RUN123",
        "state": state,
        "parameters": {"region": "emea"},
        "python_state": "none",
        "created_at": "2024-03-01T10:00:00.000Z",
        "completed_at": "2024-03-01T10:00:42.000Z",
        "form_fields": [],
        "_links": {
            "executed_by": {"href": "/api/jdoe"},
            "account": {"href": "/api/acme"},
            "report": {"href": REPORT_PATH},
            "query_runs": {"href": format!("{RUN_PATH}/query_runs")},
            "web_external_url": {"href": "https://app.example.com/acme/reports/REPORT1/runs/RUN123?utm=hook"}
        }
    })
}

pub fn report_body() -> Value {
    json!({
        "id": 42,
        "token": "REPORT1",
        "name": "Revenue",
        "space_token": "SPACE1",
        "created_at": "2024-01-01T00:00:00.000Z",
        "archived": false,
        "description": null,
        "_links": {
            "self": {"href": REPORT_PATH},
            "creator": {"href": "/api/jdoe"},
            "report_schedules": {"href": format!("{REPORT_PATH}/schedules")}
        }
    })
}

pub fn space_body() -> Value {
    json!({
        "id": 7,
        "token": "SPACE1",
        "name": "Finance",
        "space_type": "custom",
        "state": "active",
        "restricted": false,
        "_links": {"self": {"href": SPACE_PATH}}
    })
}

pub fn runs_page(states: &[&str], page: u32, total_pages: u32, next: Option<&str>) -> Value {
    let runs: Vec<Value> = states.iter().map(|s| json!({"state": s})).collect();
    let mut links = json!({});
    if let Some(href) = next {
        links["next_page"] = json!({"href": href});
    }
    json!({
        "pagination": {"page": page, "total_pages": total_pages},
        "_embedded": {"report_runs": runs},
        "_links": links
    })
}

/// Mount the report run -> report -> space chain for RUN123.
pub async fn mount_report_run_chain(server: &MockServer, state: &str, results: Value) {
    mount_json(server, RUN_PATH, report_run_body(state)).await;
    mount_json(server, &format!("{RUN_PATH}/results/content.json"), results).await;
    mount_json(server, REPORT_PATH, report_body()).await;
    mount_json(
        server,
        &format!("{REPORT_PATH}/runs"),
        runs_page(&[state, "succeeded"], 1, 1, None),
    )
    .await;
    mount_json(server, SPACE_PATH, space_body()).await;
}

pub async fn mount_second_runs_page(server: &MockServer, states: &[&str]) {
    Mock::given(method("GET"))
        .and(path(format!("{REPORT_PATH}/runs")))
        .and(query_param("page", "2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(runs_page(states, 2, 2, None)))
        .with_priority(1)
        .mount(server)
        .await;
}

pub fn report_run_event_body(base_url: &str) -> Value {
    json!({
        "event": "report_run_completed",
        "report_run_url": format!("{base_url}{RUN_PATH}")
    })
}

/// API Gateway proxy event wrapping a webhook body.
pub fn gateway_event(body: &Value) -> Value {
    json!({
        "headers": {"content-type": "application/json"},
        "body": body.to_string(),
        "isBase64Encoded": false
    })
}

// ============================================================================
// Enriched fixtures for formatter tests
// ============================================================================

pub fn report_fixture(id: i64, consecutive_run_failures: u64) -> Report {
    serde_json::from_value(json!({
        "id": id,
        "name": "Revenue",
        "space_token": "SPACE1",
        "creator": "jdoe",
        "consecutive_run_failures": consecutive_run_failures,
        "url": "https://modeanalytics.com/acme/reports/REPORT1"
    }))
    .expect("report fixture")
}

pub fn space_fixture() -> Space {
    serde_json::from_value(json!({
        "id": 7,
        "name": "Finance",
        "url": "https://modeanalytics.com/acme/spaces/SPACE1"
    }))
    .expect("space fixture")
}

pub fn report_run_fixture(state: &str, duration: Option<i64>, results: Value) -> ReportRun {
    serde_json::from_value(json!({
        "executed_by": "jdoe",
        "state": state,
        "parameters": {},
        "form_fields": [],
        "execution_duration": duration,
        "token": "RUN123",
        "results": results,
        "url": "https://modeanalytics.com/acme/reports/REPORT1/runs/RUN123"
    }))
    .expect("report run fixture")
}

pub fn report_run_result(
    state: &str,
    duration: Option<i64>,
    results: Value,
    failures: u64,
) -> EnrichedResult {
    EnrichedResult::ReportRun {
        report_run: report_run_fixture(state, duration, results),
        report: report_fixture(42, failures),
        space: space_fixture(),
    }
}

pub fn definition_result() -> EnrichedResult {
    EnrichedResult::Definition {
        definition: serde_json::from_value::<Definition>(json!({
            "id": 3,
            "name": "Active users",
            "token": "DEF1",
            "creator": "jdoe",
            "url": "https://modeanalytics.com/editor/acme/definitions/DEF1"
        }))
        .expect("definition fixture"),
    }
}

pub fn connection_result(vendor: Option<&str>) -> EnrichedResult {
    EnrichedResult::Connection {
        connection: serde_json::from_value::<Connection>(json!({
            "id": 4,
            "name": "Warehouse",
            "token": "CONN1",
            "vendor": vendor,
            "provider": "aws",
            "url": "https://modeanalytics.com/organizations/acme/data_sources/CONN1"
        }))
        .expect("connection fixture"),
    }
}

pub fn membership_result() -> EnrichedResult {
    EnrichedResult::Membership {
        membership: Membership {
            admin: false,
            limited: false,
            token: "MEM1".into(),
        },
        user: serde_json::from_value::<User>(json!({
            "id": 1,
            "name": "Jane Doe",
            "token": "u1",
            "username": "jdoe",
            "url": "https://modeanalytics.com/jdoe"
        }))
        .expect("user fixture"),
        organization: serde_json::from_value::<Organization>(json!({
            "id": 2,
            "name": "Acme",
            "token": "o1",
            "username": "acme",
            "url": "https://modeanalytics.com/acme"
        }))
        .expect("organization fixture"),
    }
}
