use hookrich::api::parsing::{extract_body, parse_webhook_event};
use hookrich::core::events::{EventKind, Scope, WebhookEvent};
use hookrich::errors::HookError;
use serde_json::json;

#[test]
fn every_event_has_a_url_field_and_scope() {
    let expected = [
        ("report_created", "report_url", Scope::Report),
        ("report_run_started", "report_run_url", Scope::ReportRun),
        ("report_run_completed", "report_run_url", Scope::ReportRun),
        ("definition_created", "definition_url", Scope::Definition),
        ("definition_updated", "definition_url", Scope::Definition),
        ("new_database_connection", "connection_url", Scope::Connection),
        ("member_joined_organization", "member_url", Scope::Membership),
    ];
    assert_eq!(EventKind::ALL.len(), expected.len());

    for (name, url_field, scope) in expected {
        let kind = EventKind::parse(name).expect("known event");
        assert_eq!(kind.as_str(), name);
        assert_eq!(kind.url_field(), url_field);
        assert_eq!(kind.scope(), scope);
    }
}

#[test]
fn resource_kinds_per_scope() {
    assert_eq!(
        Scope::ReportRun.resource_kinds(),
        &["report_run", "report", "space"]
    );
    assert_eq!(Scope::Report.resource_kinds(), &["report", "space"]);
    assert_eq!(Scope::Definition.resource_kinds(), &["definition"]);
    assert_eq!(Scope::Connection.resource_kinds(), &["connection"]);
    assert_eq!(
        Scope::Membership.resource_kinds(),
        &["membership", "user", "organization"]
    );
}

#[test]
fn webhook_event_from_body() {
    let event = WebhookEvent::from_body(&json!({
        "event": "report_run_completed",
        "report_run_url": "https://modeanalytics.com/api/acme/reports/R/runs/RUN123"
    }))
    .unwrap();
    assert_eq!(event.event, EventKind::ReportRunCompleted);
    assert_eq!(
        event.resource_url,
        "https://modeanalytics.com/api/acme/reports/R/runs/RUN123"
    );
}

#[test]
fn webhook_event_rejects_unknown_event() {
    let err = WebhookEvent::from_body(&json!({"event": "report_deleted", "report_url": "x"}))
        .unwrap_err();
    assert!(matches!(err, HookError::InvalidEvent(ref m) if m.contains("report_deleted")));
}

#[test]
fn webhook_event_requires_the_events_url_field() {
    // definition events carry `definition_url`, not `report_url`
    let err = WebhookEvent::from_body(&json!({
        "event": "definition_created",
        "report_url": "https://modeanalytics.com/api/acme/reports/R"
    }))
    .unwrap_err();
    assert!(matches!(err, HookError::InvalidEvent(ref m) if m.contains("definition_url")));

    let err = WebhookEvent::from_body(&json!({"report_url": "x"})).unwrap_err();
    assert!(err.is_client_error());
}

#[test]
fn webhook_event_from_json_rejects_garbage() {
    assert!(matches!(
        WebhookEvent::from_json("not json"),
        Err(HookError::InvalidEvent(_))
    ));
}

#[test]
fn extract_body_from_gateway_string() {
    let payload = json!({"body": "{\"event\":\"report_created\",\"report_url\":\"u\"}"});
    assert_eq!(
        extract_body(&payload).unwrap(),
        json!({"event": "report_created", "report_url": "u"})
    );
}

#[test]
fn extract_body_from_base64() {
    // {"event":"report_created","report_url":"u"}
    let payload = json!({
        "body": "eyJldmVudCI6InJlcG9ydF9jcmVhdGVkIiwicmVwb3J0X3VybCI6InUifQ==",
        "isBase64Encoded": true
    });
    let event = parse_webhook_event(&payload).unwrap();
    assert_eq!(event.event, EventKind::ReportCreated);
    assert_eq!(event.resource_url, "u");
}

#[test]
fn extract_body_from_direct_invocation() {
    let payload = json!({"event": "report_created", "report_url": "u"});
    assert_eq!(extract_body(&payload).unwrap(), payload);
}

#[test]
fn extract_body_errors() {
    assert!(matches!(
        extract_body(&json!({"headers": {}})),
        Err(HookError::InvalidEvent(_))
    ));
    assert!(matches!(
        extract_body(&json!({"body": 12})),
        Err(HookError::InvalidEvent(_))
    ));
    assert!(matches!(
        extract_body(&json!({"body": "{oops"})),
        Err(HookError::InvalidEvent(_))
    ));
}
