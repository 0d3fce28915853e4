mod common;

use common::*;
use hookrich::clients::ModeClient;
use hookrich::errors::HookError;
use hookrich::usage_log::{QueryRunRow, append_rows, encode_rows, log_report_run};
use pretty_assertions::assert_eq;
use serde_json::{Value, json};
use wiremock::MockServer;

fn query_runs_body(runs: Value) -> Value {
    json!({"_embedded": {"query_runs": runs}})
}

async fn client_with_query_runs(server: &MockServer, runs: Value) -> ModeClient {
    mount_json(server, &format!("{RUN_PATH}/query_runs"), query_runs_body(runs)).await;
    ModeClient::new(&test_config(&server.uri(), &[]), reqwest::Client::new())
}

#[tokio::test]
async fn appends_one_line_per_query_run_without_header() {
    let server = MockServer::start().await;
    let client = client_with_query_runs(
        &server,
        json!([
            {
                "query_token": "q1",
                "state": "succeeded",
                "created_at": "2024-03-01T10:00:00Z",
                "completed_at": "2024-03-01T10:00:05Z",
                "raw_source": "SELECT *\n    FROM orders",
                "parameters": {"region": "emea"}
            },
            {
                "query_token": "q2",
                "state": "failed",
                "created_at": "2024-03-01T10:00:00Z",
                "completed_at": null,
                "raw_source": "SELECT 1",
                "parameters": null
            }
        ]),
    )
    .await;

    let dir = tempfile::tempdir().unwrap();
    let log_path = dir.path().join("report_query_runs.csv");
    let run_url = format!("{}{RUN_PATH}", server.uri());

    let written = log_report_run(&client, &run_url, &log_path).await.unwrap();
    assert_eq!(written, 2);

    let contents = std::fs::read_to_string(&log_path).unwrap();
    assert_eq!(
        contents,
        concat!(
            "q1,succeeded,2024-03-01T10:00:00Z,2024-03-01T10:00:05Z,SELECT * FROM orders,\"{\"\"region\"\":\"\"emea\"\"}\"\n",
            "q2,failed,2024-03-01T10:00:00Z,,SELECT 1,\n",
        )
    );
    assert!(!contents.contains(QueryRunRow::COLUMNS[0]));
}

#[tokio::test]
async fn repeated_runs_append_to_existing_log() {
    let server = MockServer::start().await;
    let client = client_with_query_runs(
        &server,
        json!([{"query_token": "q1", "state": "succeeded"}]),
    )
    .await;

    let dir = tempfile::tempdir().unwrap();
    let log_path = dir.path().join("log.csv");
    let run_url = format!("{}{RUN_PATH}", server.uri());

    log_report_run(&client, &run_url, &log_path).await.unwrap();
    log_report_run(&client, &run_url, &log_path).await.unwrap();

    let contents = std::fs::read_to_string(&log_path).unwrap();
    assert_eq!(contents, "q1,succeeded,,,,\nq1,succeeded,,,,\n");
}

#[tokio::test]
async fn run_without_query_runs_leaves_log_untouched() {
    let server = MockServer::start().await;
    let client = client_with_query_runs(&server, json!([])).await;

    let dir = tempfile::tempdir().unwrap();
    let log_path = dir.path().join("log.csv");
    let run_url = format!("{}{RUN_PATH}", server.uri());

    assert_eq!(log_report_run(&client, &run_url, &log_path).await.unwrap(), 0);
    assert!(!log_path.exists());
}

#[tokio::test]
async fn query_run_without_token_is_a_format_error() {
    let server = MockServer::start().await;
    let client = client_with_query_runs(&server, json!([{"state": "succeeded"}])).await;

    let dir = tempfile::tempdir().unwrap();
    let log_path = dir.path().join("log.csv");
    let run_url = format!("{}{RUN_PATH}", server.uri());

    let err = log_report_run(&client, &run_url, &log_path)
        .await
        .unwrap_err();
    assert!(matches!(err, HookError::FormatError(ref m) if m.contains("query_token")));
    assert!(!log_path.exists());
}

#[tokio::test]
async fn unwritable_log_is_a_delivery_error() {
    let server = MockServer::start().await;
    let client = client_with_query_runs(
        &server,
        json!([{"query_token": "q1", "state": "succeeded"}]),
    )
    .await;

    let dir = tempfile::tempdir().unwrap();
    let log_path = dir.path().join("missing").join("log.csv");
    let run_url = format!("{}{RUN_PATH}", server.uri());

    let err = log_report_run(&client, &run_url, &log_path)
        .await
        .unwrap_err();
    assert!(matches!(err, HookError::DeliveryError(_)));
}

fn encoded_block(token: &str, rows: usize) -> Vec<u8> {
    let rows: Vec<QueryRunRow> = (0..rows)
        .map(|i| QueryRunRow {
            query_token: token.to_string(),
            state: "succeeded".into(),
            created_at: i.to_string(),
            completed_at: String::new(),
            raw_source: format!("SELECT {}", "x".repeat(120)),
            parameters: String::new(),
        })
        .collect();
    encode_rows(&rows).unwrap()
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_appends_land_as_contiguous_blocks() {
    let dir = tempfile::tempdir().unwrap();
    let log_path = dir.path().join("log.csv");

    // several MiB each, well past a single buffered write
    let first = encoded_block("qa", 40_000);
    let second = encoded_block("qb", 40_000);

    let tasks = [first.clone(), second.clone()].map(|bytes| {
        let path = log_path.clone();
        tokio::spawn(async move { append_rows(&path, &bytes).await })
    });
    for task in tasks {
        task.await.unwrap().unwrap();
    }

    let contents = std::fs::read_to_string(&log_path).unwrap();
    assert_eq!(contents.len(), first.len() + second.len());

    let tokens: Vec<&str> = contents
        .lines()
        .map(|line| line.split(',').next().unwrap_or_default())
        .collect();
    assert_eq!(tokens.len(), 80_000);
    let switches = tokens.windows(2).filter(|pair| pair[0] != pair[1]).count();
    assert_eq!(switches, 1, "appends interleaved");
}
