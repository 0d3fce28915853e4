use serde::Serialize;
use serde_json::Value;

use crate::enrich::resources::QueryRun;
use crate::errors::HookError;

/// One CSV line. Field order is the column order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct QueryRunRow {
    pub query_token: String,
    pub state: String,
    pub created_at: String,
    pub completed_at: String,
    pub raw_source: String,
    pub parameters: String,
}

impl QueryRunRow {
    pub const COLUMNS: [&'static str; 6] = [
        "query_token",
        "state",
        "created_at",
        "completed_at",
        "raw_source",
        "parameters",
    ];

    pub fn from_query_run(run: &QueryRun) -> Result<Self, HookError> {
        let query_token = run
            .query_token
            .clone()
            .ok_or_else(|| HookError::missing_field("query_run", "query_token"))?;
        let state = run
            .state
            .clone()
            .ok_or_else(|| HookError::missing_field("query_run", "state"))?;

        Ok(Self {
            query_token,
            state,
            created_at: run.created_at.clone().unwrap_or_default(),
            completed_at: run.completed_at.clone().unwrap_or_default(),
            raw_source: flatten_source(run.raw_source.as_deref().unwrap_or_default()),
            parameters: match &run.parameters {
                None | Some(Value::Null) => String::new(),
                Some(params) => params.to_string(),
            },
        })
    }
}

/// Put a SQL source on one line: newlines become spaces and four-space
/// indents are dropped.
#[must_use]
pub fn flatten_source(source: &str) -> String {
    source.replace("\r\n", " ").replace('\n', " ").replace("    ", "")
}

pub fn query_run_rows(runs: &[QueryRun]) -> Result<Vec<QueryRunRow>, HookError> {
    runs.iter().map(QueryRunRow::from_query_run).collect()
}

/// Encode rows as CSV without a header line.
pub fn encode_rows(rows: &[QueryRunRow]) -> Result<Vec<u8>, HookError> {
    let mut writer = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(Vec::new());
    for row in rows {
        writer
            .serialize(row)
            .map_err(|e| HookError::FormatError(format!("failed to encode CSV row: {e}")))?;
    }
    writer
        .into_inner()
        .map_err(|e| HookError::FormatError(format!("failed to flush CSV rows: {e}")))
}
