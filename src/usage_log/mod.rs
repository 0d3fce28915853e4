//! CSV log of the query runs behind each completed report run.

pub mod rows;
pub mod writer;

pub use rows::{QueryRunRow, encode_rows, query_run_rows};
pub use writer::append_rows;

use std::path::Path;
use tracing::info;

use crate::clients::ModeClient;
use crate::enrich::event_url::join_path;
use crate::enrich::resources::{QueryRun, QueryRunsPage};
use crate::errors::HookError;

/// Fetch the query runs of a report run.
pub async fn fetch_query_runs(
    client: &ModeClient,
    report_run_url: &str,
) -> Result<Vec<QueryRun>, HookError> {
    let page: QueryRunsPage = client
        .get_json(&join_path(report_run_url, "query_runs"))
        .await?;
    Ok(page.embedded.query_runs)
}

/// Fetch, format and append the query runs of one report run. Returns the
/// number of rows written.
#[tracing::instrument(level = "info", skip(client))]
pub async fn log_report_run(
    client: &ModeClient,
    report_run_url: &str,
    log_path: &Path,
) -> Result<usize, HookError> {
    let query_runs = fetch_query_runs(client, report_run_url).await?;
    let rows = query_run_rows(&query_runs)?;
    let encoded = encode_rows(&rows)?;
    append_rows(log_path, &encoded).await?;

    info!(rows = rows.len(), path = %log_path.display(), "Logged query runs");
    Ok(rows.len())
}
