use chrono::DateTime;
use tracing::debug;

use super::event_url::join_path;
use super::resources::ReportRunsPage;
use crate::clients::ModeClient;
use crate::errors::HookError;

/// Upper bound on run-history pages read for the failure streak.
pub const MAX_RUN_PAGES: u32 = 10;

const SUCCEEDED: &str = "succeeded";

/// Whole seconds between two RFC 3339 timestamps, `None` if either is absent.
///
/// # Errors
///
/// Returns [`HookError::UpstreamError`] if a timestamp is present but malformed.
pub fn execution_duration(
    created_at: Option<&str>,
    completed_at: Option<&str>,
) -> Result<Option<i64>, HookError> {
    let (Some(created), Some(completed)) = (created_at, completed_at) else {
        return Ok(None);
    };
    let parse = |ts: &str| {
        DateTime::parse_from_rfc3339(ts).map_err(|e| {
            HookError::UpstreamError(format!("malformed timestamp `{ts}`: {e}"))
        })
    };
    Ok(Some((parse(completed)? - parse(created)?).num_seconds()))
}

/// Count the runs before the most recent success, given pages newest first.
///
/// Returns the count and whether a success was found.
#[must_use]
pub fn count_failures<'a>(states: impl IntoIterator<Item = &'a str>) -> (u64, bool) {
    let mut failures = 0;
    for state in states {
        if state == SUCCEEDED {
            return (failures, true);
        }
        failures += 1;
    }
    (failures, false)
}

/// Number of consecutive non-successful runs of a report, most recent first.
pub async fn consecutive_run_failures(
    client: &ModeClient,
    report_url: &str,
) -> Result<u64, HookError> {
    let mut url = join_path(report_url, "runs");
    let mut failures = 0;

    for pages_read in 1..=MAX_RUN_PAGES {
        let page: ReportRunsPage = client.get_json(&url).await?;
        let (count, found_success) =
            count_failures(page.embedded.report_runs.iter().map(|r| r.state.as_str()));
        failures += count;
        if found_success {
            break;
        }

        let last_page = page.pagination.total_pages.min(MAX_RUN_PAGES);
        match page.links.next_page {
            Some(next) if page.pagination.page < last_page && pages_read < MAX_RUN_PAGES => {
                url = client.absolute_url(&next.href);
            }
            _ => break,
        }
    }

    debug!(report_url = %report_url, failures, "Counted consecutive run failures");
    Ok(failures)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn duration_between_timestamps() {
        let d = execution_duration(
            Some("2024-03-01T10:00:00.000Z"),
            Some("2024-03-01T10:01:05.250Z"),
        )
        .unwrap();
        assert_eq!(d, Some(65));
    }

    #[test]
    fn duration_missing_completion() {
        assert_eq!(
            execution_duration(Some("2024-03-01T10:00:00.000Z"), None).unwrap(),
            None
        );
    }

    #[test]
    fn duration_rejects_garbage() {
        let err = execution_duration(Some("yesterday"), Some("2024-03-01T10:00:00Z")).unwrap_err();
        assert!(matches!(err, HookError::UpstreamError(_)));
    }

    #[test]
    fn failures_stop_at_first_success() {
        assert_eq!(
            count_failures(["failed", "failed", "succeeded", "failed"]),
            (2, true)
        );
        assert_eq!(count_failures(["succeeded"]), (0, true));
        assert_eq!(count_failures(["failed", "cancelled"]), (2, false));
    }
}
