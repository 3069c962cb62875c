/*
[INPUT]:  Document payloads and task identifiers
[OUTPUT]: Task ids and status snapshots from the analysis backend
[POS]:    Core layer - transport seam (submission gateway + status client)
[UPDATE]: When the transport contract changes
*/

use async_trait::async_trait;
use finsight_client::{AnalysisStatus, FinsightClient, FinsightError, TaskId, TaskStatus};

use crate::snapshot::{AnalysisOutcome, StatusSnapshot};

/// A document plus its free-form analysis instruction.
#[derive(Debug, Clone)]
pub struct AnalysisRequest {
    pub filename: String,
    pub content: Vec<u8>,
    pub query: String,
}

/// The authenticated transport capability the coordinator is built on.
///
/// Covers exactly the two remote operations the lifecycle needs: submitting
/// a document and fetching one task's status. The real implementation is
/// [`FinsightClient`]; tests substitute scripted doubles.
#[async_trait]
pub trait AnalysisApi: Send + Sync + 'static {
    /// Submit a document for analysis; returns the task id that seeds
    /// observation. Does not start polling.
    async fn submit(&self, request: AnalysisRequest) -> Result<TaskId, FinsightError>;

    /// Fetch the current status of one task.
    async fn fetch_status(&self, task_id: &TaskId) -> Result<StatusSnapshot, FinsightError>;
}

#[async_trait]
impl AnalysisApi for FinsightClient {
    async fn submit(&self, request: AnalysisRequest) -> Result<TaskId, FinsightError> {
        let response = self
            .upload_document(&request.filename, request.content, &request.query)
            .await?;
        Ok(response.task_id)
    }

    async fn fetch_status(&self, task_id: &TaskId) -> Result<StatusSnapshot, FinsightError> {
        let status = self.fetch_analysis_status(task_id).await?;
        Ok(snapshot_from_status(status))
    }
}

/// Build the immutable snapshot, attaching a terminal payload only for
/// terminal statuses.
fn snapshot_from_status(status: AnalysisStatus) -> StatusSnapshot {
    let outcome = match status.status {
        TaskStatus::Completed => Some(AnalysisOutcome::Report(
            status.result.unwrap_or_default(),
        )),
        TaskStatus::Failed => Some(AnalysisOutcome::Error(
            status
                .error
                .unwrap_or_else(|| "analysis failed for an unknown reason".to_string()),
        )),
        TaskStatus::Pending | TaskStatus::InProgress => None,
    };

    StatusSnapshot {
        task_id: status.task_id,
        status: status.status,
        filename: status.filename,
        query: status.query,
        outcome,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn status(kind: TaskStatus) -> AnalysisStatus {
        AnalysisStatus {
            task_id: TaskId::from("t-1"),
            status: kind,
            filename: Some("q3.pdf".to_string()),
            query: Some("summarize".to_string()),
            result: None,
            error: None,
        }
    }

    #[test]
    fn test_non_terminal_status_has_no_outcome() {
        for kind in [TaskStatus::Pending, TaskStatus::InProgress] {
            let mut raw = status(kind);
            // Even if the server leaks a payload early, non-terminal
            // snapshots never carry one.
            raw.result = Some("partial".to_string());
            let snapshot = snapshot_from_status(raw);
            assert!(snapshot.outcome.is_none());
        }
    }

    #[test]
    fn test_completed_status_carries_report() {
        let mut raw = status(TaskStatus::Completed);
        raw.result = Some("report text".to_string());
        let snapshot = snapshot_from_status(raw);
        assert_eq!(
            snapshot.outcome,
            Some(AnalysisOutcome::Report("report text".to_string()))
        );
    }

    #[test]
    fn test_failed_status_carries_error_with_fallback() {
        let mut raw = status(TaskStatus::Failed);
        raw.error = Some("worker crashed".to_string());
        let snapshot = snapshot_from_status(raw);
        assert_eq!(
            snapshot.outcome,
            Some(AnalysisOutcome::Error("worker crashed".to_string()))
        );

        let raw = status(TaskStatus::Failed);
        let snapshot = snapshot_from_status(raw);
        assert_eq!(
            snapshot.outcome,
            Some(AnalysisOutcome::Error(
                "analysis failed for an unknown reason".to_string()
            ))
        );
    }
}
