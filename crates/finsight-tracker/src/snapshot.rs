/*
[INPUT]:  Validated status fetches from the analysis backend
[OUTPUT]: Immutable snapshot values and the published observation state
[POS]:    Core layer - observable state definitions
[UPDATE]: When the published-state contract changes
*/

use finsight_client::{TaskId, TaskStatus};
use serde::Serialize;

/// Terminal payload of an analysis task: the report text on success, the
/// failure description otherwise.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum AnalysisOutcome {
    Report(String),
    Error(String),
}

/// One complete observation of a task.
///
/// Snapshots are replaced wholesale; readers never see fields mixed from
/// two different fetches. `outcome` is populated exactly when the status is
/// terminal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StatusSnapshot {
    pub task_id: TaskId,
    pub status: TaskStatus,
    pub filename: Option<String>,
    pub query: Option<String>,
    pub outcome: Option<AnalysisOutcome>,
}

impl StatusSnapshot {
    /// The state published immediately on (re)binding a task, before the
    /// first fetch lands.
    pub fn placeholder(task_id: TaskId) -> Self {
        Self {
            task_id,
            status: TaskStatus::Pending,
            filename: None,
            query: None,
            outcome: None,
        }
    }

    pub fn is_terminal(&self) -> bool {
        self.status.is_terminal()
    }
}

/// The single externally observable slot the coordinator publishes into.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub enum WatchState {
    /// Nothing observed yet, or observation explicitly shut down
    #[default]
    Idle,
    /// The last submission failed before a task id existed
    SubmissionFailed { message: String },
    /// Observing a task; carries the latest accepted snapshot
    Watching(StatusSnapshot),
}

impl WatchState {
    pub fn snapshot(&self) -> Option<&StatusSnapshot> {
        match self {
            WatchState::Watching(snapshot) => Some(snapshot),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_placeholder_is_pending_without_outcome() {
        let snapshot = StatusSnapshot::placeholder(TaskId::from("t-1"));
        assert_eq!(snapshot.status, TaskStatus::Pending);
        assert!(snapshot.outcome.is_none());
        assert!(!snapshot.is_terminal());
    }

    #[test]
    fn test_watch_state_snapshot_accessor() {
        assert!(WatchState::Idle.snapshot().is_none());
        assert!(
            WatchState::SubmissionFailed {
                message: "upload failed".to_string()
            }
            .snapshot()
            .is_none()
        );

        let snapshot = StatusSnapshot::placeholder(TaskId::from("t-1"));
        let state = WatchState::Watching(snapshot.clone());
        assert_eq!(state.snapshot(), Some(&snapshot));
    }
}
