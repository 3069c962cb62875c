/*
[INPUT]:  Status strings from the analysis backend (canonical and Celery-style)
[OUTPUT]: Closed TaskStatus set with terminality queries
[POS]:    Data layer - analysis task state
[UPDATE]: When the backend introduces new task states
*/

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// State of one server-side analysis task.
///
/// The set is closed: anything the server sends outside of it is a protocol
/// violation, not a new state. Transitions are monotonic; `Completed` and
/// `Failed` are terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskStatus {
    #[serde(alias = "PENDING")]
    Pending,
    #[serde(alias = "STARTED")]
    InProgress,
    #[serde(alias = "SUCCESS")]
    Completed,
    #[serde(alias = "FAILURE")]
    Failed,
}

impl TaskStatus {
    /// Terminal statuses never transition again.
    pub fn is_terminal(self) -> bool {
        matches!(self, TaskStatus::Completed | TaskStatus::Failed)
    }

    /// Canonical wire name.
    pub fn as_str(self) -> &'static str {
        match self {
            TaskStatus::Pending => "pending",
            TaskStatus::InProgress => "in_progress",
            TaskStatus::Completed => "completed",
            TaskStatus::Failed => "failed",
        }
    }
}

impl fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Parse error for status values outside the closed set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownStatus(pub String);

impl FromStr for TaskStatus {
    type Err = UnknownStatus;

    /// Accepts the canonical names plus the Celery-style names the backend's
    /// task queue reports (`PENDING`, `STARTED`, `SUCCESS`, `FAILURE`).
    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "pending" | "PENDING" => Ok(TaskStatus::Pending),
            "in_progress" | "STARTED" => Ok(TaskStatus::InProgress),
            "completed" | "SUCCESS" => Ok(TaskStatus::Completed),
            "failed" | "FAILURE" => Ok(TaskStatus::Failed),
            other => Err(UnknownStatus(other.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("pending", TaskStatus::Pending)]
    #[case("PENDING", TaskStatus::Pending)]
    #[case("in_progress", TaskStatus::InProgress)]
    #[case("STARTED", TaskStatus::InProgress)]
    #[case("completed", TaskStatus::Completed)]
    #[case("SUCCESS", TaskStatus::Completed)]
    #[case("failed", TaskStatus::Failed)]
    #[case("FAILURE", TaskStatus::Failed)]
    fn test_status_parsing(#[case] wire: &str, #[case] expected: TaskStatus) {
        assert_eq!(wire.parse::<TaskStatus>().unwrap(), expected);
    }

    #[rstest]
    #[case("RETRY")]
    #[case("Pending")]
    #[case("")]
    #[case("done")]
    fn test_status_parsing_rejects_unknown(#[case] wire: &str) {
        let err = wire.parse::<TaskStatus>().unwrap_err();
        assert_eq!(err, UnknownStatus(wire.to_string()));
    }

    #[test]
    fn test_terminality() {
        assert!(!TaskStatus::Pending.is_terminal());
        assert!(!TaskStatus::InProgress.is_terminal());
        assert!(TaskStatus::Completed.is_terminal());
        assert!(TaskStatus::Failed.is_terminal());
    }
}
