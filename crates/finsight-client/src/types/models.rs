/*
[INPUT]:  Backend identifiers and analysis state payloads
[OUTPUT]: Domain models shared by the HTTP layer and its consumers
[POS]:    Data layer - core model definitions
[UPDATE]: When the backend schema changes or new models are added
*/

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::types::TaskStatus;

/// Opaque identifier of one server-side analysis task.
///
/// Assigned by the server at submission time and never reinterpreted
/// client-side.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TaskId(String);

impl TaskId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TaskId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<String> for TaskId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl From<&str> for TaskId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

/// One status fetch for a task, with the status already validated against
/// the closed [`TaskStatus`] set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnalysisStatus {
    pub task_id: TaskId,
    pub status: TaskStatus,
    pub filename: Option<String>,
    pub query: Option<String>,
    pub result: Option<String>,
    pub error: Option<String>,
}

/// One entry of the analysis history listing.
///
/// GET /documents returns these newest-first; the listing only exists to
/// seed observation of a historical task.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentRecord {
    pub id: String,
    pub filename: String,
    pub content_type: String,
    #[serde(default)]
    pub query: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    pub upload_date: DateTime<Utc>,
    pub analysis_task_id: Option<TaskId>,
}
