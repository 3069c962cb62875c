/*
[INPUT]:  Task identifiers and bearer authentication
[OUTPUT]: Validated analysis status snapshots
[POS]:    HTTP layer - task status endpoint
[UPDATE]: When the status contract or the closed status set changes
*/

use reqwest::Method;

use crate::http::{FinsightClient, FinsightError, Result};
use crate::types::{AnalysisStatus, AnalysisStatusResponse, TaskId, TaskStatus};

impl FinsightClient {
    /// Fetch the status of one analysis task.
    ///
    /// GET /analysis/{task_id}
    ///
    /// A status value outside the closed set fails with `MalformedStatus`,
    /// which callers treat like a transient fetch failure.
    pub async fn fetch_analysis_status(&self, task_id: &TaskId) -> Result<AnalysisStatus> {
        let endpoint = format!("/analysis/{task_id}");
        let builder = self.authed_request(Method::GET, &endpoint)?;
        let raw: AnalysisStatusResponse = self.send_json(builder).await?;

        let status = raw
            .status
            .parse::<TaskStatus>()
            .map_err(|unknown| FinsightError::MalformedStatus { value: unknown.0 })?;

        Ok(AnalysisStatus {
            task_id: TaskId::from(raw.task_id),
            status,
            filename: raw.filename,
            query: raw.query,
            result: raw.result,
            error: raw.error,
        })
    }
}
