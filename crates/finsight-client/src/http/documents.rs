/*
[INPUT]:  Document payloads and bearer authentication
[OUTPUT]: Upload acknowledgements and the analysis history listing
[POS]:    HTTP layer - document submission and history endpoints
[UPDATE]: When the upload contract or listing shape changes
*/

use reqwest::Method;
use reqwest::multipart::{Form, Part};

use crate::http::{FinsightClient, Result};
use crate::types::{DocumentRecord, UploadResponse};

impl FinsightClient {
    /// Submit a document for analysis.
    ///
    /// POST /documents/upload (multipart, 202 Accepted)
    ///
    /// The server stores the document, enqueues the analysis job, and echoes
    /// the task id that polling binds to. Submission itself never starts
    /// polling.
    pub async fn upload_document(
        &self,
        filename: &str,
        content: Vec<u8>,
        query: &str,
    ) -> Result<UploadResponse> {
        let file_part = Part::bytes(content)
            .file_name(filename.to_string())
            .mime_str("application/pdf")?;
        let form = Form::new()
            .part("file", file_part)
            .text("query", query.to_string());

        let builder = self
            .authed_request(Method::POST, "/documents/upload")?
            .multipart(form);
        let response: UploadResponse = self.send_json(builder).await?;
        tracing::debug!(task_id = %response.task_id, "document accepted for analysis");
        Ok(response)
    }

    /// Fetch the analysis history, newest first.
    ///
    /// GET /documents
    pub async fn list_documents(&self) -> Result<Vec<DocumentRecord>> {
        let builder = self.authed_request(Method::GET, "/documents")?;
        self.send_json(builder).await
    }
}
