/*
[INPUT]:  Raw JSON bodies from the analysis backend
[OUTPUT]: Deserializable response structs
[POS]:    Data layer - wire response definitions
[UPDATE]: When backend response bodies change
*/

use serde::Deserialize;

use crate::types::TaskId;

/// Response from POST /documents/upload (202 Accepted).
#[derive(Debug, Clone, Deserialize)]
pub struct UploadResponse {
    pub message: String,
    pub document_id: String,
    pub task_id: TaskId,
}

/// Raw body of GET /analysis/{task_id}.
///
/// `status` stays a string here: validation against the closed status set
/// happens in the HTTP layer so an out-of-set value surfaces as a protocol
/// violation rather than a deserialization failure.
#[derive(Debug, Clone, Deserialize)]
pub struct AnalysisStatusResponse {
    pub task_id: String,
    pub status: String,
    #[serde(default)]
    pub filename: Option<String>,
    #[serde(default)]
    pub query: Option<String>,
    #[serde(default)]
    pub result: Option<String>,
    #[serde(default)]
    pub error: Option<String>,
}

/// Response from POST /auth/token.
#[derive(Debug, Clone, Deserialize)]
pub struct LoginResponse {
    pub access_token: String,
    pub token_type: String,
}

/// Response from POST /auth/register and GET /users/me.
#[derive(Debug, Clone, Deserialize)]
pub struct UserProfile {
    pub id: String,
    pub email: String,
    pub full_name: String,
}
