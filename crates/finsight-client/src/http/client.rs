/*
[INPUT]:  HTTP configuration (base URL, timeouts, bearer credential)
[OUTPUT]: Configured reqwest client ready for API calls
[POS]:    HTTP layer - core client implementation
[UPDATE]: When adding connection options or changing client behavior
*/

use std::time::Duration;

use reqwest::{Client, Method, RequestBuilder, Url};
use serde::de::DeserializeOwned;

use crate::http::{FinsightError, Result};

/// Default base URL of the analysis backend
const DEFAULT_BASE_URL: &str = "http://localhost:8000/api/v1";

/// HTTP client configuration
#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub timeout: Duration,
    pub connect_timeout: Duration,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(30),
            connect_timeout: Duration::from_secs(10),
        }
    }
}

/// Bearer credential for authenticated requests.
///
/// Persisting and refreshing the token is the hosting application's job;
/// the client only carries whatever it was handed.
#[derive(Debug, Clone)]
pub struct Credentials {
    pub bearer_token: String,
}

/// Main HTTP client for the analysis backend
#[derive(Debug)]
pub struct FinsightClient {
    http_client: Client,
    base_url: Url,
    credentials: Option<Credentials>,
}

impl FinsightClient {
    /// Create a new client with default configuration
    pub fn new() -> Result<Self> {
        Self::with_config(ClientConfig::default())
    }

    /// Create a new client with custom configuration
    pub fn with_config(config: ClientConfig) -> Result<Self> {
        Self::with_config_and_base_url(config, DEFAULT_BASE_URL)
    }

    /// Create a new client against an explicit base URL
    pub fn with_config_and_base_url(config: ClientConfig, base_url: &str) -> Result<Self> {
        let http_client = Client::builder()
            .timeout(config.timeout)
            .connect_timeout(config.connect_timeout)
            .build()?;

        Ok(Self {
            http_client,
            base_url: Url::parse(base_url.trim_end_matches('/'))?,
            credentials: None,
        })
    }

    /// Set the bearer credential for authenticated requests
    pub fn set_credentials(&mut self, credentials: Credentials) {
        self.credentials = Some(credentials);
    }

    /// Drop the bearer credential
    pub fn clear_credentials(&mut self) {
        self.credentials = None;
    }

    /// Get the credential if set
    pub fn credentials(&self) -> Option<&Credentials> {
        self.credentials.as_ref()
    }

    /// Build the full URL for an endpoint path.
    ///
    /// The base URL may carry a path prefix (`/api/v1`), so joining is done
    /// textually rather than via `Url::join`, which would discard it.
    fn endpoint_url(&self, endpoint: &str) -> Result<Url> {
        let full = format!("{}{}", self.base_url.as_str().trim_end_matches('/'), endpoint);
        Ok(Url::parse(&full)?)
    }

    /// Build a request builder for an unauthenticated endpoint
    pub(crate) fn request(&self, method: Method, endpoint: &str) -> Result<RequestBuilder> {
        let url = self.endpoint_url(endpoint)?;
        Ok(self.http_client.request(method, url))
    }

    /// Build a request builder carrying the bearer credential.
    ///
    /// Fails with the auth variant when no credential is set, so callers get
    /// the same error class a server-side 401 produces.
    pub(crate) fn authed_request(&self, method: Method, endpoint: &str) -> Result<RequestBuilder> {
        let credentials = self
            .credentials
            .as_ref()
            .ok_or_else(|| FinsightError::Unauthorized {
                message: "no bearer credential set".to_string(),
            })?;

        Ok(self
            .request(method, endpoint)?
            .bearer_auth(&credentials.bearer_token))
    }

    /// Send a request and decode a JSON body, mapping error responses.
    pub(crate) async fn send_json<T: DeserializeOwned>(
        &self,
        builder: RequestBuilder,
    ) -> Result<T> {
        let response = builder.send().await?;
        let status = response.status();

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let message = error_detail(&body);
            tracing::warn!(status = status.as_u16(), "request rejected: {message}");
            return Err(FinsightError::from_response(status, message));
        }

        Ok(response.json::<T>().await?)
    }
}

/// Extract the backend's `detail` message from an error body, falling back
/// to the raw body text.
fn error_detail(body: &str) -> String {
    serde_json::from_str::<serde_json::Value>(body)
        .ok()
        .and_then(|value| {
            value
                .get("detail")
                .and_then(|detail| detail.as_str())
                .map(str::to_string)
        })
        .unwrap_or_else(|| body.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use reqwest::StatusCode;

    #[test]
    fn test_client_creation() {
        let client = FinsightClient::new().unwrap();
        assert!(client.credentials().is_none());
    }

    #[test]
    fn test_credentials_roundtrip() {
        let mut client = FinsightClient::new().unwrap();
        client.set_credentials(Credentials {
            bearer_token: "jwt-token".to_string(),
        });
        assert_eq!(
            client.credentials().map(|c| c.bearer_token.as_str()),
            Some("jwt-token")
        );

        client.clear_credentials();
        assert!(client.credentials().is_none());
    }

    #[test]
    fn test_authed_request_without_credential_fails() {
        let client = FinsightClient::new().unwrap();
        let err = client.authed_request(Method::GET, "/users/me").unwrap_err();
        assert!(err.is_auth_error());
    }

    #[test]
    fn test_endpoint_url_keeps_base_path() {
        let client = FinsightClient::with_config_and_base_url(
            ClientConfig::default(),
            "http://localhost:8000/api/v1",
        )
        .unwrap();
        let url = client.endpoint_url("/analysis/t-1").unwrap();
        assert_eq!(url.as_str(), "http://localhost:8000/api/v1/analysis/t-1");
    }

    #[test]
    fn test_error_detail_extraction() {
        assert_eq!(
            error_detail(r#"{"detail": "Only PDF files are allowed"}"#),
            "Only PDF files are allowed"
        );
        assert_eq!(error_detail("plain text"), "plain text");
    }

    #[test]
    fn test_from_response_used_by_send_json() {
        let err = FinsightError::from_response(StatusCode::UNAUTHORIZED, "expired");
        assert!(err.is_auth_error());
    }
}
