/*
[INPUT]:  User credentials (email/password) and bearer tokens
[OUTPUT]: Login tokens and user profiles
[POS]:    HTTP layer - authentication endpoints
[UPDATE]: When auth endpoints or token exchange shape change
*/

use reqwest::Method;
use serde_json::json;

use crate::http::{FinsightClient, Result};
use crate::types::{LoginResponse, UserProfile};

impl FinsightClient {
    /// Exchange email/password for a bearer token
    ///
    /// POST /auth/token (form-urlencoded, OAuth2 password grant shape)
    pub async fn login(&self, email: &str, password: &str) -> Result<LoginResponse> {
        let params = [("username", email), ("password", password)];
        let builder = self.request(Method::POST, "/auth/token")?.form(&params);
        self.send_json(builder).await
    }

    /// Register a new account
    ///
    /// POST /auth/register
    pub async fn register(
        &self,
        email: &str,
        full_name: &str,
        password: &str,
    ) -> Result<UserProfile> {
        let body = json!({
            "email": email,
            "full_name": full_name,
            "password": password,
        });
        let builder = self.request(Method::POST, "/auth/register")?.json(&body);
        self.send_json(builder).await
    }

    /// Fetch the profile of the authenticated user
    ///
    /// GET /users/me
    pub async fn me(&self) -> Result<UserProfile> {
        let builder = self.authed_request(Method::GET, "/users/me")?;
        self.send_json(builder).await
    }
}

#[cfg(test)]
mod tests {
    use crate::http::{ClientConfig, Credentials, FinsightClient};
    use wiremock::matchers::{body_string_contains, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    async fn test_client(server: &MockServer) -> FinsightClient {
        FinsightClient::with_config_and_base_url(ClientConfig::default(), &server.uri())
            .expect("client init")
    }

    #[tokio::test]
    async fn test_login_sends_form_and_parses_token() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/auth/token"))
            .and(header("content-type", "application/x-www-form-urlencoded"))
            .and(body_string_contains("username=user%40example.com"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "access_token": "jwt-token",
                "token_type": "bearer",
            })))
            .expect(1)
            .mount(&server)
            .await;

        let client = test_client(&server).await;
        let login = client.login("user@example.com", "hunter2").await.unwrap();
        assert_eq!(login.access_token, "jwt-token");
        assert_eq!(login.token_type, "bearer");
    }

    #[tokio::test]
    async fn test_login_rejected_maps_to_auth_error() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/auth/token"))
            .respond_with(ResponseTemplate::new(401).set_body_json(serde_json::json!({
                "detail": "Incorrect email or password",
            })))
            .expect(1)
            .mount(&server)
            .await;

        let client = test_client(&server).await;
        let err = client.login("user@example.com", "wrong").await.unwrap_err();
        assert!(err.is_auth_error());
    }

    #[tokio::test]
    async fn test_me_carries_bearer_header() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/users/me"))
            .and(header("authorization", "Bearer jwt-token"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "id": "u-1",
                "email": "user@example.com",
                "full_name": "Test User",
            })))
            .expect(1)
            .mount(&server)
            .await;

        let mut client = test_client(&server).await;
        client.set_credentials(Credentials {
            bearer_token: "jwt-token".to_string(),
        });

        let profile = client.me().await.unwrap();
        assert_eq!(profile.email, "user@example.com");
    }
}
