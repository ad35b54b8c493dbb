//! Client for the hosted auth service.
//!
//! Credentials are checked by the backend's auth endpoint (password grant); this module
//! only sends them and maps the answer. Nothing here stores tokens: the portal keeps the
//! authenticated identity as a session marker in the local store instead.

use crate::{
    config::auth::AuthSettings,
    errors::{Error, Result},
};
use serde::{Deserialize, Serialize};
use std::future::Future;

/// Account returned by a successful sign-in
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct AuthUser {
    pub id: String,
    #[serde(default)]
    pub email: Option<String>,
}

/// Something that can verify an email/password pair.
pub trait AuthProvider {
    /// Returns the authenticated account or [`Error::Authentication`].
    fn sign_in_with_password(
        &self,
        email: &str,
        password: &str,
    ) -> impl Future<Output = Result<AuthUser>> + Send;
}

#[derive(Serialize)]
struct PasswordGrant<'a> {
    email: &'a str,
    password: &'a str,
}

#[derive(Deserialize)]
struct TokenResponse {
    user: AuthUser,
}

#[derive(Deserialize, Default)]
struct AuthErrorBody {
    error_description: Option<String>,
    msg: Option<String>,
    message: Option<String>,
    error: Option<String>,
}

/// `reqwest` based client for the hosted auth REST API.
#[derive(Debug, Clone)]
pub struct HostedAuthClient {
    http: reqwest::Client,
    settings: AuthSettings,
}

impl HostedAuthClient {
    #[must_use]
    pub fn new(settings: AuthSettings) -> Self {
        Self {
            http: reqwest::Client::new(),
            settings,
        }
    }

    fn token_url(&self) -> String {
        format!("{}/auth/v1/token?grant_type=password", self.settings.base_url)
    }
}

impl AuthProvider for HostedAuthClient {
    async fn sign_in_with_password(&self, email: &str, password: &str) -> Result<AuthUser> {
        let response = self
            .http
            .post(self.token_url())
            .header("apikey", &self.settings.anon_key)
            .json(&PasswordGrant { email, password })
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;
        tracing::debug!(%status, "Auth service answered password grant");
        parse_token_response(status.is_success(), &body)
    }
}

/// Maps a token endpoint response body to an [`AuthUser`].
fn parse_token_response(success: bool, body: &str) -> Result<AuthUser> {
    if success {
        let token: TokenResponse = serde_json::from_str(body)?;
        return Ok(token.user);
    }

    let error: AuthErrorBody = serde_json::from_str(body).unwrap_or_default();
    let message = error
        .error_description
        .or(error.msg)
        .or(error.message)
        .or(error.error)
        .unwrap_or_else(|| "unexpected response from auth service".to_string());
    Err(Error::Authentication { message })
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;

    #[test]
    fn test_parse_successful_grant() {
        let body = r#"{
            "access_token": "token",
            "token_type": "bearer",
            "user": { "id": "0b9c", "email": "ana@example.com", "aud": "authenticated" }
        }"#;

        let user = parse_token_response(true, body).unwrap();
        assert_eq!(user.id, "0b9c");
        assert_eq!(user.email.as_deref(), Some("ana@example.com"));
    }

    #[test]
    fn test_parse_invalid_credentials() {
        let body = r#"{"error":"invalid_grant","error_description":"Invalid login credentials"}"#;
        let result = parse_token_response(false, body);
        assert!(matches!(
            result,
            Err(Error::Authentication { ref message }) if message == "Invalid login credentials"
        ));
    }

    #[test]
    fn test_parse_error_with_msg_field() {
        let body = r#"{"code":400,"msg":"Email not confirmed"}"#;
        let result = parse_token_response(false, body);
        assert!(matches!(
            result,
            Err(Error::Authentication { ref message }) if message == "Email not confirmed"
        ));
    }

    #[test]
    fn test_parse_unreadable_error_body() {
        let result = parse_token_response(false, "<html>bad gateway</html>");
        assert!(matches!(result, Err(Error::Authentication { .. })));
    }

    #[test]
    fn test_token_url() {
        let settings =
            AuthSettings::new("https://backend.example".to_string(), "anon".to_string()).unwrap();
        let client = HostedAuthClient::new(settings);
        assert_eq!(
            client.token_url(),
            "https://backend.example/auth/v1/token?grant_type=password"
        );
    }
}
