//! Client for the hosted auth provider (GoTrue-compatible REST API).
//!
//! The provider owns credentials and sessions. This module only forwards
//! sign-in, password recovery, PKCE code exchange and sign-out, and exposes
//! them through the [`AuthProvider`] trait so handlers can be exercised
//! against an in-process fake.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Session issued by the provider after a successful sign-in or code exchange.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthSession {
    pub access_token: String,
    pub refresh_token: String,
    #[serde(default = "default_token_type")]
    pub token_type: String,
    /// Lifetime of the access token in seconds.
    pub expires_in: i64,
    /// Absolute expiry as a Unix timestamp, when the provider reports it.
    #[serde(default)]
    pub expires_at: Option<i64>,
    pub user: AuthUserInfo,
}

fn default_token_type() -> String {
    "bearer".to_string()
}

/// Subset of the provider's user record carried in a session.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthUserInfo {
    pub id: Uuid,
    #[serde(default)]
    pub email: Option<String>,
}

/// Errors from the auth provider client.
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    /// The HTTP request itself failed (network, DNS, TLS, timeout).
    #[error("Auth request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The provider refused the request (bad credentials, expired code, ...).
    #[error("Auth provider rejected the request ({status}): {message}")]
    Rejected { status: u16, message: String },

    /// The provider itself failed.
    #[error("Auth provider unavailable ({status}): {message}")]
    Unavailable { status: u16, message: String },
}

/// Operations the API needs from the auth provider.
#[async_trait]
pub trait AuthProvider: Send + Sync {
    /// Exchange an email and password for a session.
    async fn sign_in_with_password(
        &self,
        email: &str,
        password: &str,
    ) -> Result<AuthSession, AuthError>;

    /// Send a password-recovery email, optionally redirecting to `redirect_to`.
    async fn reset_password_for_email(
        &self,
        email: &str,
        redirect_to: Option<&str>,
    ) -> Result<(), AuthError>;

    /// Exchange a one-time PKCE authorization code for a session.
    async fn exchange_code_for_session(
        &self,
        code: &str,
        code_verifier: Option<&str>,
    ) -> Result<AuthSession, AuthError>;

    /// Revoke the session that owns `access_token`.
    async fn sign_out(&self, access_token: &str) -> Result<(), AuthError>;
}

/// REST client for a GoTrue-compatible provider.
pub struct GoTrueClient {
    client: reqwest::Client,
    base_url: String,
    anon_key: String,
}

impl GoTrueClient {
    /// * `base_url` - Project URL, e.g. `https://xyz.supabase.co`.
    /// * `anon_key` - Public API key sent as the `apikey` header.
    pub fn new(client: reqwest::Client, base_url: &str, anon_key: String) -> Self {
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            anon_key,
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}/auth/v1{path}", self.base_url)
    }

    async fn token_grant(
        &self,
        grant_type: &str,
        body: serde_json::Value,
    ) -> Result<AuthSession, AuthError> {
        let response = self
            .client
            .post(self.url("/token"))
            .query(&[("grant_type", grant_type)])
            .header("apikey", &self.anon_key)
            .json(&body)
            .send()
            .await?;

        let response = ensure_success(response).await?;
        Ok(response.json::<AuthSession>().await?)
    }
}

#[async_trait]
impl AuthProvider for GoTrueClient {
    async fn sign_in_with_password(
        &self,
        email: &str,
        password: &str,
    ) -> Result<AuthSession, AuthError> {
        self.token_grant(
            "password",
            serde_json::json!({ "email": email, "password": password }),
        )
        .await
    }

    async fn reset_password_for_email(
        &self,
        email: &str,
        redirect_to: Option<&str>,
    ) -> Result<(), AuthError> {
        let mut request = self
            .client
            .post(self.url("/recover"))
            .header("apikey", &self.anon_key)
            .json(&serde_json::json!({ "email": email }));
        if let Some(target) = redirect_to {
            request = request.query(&[("redirect_to", target)]);
        }

        ensure_success(request.send().await?).await?;
        Ok(())
    }

    async fn exchange_code_for_session(
        &self,
        code: &str,
        code_verifier: Option<&str>,
    ) -> Result<AuthSession, AuthError> {
        self.token_grant(
            "pkce",
            serde_json::json!({ "auth_code": code, "code_verifier": code_verifier }),
        )
        .await
    }

    async fn sign_out(&self, access_token: &str) -> Result<(), AuthError> {
        let response = self
            .client
            .post(self.url("/logout"))
            .header("apikey", &self.anon_key)
            .bearer_auth(access_token)
            .send()
            .await?;

        ensure_success(response).await?;
        Ok(())
    }
}

/// Return the response unchanged on 2xx; otherwise classify it by status.
async fn ensure_success(response: reqwest::Response) -> Result<reqwest::Response, AuthError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response
        .text()
        .await
        .unwrap_or_else(|_| "<unreadable body>".to_string());
    let message = provider_message(&body);

    if status.is_client_error() {
        Err(AuthError::Rejected {
            status: status.as_u16(),
            message,
        })
    } else {
        Err(AuthError::Unavailable {
            status: status.as_u16(),
            message,
        })
    }
}

/// Pull a human-readable message out of a provider error body.
///
/// Different provider versions use `msg`, `error_description`, `message` or
/// `error`; the raw body is returned when none is present.
pub fn provider_message(body: &str) -> String {
    let Ok(value) = serde_json::from_str::<serde_json::Value>(body) else {
        return body.trim().to_string();
    };
    ["msg", "error_description", "message", "error"]
        .iter()
        .find_map(|key| value.get(key).and_then(|v| v.as_str()))
        .map(str::to_string)
        .unwrap_or_else(|| body.trim().to_string())
}
