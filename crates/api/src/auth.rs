//! Bearer token verification.

use std::collections::HashMap;
use std::time::Duration;

use async_trait::async_trait;
use axum::http::{header, HeaderMap};
use reqwest::StatusCode;
use serde::Deserialize;
use tracing::{debug, warn};

use crate::error::ApiError;
use crate::state::AppState;

/// Errors from an identity check.
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    /// The token is unknown, expired or malformed.
    #[error("invalid token")]
    InvalidToken,

    /// The identity provider could not be reached or answered oddly.
    #[error("identity provider error: {0}")]
    Upstream(String),
}

impl From<AuthError> for ApiError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::InvalidToken => ApiError::Unauthorized,
            AuthError::Upstream(msg) => ApiError::Internal(msg),
        }
    }
}

/// Resolves a bearer token to a user id.
#[async_trait]
pub trait Authenticator: Send + Sync {
    /// Return the id of the user the token belongs to.
    async fn authenticate(&self, token: &str) -> Result<String, AuthError>;
}

/// Verifies tokens against a hosted identity provider (`GET {base}/user`).
pub struct RemoteAuthenticator {
    http: reqwest::Client,
    base_url: String,
    api_key: Option<String>,
}

#[derive(Deserialize)]
struct IdentityResponse {
    id: String,
}

impl RemoteAuthenticator {
    pub fn new(base_url: impl Into<String>, api_key: Option<String>) -> Result<Self, AuthError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(10))
            .build()
            .map_err(|e| AuthError::Upstream(e.to_string()))?;

        Ok(Self {
            http,
            base_url: base_url.into(),
            api_key,
        })
    }
}

#[async_trait]
impl Authenticator for RemoteAuthenticator {
    async fn authenticate(&self, token: &str) -> Result<String, AuthError> {
        let mut request = self
            .http
            .get(format!("{}/user", self.base_url))
            .bearer_auth(token);
        if let Some(key) = &self.api_key {
            request = request.header("apikey", key);
        }

        let response = request
            .send()
            .await
            .map_err(|e| AuthError::Upstream(e.to_string()))?;

        match response.status() {
            status if status.is_success() => {}
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN | StatusCode::NOT_FOUND => {
                return Err(AuthError::InvalidToken)
            }
            status => {
                warn!(%status, "Identity provider returned an error");
                return Err(AuthError::Upstream(format!(
                    "identity provider returned {}",
                    status
                )));
            }
        }

        let identity: IdentityResponse = response
            .json()
            .await
            .map_err(|e| AuthError::Upstream(e.to_string()))?;
        debug!(user = %identity.id, "Token verified");
        Ok(identity.id)
    }
}

/// Fixed token to user id map for local development and tests.
#[derive(Debug, Clone, Default)]
pub struct StaticAuthenticator {
    tokens: HashMap<String, String>,
}

impl StaticAuthenticator {
    pub fn new<I, T, U>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (T, U)>,
        T: Into<String>,
        U: Into<String>,
    {
        Self {
            tokens: pairs
                .into_iter()
                .map(|(token, user)| (token.into(), user.into()))
                .collect(),
        }
    }
}

#[async_trait]
impl Authenticator for StaticAuthenticator {
    async fn authenticate(&self, token: &str) -> Result<String, AuthError> {
        self.tokens
            .get(token)
            .cloned()
            .ok_or(AuthError::InvalidToken)
    }
}

/// The bearer token from the `Authorization` header, if present.
pub fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    let value = headers.get(header::AUTHORIZATION)?.to_str().ok()?;
    let token = value.strip_prefix("Bearer ").unwrap_or(value).trim();
    (!token.is_empty()).then_some(token)
}

/// Resolve the caller's user id or fail with 401.
pub async fn authorize(state: &AppState, headers: &HeaderMap) -> Result<String, ApiError> {
    let Some(token) = bearer_token(headers) else {
        return Err(ApiError::Unauthorized);
    };

    Ok(state.auth.authenticate(token).await?)
}
