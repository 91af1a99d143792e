//! Identity collaborator and authentication extractors.
//!
//! Credential verification is delegated wholesale to the external identity
//! service: the meter sends the bearer token upstream and receives the
//! account id plus the subscribed plan. Nothing about the credential is
//! interpreted locally.
//!
//! This module provides:
//! - `IdentityClient` - the upstream resolve call
//! - `AuthAccount` - extractor for end-user requests
//! - `AdminAuth` - extractor for privileged endpoints

use std::sync::Arc;
use std::time::Duration;

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use reqwest::StatusCode;
use serde::Deserialize;

use mapscout_core::{Account, TierId};

use crate::error::ApiError;
use crate::state::AppState;

/// Errors from resolving a credential with the identity service.
#[derive(Debug, thiserror::Error)]
pub enum IdentityError {
    /// The identity service rejected the credential.
    #[error("credential rejected")]
    Unauthorized,

    /// The identity service could not be reached or answered abnormally.
    #[error("identity service error: {0}")]
    Upstream(String),

    /// The identity service answered with an unparseable body.
    #[error("malformed identity response")]
    Malformed,
}

/// Wire shape of the identity service's user payload.
#[derive(Debug, Deserialize)]
struct UserPayload {
    id: String,
    #[serde(default)]
    plan: Option<String>,
}

/// HTTP client for the external identity service.
///
/// One reusable `reqwest` client; building a client per request would defeat
/// connection pooling on the hottest path in the service.
#[derive(Debug, Clone)]
pub struct IdentityClient {
    client: reqwest::Client,
    base_url: String,
}

impl IdentityClient {
    /// Create a client against an identity service base URL.
    #[must_use]
    pub fn new(base_url: &str, timeout: Duration) -> Self {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .unwrap_or_else(|_| reqwest::Client::new());

        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    /// Resolve a bearer credential to an account.
    ///
    /// # Errors
    ///
    /// - [`IdentityError::Unauthorized`] when the credential is rejected.
    /// - [`IdentityError::Upstream`] on transport or server faults.
    /// - [`IdentityError::Malformed`] when the response cannot be parsed.
    pub async fn resolve(&self, credential: &str) -> Result<Account, IdentityError> {
        let url = format!("{}/auth/v1/user", self.base_url);

        let response = self
            .client
            .get(&url)
            .bearer_auth(credential)
            .send()
            .await
            .map_err(|e| IdentityError::Upstream(e.to_string()))?;

        match response.status() {
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
                return Err(IdentityError::Unauthorized);
            }
            status if !status.is_success() => {
                return Err(IdentityError::Upstream(format!(
                    "identity service returned {status}"
                )));
            }
            _ => {}
        }

        let payload: UserPayload = response
            .json()
            .await
            .map_err(|_| IdentityError::Malformed)?;

        let account_id = payload.id.parse().map_err(|_| IdentityError::Malformed)?;

        Ok(Account {
            account_id,
            tier_id: payload.plan.map(TierId::new),
        })
    }
}

impl From<IdentityError> for ApiError {
    fn from(err: IdentityError) -> Self {
        match err {
            IdentityError::Unauthorized => Self::Unauthorized,
            IdentityError::Upstream(msg) => Self::ExternalService(msg),
            IdentityError::Malformed => {
                Self::ExternalService("identity service returned an invalid response".into())
            }
        }
    }
}

/// An authenticated account extracted from the `Authorization` header.
#[derive(Debug, Clone)]
pub struct AuthAccount(pub Account);

#[axum::async_trait]
impl FromRequestParts<Arc<AppState>> for AuthAccount {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &Arc<AppState>,
    ) -> Result<Self, Self::Rejection> {
        let auth_header = parts
            .headers
            .get("authorization")
            .and_then(|v| v.to_str().ok())
            .ok_or(ApiError::Unauthorized)?;

        let token = auth_header
            .strip_prefix("Bearer ")
            .ok_or(ApiError::Unauthorized)?;

        let account = state.identity.resolve(token).await?;

        Ok(Self(account))
    }
}

/// Admin authentication via API key.
///
/// Used for privileged endpoints like the bulk usage purge. Requires the
/// `X-Admin-Key` header to match the configured admin key.
#[derive(Debug, Clone)]
pub struct AdminAuth {
    /// Admin identifier (for audit logging).
    pub admin_id: String,
}

#[axum::async_trait]
impl FromRequestParts<Arc<AppState>> for AdminAuth {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &Arc<AppState>,
    ) -> Result<Self, Self::Rejection> {
        let admin_key = parts
            .headers
            .get("x-admin-key")
            .and_then(|v| v.to_str().ok())
            .ok_or(ApiError::Unauthorized)?;

        let expected_key = state
            .config
            .admin_api_key
            .as_ref()
            .ok_or(ApiError::Unauthorized)?;

        if admin_key != expected_key {
            return Err(ApiError::Unauthorized);
        }

        let admin_id = parts
            .headers
            .get("x-admin-id")
            .and_then(|v| v.to_str().ok())
            .unwrap_or("admin")
            .to_string();

        tracing::info!(admin_id = %admin_id, "Admin authenticated");

        Ok(Self { admin_id })
    }
}
