//! API error types and responses.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;

use mapscout_core::{UsageSnapshot, WindowKind};

/// API error type.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// Unauthorized - missing or invalid credentials.
    #[error("unauthorized")]
    Unauthorized,

    /// Resource not found.
    #[error("not found: {0}")]
    NotFound(String),

    /// Bad request - invalid input.
    #[error("bad request: {0}")]
    BadRequest(String),

    /// The account's window allowance is used up.
    #[error("quota exceeded")]
    QuotaExceeded(Box<UsageSnapshot>),

    /// The usage store cannot be read right now.
    #[error("temporarily unavailable: {0}")]
    Unavailable(String),

    /// Internal server error.
    #[error("internal error: {0}")]
    Internal(String),

    /// External service error.
    #[error("external service error: {0}")]
    ExternalService(String),
}

/// JSON error response body (all errors except quota denials).
#[derive(Debug, Serialize)]
struct ErrorResponse {
    error: ErrorBody,
}

#[derive(Debug, Serialize)]
struct ErrorBody {
    code: String,
    message: String,
}

/// Quota denials use the flat wire format the frontend consumes directly:
/// enough fields to explain the denial and render a "try again after
/// resetDate" hint.
fn quota_denial_response(snapshot: &UsageSnapshot) -> Response {
    let cadence = match snapshot.window {
        WindowKind::Weekly => "Weekly",
        WindowKind::Monthly => "Monthly",
    };
    let body = serde_json::json!({
        "error": format!(
            "{cadence} limit reached ({} searches for {} plan)",
            snapshot.limit, snapshot.tier_id
        ),
        "used": snapshot.current,
        "limit": snapshot.limit,
        "limitType": snapshot.window,
        "planType": snapshot.tier_id,
        "resetDate": snapshot.reset_at.to_rfc3339(),
    });
    (StatusCode::TOO_MANY_REQUESTS, Json(body)).into_response()
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, code, message) = match self {
            Self::QuotaExceeded(snapshot) => return quota_denial_response(&snapshot),
            Self::Unauthorized => (
                StatusCode::UNAUTHORIZED,
                "unauthorized",
                "unauthorized".to_string(),
            ),
            Self::NotFound(msg) => (StatusCode::NOT_FOUND, "not_found", msg),
            Self::BadRequest(msg) => (StatusCode::BAD_REQUEST, "bad_request", msg),
            Self::Unavailable(msg) => {
                tracing::error!(error = %msg, "Service temporarily unavailable");
                (StatusCode::SERVICE_UNAVAILABLE, "unavailable", msg)
            }
            Self::Internal(msg) => {
                tracing::error!(error = %msg, "Internal server error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "internal_error",
                    "An internal error occurred".to_string(),
                )
            }
            Self::ExternalService(msg) => {
                (StatusCode::BAD_GATEWAY, "external_service_error", msg)
            }
        };

        let body = ErrorResponse {
            error: ErrorBody {
                code: code.to_string(),
                message,
            },
        };

        (status, Json(body)).into_response()
    }
}

impl From<mapscout_store::StoreError> for ApiError {
    fn from(err: mapscout_store::StoreError) -> Self {
        Self::Unavailable(err.to_string())
    }
}
