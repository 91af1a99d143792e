//! Client error types.

use chrono::{DateTime, Utc};
use mapscout_core::WindowKind;

use crate::types::QuotaDenial;

/// Errors from the mapscout API client.
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    /// Transport-level failure.
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The credential was rejected.
    #[error("credential rejected")]
    Unauthorized,

    /// The search matched nothing; no quota was consumed.
    #[error("no places found")]
    NoResults,

    /// The account's window allowance is used up.
    #[error("quota exceeded: {used}/{limit} ({limit_type}), resets {reset_date}")]
    QuotaExceeded {
        /// Human-readable denial message from the service.
        message: String,
        /// Events counted in the denied window.
        used: u64,
        /// The tier's per-window allowance.
        limit: u64,
        /// Window cadence.
        limit_type: WindowKind,
        /// The effective tier id.
        plan_type: String,
        /// When the window resets.
        reset_date: DateTime<Utc>,
    },

    /// Any other API error.
    #[error("api error ({status}): {message}")]
    Api {
        /// HTTP status code.
        status: u16,
        /// Error message from the service, or the raw status.
        message: String,
    },
}

impl From<QuotaDenial> for ClientError {
    fn from(denial: QuotaDenial) -> Self {
        Self::QuotaExceeded {
            message: denial.error,
            used: denial.used,
            limit: denial.limit,
            limit_type: denial.limit_type,
            plan_type: denial.plan_type,
            reset_date: denial.reset_date,
        }
    }
}
