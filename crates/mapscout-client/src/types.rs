//! Wire types for the mapscout API.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use mapscout_core::{PlanFeatures, WindowKind};

/// A place search request.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchRequest {
    /// Category query ("restaurant", "pharmacy", ...).
    pub query: String,

    /// Free-form location. Empty means the source's default area.
    #[serde(skip_serializing_if = "String::is_empty")]
    pub location: String,

    /// Requested result count.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_results: Option<usize>,
}

impl SearchRequest {
    /// A search for a category query.
    #[must_use]
    pub fn new(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            location: String::new(),
            max_results: None,
        }
    }

    /// Set the location.
    #[must_use]
    pub fn with_location(mut self, location: impl Into<String>) -> Self {
        self.location = location.into();
        self
    }

    /// Set the requested result count.
    #[must_use]
    pub const fn with_max_results(mut self, max_results: usize) -> Self {
        self.max_results = Some(max_results);
        self
    }
}

/// One place in a search result.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Place {
    /// Business name.
    pub name: String,
    /// Category label.
    pub category: String,
    /// Rating as the service formats it ("4.2").
    pub rating: String,
    /// Street address.
    pub address: String,
    /// Phone number.
    pub phone: String,
    /// Website, or "N/A".
    pub website: String,
    /// Opening hours text.
    pub hours: String,
}

/// A successful search response.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchResults {
    /// Id of the recorded consumption event, when accounting succeeded.
    #[serde(default)]
    pub id: Option<String>,

    /// The query as searched.
    pub query: String,

    /// The location as searched.
    pub location: String,

    /// Matched places.
    pub places: Vec<Place>,

    /// When the search completed.
    pub created_at: DateTime<Utc>,
}

/// The usage report for an account.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UsageReport {
    /// Events counted in the active window.
    pub current: u64,

    /// The tier's per-window allowance.
    pub limit: u64,

    /// Allowance left in the active window.
    pub remaining: u64,

    /// Window cadence.
    pub limit_type: WindowKind,

    /// The effective tier id.
    pub plan_type: String,

    /// Whether the effective tier is free of charge.
    pub is_free_plan: bool,

    /// First instant of the next window.
    pub reset_date: DateTime<Utc>,

    /// Descriptive plan info for every tier, keyed by tier id.
    pub plan_features: BTreeMap<String, PlanFeatures>,
}

/// Wire shape of a quota denial (HTTP 429).
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuotaDenial {
    /// Human-readable denial message.
    pub error: String,
    /// Events counted in the denied window.
    pub used: u64,
    /// The tier's per-window allowance.
    pub limit: u64,
    /// Window cadence.
    pub limit_type: WindowKind,
    /// The effective tier id.
    pub plan_type: String,
    /// When the window resets.
    pub reset_date: DateTime<Utc>,
}

/// Wire shape of non-quota API errors.
#[derive(Debug, Clone, Deserialize)]
pub struct ApiErrorResponse {
    /// The error envelope.
    pub error: ApiErrorBody,
}

/// Error envelope contents.
#[derive(Debug, Clone, Deserialize)]
pub struct ApiErrorBody {
    /// Stable error code.
    pub code: String,
    /// Human-readable message.
    pub message: String,
}
