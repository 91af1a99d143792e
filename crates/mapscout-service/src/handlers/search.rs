//! Check-and-search handler.
//!
//! The only write path in the service: resolve the credential, run the
//! search through the admission gate, and hand back results. The client is
//! expected to re-query `/v1/usage` afterwards for fresh counts.

use std::sync::Arc;

use axum::extract::State;
use axum::Json;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::ApiError;
use crate::identity::AuthAccount;
use crate::places::{Place, PlaceSourceError};
use crate::quota::AdmissionError;
use crate::state::AppState;

/// Hard cap on results per search, whatever the client asks for.
const MAX_RESULTS_CAP: usize = 100;

/// Default result count when the client does not specify one.
const DEFAULT_MAX_RESULTS: usize = 20;

/// Search request body.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchRequest {
    /// Category query ("restaurant", "pharmacy", ...).
    pub query: String,

    /// Free-form location ("Lyon"). Empty means the source's default area.
    #[serde(default)]
    pub location: String,

    /// Requested result count.
    #[serde(default = "default_max_results")]
    pub max_results: usize,
}

fn default_max_results() -> usize {
    DEFAULT_MAX_RESULTS
}

/// Search response body.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchResponse {
    /// Id of the recorded consumption event; absent if recording failed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    /// The query as searched (trimmed).
    pub query: String,

    /// The location as searched (trimmed).
    pub location: String,

    /// Matched places.
    pub places: Vec<Place>,

    /// When the search completed.
    pub created_at: DateTime<Utc>,
}

/// Run a quota-gated place search.
pub async fn check_and_search(
    State(state): State<Arc<AppState>>,
    AuthAccount(account): AuthAccount,
    Json(body): Json<SearchRequest>,
) -> Result<Json<SearchResponse>, ApiError> {
    let query = body.query.trim().to_string();
    if query.is_empty() {
        return Err(ApiError::BadRequest("search query is required".into()));
    }
    let location = body.location.trim().to_string();
    let max_results = body.max_results.clamp(1, MAX_RESULTS_CAP);

    tracing::debug!(
        account_id = %account.account_id,
        query = %query,
        location = %location,
        "Processing search"
    );

    let operation = state.places.search(&query, &location, max_results);

    match state.gate.admit(&account, operation).await {
        Ok(admitted) => {
            tracing::info!(
                account_id = %account.account_id,
                query = %query,
                results = admitted.value.len(),
                "Search admitted"
            );
            Ok(Json(SearchResponse {
                id: admitted.event_id.map(|id| id.to_string()),
                query,
                location,
                places: admitted.value,
                created_at: Utc::now(),
            }))
        }
        Err(AdmissionError::QuotaExceeded(snapshot)) => {
            tracing::info!(
                account_id = %account.account_id,
                used = snapshot.current,
                limit = snapshot.limit,
                "Search denied: quota exceeded"
            );
            Err(ApiError::QuotaExceeded(snapshot))
        }
        Err(AdmissionError::Store(e)) => Err(ApiError::from(e)),
        Err(AdmissionError::Operation(PlaceSourceError::NoResults)) => Err(ApiError::NotFound(
            "No places found. Try a different search query or location.".into(),
        )),
        Err(AdmissionError::Operation(PlaceSourceError::Timeout)) => {
            Err(ApiError::ExternalService("place search timed out".into()))
        }
        Err(AdmissionError::Operation(PlaceSourceError::Upstream(msg))) => {
            Err(ApiError::ExternalService(msg))
        }
    }
}
