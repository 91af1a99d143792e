//! Administrative handlers.

use std::sync::Arc;

use axum::extract::{Path, State};
use axum::Json;
use serde_json::json;

use mapscout_core::AccountId;
use mapscout_store::Store;

use crate::error::ApiError;
use crate::identity::AdminAuth;
use crate::state::AppState;

/// Bulk-purge every consumption event for an account.
///
/// Account-removal tooling only. Evaluations running concurrently with a
/// purge may count rows that are about to disappear; that is acceptable
/// here and nowhere else, which is why this is the log's only delete path.
pub async fn purge_usage(
    State(state): State<Arc<AppState>>,
    admin: AdminAuth,
    Path(account_id): Path<String>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let account_id: AccountId = account_id
        .parse()
        .map_err(|_| ApiError::BadRequest("invalid account ID".into()))?;

    let purged = state
        .store
        .purge_account(&account_id)
        .map_err(|e| ApiError::Internal(e.to_string()))?;

    tracing::info!(
        admin_id = %admin.admin_id,
        account_id = %account_id,
        purged = purged,
        "Account usage purged"
    );

    Ok(Json(json!({
        "accountId": account_id.to_string(),
        "purged": purged,
    })))
}
