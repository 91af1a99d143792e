//! Health check handler.

use axum::Json;
use serde_json::json;

/// Liveness probe. No auth, no state.
pub async fn health() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}
