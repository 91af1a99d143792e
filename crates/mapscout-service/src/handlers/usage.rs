//! Usage reporting handler.
//!
//! Read-only projection of the quota evaluator for display: called on page
//! load and after every search. Safe to call arbitrarily often; nothing
//! here writes.

use std::collections::BTreeMap;
use std::sync::Arc;

use axum::extract::State;
use axum::Json;
use chrono::{DateTime, Utc};
use serde::Serialize;

use mapscout_core::{PlanFeatures, TierId, WindowKind};

use crate::error::ApiError;
use crate::identity::AuthAccount;
use crate::state::AppState;

/// Usage report body.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UsageReport {
    /// Events counted in the active window.
    pub current: u64,

    /// The tier's per-window allowance.
    pub limit: u64,

    /// Allowance left in the active window.
    pub remaining: u64,

    /// Window cadence ("weekly" / "monthly").
    pub limit_type: WindowKind,

    /// The effective tier (after unknown-tier fallback).
    pub plan_type: TierId,

    /// Whether the effective tier is free of charge.
    pub is_free_plan: bool,

    /// First instant of the next window, ISO-8601.
    pub reset_date: DateTime<Utc>,

    /// Descriptive plan info for every tier, keyed by tier id.
    pub plan_features: BTreeMap<TierId, PlanFeatures>,
}

/// Report current usage for the authenticated account.
pub async fn report_usage(
    State(state): State<Arc<AppState>>,
    AuthAccount(account): AuthAccount,
) -> Result<Json<UsageReport>, ApiError> {
    let snapshot = state.evaluator.evaluate(&account).map_err(|e| {
        tracing::error!(
            account_id = %account.account_id,
            error = %e,
            "Usage evaluation failed"
        );
        ApiError::Unavailable("usage data unavailable".into())
    })?;

    let tier = state.catalog.resolve(Some(&snapshot.tier_id));

    Ok(Json(UsageReport {
        current: snapshot.current,
        limit: snapshot.limit,
        remaining: snapshot.remaining,
        limit_type: snapshot.window,
        plan_type: snapshot.tier_id.clone(),
        is_free_plan: tier.is_free(),
        reset_date: snapshot.reset_at,
        plan_features: state.catalog.features_by_tier(),
    }))
}
