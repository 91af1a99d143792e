//! Consumption events and usage snapshots.
//!
//! A consumption event is one unit of billable usage (one search) pinned to
//! an account and an instant. Events are append-only: the store never
//! mutates or deletes them in normal operation.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::ids::{AccountId, EventId};
use crate::plan::{PlanTier, TierId, WindowKind};

/// Discriminator for the kind of usage an event represents.
///
/// Currently only searches are metered; the byte tag keeps store index keys
/// stable if further kinds are added.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventKind {
    /// One place search.
    Search,
}

impl EventKind {
    /// Wire-format label.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Search => "search",
        }
    }

    /// Stable single-byte tag used in store index keys.
    #[must_use]
    pub const fn tag(self) -> u8 {
        match self {
            Self::Search => 0,
        }
    }
}

/// One unit of recorded consumption.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConsumptionEvent {
    /// Unique, time-ordered event id.
    pub event_id: EventId,

    /// The account the usage is attributed to.
    pub account_id: AccountId,

    /// What was consumed.
    pub kind: EventKind,

    /// When the usage occurred.
    pub occurred_at: DateTime<Utc>,
}

impl ConsumptionEvent {
    /// Create an event at an explicit instant.
    #[must_use]
    pub fn new(account_id: AccountId, kind: EventKind, occurred_at: DateTime<Utc>) -> Self {
        Self {
            event_id: EventId::generate(),
            account_id,
            kind,
            occurred_at,
        }
    }

    /// Create a search event stamped with the current time.
    #[must_use]
    pub fn search(account_id: AccountId) -> Self {
        Self::new(account_id, EventKind::Search, Utc::now())
    }
}

/// A point-in-time, side-effect-free view of an account's usage state.
///
/// Derived, never persisted: `current` is recomputed from event data on
/// every evaluation so it can never go stale past a window boundary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UsageSnapshot {
    /// The tier the usage was evaluated against (after fallback).
    pub tier_id: TierId,

    /// The window cadence of that tier.
    pub window: WindowKind,

    /// Consumption events counted inside the active window.
    pub current: u64,

    /// The tier's per-window allowance.
    pub limit: u64,

    /// `max(0, limit - current)`.
    pub remaining: u64,

    /// First instant of the next window.
    pub reset_at: DateTime<Utc>,
}

impl UsageSnapshot {
    /// Build a snapshot for a tier from a window count.
    #[must_use]
    pub fn from_count(tier: &PlanTier, current: u64, reset_at: DateTime<Utc>) -> Self {
        Self {
            tier_id: tier.id.clone(),
            window: tier.window,
            current,
            limit: tier.limit,
            remaining: tier.limit.saturating_sub(current),
            reset_at,
        }
    }

    /// Whether the account has allowance left in the active window.
    #[must_use]
    pub const fn has_remaining(&self) -> bool {
        self.remaining > 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::plan::PlanCatalog;

    #[test]
    fn snapshot_remaining_invariant() {
        let catalog = PlanCatalog::builtin();
        let starter = catalog.default_tier();

        for current in [0, 1, 50, 99, 100, 101, 500] {
            let snapshot = UsageSnapshot::from_count(starter, current, Utc::now());
            assert_eq!(snapshot.remaining, starter.limit.saturating_sub(current));
        }
    }

    #[test]
    fn snapshot_remaining_clamps_at_zero() {
        let catalog = PlanCatalog::builtin();
        let snapshot = UsageSnapshot::from_count(catalog.default_tier(), 250, Utc::now());
        assert_eq!(snapshot.remaining, 0);
        assert!(!snapshot.has_remaining());
    }

    #[test]
    fn search_event_carries_kind_and_account() {
        let account_id = AccountId::generate();
        let event = ConsumptionEvent::search(account_id);
        assert_eq!(event.kind, EventKind::Search);
        assert_eq!(event.account_id, account_id);
    }
}
