//! `RocksDB` storage layer for the mapscout metering service.
//!
//! This crate persists the append-only consumption-event log and answers
//! range-bounded counts over it. Quota state is never stored: the service
//! recomputes usage from this log on every evaluation.
//!
//! # Architecture
//!
//! The storage uses the following column families:
//!
//! - `events`: primary event records, keyed by `event_id` (ULID)
//! - `events_by_account`: index keyed by
//!   `account_id || kind || occurred_at millis (BE) || event_id`, empty
//!   value; the big-endian timestamp makes window counts a forward range
//!   scan with an inclusive lower bound
//!
//! # Example
//!
//! ```no_run
//! use mapscout_store::{RocksStore, Store};
//! use mapscout_core::{AccountId, ConsumptionEvent, EventKind};
//! use chrono::Utc;
//!
//! let store = RocksStore::open("/tmp/mapscout-db").unwrap();
//!
//! let account_id = AccountId::generate();
//! store.record_event(&ConsumptionEvent::search(account_id)).unwrap();
//!
//! let since = Utc::now() - chrono::Duration::days(7);
//! let count = store.count_since(&account_id, EventKind::Search, since).unwrap();
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod error;
pub mod keys;
pub mod rocks;
pub mod schema;

pub use error::{Result, StoreError};
pub use rocks::RocksStore;

use chrono::{DateTime, Utc};
use mapscout_core::{AccountId, ConsumptionEvent, EventId, EventKind};

/// The storage trait defining all event-log operations.
///
/// This trait abstracts the storage layer so the quota components can be
/// exercised against test doubles (e.g. a store that fails on demand) as
/// well as the `RocksDB` implementation.
pub trait Store: Send + Sync {
    /// Append one consumption event.
    ///
    /// The event is durable before this returns `Ok`. Events are
    /// append-only: there is no update or single-delete operation.
    ///
    /// # Errors
    ///
    /// Returns an error if the database write fails; the caller decides
    /// whether that failure is fatal (see the admission gate's policy).
    fn record_event(&self, event: &ConsumptionEvent) -> Result<()>;

    /// Fetch one event by id.
    ///
    /// # Errors
    ///
    /// Returns an error if the database read fails.
    fn get_event(&self, event_id: &EventId) -> Result<Option<ConsumptionEvent>>;

    /// Count events for an account with `occurred_at >= since`.
    ///
    /// The lower bound is inclusive, matching the `[window_start, reset_at)`
    /// window convention. Monotonically consistent with `record_event`: a
    /// count taken after a successful record for the same account includes
    /// that event.
    ///
    /// # Errors
    ///
    /// Returns an error if the database read fails.
    fn count_since(&self, account_id: &AccountId, kind: EventKind, since: DateTime<Utc>)
        -> Result<u64>;

    /// List events for an account with `occurred_at >= since`, oldest first,
    /// up to `limit` entries. Diagnostic/admin surface.
    ///
    /// # Errors
    ///
    /// Returns an error if the database read fails.
    fn list_events_since(
        &self,
        account_id: &AccountId,
        kind: EventKind,
        since: DateTime<Utc>,
        limit: usize,
    ) -> Result<Vec<ConsumptionEvent>>;

    /// Bulk administrative purge of every event for an account.
    ///
    /// Returns the number of events removed. This is the only delete path;
    /// it exists for account-removal tooling and carries no correctness
    /// guarantees for concurrent evaluations.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    fn purge_account(&self, account_id: &AccountId) -> Result<u64>;
}
