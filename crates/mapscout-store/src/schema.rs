//! Database schema definitions and column families.
//!
//! This module defines the column families used in `RocksDB` storage.

/// Column family names for the `RocksDB` database.
pub mod cf {
    /// Primary consumption-event records, keyed by `event_id`.
    pub const EVENTS: &str = "events";

    /// Index: events by account, keyed by
    /// `account_id || kind || occurred_at millis (BE) || event_id`.
    /// Value is empty (index only).
    pub const EVENTS_BY_ACCOUNT: &str = "events_by_account";
}

/// Returns all column family names for database initialization.
#[must_use]
pub fn all_column_families() -> Vec<&'static str> {
    vec![cf::EVENTS, cf::EVENTS_BY_ACCOUNT]
}
