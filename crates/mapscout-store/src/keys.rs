//! Key encoding utilities for `RocksDB`.
//!
//! Index keys place the event timestamp in big-endian milliseconds so the
//! bytewise comparator orders an account's events chronologically and a
//! window count becomes a single forward range scan.

use chrono::{DateTime, Utc};
use mapscout_core::{AccountId, EventId, EventKind};

/// Byte length of an index key:
/// `account_id (16) || kind (1) || millis (8) || event_id (16)`.
pub const INDEX_KEY_LEN: usize = 41;

/// Event timestamp as non-negative milliseconds since the epoch.
///
/// Pre-epoch timestamps clamp to zero; the meter never records them.
#[must_use]
pub fn event_millis(at: DateTime<Utc>) -> u64 {
    u64::try_from(at.timestamp_millis()).unwrap_or(0)
}

/// Create a primary event key from an event id.
#[must_use]
pub fn event_key(event_id: &EventId) -> Vec<u8> {
    event_id.to_bytes().to_vec()
}

/// Create an account-event index key.
///
/// Format: `account_id (16) || kind tag (1) || occurred_at millis BE (8) ||
/// event_id (16)`.
#[must_use]
pub fn account_event_key(
    account_id: &AccountId,
    kind: EventKind,
    occurred_at: DateTime<Utc>,
    event_id: &EventId,
) -> Vec<u8> {
    let mut key = Vec::with_capacity(INDEX_KEY_LEN);
    key.extend_from_slice(account_id.as_bytes());
    key.push(kind.tag());
    key.extend_from_slice(&event_millis(occurred_at).to_be_bytes());
    key.extend_from_slice(&event_id.to_bytes());
    key
}

/// Prefix covering every index row for an account and kind.
#[must_use]
pub fn account_kind_prefix(account_id: &AccountId, kind: EventKind) -> Vec<u8> {
    let mut key = Vec::with_capacity(17);
    key.extend_from_slice(account_id.as_bytes());
    key.push(kind.tag());
    key
}

/// Prefix covering every index row for an account, any kind. Used by the
/// administrative purge.
#[must_use]
pub fn account_prefix(account_id: &AccountId) -> Vec<u8> {
    account_id.as_bytes().to_vec()
}

/// Smallest index key for events with `occurred_at >= since`.
///
/// Omitting the event-id suffix makes this key sort before every full key
/// sharing the same timestamp, so scans starting here include events at
/// exactly `since` (inclusive lower bound).
#[must_use]
pub fn since_lower_bound(
    account_id: &AccountId,
    kind: EventKind,
    since: DateTime<Utc>,
) -> Vec<u8> {
    let mut key = account_kind_prefix(account_id, kind);
    key.extend_from_slice(&event_millis(since).to_be_bytes());
    key
}

/// Extract the event id from an index key.
///
/// # Panics
///
/// Panics if the key is shorter than [`INDEX_KEY_LEN`].
#[must_use]
pub fn extract_event_id_from_index_key(key: &[u8]) -> EventId {
    let mut bytes = [0u8; 16];
    bytes.copy_from_slice(&key[INDEX_KEY_LEN - 16..INDEX_KEY_LEN]);
    EventId::from_bytes(bytes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn index_key_format() {
        let account_id = AccountId::generate();
        let event_id = EventId::generate();
        let at = Utc.with_ymd_and_hms(2024, 3, 11, 0, 0, 0).unwrap();

        let key = account_event_key(&account_id, EventKind::Search, at, &event_id);

        assert_eq!(key.len(), INDEX_KEY_LEN);
        assert_eq!(&key[..16], account_id.as_bytes());
        assert_eq!(key[16], EventKind::Search.tag());
        assert_eq!(&key[17..25], &event_millis(at).to_be_bytes());
        assert_eq!(&key[25..], &event_id.to_bytes());
    }

    #[test]
    fn lower_bound_sorts_before_full_keys_at_same_instant() {
        let account_id = AccountId::generate();
        let event_id = EventId::generate();
        let at = Utc.with_ymd_and_hms(2024, 3, 11, 0, 0, 0).unwrap();

        let bound = since_lower_bound(&account_id, EventKind::Search, at);
        let full = account_event_key(&account_id, EventKind::Search, at, &event_id);

        assert!(bound.as_slice() < full.as_slice());
    }

    #[test]
    fn keys_order_by_timestamp() {
        let account_id = AccountId::generate();
        let event_id = EventId::generate();
        let earlier = Utc.with_ymd_and_hms(2024, 3, 11, 0, 0, 0).unwrap();
        let later = Utc.with_ymd_and_hms(2024, 3, 11, 0, 0, 1).unwrap();

        let a = account_event_key(&account_id, EventKind::Search, earlier, &event_id);
        let b = account_event_key(&account_id, EventKind::Search, later, &event_id);

        assert!(a < b);
    }

    #[test]
    fn extract_event_id_roundtrip() {
        let account_id = AccountId::generate();
        let event_id = EventId::generate();
        let key = account_event_key(&account_id, EventKind::Search, Utc::now(), &event_id);

        assert_eq!(extract_event_id_from_index_key(&key), event_id);
    }

    #[test]
    fn pre_epoch_timestamps_clamp_to_zero() {
        let before_epoch = Utc.with_ymd_and_hms(1969, 12, 31, 23, 59, 59).unwrap();
        assert_eq!(event_millis(before_epoch), 0);
    }
}
