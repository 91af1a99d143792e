//! `RocksDB` storage implementation.
//!
//! This module provides the `RocksStore` implementation of the `Store`
//! trait.

use std::path::Path;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use rocksdb::{
    BoundColumnFamily, ColumnFamilyDescriptor, DBWithThreadMode, Direction, IteratorMode, Options,
    WriteBatch,
};

use mapscout_core::{AccountId, ConsumptionEvent, EventId, EventKind};

use crate::error::{Result, StoreError};
use crate::keys;
use crate::schema::{all_column_families, cf};
use crate::Store;

/// RocksDB-backed event log.
///
/// Concurrent appends and range counts are safe: reads observe completed
/// batch writes, which gives the per-account read-your-writes ordering the
/// quota evaluator relies on.
pub struct RocksStore {
    db: Arc<DBWithThreadMode<rocksdb::MultiThreaded>>,
}

impl RocksStore {
    /// Open or create a `RocksDB` database at the given path.
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be opened or created.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let mut opts = Options::default();
        opts.create_if_missing(true);
        opts.create_missing_column_families(true);

        let cf_descriptors: Vec<_> = all_column_families()
            .into_iter()
            .map(|name| ColumnFamilyDescriptor::new(name, Options::default()))
            .collect();

        let db = DBWithThreadMode::open_cf_descriptors(&opts, path, cf_descriptors)
            .map_err(|e| StoreError::Database(e.to_string()))?;

        Ok(Self { db: Arc::new(db) })
    }

    /// Get a column family handle.
    fn cf(&self, name: &str) -> Result<Arc<BoundColumnFamily<'_>>> {
        self.db
            .cf_handle(name)
            .ok_or_else(|| StoreError::Database(format!("column family not found: {name}")))
    }

    /// Serialize a value using CBOR.
    fn serialize<T: serde::Serialize>(value: &T) -> Result<Vec<u8>> {
        let mut buf = Vec::new();
        ciborium::into_writer(value, &mut buf)
            .map_err(|e| StoreError::Serialization(e.to_string()))?;
        Ok(buf)
    }

    /// Deserialize a value from CBOR.
    fn deserialize<T: serde::de::DeserializeOwned>(data: &[u8]) -> Result<T> {
        ciborium::from_reader(data).map_err(|e| StoreError::Serialization(e.to_string()))
    }

    /// Collect index keys for an account-and-kind scan starting at `lower`,
    /// bounded by `prefix`.
    fn scan_index_keys(&self, lower: &[u8], prefix: &[u8]) -> Result<Vec<Vec<u8>>> {
        let cf_index = self.cf(cf::EVENTS_BY_ACCOUNT)?;
        let iter = self
            .db
            .iterator_cf(&cf_index, IteratorMode::From(lower, Direction::Forward));

        let mut matched = Vec::new();
        for item in iter {
            let (key, _) = item.map_err(|e| StoreError::Database(e.to_string()))?;
            if !key.starts_with(prefix) {
                break;
            }
            matched.push(key.to_vec());
        }
        Ok(matched)
    }
}

impl Store for RocksStore {
    fn record_event(&self, event: &ConsumptionEvent) -> Result<()> {
        let cf_events = self.cf(cf::EVENTS)?;
        let cf_index = self.cf(cf::EVENTS_BY_ACCOUNT)?;

        let event_key = keys::event_key(&event.event_id);
        let index_key = keys::account_event_key(
            &event.account_id,
            event.kind,
            event.occurred_at,
            &event.event_id,
        );
        let value = Self::serialize(event)?;

        let mut batch = WriteBatch::default();
        batch.put_cf(&cf_events, &event_key, &value);
        batch.put_cf(&cf_index, &index_key, []); // Index entry (empty value)

        self.db
            .write(batch)
            .map_err(|e| StoreError::Database(e.to_string()))?;

        Ok(())
    }

    fn get_event(&self, event_id: &EventId) -> Result<Option<ConsumptionEvent>> {
        let cf_events = self.cf(cf::EVENTS)?;
        let key = keys::event_key(event_id);

        self.db
            .get_cf(&cf_events, key)
            .map_err(|e| StoreError::Database(e.to_string()))?
            .map(|data| Self::deserialize(&data))
            .transpose()
    }

    fn count_since(
        &self,
        account_id: &AccountId,
        kind: EventKind,
        since: DateTime<Utc>,
    ) -> Result<u64> {
        let lower = keys::since_lower_bound(account_id, kind, since);
        let prefix = keys::account_kind_prefix(account_id, kind);

        let cf_index = self.cf(cf::EVENTS_BY_ACCOUNT)?;
        let iter = self
            .db
            .iterator_cf(&cf_index, IteratorMode::From(&lower, Direction::Forward));

        let mut count = 0u64;
        for item in iter {
            let (key, _) = item.map_err(|e| StoreError::Database(e.to_string()))?;
            if !key.starts_with(&prefix) {
                break;
            }
            count += 1;
        }
        Ok(count)
    }

    fn list_events_since(
        &self,
        account_id: &AccountId,
        kind: EventKind,
        since: DateTime<Utc>,
        limit: usize,
    ) -> Result<Vec<ConsumptionEvent>> {
        let lower = keys::since_lower_bound(account_id, kind, since);
        let prefix = keys::account_kind_prefix(account_id, kind);

        let mut events = Vec::new();
        for key in self.scan_index_keys(&lower, &prefix)? {
            if events.len() >= limit {
                break;
            }
            let event_id = keys::extract_event_id_from_index_key(&key);
            if let Some(event) = self.get_event(&event_id)? {
                events.push(event);
            }
        }
        Ok(events)
    }

    fn purge_account(&self, account_id: &AccountId) -> Result<u64> {
        let cf_events = self.cf(cf::EVENTS)?;
        let cf_index = self.cf(cf::EVENTS_BY_ACCOUNT)?;
        let prefix = keys::account_prefix(account_id);

        let index_keys = self.scan_index_keys(&prefix, &prefix)?;

        let mut batch = WriteBatch::default();
        for key in &index_keys {
            let event_id = keys::extract_event_id_from_index_key(key);
            batch.delete_cf(&cf_events, keys::event_key(&event_id));
            batch.delete_cf(&cf_index, key);
        }

        self.db
            .write(batch)
            .map_err(|e| StoreError::Database(e.to_string()))?;

        tracing::info!(
            account_id = %account_id,
            purged = index_keys.len(),
            "Purged account events"
        );

        Ok(index_keys.len() as u64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};
    use tempfile::TempDir;

    fn create_test_store() -> (RocksStore, TempDir) {
        let dir = TempDir::new().unwrap();
        let store = RocksStore::open(dir.path()).unwrap();
        (store, dir)
    }

    fn search_at(account_id: AccountId, at: DateTime<Utc>) -> ConsumptionEvent {
        ConsumptionEvent::new(account_id, EventKind::Search, at)
    }

    #[test]
    fn record_then_count_reads_own_write() {
        let (store, _dir) = create_test_store();
        let account_id = AccountId::generate();
        let since = Utc::now() - Duration::hours(1);

        assert_eq!(
            store
                .count_since(&account_id, EventKind::Search, since)
                .unwrap(),
            0
        );

        store
            .record_event(&ConsumptionEvent::search(account_id))
            .unwrap();

        assert_eq!(
            store
                .count_since(&account_id, EventKind::Search, since)
                .unwrap(),
            1
        );
    }

    #[test]
    fn count_lower_bound_is_inclusive() {
        let (store, _dir) = create_test_store();
        let account_id = AccountId::generate();
        let boundary = Utc.with_ymd_and_hms(2024, 3, 11, 0, 0, 0).unwrap();

        // One event just before the boundary, one exactly on it.
        store
            .record_event(&search_at(account_id, boundary - Duration::seconds(1)))
            .unwrap();
        store.record_event(&search_at(account_id, boundary)).unwrap();

        assert_eq!(
            store
                .count_since(&account_id, EventKind::Search, boundary)
                .unwrap(),
            1
        );
        assert_eq!(
            store
                .count_since(
                    &account_id,
                    EventKind::Search,
                    boundary - Duration::seconds(1)
                )
                .unwrap(),
            2
        );
    }

    #[test]
    fn count_is_scoped_to_the_account() {
        let (store, _dir) = create_test_store();
        let account_a = AccountId::generate();
        let account_b = AccountId::generate();
        let since = Utc::now() - Duration::hours(1);

        for _ in 0..3 {
            store
                .record_event(&ConsumptionEvent::search(account_a))
                .unwrap();
        }
        store
            .record_event(&ConsumptionEvent::search(account_b))
            .unwrap();

        assert_eq!(
            store
                .count_since(&account_a, EventKind::Search, since)
                .unwrap(),
            3
        );
        assert_eq!(
            store
                .count_since(&account_b, EventKind::Search, since)
                .unwrap(),
            1
        );
    }

    #[test]
    fn get_event_roundtrip() {
        let (store, _dir) = create_test_store();
        let account_id = AccountId::generate();
        let event = ConsumptionEvent::search(account_id);

        store.record_event(&event).unwrap();

        let loaded = store.get_event(&event.event_id).unwrap().unwrap();
        assert_eq!(loaded, event);
        assert!(store
            .get_event(&EventId::generate())
            .unwrap()
            .is_none());
    }

    #[test]
    fn list_events_is_oldest_first_and_bounded() {
        let (store, _dir) = create_test_store();
        let account_id = AccountId::generate();
        let base = Utc.with_ymd_and_hms(2024, 3, 11, 12, 0, 0).unwrap();

        for offset in [2i64, 0, 1] {
            store
                .record_event(&search_at(account_id, base + Duration::minutes(offset)))
                .unwrap();
        }

        let events = store
            .list_events_since(&account_id, EventKind::Search, base, 10)
            .unwrap();
        assert_eq!(events.len(), 3);
        assert!(events.windows(2).all(|w| w[0].occurred_at <= w[1].occurred_at));

        let capped = store
            .list_events_since(&account_id, EventKind::Search, base, 2)
            .unwrap();
        assert_eq!(capped.len(), 2);
        assert_eq!(capped[0].occurred_at, base);
    }

    #[test]
    fn purge_removes_only_the_target_account() {
        let (store, _dir) = create_test_store();
        let purged_account = AccountId::generate();
        let kept_account = AccountId::generate();
        let since = Utc::now() - Duration::hours(1);

        for _ in 0..4 {
            store
                .record_event(&ConsumptionEvent::search(purged_account))
                .unwrap();
        }
        store
            .record_event(&ConsumptionEvent::search(kept_account))
            .unwrap();

        assert_eq!(store.purge_account(&purged_account).unwrap(), 4);

        assert_eq!(
            store
                .count_since(&purged_account, EventKind::Search, since)
                .unwrap(),
            0
        );
        assert_eq!(
            store
                .count_since(&kept_account, EventKind::Search, since)
                .unwrap(),
            1
        );
    }

    #[test]
    fn events_survive_reopen() {
        let dir = TempDir::new().unwrap();
        let account_id = AccountId::generate();
        let since = Utc::now() - Duration::hours(1);

        {
            let store = RocksStore::open(dir.path()).unwrap();
            store
                .record_event(&ConsumptionEvent::search(account_id))
                .unwrap();
        }

        let reopened = RocksStore::open(dir.path()).unwrap();
        assert_eq!(
            reopened
                .count_since(&account_id, EventKind::Search, since)
                .unwrap(),
            1
        );
    }
}
