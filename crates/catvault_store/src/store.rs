//! The indexed record store.

use crate::backend::SnapshotBackend;
use crate::error::{StoreError, StoreResult};
use crate::record::EncryptedRecord;
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::debug;

/// Version tag written into every snapshot.
pub const SNAPSHOT_VERSION: u32 = 1;

/// On-disk snapshot envelope.
#[derive(Debug, Serialize, Deserialize)]
struct Snapshot {
    version: u32,
    records: Vec<EncryptedRecord>,
}

/// Selector for the store's exact-match secondary indexes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IndexKey<'a> {
    /// Match records by catalog name.
    Name(&'a str),
    /// Match records by active flag.
    Active(bool),
}

/// Durable key/value store for encrypted catalog records.
///
/// Records are keyed by catalog id. Every mutating call persists a full
/// snapshot of the post-mutation record set through the backend *before*
/// the change becomes visible, so each call is transactional at its own
/// granularity and [`replace_all`](Self::replace_all) swaps the whole set
/// atomically.
pub struct RecordStore {
    inner: Mutex<Inner>,
}

struct Inner {
    records: BTreeMap<String, EncryptedRecord>,
    backend: Box<dyn SnapshotBackend>,
}

impl RecordStore {
    /// Opens a store over the given backend, loading any existing snapshot.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Corrupted`] if a snapshot exists but cannot
    /// be decoded or carries an unknown version.
    pub fn open(mut backend: Box<dyn SnapshotBackend>) -> StoreResult<Self> {
        let records = match backend.load()? {
            Some(bytes) => {
                let snapshot: Snapshot = serde_json::from_slice(&bytes)
                    .map_err(|e| StoreError::corrupted(format!("undecodable snapshot: {e}")))?;
                if snapshot.version != SNAPSHOT_VERSION {
                    return Err(StoreError::corrupted(format!(
                        "unknown snapshot version {}",
                        snapshot.version
                    )));
                }
                snapshot
                    .records
                    .into_iter()
                    .map(|r| (r.catalog_id.clone(), r))
                    .collect()
            }
            None => BTreeMap::new(),
        };

        debug!(records = records.len(), "record store opened");

        Ok(Self {
            inner: Mutex::new(Inner { records, backend }),
        })
    }

    /// Inserts or replaces a record by its catalog id.
    pub fn put(&self, record: EncryptedRecord) -> StoreResult<()> {
        let mut inner = self.inner.lock();
        let mut next = inner.records.clone();
        next.insert(record.catalog_id.clone(), record);
        Self::commit(&mut inner, next)
    }

    /// Returns the record with the given catalog id, if present.
    pub fn get(&self, catalog_id: &str) -> StoreResult<Option<EncryptedRecord>> {
        Ok(self.inner.lock().records.get(catalog_id).cloned())
    }

    /// Returns all records, ordered by catalog id.
    pub fn get_all(&self) -> StoreResult<Vec<EncryptedRecord>> {
        Ok(self.inner.lock().records.values().cloned().collect())
    }

    /// Returns all records matching an exact secondary-index value.
    pub fn get_by_index(&self, key: IndexKey<'_>) -> StoreResult<Vec<EncryptedRecord>> {
        let inner = self.inner.lock();
        Ok(inner
            .records
            .values()
            .filter(|r| match key {
                IndexKey::Name(name) => r.catalog_name == name,
                IndexKey::Active(active) => r.is_active == active,
            })
            .cloned()
            .collect())
    }

    /// Returns all records ordered by update timestamp, ascending.
    ///
    /// Timestamps are ISO-8601 strings, so lexicographic order is
    /// chronological order.
    pub fn all_ordered_by_update(&self) -> StoreResult<Vec<EncryptedRecord>> {
        let mut records: Vec<EncryptedRecord> =
            self.inner.lock().records.values().cloned().collect();
        records.sort_by(|a, b| a.updated_at.cmp(&b.updated_at));
        Ok(records)
    }

    /// Removes the record with the given catalog id, if present.
    pub fn delete(&self, catalog_id: &str) -> StoreResult<()> {
        let mut inner = self.inner.lock();
        if !inner.records.contains_key(catalog_id) {
            return Ok(());
        }
        let mut next = inner.records.clone();
        next.remove(catalog_id);
        Self::commit(&mut inner, next)
    }

    /// Removes all records.
    pub fn clear(&self) -> StoreResult<()> {
        let mut inner = self.inner.lock();
        Self::commit(&mut inner, BTreeMap::new())
    }

    /// Replaces the entire record set in one atomic step.
    ///
    /// This is the clear-plus-puts composite used by a full
    /// resynchronization: the old set stays fully visible (and durable)
    /// until the new set has been persisted. When two records share a
    /// catalog id, the later one wins.
    pub fn replace_all(&self, records: Vec<EncryptedRecord>) -> StoreResult<()> {
        let mut inner = self.inner.lock();
        let next: BTreeMap<String, EncryptedRecord> = records
            .into_iter()
            .map(|r| (r.catalog_id.clone(), r))
            .collect();
        let count = next.len();
        Self::commit(&mut inner, next)?;
        debug!(records = count, "record set replaced");
        Ok(())
    }

    /// Returns the number of stored records.
    pub fn len(&self) -> usize {
        self.inner.lock().records.len()
    }

    /// Returns true if the store holds no records.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Persists `next` and, only on success, makes it the visible set.
    fn commit(inner: &mut Inner, next: BTreeMap<String, EncryptedRecord>) -> StoreResult<()> {
        let snapshot = Snapshot {
            version: SNAPSHOT_VERSION,
            records: next.values().cloned().collect(),
        };
        let bytes = serde_json::to_vec(&snapshot)
            .map_err(|e| StoreError::serialization(e.to_string()))?;

        inner.backend.persist(&bytes)?;
        inner.records = next;
        Ok(())
    }
}

impl std::fmt::Debug for RecordStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RecordStore")
            .field("records", &self.len())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::MemoryBackend;
    use catvault_crypto::SealedBlob;

    fn record(id: &str, name: &str, active: bool, updated_at: &str) -> EncryptedRecord {
        EncryptedRecord {
            catalog_id: id.into(),
            catalog_name: name.into(),
            is_active: active,
            updated_at: updated_at.into(),
            encrypted_data: SealedBlob {
                payload: format!("payload-{id}"),
                signature: format!("signature-{id}"),
            },
        }
    }

    fn open_store() -> (RecordStore, MemoryBackend) {
        let backend = MemoryBackend::new();
        let store = RecordStore::open(Box::new(backend.clone())).unwrap();
        (store, backend)
    }

    #[test]
    fn put_and_get() {
        let (store, _) = open_store();

        store.put(record("c1", "countries", true, "2026-01-01")).unwrap();

        let found = store.get("c1").unwrap().unwrap();
        assert_eq!(found.catalog_name, "countries");
        assert!(store.get("missing").unwrap().is_none());
    }

    #[test]
    fn put_upserts_by_id() {
        let (store, _) = open_store();

        store.put(record("c1", "countries", true, "2026-01-01")).unwrap();
        store.put(record("c1", "countries", false, "2026-02-01")).unwrap();

        assert_eq!(store.len(), 1);
        let found = store.get("c1").unwrap().unwrap();
        assert!(!found.is_active);
    }

    #[test]
    fn index_lookups() {
        let (store, _) = open_store();

        store.put(record("c1", "countries", true, "2026-01-01")).unwrap();
        store.put(record("c2", "genders", true, "2026-01-02")).unwrap();
        store.put(record("c3", "countries", false, "2026-01-03")).unwrap();

        let by_name = store.get_by_index(IndexKey::Name("countries")).unwrap();
        assert_eq!(by_name.len(), 2);

        let active = store.get_by_index(IndexKey::Active(true)).unwrap();
        assert_eq!(active.len(), 2);

        let none = store.get_by_index(IndexKey::Name("unknown")).unwrap();
        assert!(none.is_empty());
    }

    #[test]
    fn ordered_by_update_ascending() {
        let (store, _) = open_store();

        store.put(record("c2", "b", true, "2026-03-01T00:00:00Z")).unwrap();
        store.put(record("c1", "a", true, "2026-01-01T00:00:00Z")).unwrap();
        store.put(record("c3", "c", true, "2026-02-01T00:00:00Z")).unwrap();

        let ordered = store.all_ordered_by_update().unwrap();
        let ids: Vec<&str> = ordered.iter().map(|r| r.catalog_id.as_str()).collect();
        assert_eq!(ids, ["c1", "c3", "c2"]);
    }

    #[test]
    fn delete_and_clear() {
        let (store, _) = open_store();

        store.put(record("c1", "countries", true, "2026-01-01")).unwrap();
        store.put(record("c2", "genders", true, "2026-01-02")).unwrap();

        store.delete("c1").unwrap();
        assert!(store.get("c1").unwrap().is_none());
        assert_eq!(store.len(), 1);

        // Deleting an absent id is not an error.
        store.delete("c1").unwrap();

        store.clear().unwrap();
        assert!(store.is_empty());
    }

    #[test]
    fn replace_all_swaps_whole_set() {
        let (store, _) = open_store();

        store.put(record("old1", "countries", true, "2026-01-01")).unwrap();
        store.put(record("old2", "genders", true, "2026-01-02")).unwrap();

        store
            .replace_all(vec![
                record("new1", "countries", true, "2026-02-01"),
                record("new2", "genders", true, "2026-02-02"),
                record("new3", "documents", true, "2026-02-03"),
            ])
            .unwrap();

        assert_eq!(store.len(), 3);
        assert!(store.get("old1").unwrap().is_none());
        assert!(store.get("new3").unwrap().is_some());
    }

    #[test]
    fn replace_all_failure_keeps_old_set() {
        let (store, backend) = open_store();

        store.put(record("old1", "countries", true, "2026-01-01")).unwrap();

        backend.fail_next_persist();
        let result = store.replace_all(vec![record("new1", "genders", true, "2026-02-01")]);
        assert!(result.is_err());

        // Old set untouched, in memory and in the snapshot.
        assert_eq!(store.len(), 1);
        assert!(store.get("old1").unwrap().is_some());

        let reopened = RecordStore::open(Box::new(backend)).unwrap();
        assert!(reopened.get("old1").unwrap().is_some());
        assert!(reopened.get("new1").unwrap().is_none());
    }

    #[test]
    fn failed_put_is_invisible() {
        let (store, backend) = open_store();

        backend.fail_next_persist();
        assert!(store.put(record("c1", "countries", true, "2026-01-01")).is_err());
        assert!(store.get("c1").unwrap().is_none());
    }

    #[test]
    fn survives_reopen() {
        let backend = MemoryBackend::new();
        {
            let store = RecordStore::open(Box::new(backend.clone())).unwrap();
            store.put(record("c1", "countries", true, "2026-01-01")).unwrap();
        }

        let store = RecordStore::open(Box::new(backend)).unwrap();
        assert_eq!(store.len(), 1);
        assert_eq!(store.get("c1").unwrap().unwrap().catalog_name, "countries");
    }

    #[test]
    fn corrupt_snapshot_is_rejected() {
        let backend = MemoryBackend::with_snapshot(b"not json at all".to_vec());
        let err = RecordStore::open(Box::new(backend)).unwrap_err();
        assert!(matches!(err, StoreError::Corrupted { .. }));
    }

    #[test]
    fn unknown_snapshot_version_is_rejected() {
        let bytes = serde_json::to_vec(&Snapshot {
            version: 99,
            records: vec![],
        })
        .unwrap();
        let backend = MemoryBackend::with_snapshot(bytes);
        let err = RecordStore::open(Box::new(backend)).unwrap_err();
        assert!(matches!(err, StoreError::Corrupted { .. }));
    }
}
