//! Entity stores mirrored to a storage backend.
//!
//! A `Store<T>` owns the in-memory collection for one entity type and writes
//! the whole collection back to its storage key after every mutation. Loading
//! never fails: a missing or unreadable document yields an empty store.

use chrono::Utc;
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::storage::{Storage, StorageError};

/// A flat record persisted under a fixed storage key.
pub trait Record: Clone + Serialize + DeserializeOwned {
    /// Storage key the collection is kept under.
    const STORAGE_KEY: &'static str;

    fn id(&self) -> &str;

    fn set_id(&mut self, id: String);

    /// Adjust a record as it is added. Runs after the identifier is assigned.
    fn on_create(&mut self) {}
}

/// In-memory collection of one record type with storage mirroring.
pub struct Store<T: Record> {
    items: Vec<T>,
    storage: Box<dyn Storage>,
}

impl<T: Record> Store<T> {
    /// Load the collection from storage, falling back to empty on missing or corrupt data.
    pub fn load(storage: impl Storage + 'static) -> Self {
        let items = match storage.get_item(T::STORAGE_KEY) {
            Ok(Some(raw)) => match serde_json::from_str::<Vec<T>>(&raw) {
                Ok(items) => items,
                Err(e) => {
                    warn!(key = T::STORAGE_KEY, error = %e, "failed to parse stored collection, starting empty");
                    Vec::new()
                }
            },
            Ok(None) => Vec::new(),
            Err(e) => {
                warn!(key = T::STORAGE_KEY, error = %e, "failed to read stored collection, starting empty");
                Vec::new()
            }
        };
        debug!(key = T::STORAGE_KEY, count = items.len(), "loaded collection");
        Store { items, storage: Box::new(storage) }
    }

    /// All records in insertion order.
    pub fn list(&self) -> &[T] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Get a record by identifier.
    pub fn get(&self, id: &str) -> Option<&T> {
        self.items.iter().find(|r| r.id() == id)
    }

    /// Append a record under a freshly generated identifier and return that identifier.
    pub fn add(&mut self, mut record: T) -> String {
        let id = next_id_after(Utc::now().timestamp_millis(), self.items.iter().map(|r| r.id()));
        record.set_id(id.clone());
        record.on_create();
        self.items.push(record);
        info!(key = T::STORAGE_KEY, %id, "added record");
        self.persist();
        id
    }

    /// Replace the record whose identifier matches `record`. Returns false when none matched.
    pub fn update(&mut self, record: T) -> bool {
        let Some(slot) = self.items.iter_mut().find(|r| r.id() == record.id()) else {
            debug!(key = T::STORAGE_KEY, id = record.id(), "update matched no record");
            return false;
        };
        *slot = record;
        info!(key = T::STORAGE_KEY, id = slot.id(), "updated record");
        self.persist();
        true
    }

    /// Apply `edit` to the record with identifier `id`. Returns false when none matched.
    pub fn update_with(&mut self, id: &str, edit: impl FnOnce(&mut T)) -> bool {
        let Some(slot) = self.items.iter_mut().find(|r| r.id() == id) else {
            debug!(key = T::STORAGE_KEY, %id, "update matched no record");
            return false;
        };
        edit(slot);
        info!(key = T::STORAGE_KEY, %id, "updated record");
        self.persist();
        true
    }

    /// Remove every record with identifier `id`. Returns false when none matched.
    pub fn delete(&mut self, id: &str) -> bool {
        let before = self.items.len();
        self.items.retain(|r| r.id() != id);
        let removed = self.items.len() != before;
        if removed {
            info!(key = T::STORAGE_KEY, %id, "deleted record");
        }
        // The collection is mirrored even when nothing changed.
        self.persist();
        removed
    }

    /// Serialize the whole collection to storage. Failures are logged and dropped.
    fn persist(&self) {
        if let Err(e) = self.try_persist() {
            warn!(key = T::STORAGE_KEY, error = %e, "failed to save collection, keeping in-memory state");
        }
    }

    fn try_persist(&self) -> Result<(), StorageError> {
        let data = serde_json::to_string(&self.items)
            .map_err(|source| StorageError::Serialize { key: T::STORAGE_KEY.to_string(), source })?;
        self.storage.set_item(T::STORAGE_KEY, &data)
    }
}

/// Next identifier: the clock reading in milliseconds, bumped past the
/// largest numeric identifier already present.
pub fn next_id_after<'a>(now_ms: i64, existing: impl Iterator<Item = &'a str>) -> String {
    let max = existing.filter_map(|id| id.parse::<i64>().ok()).max();
    match max {
        Some(m) if m >= now_ms => m.saturating_add(1).to_string(),
        _ => now_ms.to_string(),
    }
}
