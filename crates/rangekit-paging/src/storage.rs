//! Page-size persistence across sessions.

use chrono::{DateTime, Duration as ChronoDuration, Utc};
use parking_lot::RwLock;
use rangekit_core::{PaginationRequest, RangeError, RangeResult, SortDir};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{debug, warn};

/// A process-external durable key-value registry.
///
/// The contract is deliberately minimal and synchronous, matching an
/// origin-scoped local-storage-style backend: string keys, string values,
/// no enumeration.
pub trait KeyValueStore: Send + Sync {
    /// Reads the value stored under `key`.
    fn read(&self, key: &str) -> RangeResult<Option<String>>;

    /// Writes `value` under `key`, replacing any previous value.
    fn write(&self, key: &str, value: &str) -> RangeResult<()>;
}

/// Volatile in-process store, for tests and ephemeral sessions.
#[derive(Default)]
pub struct InMemoryStore {
    entries: RwLock<HashMap<String, String>>,
}

impl InMemoryStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for InMemoryStore {
    fn read(&self, key: &str) -> RangeResult<Option<String>> {
        Ok(self.entries.read().get(key).cloned())
    }

    fn write(&self, key: &str, value: &str) -> RangeResult<()> {
        self.entries
            .write()
            .insert(key.to_string(), value.to_string());
        Ok(())
    }
}

/// Durable store backed by a single JSON file of key-value pairs.
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    /// Creates a store over the given file path. The file is created on
    /// first write.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    fn load(&self) -> RangeResult<HashMap<String, String>> {
        if !self.path.exists() {
            return Ok(HashMap::new());
        }
        let raw = std::fs::read_to_string(&self.path)
            .map_err(|e| RangeError::storage(format!("read {}: {e}", self.path.display())))?;
        match serde_json::from_str(&raw) {
            Ok(map) => Ok(map),
            Err(e) => {
                warn!(path = %self.path.display(), error = %e, "Corrupt store file; starting empty");
                Ok(HashMap::new())
            }
        }
    }
}

impl KeyValueStore for JsonFileStore {
    fn read(&self, key: &str) -> RangeResult<Option<String>> {
        Ok(self.load()?.remove(key))
    }

    fn write(&self, key: &str, value: &str) -> RangeResult<()> {
        let mut map = self.load()?;
        map.insert(key.to_string(), value.to_string());
        let raw = serde_json::to_string(&map)?;
        std::fs::write(&self.path, raw)
            .map_err(|e| RangeError::storage(format!("write {}: {e}", self.path.display())))
    }
}

/// One remembered page size for a logical view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaginationStorageEntry {
    /// The last-chosen page size.
    pub page_size: usize,
    /// When the entry was last written; drives TTL expiry.
    pub last_update: DateTime<Utc>,
}

type EntryMap = HashMap<String, PaginationStorageEntry>;

/// Remembers a user's last-chosen page size per logical view.
///
/// All entries live under one registry key as a single JSON blob. Entries
/// older than the TTL are purged lazily on the next read; malformed blobs
/// reset to an empty registry instead of propagating, so a corrupt store
/// can never brick page-size memory.
pub struct PaginationStorage {
    store: Arc<dyn KeyValueStore>,
    registry_key: String,
    default_page_size: usize,
    ttl: ChronoDuration,
}

impl PaginationStorage {
    /// The registry key entries are stored under by default.
    pub const DEFAULT_REGISTRY_KEY: &'static str = "rangekit.page-sizes";
    /// Retention of a stored page size, in days.
    pub const TTL_DAYS: i64 = 30;

    /// Creates a storage service with the default registry key and TTL.
    #[must_use]
    pub fn new(store: Arc<dyn KeyValueStore>, default_page_size: usize) -> Self {
        Self {
            store,
            registry_key: Self::DEFAULT_REGISTRY_KEY.to_string(),
            default_page_size,
            ttl: ChronoDuration::days(Self::TTL_DAYS),
        }
    }

    /// Overrides the registry key.
    #[must_use]
    pub fn with_registry_key(mut self, key: impl Into<String>) -> Self {
        self.registry_key = key.into();
        self
    }

    /// Overrides the retention period.
    #[must_use]
    pub fn with_ttl_days(mut self, days: i64) -> Self {
        self.ttl = ChronoDuration::days(days);
        self
    }

    /// Returns the stored page size for `view_key`, or the default.
    ///
    /// Runs the lazy TTL cleanup pass first; an expired entry reverts the
    /// view to the default size. Store read failures degrade to the
    /// default with a warning.
    #[must_use]
    pub fn load_page_size(&self, view_key: &str) -> usize {
        let mut entries = self.load_entries();
        if self.purge_expired(&mut entries) {
            if let Err(e) = self.persist(&entries) {
                warn!(error = %e, "Failed to persist purged page-size registry");
            }
        }
        entries
            .get(view_key)
            .map_or(self.default_page_size, |e| e.page_size)
    }

    /// Upserts the page size for `view_key` with a fresh timestamp.
    ///
    /// A size of zero is refused: no entry is ever created with it.
    ///
    /// # Errors
    ///
    /// Propagates store write failures.
    pub fn save_page_size(&self, view_key: &str, size: usize) -> RangeResult<()> {
        if size == 0 {
            warn!(view_key, "Refusing to persist page size of zero");
            return Ok(());
        }

        let mut entries = self.load_entries();
        self.purge_expired(&mut entries);
        entries.insert(
            view_key.to_string(),
            PaginationStorageEntry {
                page_size: size,
                last_update: Utc::now(),
            },
        );
        debug!(view_key, size, "Saved page size");
        self.persist(&entries)
    }

    /// Builds a first-page request sized from this view's stored memory.
    #[must_use]
    pub fn create_pagination(
        &self,
        view_key: &str,
        sort: Option<&str>,
        sort_dir: SortDir,
    ) -> PaginationRequest {
        let mut request = PaginationRequest::new(0, self.load_page_size(view_key));
        if let Some(sort) = sort {
            request = request.sorted_by(sort, sort_dir);
        }
        request
    }

    fn load_entries(&self) -> EntryMap {
        let raw = match self.store.read(&self.registry_key) {
            Ok(Some(raw)) => raw,
            Ok(None) => return EntryMap::new(),
            Err(e) => {
                warn!(error = %e, "Failed to read page-size registry; using defaults");
                return EntryMap::new();
            }
        };
        match serde_json::from_str(&raw) {
            Ok(entries) => entries,
            Err(e) => {
                warn!(error = %e, "Malformed page-size registry; resetting");
                EntryMap::new()
            }
        }
    }

    fn persist(&self, entries: &EntryMap) -> RangeResult<()> {
        let raw = serde_json::to_string(entries)?;
        self.store.write(&self.registry_key, &raw)
    }

    /// Drops entries older than the TTL. Returns true if anything was
    /// removed.
    fn purge_expired(&self, entries: &mut EntryMap) -> bool {
        let cutoff = Utc::now() - self.ttl;
        let before = entries.len();
        entries.retain(|_, entry| entry.last_update >= cutoff);
        entries.len() != before
    }
}

impl std::fmt::Debug for PaginationStorage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PaginationStorage")
            .field("registry_key", &self.registry_key)
            .field("default_page_size", &self.default_page_size)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn storage() -> (Arc<InMemoryStore>, PaginationStorage) {
        let store = Arc::new(InMemoryStore::new());
        let storage = PaginationStorage::new(Arc::clone(&store) as _, 10);
        (store, storage)
    }

    #[test]
    fn test_save_then_load() {
        let (_store, storage) = storage();
        storage.save_page_size("training-definition-list", 20).unwrap();
        assert_eq!(storage.load_page_size("training-definition-list"), 20);
    }

    #[test]
    fn test_unknown_view_key_gets_default() {
        let (_store, storage) = storage();
        assert_eq!(storage.load_page_size("never-seen"), 10);
    }

    #[test]
    fn test_save_does_not_evict_other_entries() {
        let (_store, storage) = storage();
        storage.save_page_size("view-a", 20).unwrap();
        storage.save_page_size("view-b", 50).unwrap();
        assert_eq!(storage.load_page_size("view-a"), 20);
        assert_eq!(storage.load_page_size("view-b"), 50);
    }

    #[test]
    fn test_zero_page_size_refused() {
        let (store, storage) = storage();
        storage.save_page_size("view-a", 0).unwrap();
        assert!(store
            .read(PaginationStorage::DEFAULT_REGISTRY_KEY)
            .unwrap()
            .is_none());
        assert_eq!(storage.load_page_size("view-a"), 10);
    }

    #[test]
    fn test_expired_entry_purged_on_load() {
        let (store, storage) = storage();

        let stale = Utc::now() - ChronoDuration::days(31);
        let blob = json!({
            "old-view": {"page_size": 42, "last_update": stale},
            "fresh-view": {"page_size": 25, "last_update": Utc::now()},
        });
        store
            .write(PaginationStorage::DEFAULT_REGISTRY_KEY, &blob.to_string())
            .unwrap();

        assert_eq!(storage.load_page_size("old-view"), 10);
        assert_eq!(storage.load_page_size("fresh-view"), 25);

        // The purge was persisted, not just applied in memory.
        let raw = store
            .read(PaginationStorage::DEFAULT_REGISTRY_KEY)
            .unwrap()
            .unwrap();
        let entries: EntryMap = serde_json::from_str(&raw).unwrap();
        assert!(!entries.contains_key("old-view"));
        assert!(entries.contains_key("fresh-view"));
    }

    #[test]
    fn test_entry_within_ttl_survives() {
        let (store, storage) = storage();
        let recent = Utc::now() - ChronoDuration::days(29);
        let blob = json!({
            "view": {"page_size": 15, "last_update": recent},
        });
        store
            .write(PaginationStorage::DEFAULT_REGISTRY_KEY, &blob.to_string())
            .unwrap();

        assert_eq!(storage.load_page_size("view"), 15);
    }

    #[test]
    fn test_malformed_blob_resets_to_defaults() {
        let (store, storage) = storage();
        store
            .write(PaginationStorage::DEFAULT_REGISTRY_KEY, "{not json at all")
            .unwrap();

        assert_eq!(storage.load_page_size("view"), 10);
        // Saving afterwards works on a clean registry.
        storage.save_page_size("view", 30).unwrap();
        assert_eq!(storage.load_page_size("view"), 30);
    }

    #[test]
    fn test_create_pagination() {
        let (_store, storage) = storage();
        storage.save_page_size("run-list", 25).unwrap();

        let request = storage.create_pagination("run-list", Some("start_time"), SortDir::Desc);
        assert_eq!(request.page, 0);
        assert_eq!(request.size, 25);
        assert_eq!(request.sort.as_deref(), Some("start_time"));
        assert_eq!(request.sort_dir, SortDir::Desc);

        let unsorted = storage.create_pagination("other", None, SortDir::Asc);
        assert_eq!(unsorted.size, 10);
        assert!(unsorted.sort.is_none());
    }

    #[test]
    fn test_custom_registry_key_isolation() {
        let store = Arc::new(InMemoryStore::new());
        let a = PaginationStorage::new(Arc::clone(&store) as _, 10).with_registry_key("app-a");
        let b = PaginationStorage::new(Arc::clone(&store) as _, 10).with_registry_key("app-b");

        a.save_page_size("view", 20).unwrap();
        assert_eq!(a.load_page_size("view"), 20);
        assert_eq!(b.load_page_size("view"), 10);
    }

    #[test]
    fn test_json_file_store_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("store.json");
        let store = JsonFileStore::new(&path);

        assert!(store.read("k").unwrap().is_none());
        store.write("k", "v1").unwrap();
        store.write("other", "v2").unwrap();
        assert_eq!(store.read("k").unwrap().as_deref(), Some("v1"));

        // A fresh handle over the same file sees the data.
        let reopened = JsonFileStore::new(&path);
        assert_eq!(reopened.read("other").unwrap().as_deref(), Some("v2"));
    }

    #[test]
    fn test_json_file_store_corrupt_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("store.json");
        std::fs::write(&path, "garbage").unwrap();

        let store = JsonFileStore::new(&path);
        assert!(store.read("k").unwrap().is_none());
        store.write("k", "v").unwrap();
        assert_eq!(store.read("k").unwrap().as_deref(), Some("v"));
    }

    #[test]
    fn test_pagination_storage_over_file_store() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("prefs.json");

        let storage = PaginationStorage::new(Arc::new(JsonFileStore::new(&path)) as _, 10);
        storage.save_page_size("pool-list", 35).unwrap();

        let reopened = PaginationStorage::new(Arc::new(JsonFileStore::new(&path)) as _, 10);
        assert_eq!(reopened.load_page_size("pool-list"), 35);
    }
}
