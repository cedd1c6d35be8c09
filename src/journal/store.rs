//! Store trait, configuration document and the in-memory store

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Mutex;

use chrono::Utc;
use serde::{Deserialize, Serialize};

use super::error::{Result, StoreError};
use super::Entry;
use crate::shared::WindowStateUpdate;
use crate::wm::WindowId;

/// The persisted application configuration
///
/// Records are partial so files written before a field existed still load.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ConfigDocument {
    #[serde(rename = "openWindows", default)]
    pub open_windows: BTreeMap<WindowId, WindowStateUpdate>,
}

/// Backing storage for entries and the configuration document
///
/// Calls are blocking; async callers go through `spawn_blocking`.
pub trait Store: Send + Sync {
    /// Never fails: a missing or unreadable document is the empty one
    fn load_config(&self) -> ConfigDocument;

    fn save_config(&self, config: &ConfigDocument) -> Result<()>;

    /// All entries, one per id
    fn load_entries(&self) -> Result<Vec<Entry>>;

    fn load_entry(&self, id: &str) -> Result<Entry> {
        self.load_entries()?
            .into_iter()
            .find(|entry| entry.id == id)
            .ok_or_else(|| StoreError::EntryNotFound(id.to_string()))
    }

    /// Write an entry, returning it as stored (modified time and filename filled in)
    fn save_entry(&self, entry: &Entry) -> Result<Entry>;

    /// Remove an entry; already-missing data is not an error
    fn delete_entry(&self, entry: &Entry) -> Result<()>;
}

/// Store kept entirely in memory
///
/// Counts writes and can be told to fail them, which is what the
/// persistence tests need to observe.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: Mutex<BTreeMap<WindowId, Entry>>,
    config: Mutex<ConfigDocument>,
    config_saves: AtomicUsize,
    entry_saves: AtomicUsize,
    failing: AtomicBool,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: ConfigDocument) -> Self {
        let store = Self::default();
        *store.config.lock().unwrap_or_else(|e| e.into_inner()) = config;
        store
    }

    pub fn insert(&self, entry: Entry) {
        self.entries
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .insert(entry.id.clone(), entry);
    }

    pub fn config(&self) -> ConfigDocument {
        self.config.lock().unwrap_or_else(|e| e.into_inner()).clone()
    }

    pub fn config_saves(&self) -> usize {
        self.config_saves.load(Ordering::SeqCst)
    }

    pub fn entry_saves(&self) -> usize {
        self.entry_saves.load(Ordering::SeqCst)
    }

    /// Make every following write fail with an I/O error
    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    fn check_failing(&self, what: &str) -> Result<()> {
        if self.failing.load(Ordering::SeqCst) {
            return Err(StoreError::io(
                what,
                std::io::Error::new(std::io::ErrorKind::Other, "store unavailable"),
            ));
        }
        Ok(())
    }
}

impl Store for MemoryStore {
    fn load_config(&self) -> ConfigDocument {
        self.config()
    }

    fn save_config(&self, config: &ConfigDocument) -> Result<()> {
        self.check_failing("config")?;
        *self.config.lock().unwrap_or_else(|e| e.into_inner()) = config.clone();
        self.config_saves.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    fn load_entries(&self) -> Result<Vec<Entry>> {
        let entries = self.entries.lock().unwrap_or_else(|e| e.into_inner());
        Ok(entries.values().cloned().collect())
    }

    fn save_entry(&self, entry: &Entry) -> Result<Entry> {
        self.check_failing(&entry.id)?;
        let mut stored = entry.clone();
        stored.modified = Utc::now();
        self.insert(stored.clone());
        self.entry_saves.fetch_add(1, Ordering::SeqCst);
        Ok(stored)
    }

    fn delete_entry(&self, entry: &Entry) -> Result<()> {
        self.check_failing(&entry.id)?;
        self.entries
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .remove(&entry.id);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_config_document_wire_format() {
        let json = r#"{"openWindows":{"a":{"x":10,"zIndex":1001},"b":{}}}"#;
        let doc: ConfigDocument = serde_json::from_str(json).unwrap();
        assert_eq!(doc.open_windows.len(), 2);
        assert_eq!(doc.open_windows["a"].x, Some(10.0));
        assert_eq!(doc.open_windows["a"].z_index, Some(1001));
        assert!(doc.open_windows["b"].is_empty());

        let empty: ConfigDocument = serde_json::from_str("{}").unwrap();
        assert!(empty.open_windows.is_empty());
    }

    #[test]
    fn test_save_stamps_modified() {
        let store = MemoryStore::new();
        let created = Utc.with_ymd_and_hms(2024, 5, 1, 9, 0, 0).unwrap();
        let saved = store.save_entry(&Entry::new("a", "A", created)).unwrap();
        assert!(saved.modified > created);
        assert_eq!(store.load_entry("a").unwrap(), saved);
        assert_eq!(store.entry_saves(), 1);
    }

    #[test]
    fn test_load_missing_entry() {
        let store = MemoryStore::new();
        match store.load_entry("nope") {
            Err(StoreError::EntryNotFound(id)) => assert_eq!(id, "nope"),
            other => panic!("Expected EntryNotFound, got {:?}", other),
        }
    }

    #[test]
    fn test_failing_store() {
        let store = MemoryStore::new();
        store.set_failing(true);
        assert!(store.save_config(&ConfigDocument::default()).is_err());
        assert_eq!(store.config_saves(), 0);

        store.set_failing(false);
        store.save_config(&ConfigDocument::default()).unwrap();
        assert_eq!(store.config_saves(), 1);
    }
}
