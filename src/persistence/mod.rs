//! Persistence Module
//!
//! Bridges window and document changes to the store. Saves are debounced
//! per key and run on the blocking pool; a failed background save is
//! logged and dropped, and the next change tries again.
//!
//! Store writes run one at a time. Aborting a debounced save does not
//! stop a blocking write that already started, so the write lock is held
//! until the blocking call returns and a later save always lands last.

pub mod debounce;

use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use tokio::sync::Mutex;
use tracing::{debug, warn};

use crate::config::PersistenceConfig;
use crate::journal::{ConfigDocument, Entry, Store};
use crate::wm::WindowId;

pub use debounce::Debouncer;

/// Debounce key: one for the configuration document, one per entry
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum SaveKey {
    Config,
    Entry(WindowId),
}

pub struct PersistenceBridge {
    store: Arc<dyn Store>,
    write_lock: Arc<Mutex<()>>,
    debouncer: Debouncer<SaveKey>,
    config_delay: Duration,
    entry_delay: Duration,
}

impl PersistenceBridge {
    pub fn new(store: Arc<dyn Store>, config: &PersistenceConfig) -> Self {
        Self {
            store,
            write_lock: Arc::new(Mutex::new(())),
            debouncer: Debouncer::new(),
            config_delay: config.config_debounce(),
            entry_delay: config.entry_debounce(),
        }
    }

    /// Saves scheduled but not yet finished
    pub fn pending(&self) -> usize {
        self.debouncer.pending()
    }

    /// Schedule a write of the open-window map
    pub fn save_window_map(&mut self, document: ConfigDocument) {
        let store = self.store.clone();
        let lock = self.write_lock.clone();
        self.debouncer.schedule(SaveKey::Config, self.config_delay, async move {
            let count = document.open_windows.len();
            match run_blocking(store, lock, move |store| store.save_config(&document).map_err(Into::into)).await {
                Ok(()) => debug!("Saved open-window map ({} windows)", count),
                Err(e) => warn!("Failed to save open-window map: {:#}", e),
            }
        });
    }

    /// Schedule a write of one entry
    pub fn save_entry(&mut self, entry: Entry) {
        let store = self.store.clone();
        let lock = self.write_lock.clone();
        let key = SaveKey::Entry(entry.id.clone());
        self.debouncer.schedule(key, self.entry_delay, async move {
            let id = entry.id.clone();
            match run_blocking(store, lock, move |store| store.save_entry(&entry).map_err(Into::into)).await {
                Ok(saved) => debug!("Saved entry {} as {:?}", id, saved.filename),
                Err(e) => warn!("Failed to save entry {}: {:#}", id, e),
            }
        });
    }

    /// Drop a pending entry save, e.g. when the entry is deleted
    pub fn cancel_entry(&mut self, id: &str) {
        self.debouncer.cancel(&SaveKey::Entry(id.to_string()));
    }

    pub async fn save_config_now(&mut self, document: ConfigDocument) -> Result<()> {
        self.debouncer.cancel(&SaveKey::Config);
        run_blocking(self.store.clone(), self.write_lock.clone(), move |store| {
            store.save_config(&document).context("Failed to save open-window map")
        })
        .await
    }

    pub async fn save_entry_now(&mut self, entry: Entry) -> Result<Entry> {
        self.debouncer.cancel(&SaveKey::Entry(entry.id.clone()));
        run_blocking(self.store.clone(), self.write_lock.clone(), move |store| {
            store
                .save_entry(&entry)
                .with_context(|| format!("Failed to save entry {}", entry.id))
        })
        .await
    }

    pub async fn delete_entry_now(&mut self, entry: Entry) -> Result<()> {
        self.cancel_entry(&entry.id);
        run_blocking(self.store.clone(), self.write_lock.clone(), move |store| {
            store
                .delete_entry(&entry)
                .with_context(|| format!("Failed to delete entry {}", entry.id))
        })
        .await
    }

    /// Abort every pending save
    pub fn shutdown(&mut self) {
        let pending = self.debouncer.pending();
        if pending > 0 {
            warn!("Dropping {} pending saves on shutdown", pending);
        }
        self.debouncer.cancel_all();
    }
}

/// Run a store call on the blocking pool while holding the write lock
///
/// The guard moves into the blocking closure, so it is released when the
/// call returns even if the awaiting task was aborted.
async fn run_blocking<T, F>(store: Arc<dyn Store>, lock: Arc<Mutex<()>>, call: F) -> Result<T>
where
    T: Send + 'static,
    F: FnOnce(&dyn Store) -> Result<T> + Send + 'static,
{
    let guard = lock.lock_owned().await;
    tokio::task::spawn_blocking(move || {
        let _guard = guard;
        call(store.as_ref())
    })
    .await
        .context("Store task panicked")?
}
