//! Session Module
//!
//! The application layer: owns the journal entries, the window manager
//! and the persistence bridge. Window notifications are drained after
//! every change and turned into a rebuilt open-window map, whose save is
//! debounced.

use std::collections::BTreeMap;
use std::sync::Arc;

use anyhow::{Context, Result};
use chrono::{DateTime, Local, NaiveDate, Utc};
use tracing::{debug, info};
use uuid::Uuid;

use crate::config::Config;
use crate::journal::{ConfigDocument, Entry, Store, StoreError};
use crate::persistence::PersistenceBridge;
use crate::shared::WindowStateUpdate;
use crate::wm::{Viewport, WindowCommand, WindowId, WindowManager};

pub struct Session {
    entries: BTreeMap<WindowId, Entry>,
    windows: WindowManager,
    bridge: PersistenceBridge,
}

impl Session {
    /// Load entries and reopen the windows recorded in the configuration document
    ///
    /// Records for entries that no longer exist are dropped. The rest are
    /// reopened lowest z-index first, so the persisted stacking survives.
    pub async fn load(store: Arc<dyn Store>, config: &Config, viewport: impl Viewport + 'static) -> Result<Self> {
        let loader = store.clone();
        let (entries, document) = tokio::task::spawn_blocking(move || -> Result<_> {
            let entries = loader.load_entries().context("Failed to load journal entries")?;
            Ok((entries, loader.load_config()))
        })
        .await
        .context("Loader task panicked")??;

        let entries: BTreeMap<WindowId, Entry> = entries.into_iter().map(|e| (e.id.clone(), e)).collect();

        let mut records: Vec<(WindowId, WindowStateUpdate)> = document
            .open_windows
            .into_iter()
            .filter(|(id, _)| entries.contains_key(id))
            .collect();
        records.sort_by(|(a_id, a), (b_id, b)| a.z_index.cmp(&b.z_index).then_with(|| a_id.cmp(b_id)));

        let mut windows = WindowManager::new(config.layout.clone(), viewport);
        windows.restore_open_windows(records.into_iter().map(|(id, record)| {
            let title = entries.get(&id).map(|e| e.title.clone()).unwrap_or_default();
            (id, title, record)
        }));

        info!("Session loaded: {} entries, {} open windows", entries.len(), windows.len());

        Ok(Self {
            entries,
            windows,
            bridge: PersistenceBridge::new(store, &config.persistence),
        })
    }

    pub fn entries(&self) -> impl Iterator<Item = &Entry> {
        self.entries.values()
    }

    /// Entries created on `date` (UTC), oldest first
    pub fn entries_on(&self, date: NaiveDate) -> Vec<&Entry> {
        let mut entries: Vec<&Entry> = self
            .entries
            .values()
            .filter(|entry| entry.created.date_naive() == date)
            .collect();
        entries.sort_by_key(|entry| entry.created);
        entries
    }

    pub fn entry(&self, id: &str) -> Option<&Entry> {
        self.entries.get(id)
    }

    pub fn windows(&self) -> &WindowManager {
        &self.windows
    }

    /// Direct access to the manager; call [`Session::pump_events`] afterwards
    pub fn windows_mut(&mut self) -> &mut WindowManager {
        &mut self.windows
    }

    pub fn bridge(&self) -> &PersistenceBridge {
        &self.bridge
    }

    /// Create an entry, save it right away and open its window
    pub async fn new_entry(&mut self, created: Option<DateTime<Utc>>) -> Result<WindowId> {
        let created = created.unwrap_or_else(Utc::now);
        let id = Uuid::new_v4().to_string();
        let title = format!("Entry {}", created.with_timezone(&Local).format("%H:%M:%S"));

        let entry = Entry::new(id.clone(), title, created);
        let saved = self.bridge.save_entry_now(entry).await?;
        info!("Created entry {} ({})", id, saved.title);

        self.windows.open(id.clone(), saved.title.clone());
        self.entries.insert(id.clone(), saved);
        self.pump_events();
        Ok(id)
    }

    pub fn open_entry(&mut self, id: &str) -> Result<()> {
        let entry = self
            .entries
            .get(id)
            .ok_or_else(|| StoreError::EntryNotFound(id.to_string()))?;
        self.windows.open(id, entry.title.clone());
        self.pump_events();
        Ok(())
    }

    pub fn close_entry(&mut self, id: &str) -> bool {
        let closed = self.windows.close(id);
        self.pump_events();
        closed
    }

    /// Replace an entry's content and schedule its save
    pub fn update_content(&mut self, id: &str, content: impl Into<String>) -> Result<()> {
        let entry = self.entry_mut(id)?;
        entry.content = content.into();
        entry.modified = Utc::now();
        let entry = entry.clone();
        self.bridge.save_entry(entry);
        Ok(())
    }

    pub fn rename_entry(&mut self, id: &str, title: impl Into<String>) -> Result<()> {
        let title = title.into();
        let entry = self.entry_mut(id)?;
        entry.title = title.clone();
        entry.modified = Utc::now();
        let entry = entry.clone();

        self.windows.set_title(id, title);
        self.bridge.save_entry(entry);
        Ok(())
    }

    pub async fn delete_entry(&mut self, id: &str) -> Result<()> {
        let entry = self
            .entries
            .remove(id)
            .ok_or_else(|| StoreError::EntryNotFound(id.to_string()))?;
        self.windows.close(id);
        self.pump_events();
        self.bridge.delete_entry_now(entry).await
    }

    pub fn dispatch(&mut self, command: WindowCommand) {
        self.windows.dispatch(command);
        self.pump_events();
    }

    /// Drain window notifications and schedule a map save when needed
    pub fn pump_events(&mut self) {
        let events = self.windows.drain_events();
        if events.is_empty() {
            return;
        }
        debug!("Processing {} window events", events.len());

        if events.iter().any(|e| e.affects_window_map()) {
            self.bridge.save_window_map(self.open_window_map());
        }
    }

    /// Current open-window map as persisted
    pub fn open_window_map(&self) -> ConfigDocument {
        ConfigDocument {
            open_windows: self
                .windows
                .window_states()
                .map(|(id, state)| (id.clone(), WindowStateUpdate::from(state)))
                .collect(),
        }
    }

    /// Write the open-window map immediately, replacing any pending save
    pub async fn flush(&mut self) -> Result<()> {
        let document = self.open_window_map();
        self.bridge.save_config_now(document).await
    }

    /// Flush the window map and drop whatever else is still pending
    pub async fn shutdown(mut self) -> Result<()> {
        let result = self.flush().await;
        self.bridge.shutdown();
        result
    }

    fn entry_mut(&mut self, id: &str) -> Result<&mut Entry> {
        self.entries
            .get_mut(id)
            .ok_or_else(|| StoreError::EntryNotFound(id.to_string()).into())
    }
}
