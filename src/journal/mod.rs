//! Journal Module
//!
//! Journal entries and the stores that keep them, together with the
//! configuration document holding the open-window map.

pub mod error;
pub mod file_store;
pub mod store;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::wm::WindowId;

pub use error::StoreError;
pub use file_store::FileStore;
pub use store::{ConfigDocument, MemoryStore, Store};

/// A journal entry; its id is also the id of its window
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Entry {
    pub id: WindowId,
    pub title: String,
    /// Markdown body, stored next to the metadata file
    #[serde(default)]
    pub content: String,
    pub created: DateTime<Utc>,
    pub modified: DateTime<Utc>,
    #[serde(default)]
    pub tags: Vec<String>,
    /// Base name of the entry's files (`DD-NNN`) once it has been saved
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub filename: Option<String>,
}

impl Entry {
    pub fn new(id: impl Into<WindowId>, title: impl Into<String>, created: DateTime<Utc>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            content: String::new(),
            created,
            modified: created,
            tags: Vec::new(),
            filename: None,
        }
    }

    pub fn metadata(&self) -> EntryMetadata {
        EntryMetadata {
            id: self.id.clone(),
            title: self.title.clone(),
            created: self.created,
            modified: self.modified,
            tags: self.tags.clone(),
            filename: self.filename.clone(),
        }
    }
}

/// The `.json` half of a stored entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EntryMetadata {
    pub id: WindowId,
    pub title: String,
    pub created: DateTime<Utc>,
    pub modified: DateTime<Utc>,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub filename: Option<String>,
}

impl EntryMetadata {
    pub fn into_entry(self, content: String) -> Entry {
        Entry {
            id: self.id,
            title: self.title,
            content,
            created: self.created,
            modified: self.modified,
            tags: self.tags,
            filename: self.filename,
        }
    }
}
