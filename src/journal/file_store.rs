//! File-backed journal store
//!
//! Layout under the journal directory:
//!
//! ```text
//! <journal>/2024/03/09-001.json   metadata
//! <journal>/2024/03/09-001.md     content
//! ```
//!
//! The number after the day is one more than the highest number already
//! used in that month's directory.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::thread;
use std::time::Duration;

use chrono::{DateTime, Datelike, Utc};
use tracing::{debug, info, warn};
use walkdir::WalkDir;

use super::error::{Result, StoreError};
use super::store::{ConfigDocument, Store};
use super::{Entry, EntryMetadata};
use crate::config::Config;

pub struct FileStore {
    journal_dir: PathBuf,
    config_file: PathBuf,
    write_retries: u32,
    retry_delay: Duration,
}

impl FileStore {
    pub fn new(journal_dir: impl Into<PathBuf>, config_file: impl Into<PathBuf>) -> Self {
        Self {
            journal_dir: journal_dir.into(),
            config_file: config_file.into(),
            write_retries: 3,
            retry_delay: Duration::from_millis(100),
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(&config.storage.journal_dir, &config.storage.config_file)
            .with_retries(config.persistence.write_retries, config.persistence.retry_delay())
    }

    pub fn with_retries(mut self, write_retries: u32, retry_delay: Duration) -> Self {
        self.write_retries = write_retries.max(1);
        self.retry_delay = retry_delay;
        self
    }

    pub fn journal_dir(&self) -> &Path {
        &self.journal_dir
    }

    /// `<journal>/<YYYY>/<MM>`
    fn month_dir(&self, created: &DateTime<Utc>) -> PathBuf {
        self.journal_dir
            .join(format!("{:04}", created.year()))
            .join(format!("{:02}", created.month()))
    }

    /// Base name of the file already holding `id` in `dir`, if any
    fn find_existing(dir: &Path, id: &str) -> Option<String> {
        let files = fs::read_dir(dir).ok()?;
        for file in files.flatten() {
            let path = file.path();
            if path.extension().and_then(|e| e.to_str()) != Some("json") {
                continue;
            }
            match read_metadata(&path) {
                Ok(metadata) if metadata.id == id => {
                    return path.file_stem().and_then(|s| s.to_str()).map(str::to_string);
                }
                Ok(_) => {}
                Err(e) => warn!("Skipping unreadable metadata: {}", e),
            }
        }
        None
    }

    /// Next `NNN` for a month directory, zero-padded to three digits
    fn next_file_number(dir: &Path) -> String {
        let max = fs::read_dir(dir)
            .map(|files| {
                files
                    .flatten()
                    .filter_map(|file| {
                        let name = file.file_name().into_string().ok()?;
                        let stem = name.strip_suffix(".json")?;
                        stem.split('-').nth(1)?.parse::<u32>().ok()
                    })
                    .max()
                    .unwrap_or(0)
            })
            .unwrap_or(0);

        format!("{:03}", max + 1)
    }

    /// Write `content` and read it back until it matches
    fn write_verified(&self, path: &Path, content: &str) -> Result<()> {
        for attempt in 1..=self.write_retries {
            fs::write(path, content).map_err(|e| StoreError::io(path, e))?;

            match fs::read_to_string(path) {
                Ok(written) if written == content => {
                    debug!("Verified {} bytes written to {:?}", written.len(), path);
                    return Ok(());
                }
                Ok(written) => warn!(
                    "Content mismatch in {:?} (attempt {}): wrote {} bytes, read {}",
                    path,
                    attempt,
                    content.len(),
                    written.len()
                ),
                Err(e) => warn!("Failed to verify {:?} (attempt {}): {}", path, attempt, e),
            }

            if attempt < self.write_retries {
                thread::sleep(self.retry_delay);
            }
        }

        Err(StoreError::WriteVerification {
            path: path.to_path_buf(),
            attempts: self.write_retries,
        })
    }
}

fn read_metadata(path: &Path) -> Result<EntryMetadata> {
    let json = fs::read_to_string(path).map_err(|e| StoreError::io(path, e))?;
    serde_json::from_str(&json).map_err(|e| StoreError::json(path, e))
}

/// Metadata plus the sibling `.md`; a missing content file reads as empty
fn read_entry(json_path: &Path) -> Result<Entry> {
    let metadata = read_metadata(json_path)?;
    let md_path = json_path.with_extension("md");
    let content = match fs::read_to_string(&md_path) {
        Ok(content) => content,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            warn!("No content file for {:?}", json_path);
            String::new()
        }
        Err(e) => return Err(StoreError::io(md_path, e)),
    };
    Ok(metadata.into_entry(content))
}

fn remove_if_present(path: &Path) -> Result<()> {
    match fs::remove_file(path) {
        Err(e) if e.kind() != std::io::ErrorKind::NotFound => Err(StoreError::io(path, e)),
        _ => Ok(()),
    }
}

impl Store for FileStore {
    fn load_config(&self) -> ConfigDocument {
        let json = match fs::read_to_string(&self.config_file) {
            Ok(json) => json,
            Err(e) => {
                if e.kind() != std::io::ErrorKind::NotFound {
                    warn!("Failed to read {:?}: {}", self.config_file, e);
                }
                return ConfigDocument::default();
            }
        };

        serde_json::from_str(&json).unwrap_or_else(|e| {
            warn!("Ignoring unreadable config {:?}: {}", self.config_file, e);
            ConfigDocument::default()
        })
    }

    fn save_config(&self, config: &ConfigDocument) -> Result<()> {
        if let Some(parent) = self.config_file.parent() {
            fs::create_dir_all(parent).map_err(|e| StoreError::io(parent, e))?;
        }
        let json = serde_json::to_string_pretty(config).map_err(|e| StoreError::json(&self.config_file, e))?;
        fs::write(&self.config_file, json).map_err(|e| StoreError::io(&self.config_file, e))?;

        debug!("Saved {} open windows to {:?}", config.open_windows.len(), self.config_file);
        Ok(())
    }

    fn load_entries(&self) -> Result<Vec<Entry>> {
        if !self.journal_dir.exists() {
            return Ok(Vec::new());
        }

        let mut by_id: HashMap<String, Entry> = HashMap::new();

        for item in WalkDir::new(&self.journal_dir).follow_links(false) {
            let item = match item {
                Ok(item) => item,
                Err(e) => {
                    warn!("Error walking journal directory: {}", e);
                    continue;
                }
            };
            let path = item.path();
            if !item.file_type().is_file() || path.extension().and_then(|e| e.to_str()) != Some("json") {
                continue;
            }

            let entry = match read_entry(path) {
                Ok(entry) => entry,
                Err(e) => {
                    warn!("Skipping entry: {}", e);
                    continue;
                }
            };

            // Keep the most recently modified copy of a duplicated id
            match by_id.get(&entry.id) {
                Some(existing) if existing.modified >= entry.modified => {}
                _ => {
                    by_id.insert(entry.id.clone(), entry);
                }
            }
        }

        let mut entries: Vec<Entry> = by_id.into_values().collect();
        entries.sort_by(|a, b| a.created.cmp(&b.created).then_with(|| a.id.cmp(&b.id)));

        info!("Loaded {} journal entries from {:?}", entries.len(), self.journal_dir);
        Ok(entries)
    }

    fn save_entry(&self, entry: &Entry) -> Result<Entry> {
        let dir = self.month_dir(&entry.created);
        fs::create_dir_all(&dir).map_err(|e| StoreError::io(&dir, e))?;

        let filename = Self::find_existing(&dir, &entry.id)
            .unwrap_or_else(|| format!("{:02}-{}", entry.created.day(), Self::next_file_number(&dir)));

        let md_path = dir.join(format!("{filename}.md"));
        let json_path = dir.join(format!("{filename}.json"));

        self.write_verified(&md_path, &entry.content)?;

        let mut stored = entry.clone();
        stored.modified = Utc::now();
        stored.filename = Some(filename);

        let json = serde_json::to_string_pretty(&stored.metadata()).map_err(|e| StoreError::json(&json_path, e))?;
        fs::write(&json_path, json).map_err(|e| StoreError::io(&json_path, e))?;

        debug!("Saved entry {} to {:?}", stored.id, json_path);
        Ok(stored)
    }

    fn delete_entry(&self, entry: &Entry) -> Result<()> {
        let dir = self.month_dir(&entry.created);
        let Some(filename) = entry.filename.clone().or_else(|| Self::find_existing(&dir, &entry.id)) else {
            debug!("Entry {} was never saved, nothing to delete", entry.id);
            return Ok(());
        };

        remove_if_present(&dir.join(format!("{filename}.md")))?;
        remove_if_present(&dir.join(format!("{filename}.json")))?;

        info!("Deleted entry {} ({})", entry.id, filename);
        Ok(())
    }
}
