//! JSON file backed store

use fs2::FileExt;
use std::collections::BTreeMap;
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::warn;

use super::{validate_key, KeyValueStore, Result};
use crate::config::{get_profile_dir, DEFAULT_PROFILE};

const STORE_FILE: &str = "store.json";

/// All keys of one profile, kept together in `<profile_dir>/store.json`.
///
/// Every write re-reads the file under an exclusive lock, so two processes
/// writing different keys do not clobber each other. Writes to the same key
/// are last-writer-wins.
pub struct FileStore {
    profile: String,
    path: PathBuf,
}

impl FileStore {
    pub fn new(profile: &str) -> anyhow::Result<Self> {
        let profile_name = if profile.is_empty() {
            DEFAULT_PROFILE.to_string()
        } else {
            profile.to_string()
        };

        let profile_dir = get_profile_dir(&profile_name)?;

        Ok(Self {
            profile: profile_name,
            path: profile_dir.join(STORE_FILE),
        })
    }

    /// Store rooted at an explicit directory, bypassing profile lookup.
    pub fn in_dir(dir: impl AsRef<Path>) -> Self {
        Self {
            profile: DEFAULT_PROFILE.to_string(),
            path: dir.as_ref().join(STORE_FILE),
        }
    }

    pub fn profile(&self) -> &str {
        &self.profile
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_map(&self) -> Result<BTreeMap<String, String>> {
        if !self.path.exists() {
            return Ok(BTreeMap::new());
        }

        let content = fs::read_to_string(&self.path)?;
        if content.trim().is_empty() {
            return Ok(BTreeMap::new());
        }

        Ok(serde_json::from_str(&content)?)
    }

    fn lock(&self) -> Result<File> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let lock = File::create(self.path.with_extension("json.lock"))?;
        lock.lock_exclusive()?;
        Ok(lock)
    }

    fn update(&mut self, apply: impl FnOnce(&mut BTreeMap<String, String>)) -> Result<()> {
        let _lock = self.lock()?;

        let mut map = match self.read_map() {
            Ok(map) => map,
            Err(e) => {
                let corrupt_path = self.path.with_extension("json.corrupt");
                warn!(
                    "Discarding unreadable store {}: {} (kept as {})",
                    self.path.display(),
                    e,
                    corrupt_path.display()
                );
                if let Err(e) = fs::copy(&self.path, &corrupt_path) {
                    warn!("Failed to keep unreadable store: {}", e);
                }
                BTreeMap::new()
            }
        };
        apply(&mut map);

        if self.path.exists() {
            let backup_path = self.path.with_extension("json.bak");
            if let Err(e) = fs::copy(&self.path, &backup_path) {
                warn!("Failed to create backup: {}", e);
            }
        }

        let content = serde_json::to_string_pretty(&map)?;
        let dir = self.path.parent().unwrap_or_else(|| Path::new("."));
        let mut tmp = tempfile::NamedTempFile::new_in(dir)?;
        tmp.write_all(content.as_bytes())?;
        tmp.persist(&self.path).map_err(|e| e.error)?;
        Ok(())
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        validate_key(key)?;
        Ok(self.read_map()?.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        validate_key(key)?;
        self.update(|map| {
            map.insert(key.to_string(), value.to_string());
        })
    }

    fn remove(&mut self, key: &str) -> Result<()> {
        validate_key(key)?;
        if !self.path.exists() {
            return Ok(());
        }
        self.update(|map| {
            map.remove(key);
        })
    }
}
