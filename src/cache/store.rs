// Cache store for the raw calendar page.
// Handles TTL checking, paired slot writes, and the in-memory and file backends.

use std::collections::HashMap;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use std::time::Duration;

use chrono::{DateTime, Utc};

use crate::error::{CalendarError, Result};

use super::paths::{self, CacheKeys};

/// Default TTL for a cached calendar page: one day.
pub const DEFAULT_TTL: Duration = Duration::from_secs(24 * 60 * 60);

/// String key-value storage that survives between loads.
pub trait CacheStore: Send + Sync {
    /// Read a single slot.
    fn get(&self, key: &str) -> Result<Option<String>>;

    /// Read several slots as one operation, so a concurrent `set_many` is seen whole or not at all.
    fn get_many(&self, keys: &[&str]) -> Result<Vec<Option<String>>>;

    /// Write several slots as one operation, so readers never observe half of them.
    fn set_many(&self, entries: &[(&str, &str)]) -> Result<()>;
}

/// A cached calendar page with its absolute expiry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CacheEntry {
    /// The raw page markup.
    pub content: String,
    /// When the entry stops being usable.
    pub expires_at: DateTime<Utc>,
}

impl CacheEntry {
    /// Create an entry that expires `ttl` after `now`.
    pub fn new(content: String, now: DateTime<Utc>, ttl: Duration) -> Self {
        let ttl = chrono::Duration::from_std(ttl).unwrap_or(chrono::Duration::MAX);
        Self {
            content,
            expires_at: now.checked_add_signed(ttl).unwrap_or(DateTime::<Utc>::MAX_UTC),
        }
    }

    /// Usable only strictly before the expiry and when there is content to use.
    pub fn is_fresh(&self, now: DateTime<Utc>) -> bool {
        now < self.expires_at && !self.content.is_empty()
    }
}

/// Read the entry for a user. A missing or unparseable expiry counts as already expired.
pub fn read_entry<S: CacheStore + ?Sized>(store: &S, username: &str) -> Result<Option<CacheEntry>> {
    let keys = CacheKeys::for_user(username);
    let mut slots = store
        .get_many(&[keys.content.as_str(), keys.expire_at.as_str()])?
        .into_iter();
    let (Some(Some(content)), expire_at) = (slots.next(), slots.next().flatten()) else {
        return Ok(None);
    };

    let expires_at = expire_at
        .and_then(|raw| raw.trim().parse::<i64>().ok())
        .and_then(DateTime::from_timestamp_millis)
        .unwrap_or(DateTime::<Utc>::MIN_UTC);

    Ok(Some(CacheEntry {
        content,
        expires_at,
    }))
}

/// Read the cached content for a user, returning None if stale or empty.
pub fn read_if_fresh<S: CacheStore + ?Sized>(
    store: &S,
    username: &str,
    now: DateTime<Utc>,
) -> Result<Option<String>> {
    match read_entry(store, username)? {
        Some(entry) if entry.is_fresh(now) => Ok(Some(entry.content)),
        _ => Ok(None),
    }
}

/// Write content and expiry for a user together.
pub fn write_entry<S: CacheStore + ?Sized>(
    store: &S,
    username: &str,
    entry: &CacheEntry,
) -> Result<()> {
    let keys = CacheKeys::for_user(username);
    let expire_at = entry.expires_at.timestamp_millis().to_string();
    store.set_many(&[
        (keys.content.as_str(), entry.content.as_str()),
        (keys.expire_at.as_str(), expire_at.as_str()),
    ])
}

/// Process-local store, mostly for tests and embedding.
#[derive(Debug, Default)]
pub struct MemoryStore {
    slots: Mutex<HashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of slots currently held.
    pub fn len(&self) -> usize {
        self.slots.lock().map(|slots| slots.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl CacheStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        let slots = self
            .slots
            .lock()
            .map_err(|e| CalendarError::Other(e.to_string()))?;
        Ok(slots.get(key).cloned())
    }

    fn get_many(&self, keys: &[&str]) -> Result<Vec<Option<String>>> {
        let slots = self
            .slots
            .lock()
            .map_err(|e| CalendarError::Other(e.to_string()))?;
        Ok(keys.iter().map(|key| slots.get(*key).cloned()).collect())
    }

    fn set_many(&self, entries: &[(&str, &str)]) -> Result<()> {
        let mut slots = self
            .slots
            .lock()
            .map_err(|e| CalendarError::Other(e.to_string()))?;
        for (key, value) in entries {
            slots.insert((*key).to_string(), (*value).to_string());
        }
        Ok(())
    }
}

/// Store persisted as a single JSON object on disk.
#[derive(Debug)]
pub struct FileStore {
    path: PathBuf,
    lock: Mutex<()>,
}

impl FileStore {
    /// Open (lazily) a store at the given path.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            lock: Mutex::new(()),
        }
    }

    /// Open the store in the user cache directory.
    pub fn open_default() -> Result<Self> {
        paths::store_path()
            .map(Self::new)
            .ok_or_else(|| CalendarError::Other("No cache directory available".to_string()))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_map(&self) -> Result<HashMap<String, String>> {
        if !self.path.exists() {
            return Ok(HashMap::new());
        }

        let contents = fs::read_to_string(&self.path)?;
        if contents.trim().is_empty() {
            return Ok(HashMap::new());
        }
        Ok(serde_json::from_str(&contents)?)
    }

    fn write_map(&self, map: &HashMap<String, String>) -> Result<()> {
        // Ensure parent directory exists
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }

        let json = serde_json::to_string_pretty(map)?;

        // Write atomically via temp file
        let temp_path = self.path.with_extension("tmp");
        let mut file = fs::File::create(&temp_path)?;
        file.write_all(json.as_bytes())?;
        file.sync_all()?;
        fs::rename(&temp_path, &self.path)?;

        Ok(())
    }
}

impl CacheStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        let _guard = self
            .lock
            .lock()
            .map_err(|e| CalendarError::Other(e.to_string()))?;
        Ok(self.read_map()?.remove(key))
    }

    fn get_many(&self, keys: &[&str]) -> Result<Vec<Option<String>>> {
        let _guard = self
            .lock
            .lock()
            .map_err(|e| CalendarError::Other(e.to_string()))?;
        let map = self.read_map()?;
        Ok(keys.iter().map(|key| map.get(*key).cloned()).collect())
    }

    fn set_many(&self, entries: &[(&str, &str)]) -> Result<()> {
        let _guard = self
            .lock
            .lock()
            .map_err(|e| CalendarError::Other(e.to_string()))?;
        let mut map = self.read_map()?;
        for (key, value) in entries {
            map.insert((*key).to_string(), (*value).to_string());
        }
        self.write_map(&map)
    }
}
