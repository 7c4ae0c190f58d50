// Cache path and key utilities.
// Locates the on-disk store and derives the per-user cache slot names.

use std::path::PathBuf;

use directories::ProjectDirs;

const CONTENT_KEY_PREFIX: &str = "gh_calendar_content";
const EXPIRE_KEY_PREFIX: &str = "gh_calendar_expire";

/// Get the base cache directory (~/.cache/ghcal on Linux).
pub fn cache_dir() -> Option<PathBuf> {
    ProjectDirs::from("", "", "ghcal").map(|dirs| dirs.cache_dir().to_path_buf())
}

/// Path to the persistent key-value store file.
pub fn store_path() -> Option<PathBuf> {
    cache_dir().map(|dir| dir.join("store.json"))
}

/// The two cache slots held for one user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CacheKeys {
    /// Slot holding the raw calendar page.
    pub content: String,
    /// Slot holding the expiry as milliseconds since the epoch.
    pub expire_at: String,
}

impl CacheKeys {
    /// Keys hold the username verbatim; they are map keys, never paths.
    pub fn for_user(username: &str) -> Self {
        Self {
            content: format!("{}.{}", CONTENT_KEY_PREFIX, username),
            expire_at: format!("{}.{}", EXPIRE_KEY_PREFIX, username),
        }
    }
}
