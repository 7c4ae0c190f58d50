// Cache module for the raw calendar page.
// Keeps one content/expiry pair per user in a pluggable key-value store.

pub mod paths;
pub mod store;

pub use paths::{CacheKeys, cache_dir, store_path};
pub use store::{
    CacheEntry, CacheStore, DEFAULT_TTL, FileStore, MemoryStore, read_entry, read_if_fresh,
    write_entry,
};
