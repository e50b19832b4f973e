//! TTL cache for automation GET responses.
//!
//! Key to `{value, inserted_at}`; a hit requires the entry to be younger
//! than the TTL. No size bound and no LRU; a background sweep deletes
//! expired entries once a minute.

use std::time::{Duration, Instant};

use dashmap::DashMap;
use serde_json::Value;

/// Entry lifetime.
pub const DEFAULT_TTL: Duration = Duration::from_secs(5 * 60);

/// How often the background sweep runs.
pub const SWEEP_INTERVAL: Duration = Duration::from_secs(60);

struct Entry {
    value: Value,
    inserted_at: Instant,
}

/// In-memory cache of JSON responses with a fixed TTL.
pub struct TtlCache {
    ttl: Duration,
    entries: DashMap<String, Entry>,
}

impl TtlCache {
    /// Creates a cache with the given entry lifetime.
    #[must_use]
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            entries: DashMap::new(),
        }
    }

    /// Returns the cached value for `key` if it has not expired.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<Value> {
        self.get_at(key, Instant::now())
    }

    /// Lookup as of `now`. Expired entries are removed on access.
    #[must_use]
    pub fn get_at(&self, key: &str, now: Instant) -> Option<Value> {
        let expired = {
            let entry = self.entries.get(key)?;
            if now.duration_since(entry.inserted_at) < self.ttl {
                return Some(entry.value.clone());
            }
            true
        };
        if expired {
            self.entries.remove(key);
        }
        None
    }

    /// Stores `value` under `key`, stamped now.
    pub fn insert(&self, key: impl Into<String>, value: Value) {
        self.insert_at(key, value, Instant::now());
    }

    /// Store with an explicit insertion time.
    pub fn insert_at(&self, key: impl Into<String>, value: Value, now: Instant) {
        self.entries.insert(
            key.into(),
            Entry {
                value,
                inserted_at: now,
            },
        );
    }

    /// Deletes every expired entry.
    pub fn sweep(&self) {
        self.sweep_at(Instant::now());
    }

    /// Sweep as of `now`.
    pub fn sweep_at(&self, now: Instant) {
        self.entries
            .retain(|_, entry| now.duration_since(entry.inserted_at) < self.ttl);
    }

    /// Number of entries currently stored, expired or not.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` when the cache holds no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Default for TtlCache {
    fn default() -> Self {
        Self::new(DEFAULT_TTL)
    }
}
