// crates/regionmatch-core/src/cache.rs

//! # Resolution cache
//!
//! Line-lists repeat the same handful of location strings thousands of
//! times. The cache memoizes whole [`ResolutionResult`]s per
//! (gazetteer version, parent, raw tuple).
//!
//! The cache tracks a single *current* version. Lookups and inserts for any
//! other version are misses and dropped writes respectively, and
//! [`ResolutionCache::invalidate`] clears everything while moving to the new
//! version under the same lock, so no hit can ever cross versions.

use crate::resolver::{RawLocationInput, ResolutionResult};
use log::{debug, warn};
use lru::LruCache;
use parking_lot::Mutex;
use serde::Serialize;
use std::num::NonZeroUsize;
use std::sync::atomic::{AtomicU64, Ordering};

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct CacheKey {
    pub version: u64,
    pub parent: Option<String>,
    pub input: RawLocationInput,
}

impl CacheKey {
    pub fn new(version: u64, parent: Option<&str>, input: &RawLocationInput) -> Self {
        Self {
            version,
            parent: parent.map(str::to_string),
            input: input.clone(),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct CacheStats {
    pub version: u64,
    pub len: usize,
    pub capacity: usize,
    pub hits: u64,
    pub misses: u64,
    pub insertions: u64,
    pub evictions: u64,
    /// Results computed against a version that was superseded before they
    /// could be stored.
    pub stale_writes: u64,
}

impl CacheStats {
    pub fn hit_rate(&self) -> f64 {
        let total = self.hits + self.misses;
        if total == 0 {
            0.0
        } else {
            self.hits as f64 / total as f64
        }
    }
}

struct CacheState {
    version: u64,
    /// `None` when caching is disabled.
    entries: Option<LruCache<CacheKey, ResolutionResult>>,
}

/// Bounded LRU of resolution results, safe to share between threads.
pub struct ResolutionCache {
    state: Mutex<CacheState>,
    capacity: usize,
    hits: AtomicU64,
    misses: AtomicU64,
    insertions: AtomicU64,
    evictions: AtomicU64,
    stale_writes: AtomicU64,
}

impl ResolutionCache {
    /// A cache starting at `version`; `capacity` 0 disables storage.
    pub fn new(capacity: usize, version: u64) -> Self {
        Self {
            state: Mutex::new(CacheState {
                version,
                entries: NonZeroUsize::new(capacity).map(LruCache::new),
            }),
            capacity,
            hits: AtomicU64::new(0),
            misses: AtomicU64::new(0),
            insertions: AtomicU64::new(0),
            evictions: AtomicU64::new(0),
            stale_writes: AtomicU64::new(0),
        }
    }

    pub fn version(&self) -> u64 {
        self.state.lock().version
    }

    /// Returns the cached result for `key`, or runs `compute` and stores
    /// what it returns.
    ///
    /// The lock is not held while `compute` runs: two callers missing on the
    /// same key may both compute, and the later insert wins. Errors are
    /// passed through and never cached.
    pub fn get_or_compute<F, E>(&self, key: CacheKey, compute: F) -> Result<ResolutionResult, E>
    where
        F: FnOnce() -> Result<ResolutionResult, E>,
    {
        if let Some(hit) = self.get(&key) {
            return Ok(hit);
        }
        let result = compute()?;
        self.insert(key, &result);
        Ok(result)
    }

    pub fn get(&self, key: &CacheKey) -> Option<ResolutionResult> {
        let mut state = self.state.lock();
        let hit = if state.version == key.version {
            state.entries.as_mut().and_then(|e| e.get(key).cloned())
        } else {
            None
        };
        drop(state);

        match hit {
            Some(r) => {
                self.hits.fetch_add(1, Ordering::Relaxed);
                Some(r)
            }
            None => {
                self.misses.fetch_add(1, Ordering::Relaxed);
                None
            }
        }
    }

    fn insert(&self, key: CacheKey, result: &ResolutionResult) {
        let mut state = self.state.lock();
        if state.version != key.version {
            self.stale_writes.fetch_add(1, Ordering::Relaxed);
            debug!(
                "Dropping result for version {} (cache is at {})",
                key.version, state.version
            );
            return;
        }
        let Some(entries) = state.entries.as_mut() else {
            return;
        };
        if !entries.contains(&key) && entries.len() == entries.cap().get() {
            self.evictions.fetch_add(1, Ordering::Relaxed);
        }
        entries.put(key, result.clone());
        self.insertions.fetch_add(1, Ordering::Relaxed);
    }

    /// Drops every entry and moves the cache to `new_version` atomically.
    pub fn invalidate(&self, new_version: u64) {
        let mut state = self.state.lock();
        if new_version < state.version {
            warn!(
                "Cache moved backwards from version {} to {}",
                state.version, new_version
            );
        }
        let dropped = state.entries.as_ref().map_or(0, LruCache::len);
        if let Some(entries) = state.entries.as_mut() {
            entries.clear();
        }
        state.version = new_version;
        debug!("Cache invalidated: {dropped} entries dropped, now at version {new_version}");
    }

    pub fn len(&self) -> usize {
        self.state.lock().entries.as_ref().map_or(0, LruCache::len)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn stats(&self) -> CacheStats {
        let (version, len) = {
            let state = self.state.lock();
            (state.version, state.entries.as_ref().map_or(0, LruCache::len))
        };
        CacheStats {
            version,
            len,
            capacity: self.capacity,
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
            insertions: self.insertions.load(Ordering::Relaxed),
            evictions: self.evictions.load(Ordering::Relaxed),
            stale_writes: self.stale_writes.load(Ordering::Relaxed),
        }
    }
}
