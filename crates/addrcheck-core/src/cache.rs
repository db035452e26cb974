//! Capacity-bounded LRU memoization cache.
//!
//! Keys are composite strings built by the caller (input plus the flags that
//! influenced the computation); values are whatever the computation produced.
//! Entries are never explicitly deleted: eviction is driven purely by capacity
//! and recency of access.

use std::num::NonZeroUsize;

use lru::LruCache;
use parking_lot::Mutex;
use thiserror::Error;
use tracing::trace;

/// Errors that can occur constructing a cache.
#[derive(Debug, Error)]
pub enum CacheError {
    /// The requested capacity was zero.
    #[error("cache capacity must be non-zero")]
    InvalidCapacity,
}

/// Counters describing cache traffic since construction.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CacheStats {
    pub hits: u64,
    pub misses: u64,
    pub evictions: u64,
}

/// Fixed-capacity string-keyed map with least-recently-used eviction.
///
/// `get` refreshes the recency of the looked-up key; `contains` deliberately
/// does not, so existence probes never perturb the eviction order. All methods
/// take `&self` and are safe to call from multiple threads; LRU bookkeeping
/// mutates internal ordering on every read, so the whole structure sits behind
/// a mutex.
pub struct BoundedCache<V> {
    inner: Mutex<Inner<V>>,
    capacity: usize,
}

struct Inner<V> {
    entries: LruCache<String, V>,
    stats: CacheStats,
}

impl<V: Clone> BoundedCache<V> {
    /// Creates a cache holding at most `capacity` entries.
    ///
    /// # Errors
    ///
    /// Returns [`CacheError::InvalidCapacity`] if `capacity` is zero.
    pub fn new(capacity: usize) -> Result<Self, CacheError> {
        let capacity_nz = NonZeroUsize::new(capacity).ok_or(CacheError::InvalidCapacity)?;
        Ok(Self {
            inner: Mutex::new(Inner {
                entries: LruCache::new(capacity_nz),
                stats: CacheStats::default(),
            }),
            capacity,
        })
    }

    /// Returns true iff an entry for `key` exists. Does not refresh recency.
    #[must_use]
    pub fn contains(&self, key: &str) -> bool {
        self.inner.lock().entries.contains(key)
    }

    /// Returns the stored value and marks `key` as most-recently-used.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<V> {
        let inner = &mut *self.inner.lock();
        match inner.entries.get(key) {
            Some(value) => {
                inner.stats.hits += 1;
                trace!(key = key, "cache hit");
                Some(value.clone())
            }
            None => {
                inner.stats.misses += 1;
                trace!(key = key, "cache miss");
                None
            }
        }
    }

    /// Inserts or overwrites the entry for `key` as most-recently-used.
    ///
    /// When the cache is full and `key` is new, the least-recently-used entry
    /// is evicted first, so the size bound holds after every insert.
    pub fn insert(&self, key: String, value: V) {
        let inner = &mut *self.inner.lock();
        if inner.entries.len() == self.capacity && !inner.entries.contains(&key) {
            inner.stats.evictions += 1;
            trace!(key = %key, "evicting least-recently-used entry");
        }
        inner.entries.put(key, value);
    }

    /// Number of entries currently stored. Always `<= capacity()`.
    #[must_use]
    pub fn len(&self) -> usize {
        self.inner.lock().entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.inner.lock().entries.is_empty()
    }

    /// Maximum number of entries, fixed at construction.
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Snapshot of traffic counters.
    #[must_use]
    pub fn stats(&self) -> CacheStats {
        self.inner.lock().stats.clone()
    }
}
