//! Bounded in-process memoization
//!
//! Both the catalog listing and the file downloader remember the results of
//! previous calls so that repeated calls with the same arguments within one
//! process never touch the network again. Entries are only ever evicted when
//! the cache is full, least recently used first; nothing invalidates them.

use std::hash::Hash;
use std::num::NonZeroUsize;

use lru::LruCache;
use tracing::debug;

use crate::constants::cache::DEFAULT_CAPACITY;

/// Hit/miss counters for a memoization cache
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MemoStats {
    /// Lookups answered from the cache
    pub hits: u64,
    /// Lookups that found nothing
    pub misses: u64,
    /// Entries currently held
    pub len: usize,
    /// Maximum number of entries
    pub capacity: usize,
}

impl MemoStats {
    /// Fraction of lookups answered from the cache
    pub fn hit_rate(&self) -> f64 {
        let total = self.hits + self.misses;
        if total == 0 {
            return 0.0;
        }
        self.hits as f64 / total as f64
    }
}

/// Fixed-capacity least-recently-used map from call arguments to results
#[derive(Debug)]
pub struct MemoCache<K: Hash + Eq, V> {
    entries: LruCache<K, V>,
    hits: u64,
    misses: u64,
}

impl<K: Hash + Eq, V: Clone> MemoCache<K, V> {
    /// Create a cache holding at most `capacity` entries
    ///
    /// A capacity of zero falls back to the default of 128.
    pub fn new(capacity: usize) -> Self {
        let capacity = NonZeroUsize::new(capacity)
            .or_else(|| NonZeroUsize::new(DEFAULT_CAPACITY))
            .unwrap_or(NonZeroUsize::MIN);
        Self {
            entries: LruCache::new(capacity),
            hits: 0,
            misses: 0,
        }
    }

    /// Look up a previous result, marking it as most recently used
    pub fn get(&mut self, key: &K) -> Option<V> {
        match self.entries.get(key) {
            Some(value) => {
                self.hits += 1;
                Some(value.clone())
            }
            None => {
                self.misses += 1;
                None
            }
        }
    }

    /// Remember a result, evicting the least recently used entry when full
    pub fn insert(&mut self, key: K, value: V) {
        // `push` also hands back the old value when the key was already present
        let replacing = self.entries.contains(&key);
        if self.entries.push(key, value).is_some() && !replacing {
            debug!("Memoization cache full, evicted least recently used entry");
        }
    }

    /// Whether a result is remembered for `key`, without touching recency
    pub fn contains(&self, key: &K) -> bool {
        self.entries.contains(key)
    }

    /// Number of remembered results
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether nothing is remembered yet
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Maximum number of remembered results
    pub fn capacity(&self) -> usize {
        self.entries.cap().get()
    }

    /// Current hit/miss statistics
    pub fn stats(&self) -> MemoStats {
        MemoStats {
            hits: self.hits,
            misses: self.misses,
            len: self.entries.len(),
            capacity: self.capacity(),
        }
    }
}

impl<K: Hash + Eq, V: Clone> Default for MemoCache<K, V> {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}
