//! In-memory lookup cache backed by `DashMap` for concurrent access.
//!
//! Replaces process-wide memoization with an explicit component that is
//! injected into [`crate::RegCensus`]. Entries are bounded by an optional
//! time-to-live and an optional entry count.

use std::hash::Hash;
use std::time::{Duration, Instant};

use dashmap::DashMap;

/// Eviction settings for a [`MemoryCache`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CachePolicy {
    /// Entries older than this are dropped on the next read. `None` keeps them forever.
    pub ttl: Option<Duration>,
    /// Maximum number of entries; the oldest entry is evicted to make room.
    /// `Some(0)` disables caching entirely.
    pub max_entries: Option<usize>,
}

impl Default for CachePolicy {
    fn default() -> Self {
        Self::unbounded()
    }
}

impl CachePolicy {
    /// Never expires, never evicts.
    pub fn unbounded() -> Self {
        Self {
            ttl: None,
            max_entries: None,
        }
    }

    /// Stores nothing; every lookup goes to the network.
    pub fn disabled() -> Self {
        Self {
            ttl: None,
            max_entries: Some(0),
        }
    }

    pub fn with_ttl(mut self, ttl: Duration) -> Self {
        self.ttl = Some(ttl);
        self
    }

    pub fn with_max_entries(mut self, max_entries: usize) -> Self {
        self.max_entries = Some(max_entries);
        self
    }
}

/// A single cached value with its insertion time.
struct CacheEntry<V> {
    value: V,
    inserted_at: Instant,
}

/// Thread-safe in-memory cache.
///
/// Expired entries are lazily evicted on the next `get` call for that key.
/// Concurrent first-populates of the same key are not coordinated; the last
/// write wins.
pub struct MemoryCache<K, V> {
    store: DashMap<K, CacheEntry<V>>,
    policy: CachePolicy,
}

impl<K, V> MemoryCache<K, V>
where
    K: Eq + Hash + Clone,
    V: Clone,
{
    /// Creates a new cache with the given eviction policy.
    pub fn new(policy: CachePolicy) -> Self {
        Self {
            store: DashMap::new(),
            policy,
        }
    }

    /// Creates a cache whose entries expire after `ttl`.
    pub fn with_ttl(ttl: Duration) -> Self {
        Self::new(CachePolicy::unbounded().with_ttl(ttl))
    }

    /// Creates a cache that stores nothing.
    pub fn disabled() -> Self {
        Self::new(CachePolicy::disabled())
    }

    pub fn policy(&self) -> CachePolicy {
        self.policy
    }

    /// Returns the cached value for `key`, or `None` if missing or expired.
    pub fn get(&self, key: &K) -> Option<V> {
        let entry = self.store.get(key)?;
        if self.is_expired(&entry) {
            drop(entry);
            self.store.remove(key);
            return None;
        }
        Some(entry.value.clone())
    }

    /// Inserts or overwrites a cache entry, evicting the oldest entry when full.
    pub fn set(&self, key: K, value: V) {
        if let Some(max) = self.policy.max_entries {
            if max == 0 {
                return;
            }
            while !self.store.contains_key(&key) && self.store.len() >= max {
                if !self.evict_oldest() {
                    break;
                }
            }
        }
        self.store.insert(
            key,
            CacheEntry {
                value,
                inserted_at: Instant::now(),
            },
        );
    }

    pub fn len(&self) -> usize {
        self.store.len()
    }

    pub fn is_empty(&self) -> bool {
        self.store.is_empty()
    }

    /// Removes all entries from the cache.
    pub fn clear(&self) {
        self.store.clear();
    }

    fn is_expired(&self, entry: &CacheEntry<V>) -> bool {
        match self.policy.ttl {
            Some(ttl) => entry.inserted_at.elapsed() > ttl,
            None => false,
        }
    }

    fn evict_oldest(&self) -> bool {
        let oldest = self
            .store
            .iter()
            .min_by_key(|entry| entry.value().inserted_at)
            .map(|entry| entry.key().clone());
        match oldest {
            Some(key) => self.store.remove(&key).is_some(),
            None => false,
        }
    }
}
