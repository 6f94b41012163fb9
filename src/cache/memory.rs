//! Memory Cache Module
//!
//! Bounded, TTL-based volatile cache combining HashMap storage with
//! insertion-order eviction.

use std::collections::HashMap;
use std::time::Duration;

use tracing::trace;

use crate::cache::{CacheEntry, CacheStats, InsertionOrder};

/// Default maximum number of entries.
pub const DEFAULT_MAX_SIZE: usize = 100;

/// Default time-to-live for entries set without an explicit TTL.
pub const DEFAULT_TTL: Duration = Duration::from_secs(5 * 60);

// == Memory Cache ==
/// Volatile cache bounded by entry count.
///
/// When full, inserting a new key evicts the earliest-inserted entry. Reads do
/// not affect eviction order, so this is not LRU.
#[derive(Debug)]
pub struct MemoryCache<T> {
    entries: HashMap<String, CacheEntry<T>>,
    order: InsertionOrder,
    stats: CacheStats,
    max_size: usize,
    default_ttl: Duration,
}

impl<T: Clone> MemoryCache<T> {
    // == Constructor ==
    /// Creates a new MemoryCache with specified capacity and default TTL.
    ///
    /// # Arguments
    /// * `max_size` - Maximum number of entries the cache can hold
    /// * `default_ttl` - TTL for entries set without an explicit one
    pub fn new(max_size: usize, default_ttl: Duration) -> Self {
        Self {
            entries: HashMap::new(),
            order: InsertionOrder::new(),
            stats: CacheStats::new(),
            max_size,
            default_ttl,
        }
    }

    // == Set ==
    /// Stores a value with an optional TTL.
    ///
    /// If the key already exists, the value and expiry are replaced and the key
    /// counts as newly inserted. If the key is new and the cache is at capacity,
    /// the earliest-inserted entry is evicted first. A zero-capacity cache
    /// stores nothing.
    pub fn set(&mut self, key: impl Into<String>, value: T, ttl: Option<Duration>) {
        let key = key.into();

        if self.max_size == 0 {
            trace!(key = %key, "memory cache has zero capacity, skipping set");
            return;
        }

        if !self.entries.contains_key(&key) && self.entries.len() >= self.max_size {
            if let Some(evicted) = self.order.pop_oldest() {
                self.entries.remove(&evicted);
                self.stats.record_eviction();
                trace!(key = %evicted, "memory cache eviction");
            }
        }

        let entry = CacheEntry::new(value, ttl.unwrap_or(self.default_ttl));
        self.entries.insert(key.clone(), entry);
        self.order.insert(&key);
        self.stats.set_total_entries(self.entries.len());
    }

    // == Get ==
    /// Retrieves a value by key.
    ///
    /// Expired entries are removed and reported as a miss.
    pub fn get(&mut self, key: &str) -> Option<T> {
        let expired = match self.entries.get(key) {
            None => {
                self.stats.record_miss();
                return None;
            }
            Some(entry) => entry.is_expired(),
        };

        if expired {
            self.remove_entry(key);
            self.stats.record_expiration();
            return None;
        }

        self.stats.record_hit();
        self.entries.get(key).map(|entry| entry.value.clone())
    }

    // == Delete ==
    /// Removes an entry by key. Deleting a missing key is a no-op.
    pub fn delete(&mut self, key: &str) {
        self.remove_entry(key);
    }

    // == Clear ==
    pub fn clear(&mut self) {
        self.entries.clear();
        self.order.clear();
        self.stats.set_total_entries(0);
    }

    // == Size ==
    /// Returns the current number of entries, including expired entries that
    /// have not been read since expiring.
    pub fn size(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn max_size(&self) -> usize {
        self.max_size
    }

    pub fn default_ttl(&self) -> Duration {
        self.default_ttl
    }

    // == Stats ==
    pub fn stats(&self) -> CacheStats {
        let mut stats = self.stats.clone();
        stats.set_total_entries(self.entries.len());
        stats
    }

    fn remove_entry(&mut self, key: &str) {
        if self.entries.remove(key).is_some() {
            self.order.remove(key);
            self.stats.set_total_entries(self.entries.len());
        }
    }
}

impl<T: Clone> Default for MemoryCache<T> {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_SIZE, DEFAULT_TTL)
    }
}
