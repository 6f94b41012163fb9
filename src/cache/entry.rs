//! Cache Entry Module
//!
//! Defines the in-memory entry and the persisted envelope, both carrying an
//! absolute expiry in Unix milliseconds.

use std::time::Duration;

use serde::{Deserialize, Serialize};

// == Cache Entry ==
/// A single memory-tier entry.
#[derive(Debug, Clone)]
pub struct CacheEntry<T> {
    /// The stored value
    pub value: T,
    /// Expiration timestamp (Unix milliseconds)
    pub expiry: u64,
}

impl<T> CacheEntry<T> {
    // == Constructor ==
    /// Creates a new entry expiring `ttl` from now.
    pub fn new(value: T, ttl: Duration) -> Self {
        Self {
            value,
            expiry: expiry_after(ttl),
        }
    }

    // == Is Expired ==
    /// Checks if the entry has expired.
    ///
    /// An entry is still valid at exactly its expiry instant; it expires once
    /// the current time is strictly past it.
    pub fn is_expired(&self) -> bool {
        current_timestamp_ms() > self.expiry
    }

    // == Time To Live ==
    /// Returns remaining TTL in milliseconds (0 once expired).
    pub fn ttl_remaining_ms(&self) -> u64 {
        self.expiry.saturating_sub(current_timestamp_ms())
    }
}

// == Persisted Entry ==
/// Envelope written to the key-value store.
///
/// `value` holds the caller's value already serialized to JSON, so the stored
/// string is JSON nested inside JSON.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PersistedEntry {
    pub value: String,
    pub expiry: u64,
    pub created: u64,
}

impl PersistedEntry {
    pub fn new(value: String, ttl: Duration) -> Self {
        let now = current_timestamp_ms();
        Self {
            value,
            expiry: now.saturating_add(ttl_ms(ttl)),
            created: now,
        }
    }

    pub fn is_expired(&self) -> bool {
        current_timestamp_ms() > self.expiry
    }

    /// Time left before `expiry` (zero once expired).
    pub fn remaining_ttl(&self) -> Duration {
        Duration::from_millis(self.expiry.saturating_sub(current_timestamp_ms()))
    }
}

// == Utility Functions ==
/// Returns current Unix timestamp in milliseconds.
pub fn current_timestamp_ms() -> u64 {
    chrono::Utc::now().timestamp_millis().max(0) as u64
}

fn ttl_ms(ttl: Duration) -> u64 {
    u64::try_from(ttl.as_millis()).unwrap_or(u64::MAX)
}

fn expiry_after(ttl: Duration) -> u64 {
    current_timestamp_ms().saturating_add(ttl_ms(ttl))
}
