//! Insertion Order Module
//!
//! Tracks the order in which keys were inserted, for capacity eviction.

use std::collections::VecDeque;

// == Insertion Order ==
/// Tracks insertion order of keys.
///
/// Keys are stored in a VecDeque where:
/// - Front = Earliest inserted
/// - Back = Most recently inserted
///
/// Reads never reorder keys; only a (re)insertion moves a key to the back.
#[derive(Debug, Default)]
pub struct InsertionOrder {
    order: VecDeque<String>,
}

impl InsertionOrder {
    // == Constructor ==
    /// Creates a new empty tracker.
    pub fn new() -> Self {
        Self {
            order: VecDeque::new(),
        }
    }

    // == Insert ==
    /// Records an insertion of `key`.
    ///
    /// A key that is already tracked is moved to the back.
    pub fn insert(&mut self, key: &str) {
        self.remove(key);
        self.order.push_back(key.to_string());
    }

    // == Remove ==
    /// Removes a key from the tracker.
    ///
    /// Linear in the number of tracked keys.
    pub fn remove(&mut self, key: &str) {
        self.order.retain(|k| k != key);
    }

    // == Pop Oldest ==
    /// Returns and removes the earliest inserted key.
    ///
    /// Returns None if tracker is empty.
    pub fn pop_oldest(&mut self) -> Option<String> {
        self.order.pop_front()
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    pub fn clear(&mut self) {
        self.order.clear();
    }
}

#[cfg(test)]
impl InsertionOrder {
    fn peek_oldest(&self) -> Option<&String> {
        self.order.front()
    }

    fn contains(&self, key: &str) -> bool {
        self.order.iter().any(|k| k == key)
    }
}
