//! Offset cache - recent query results by composite key
//!
//! Entry-count-bounded LRU from `"path[index]"` keys to resolved byte
//! ranges. A hit short-circuits the scan entirely.

use crate::range::ByteRange;
use lru::LruCache;
use std::num::NonZeroUsize;

/// Bounded LRU cache of resolved byte ranges.
pub struct OffsetCache {
    entries: LruCache<String, ByteRange>,
}

impl OffsetCache {
    /// Create a cache holding up to `capacity` entries (clamped to >= 1).
    pub fn new(capacity: usize) -> Self {
        OffsetCache {
            entries: LruCache::new(clamp(capacity)),
        }
    }

    /// Look up a key, marking it most recently used.
    pub fn get(&mut self, key: &str) -> Option<&ByteRange> {
        self.entries.get(key)
    }

    /// Insert a resolved range, evicting the least recently used entry if
    /// the cache is full.
    pub fn insert(&mut self, key: String, range: ByteRange) {
        self.entries.put(key, range);
    }

    /// Change the capacity, evicting as needed.
    pub fn set_capacity(&mut self, capacity: usize) {
        self.entries.resize(clamp(capacity));
    }

    /// Drop all entries. Capacity is unchanged.
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Number of cached entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if the cache is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[inline]
fn clamp(capacity: usize) -> NonZeroUsize {
    NonZeroUsize::new(capacity).unwrap_or(NonZeroUsize::MIN)
}
