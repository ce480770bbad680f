//! Cost-bounded cache
//!
//! Bounded by cumulative entry cost (here: source byte length) instead of
//! entry count. Lookup order is LRU; inserting past capacity evicts
//! lowest-recency entries until the total cost fits again. An entry whose
//! own cost exceeds the whole capacity is rejected outright.

use log::debug;
use lru::LruCache;

/// Cost-weighted LRU cache.
pub struct CostCache<V> {
    entries: LruCache<String, (V, usize)>,
    max_cost: usize,
    total_cost: usize,
}

impl<V> CostCache<V> {
    /// Create a cache with the given total cost capacity.
    pub fn new(max_cost: usize) -> Self {
        CostCache {
            entries: LruCache::unbounded(),
            max_cost,
            total_cost: 0,
        }
    }

    /// Look up a key, marking it most recently used.
    pub fn get(&mut self, key: &str) -> Option<&V> {
        self.entries.get(key).map(|(value, _)| value)
    }

    /// Insert a value with its cost.
    ///
    /// Returns false (dropping the value) if the cost alone exceeds the
    /// capacity; otherwise inserts and evicts least recently used entries
    /// until the total cost fits.
    pub fn insert(&mut self, key: String, value: V, cost: usize) -> bool {
        if cost > self.max_cost {
            debug!(
                "cost cache: rejecting entry {:?} (cost {} > capacity {})",
                key, cost, self.max_cost
            );
            return false;
        }

        if let Some((_, old_cost)) = self.entries.put(key, (value, cost)) {
            self.total_cost -= old_cost;
        }
        self.total_cost += cost;
        self.evict_to_fit();
        true
    }

    /// Change the capacity, evicting as needed.
    pub fn set_max_cost(&mut self, max_cost: usize) {
        self.max_cost = max_cost;
        self.evict_to_fit();
    }

    /// Total cost capacity.
    pub fn max_cost(&self) -> usize {
        self.max_cost
    }

    /// Sum of the costs of all cached entries.
    pub fn total_cost(&self) -> usize {
        self.total_cost
    }

    /// Number of cached entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if the cache is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Check if a key is cached, without touching recency.
    pub fn contains(&self, key: &str) -> bool {
        self.entries.contains(key)
    }

    /// Drop all entries. Capacity is unchanged.
    pub fn clear(&mut self) {
        self.entries.clear();
        self.total_cost = 0;
    }

    fn evict_to_fit(&mut self) {
        while self.total_cost > self.max_cost {
            match self.entries.pop_lru() {
                Some((key, (_, cost))) => {
                    self.total_cost -= cost;
                    debug!("cost cache: evicted {:?} (cost {})", key, cost);
                }
                None => break,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insert_get() {
        let mut cache = CostCache::new(100);
        assert!(cache.insert("a".to_string(), 1u32, 10));
        assert_eq!(cache.get("a"), Some(&1));
        assert_eq!(cache.total_cost(), 10);
    }

    #[test]
    fn test_oversized_entry_rejected() {
        let mut cache = CostCache::new(5);
        assert!(!cache.insert("big".to_string(), 1u32, 6));
        assert!(cache.is_empty());
    }

    #[test]
    fn test_recency_eviction_order() {
        // Capacity 15, A and B cost 10 each, re-access A, insert C:
        // B must go, not A.
        let mut cache = CostCache::new(15);
        cache.insert("A".to_string(), 1u32, 10);
        cache.insert("B".to_string(), 2u32, 10);
        cache.get("A");
        cache.insert("C".to_string(), 3u32, 10);

        assert_eq!(cache.get("A"), Some(&1));
        assert!(cache.get("B").is_none());
        assert_eq!(cache.get("C"), Some(&3));
        assert!(cache.total_cost() <= 15);
    }

    #[test]
    fn test_same_key_replaces_cost() {
        let mut cache = CostCache::new(20);
        cache.insert("a".to_string(), 1u32, 10);
        cache.insert("a".to_string(), 2u32, 5);
        assert_eq!(cache.total_cost(), 5);
        assert_eq!(cache.get("a"), Some(&2));
    }

    #[test]
    fn test_shrink_capacity_evicts() {
        let mut cache = CostCache::new(30);
        cache.insert("a".to_string(), 1u32, 10);
        cache.insert("b".to_string(), 2u32, 10);
        cache.insert("c".to_string(), 3u32, 10);
        cache.set_max_cost(10);
        assert_eq!(cache.len(), 1);
        assert_eq!(cache.get("c"), Some(&3));
    }

    #[test]
    fn test_zero_capacity_rejects_everything() {
        let mut cache = CostCache::new(0);
        assert!(!cache.insert("a".to_string(), 1u32, 1));
        assert!(cache.insert("b".to_string(), 2u32, 0));
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_clear() {
        let mut cache = CostCache::new(20);
        cache.insert("a".to_string(), 1u32, 10);
        cache.clear();
        assert!(cache.is_empty());
        assert_eq!(cache.total_cost(), 0);
    }
}
