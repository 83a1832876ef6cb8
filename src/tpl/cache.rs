use crate::tpl::ast::{ParsedTemplate, Ref};
use dashmap::DashMap;
use std::collections::VecDeque;
use std::fmt;
use std::sync::{Arc, LazyLock, Mutex};

pub const DEFAULT_CACHE_CAPACITY: usize = 100;

pub type TemplateCache = FifoCache<Arc<ParsedTemplate>>;
pub type RefCache = FifoCache<Ref>;

/// Parsed templates keyed by tags and template text.
pub static TEMPLATE_CACHE: LazyLock<Arc<TemplateCache>> =
    LazyLock::new(|| Arc::new(FifoCache::new(DEFAULT_CACHE_CAPACITY)));

/// Parsed Refs keyed by the trimmed path expression.
pub static REF_CACHE: LazyLock<Arc<RefCache>> =
    LazyLock::new(|| Arc::new(FifoCache::new(DEFAULT_CACHE_CAPACITY)));

/// A bounded map that evicts the oldest inserted key once it is full.
///
/// Reads never change eviction order, so this is FIFO rather than LRU.
/// Entries live in a `DashMap`; the insertion queue is guarded by a mutex
/// that every writer holds while it updates both.
pub struct FifoCache<V> {
    capacity: usize,
    entries: DashMap<String, V>,
    order: Mutex<VecDeque<String>>,
}

impl<V: Clone> FifoCache<V> {
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity,
            entries: DashMap::with_capacity(capacity),
            order: Mutex::new(VecDeque::with_capacity(capacity)),
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, key: &str) -> Option<V> {
        self.entries.get(key).map(|v| v.value().clone())
    }

    pub fn contains(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    /// Stores `value`. Replacing an existing key keeps its original position.
    pub fn set(&self, key: impl Into<String>, value: V) {
        if self.capacity == 0 {
            return;
        }

        let key = key.into();
        let mut order = self.order.lock().unwrap_or_else(|e| e.into_inner());
        if self.entries.contains_key(&key) {
            self.entries.insert(key, value);
            return;
        }

        while order.len() >= self.capacity {
            match order.pop_front() {
                Some(oldest) => {
                    log::trace!("cache full ({}), evicting {oldest:?}", self.capacity);
                    self.entries.remove(&oldest);
                }
                None => break,
            }
        }
        order.push_back(key.clone());
        self.entries.insert(key, value);
    }

    pub fn clear(&self) {
        let mut order = self.order.lock().unwrap_or_else(|e| e.into_inner());
        order.clear();
        self.entries.clear();
    }
}

impl<V> fmt::Debug for FifoCache<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FifoCache")
            .field("capacity", &self.capacity)
            .field("len", &self.entries.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_evicts_oldest_insert() {
        let cache = FifoCache::new(2);
        assert_eq!(cache.capacity(), 2);
        cache.set("a", 1);
        cache.set("b", 2);
        // Reading "a" does not protect it.
        assert_eq!(cache.get("a"), Some(1));
        cache.set("c", 3);

        assert_eq!(cache.get("a"), None);
        assert_eq!(cache.get("b"), Some(2));
        assert_eq!(cache.get("c"), Some(3));
        assert_eq!(cache.len(), 2);
    }

    #[test]
    fn test_replace_keeps_position() {
        let cache = FifoCache::new(2);
        cache.set("a", 1);
        cache.set("b", 2);
        cache.set("a", 10);
        assert_eq!(cache.get("a"), Some(10));

        cache.set("c", 3);
        assert!(!cache.contains("a"));
        assert!(cache.contains("b"));
    }

    #[test]
    fn test_zero_capacity_stores_nothing() {
        let cache = FifoCache::new(0);
        cache.set("a", 1);
        assert!(cache.is_empty());
    }

    #[test]
    fn test_clear() {
        let cache = FifoCache::new(4);
        cache.set("a", 1);
        cache.set("b", 2);
        cache.clear();
        assert!(cache.is_empty());
        cache.set("c", 3);
        assert_eq!(cache.len(), 1);
    }
}
