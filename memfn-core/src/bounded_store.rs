use crate::utils::{move_key_to_end, remove_key};
use crate::{CacheStore, EvictionPolicy};
use std::collections::{HashMap, VecDeque};
use std::hash::Hash;

/// A store holding at most `limit` entries.
///
/// When a write pushes the store over its limit, one entry is evicted
/// according to the configured [`EvictionPolicy`]. Evicted entries are gone
/// for good; the next call with those arguments is a miss.
///
/// # Examples
///
/// ```
/// use memfn_core::{BoundedStore, CacheStore, EvictionPolicy};
///
/// let mut store = BoundedStore::new(2, EvictionPolicy::LRU);
/// store.set("k1", 1);
/// store.set("k2", 2);
/// let _ = store.get(&"k1");  // k1 becomes most recent
/// store.set("k3", 3);        // evicts k2
///
/// assert!(store.has(&"k1"));
/// assert!(!store.has(&"k2"));
/// assert!(store.has(&"k3"));
/// ```
#[derive(Debug, Clone)]
pub struct BoundedStore<K, V> {
    map: HashMap<K, V>,
    order: VecDeque<K>,
    limit: usize,
    policy: EvictionPolicy,
}

impl<K, V> BoundedStore<K, V> {
    /// Creates a store that evicts with `policy` once it exceeds `limit` entries.
    ///
    /// A `limit` of zero is treated as one: the most recent entry always survives.
    pub fn new(limit: usize, policy: EvictionPolicy) -> Self {
        Self {
            map: HashMap::new(),
            order: VecDeque::new(),
            limit: limit.max(1),
            policy,
        }
    }

    /// Creates an LRU store, the usual choice for bounding a memoized function.
    pub fn lru(limit: usize) -> Self {
        Self::new(limit, EvictionPolicy::LRU)
    }

    pub fn len(&self) -> usize {
        self.map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    pub fn limit(&self) -> usize {
        self.limit
    }

    pub fn policy(&self) -> EvictionPolicy {
        self.policy
    }
}

impl<K: Eq + Hash, V> BoundedStore<K, V> {
    fn evict_over_limit(&mut self) {
        while self.map.len() > self.limit {
            let victim = match self.policy {
                EvictionPolicy::FIFO | EvictionPolicy::LRU => self.order.pop_front(),
                EvictionPolicy::Random => {
                    if self.order.is_empty() {
                        None
                    } else {
                        let pos = fastrand::usize(..self.order.len());
                        self.order.remove(pos)
                    }
                }
            };

            match victim {
                Some(key) => {
                    self.map.remove(&key);
                }
                None => break,
            }
        }
    }
}

impl<K, V> CacheStore<K, V> for BoundedStore<K, V>
where
    K: Eq + Hash + Clone + Send,
    V: Send,
{
    fn get(&mut self, key: &K) -> Option<&V> {
        if self.policy.tracks_reads() && self.map.contains_key(key) {
            move_key_to_end(&mut self.order, key);
        }
        self.map.get(key)
    }

    fn set(&mut self, key: K, value: V) {
        if self.map.insert(key.clone(), value).is_some() {
            // Overwrite: FIFO and Random keep the original slot
            if self.policy == EvictionPolicy::LRU {
                move_key_to_end(&mut self.order, &key);
            }
        } else {
            self.order.push_back(key);
            self.evict_over_limit();
        }
    }

    fn has(&self, key: &K) -> bool {
        self.map.contains_key(key)
    }

    fn clear(&mut self) -> bool {
        self.map.clear();
        self.order.clear();
        true
    }
}

impl<K: Eq + Hash, V> BoundedStore<K, V> {
    /// Drops a single entry. Returns true if it existed.
    pub fn remove(&mut self, key: &K) -> bool {
        remove_key(&mut self.order, key);
        self.map.remove(key).is_some()
    }
}
