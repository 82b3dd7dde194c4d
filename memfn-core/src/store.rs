//! # Cache Stores
//!
//! A memoized function keeps its entries in a store implementing
//! [`CacheStore`]. The store is owned by exactly one wrapper unless the
//! caller deliberately shares it.
//!
//! Two stores ship with the crate:
//!
//! - [`OrderedStore`] - unbounded, insertion-ordered (the default)
//! - [`BoundedStore`](crate::BoundedStore) - entry-count limited with FIFO, LRU or Random eviction
//!
//! Any other type can be plugged in by implementing the trait.

use std::collections::{HashMap, VecDeque};
use std::hash::Hash;

/// Minimal interface a store must offer to back a memoized function.
///
/// `clear` is an optional capability: the default implementation does
/// nothing and reports `false`, which makes explicit invalidation a silent
/// no-op for that store.
///
/// # Examples
///
/// ```
/// use memfn_core::CacheStore;
/// use std::collections::HashMap;
///
/// // A store that refuses to be cleared
/// struct Permanent(HashMap<u64, String>);
///
/// impl CacheStore<u64, String> for Permanent {
///     fn get(&mut self, key: &u64) -> Option<&String> {
///         self.0.get(key)
///     }
///
///     fn set(&mut self, key: u64, value: String) {
///         self.0.insert(key, value);
///     }
///
///     fn has(&self, key: &u64) -> bool {
///         self.0.contains_key(key)
///     }
/// }
///
/// let mut store = Permanent(HashMap::new());
/// store.set(1, "one".to_string());
/// assert!(!store.clear());
/// assert!(store.has(&1));
/// ```
pub trait CacheStore<K, V>: Send {
    /// Looks up an entry. Takes `&mut self` so stores can track recency.
    fn get(&mut self, key: &K) -> Option<&V>;

    /// Writes an entry, replacing any previous entry for the key.
    fn set(&mut self, key: K, value: V);

    /// Returns true if an entry exists for the key, fresh or not.
    fn has(&self, key: &K) -> bool;

    /// Removes every entry. Returns `false` if the store cannot be cleared.
    fn clear(&mut self) -> bool {
        false
    }
}

/// Unbounded store that remembers the order in which keys were first written.
///
/// Overwriting a key keeps its original position, so [`keys`](Self::keys)
/// always lists keys by first insertion.
///
/// # Examples
///
/// ```
/// use memfn_core::{CacheStore, OrderedStore};
///
/// let mut store = OrderedStore::new();
/// store.set("b", 2);
/// store.set("a", 1);
/// store.set("b", 3);
///
/// assert_eq!(store.keys().copied().collect::<Vec<_>>(), vec!["b", "a"]);
/// assert_eq!(store.get(&"b"), Some(&3));
/// ```
#[derive(Debug, Clone)]
pub struct OrderedStore<K, V> {
    map: HashMap<K, V>,
    order: VecDeque<K>,
}

impl<K, V> OrderedStore<K, V> {
    pub fn new() -> Self {
        Self {
            map: HashMap::new(),
            order: VecDeque::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    /// Keys in first-insertion order.
    pub fn keys(&self) -> impl Iterator<Item = &K> {
        self.order.iter()
    }
}

impl<K, V> Default for OrderedStore<K, V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K, V> CacheStore<K, V> for OrderedStore<K, V>
where
    K: Eq + Hash + Clone + Send,
    V: Send,
{
    fn get(&mut self, key: &K) -> Option<&V> {
        self.map.get(key)
    }

    fn set(&mut self, key: K, value: V) {
        if self.map.insert(key.clone(), value).is_none() {
            self.order.push_back(key);
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

/// Where a memoizer gets its store from.
///
/// Resolved once, when the wrapper is built. This lets a config name "a
/// fresh default store" before the value type of the entries is known.
pub trait StoreSource<K, V> {
    type Store: CacheStore<K, V>;

    fn into_store(self) -> Self::Store;
}

/// Requests a fresh, empty [`OrderedStore`] per wrapper.
#[derive(Debug, Clone, Copy, Default)]
pub struct FreshStore;

impl<K, V> StoreSource<K, V> for FreshStore
where
    K: Eq + Hash + Clone + Send,
    V: Send,
{
    type Store = OrderedStore<K, V>;

    fn into_store(self) -> Self::Store {
        OrderedStore::new()
    }
}

/// A store built by the caller and handed over as is.
#[derive(Debug, Clone)]
pub struct SuppliedStore<S>(pub S);

impl<K, V, S> StoreSource<K, V> for SuppliedStore<S>
where
    S: CacheStore<K, V>,
{
    type Store = S;

    fn into_store(self) -> S {
        self.0
    }
}
