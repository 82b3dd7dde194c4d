//! # Wrapper Registry
//!
//! Process-wide association between memoized wrappers and their stores.
//!
//! Every wrapper gets a [`MemoId`] at construction and registers a weak
//! handle to its store under that id. The registry never keeps a store
//! alive: once the wrapper is dropped its handle dangles and the entry is
//! pruned the next time another wrapper registers.
//!
//! This is what makes invalidation possible from anywhere in the process,
//! without holding the wrapper itself:
//!
//! ```
//! use memfn_core::{memoize, registry, MemoizeConfig};
//!
//! let square = memoize(|x: u64| x * x, MemoizeConfig::default().name("square_doc"));
//! square.call(4).unwrap();
//!
//! assert!(registry::is_registered(square.id()));
//! assert_eq!(registry::clear_by_name("square_doc"), 1);
//! ```

#[cfg(feature = "stats")]
use crate::CacheStats;
use once_cell::sync::Lazy;
use parking_lot::RwLock;
use std::collections::HashMap;
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Weak};

/// Process-unique identity of a memoized wrapper.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MemoId(u64);

impl MemoId {
    /// Allocates an id no other wrapper in this process has.
    pub fn next() -> Self {
        static NEXT: AtomicU64 = AtomicU64::new(1);
        MemoId(NEXT.fetch_add(1, Ordering::Relaxed))
    }

    pub fn as_u64(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for MemoId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "memo#{}", self.0)
    }
}

/// Type-erased clear capability of a registered store.
pub trait Clearable: Send + Sync {
    /// Clears the store, returning false if it lacks the capability.
    fn clear_entries(&self) -> bool;
}

struct RegistryEntry {
    name: String,
    store: Weak<dyn Clearable>,
    #[cfg(feature = "stats")]
    stats: Weak<CacheStats>,
}

impl RegistryEntry {
    fn is_alive(&self) -> bool {
        self.store.strong_count() > 0
    }
}

static REGISTRY: Lazy<RwLock<HashMap<MemoId, RegistryEntry>>> =
    Lazy::new(|| RwLock::new(HashMap::new()));

/// Records the association between a wrapper and its store.
///
/// Called once by the memoizers at construction. Entries of wrappers that
/// have since been dropped are pruned here.
pub fn register(
    id: MemoId,
    name: &str,
    store: Weak<dyn Clearable>,
    #[cfg(feature = "stats")] stats: Weak<CacheStats>,
) {
    let mut registry = REGISTRY.write();
    registry.retain(|_, entry| entry.is_alive());
    registry.insert(
        id,
        RegistryEntry {
            name: name.to_string(),
            store,
            #[cfg(feature = "stats")]
            stats,
        },
    );
    tracing::debug!(memo = name, %id, live = registry.len(), "registered memoized function");
}

/// Clears the store registered under `id`.
///
/// Returns `false`, without error, when the id is unknown, the wrapper has
/// been dropped, or its store cannot be cleared.
pub fn clear(id: MemoId) -> bool {
    // Upgrade under the read lock, clear after releasing it
    let target = REGISTRY
        .read()
        .get(&id)
        .and_then(|entry| entry.store.upgrade().map(|store| (entry.name.clone(), store)));

    match target {
        Some((name, store)) => {
            let cleared = store.clear_entries();
            tracing::debug!(memo = %name, %id, cleared, "cleared memoized function");
            cleared
        }
        None => false,
    }
}

/// Clears every live wrapper registered under `name`.
///
/// Returns the number of stores actually cleared.
pub fn clear_by_name(name: &str) -> usize {
    let stores: Vec<Arc<dyn Clearable>> = REGISTRY
        .read()
        .values()
        .filter(|entry| entry.name == name)
        .filter_map(|entry| entry.store.upgrade())
        .collect();

    let cleared = stores.iter().filter(|store| store.clear_entries()).count();
    tracing::debug!(memo = name, cleared, "cleared memoized functions by name");
    cleared
}

/// Returns true while the wrapper behind `id` is alive.
pub fn is_registered(id: MemoId) -> bool {
    REGISTRY
        .read()
        .get(&id)
        .map_or(false, RegistryEntry::is_alive)
}

/// Names of all live wrappers, sorted and deduplicated.
pub fn names() -> Vec<String> {
    let mut names: Vec<String> = REGISTRY
        .read()
        .values()
        .filter(|entry| entry.is_alive())
        .map(|entry| entry.name.clone())
        .collect();
    names.sort();
    names.dedup();
    names
}

/// Snapshot of the statistics of the first live wrapper registered under `name`.
#[cfg(feature = "stats")]
pub fn stats(name: &str) -> Option<CacheStats> {
    REGISTRY
        .read()
        .values()
        .filter(|entry| entry.name == name)
        .find_map(|entry| entry.stats.upgrade())
        .map(|stats| (*stats).clone())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{CacheStore, OrderedStore, StoreCell};

    fn register_store(name: &str) -> (MemoId, Arc<StoreCell<u32, u32, OrderedStore<u32, u32>>>) {
        let id = MemoId::next();
        let cell = Arc::new(StoreCell::new(OrderedStore::new()));
        let weak: Weak<dyn Clearable> = Arc::downgrade(&cell) as Weak<dyn Clearable>;
        #[cfg(feature = "stats")]
        let stats = Arc::new(CacheStats::new());
        register(
            id,
            name,
            weak,
            #[cfg(feature = "stats")]
            Arc::downgrade(&stats),
        );
        (id, cell)
    }

    #[test]
    fn test_ids_are_unique() {
        let a = MemoId::next();
        let b = MemoId::next();
        assert_ne!(a, b);
        assert!(b.as_u64() > a.as_u64());
    }

    #[test]
    fn test_clear_empties_store() {
        let (id, cell) = register_store("registry_clear_test");
        cell.with(|store| store.set(1, 10));

        assert!(clear(id));
        assert!(cell.with(|store| store.is_empty()));
    }

    #[test]
    fn test_clear_unknown_id_is_noop() {
        assert!(!clear(MemoId::next()));
    }

    #[test]
    fn test_dropped_store_is_not_registered() {
        let (id, cell) = register_store("registry_drop_test");
        assert!(is_registered(id));

        drop(cell);
        assert!(!is_registered(id));
        assert!(!clear(id));
        assert!(!names().contains(&"registry_drop_test".to_string()));
    }

    #[test]
    fn test_clear_by_name_counts_live_stores() {
        let (_a, first) = register_store("registry_shared_name");
        let (_b, second) = register_store("registry_shared_name");
        first.with(|store| store.set(1, 1));
        second.with(|store| store.set(2, 2));

        assert_eq!(clear_by_name("registry_shared_name"), 2);
        assert!(first.with(|store| store.is_empty()));
        assert!(second.with(|store| store.is_empty()));
        assert_eq!(clear_by_name("registry_no_such_name"), 0);
    }
}
