use crate::registry::Clearable;
use crate::{CacheEntry, CacheStore};
use parking_lot::Mutex;
use std::marker::PhantomData;
use std::time::Instant;

/// Outcome of consulting the store for one key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Lookup<R> {
    /// A usable entry; carries a clone of its data
    Hit(R),
    /// An entry exists but its deadline has passed; it stays until overwritten
    Stale,
    Miss,
}

/// A store behind the lock its wrapper and the registry share.
///
/// The marker pins the key and value types so the store's `CacheStore`
/// impl can be named from the type-erased [`Clearable`] side.
pub struct StoreCell<K, V, S> {
    store: Mutex<S>,
    _marker: PhantomData<fn() -> (K, V)>,
}

impl<K, V, S> StoreCell<K, V, S>
where
    S: CacheStore<K, V>,
{
    pub fn new(store: S) -> Self {
        Self {
            store: Mutex::new(store),
            _marker: PhantomData,
        }
    }

    /// Runs `f` with exclusive access to the store.
    ///
    /// The lock is held until `f` returns, so `f` must not call back into a
    /// memoized function using this store.
    pub fn with<T>(&self, f: impl FnOnce(&mut S) -> T) -> T {
        f(&mut self.store.lock())
    }
}

impl<K, R, S> StoreCell<K, CacheEntry<R>, S>
where
    R: Clone,
    S: CacheStore<K, CacheEntry<R>>,
{
    /// Resolves `key` to a hit, a stale entry or a miss.
    ///
    /// Without `max_age` configured every present entry is a hit.
    pub fn lookup(&self, key: &K, expiring: bool, now: Instant) -> Lookup<R> {
        self.with(|store| {
            if !store.has(key) {
                return Lookup::Miss;
            }
            match store.get(key) {
                Some(entry) if !expiring || entry.is_fresh(now) => Lookup::Hit(entry.data.clone()),
                Some(_) => Lookup::Stale,
                None => Lookup::Miss,
            }
        })
    }

    /// Writes a complete entry, replacing whatever the key held.
    pub fn commit(&self, key: K, entry: CacheEntry<R>) {
        self.with(|store| store.set(key, entry));
    }
}

impl<K, V, S> Clearable for StoreCell<K, V, S>
where
    S: CacheStore<K, V>,
{
    fn clear_entries(&self) -> bool {
        self.store.lock().clear()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::OrderedStore;
    use std::time::Duration;

    type Cell = StoreCell<u32, CacheEntry<&'static str>, OrderedStore<u32, CacheEntry<&'static str>>>;

    #[test]
    fn test_lookup_outcomes() {
        let cell: Cell = StoreCell::new(OrderedStore::new());
        let now = Instant::now();
        assert_eq!(cell.lookup(&1, true, now), Lookup::Miss);

        cell.commit(1, CacheEntry::stamped("one", Some(Duration::from_millis(50)), now));
        assert_eq!(cell.lookup(&1, true, now), Lookup::Hit("one"));
        assert_eq!(
            cell.lookup(&1, true, now + Duration::from_millis(100)),
            Lookup::Stale
        );
    }

    #[test]
    fn test_stale_entry_stays_until_overwritten() {
        let cell: Cell = StoreCell::new(OrderedStore::new());
        let now = Instant::now();
        cell.commit(1, CacheEntry::stamped("old", Some(Duration::ZERO), now));

        assert_eq!(cell.lookup(&1, true, now), Lookup::Stale);
        assert!(cell.with(|store| store.has(&1)));

        cell.commit(1, CacheEntry::stamped("new", Some(Duration::from_secs(60)), now));
        assert_eq!(cell.lookup(&1, true, now), Lookup::Hit("new"));
        assert_eq!(cell.with(|store| store.len()), 1);
    }

    #[test]
    fn test_no_expiry_check_without_max_age() {
        let cell: Cell = StoreCell::new(OrderedStore::new());
        let now = Instant::now();
        cell.commit(1, CacheEntry::stamped("kept", Some(Duration::ZERO), now));
        assert_eq!(cell.lookup(&1, false, now), Lookup::Hit("kept"));
    }

    #[test]
    fn test_clear_entries() {
        let cell: Cell = StoreCell::new(OrderedStore::new());
        cell.commit(1, CacheEntry::new("one", None));
        assert!(cell.clear_entries());
        assert_eq!(cell.lookup(&1, false, Instant::now()), Lookup::Miss);
    }
}
