use memfn::{
    clear_by_name, clear_id, memoize, registry, CacheEntry, CacheKey, CacheStore, Memo,
    MemoizeConfig,
};
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};

/// Store without the clear capability.
#[derive(Default)]
struct Permanent(HashMap<CacheKey, CacheEntry<u32>>);

impl CacheStore<CacheKey, CacheEntry<u32>> for Permanent {
    fn get(&mut self, key: &CacheKey) -> Option<&CacheEntry<u32>> {
        self.0.get(key)
    }

    fn set(&mut self, key: CacheKey, value: CacheEntry<u32>) {
        self.0.insert(key, value);
    }

    fn has(&self, key: &CacheKey) -> bool {
        self.0.contains_key(key)
    }
}

#[test]
fn test_clear_by_name_reaches_every_live_wrapper() {
    let first = memoize(|x: u32| x + 1, MemoizeConfig::default().name("shared_name"));
    let second = memoize(|x: u32| x + 2, MemoizeConfig::default().name("shared_name"));

    first.call(1).unwrap();
    second.call(1).unwrap();

    assert_eq!(clear_by_name("shared_name"), 2);
    assert!(!first.is_cached(&1).unwrap());
    assert!(!second.is_cached(&1).unwrap());

    assert_eq!(clear_by_name("no_such_function"), 0);
}

#[test]
fn test_clear_after_drop_is_a_no_op() {
    let memo = memoize(|x: u32| x, MemoizeConfig::default().name("short_lived"));
    let id = memo.memo_id();
    memo.call(1).unwrap();

    assert!(registry::is_registered(id));
    drop(memo);

    assert!(!registry::is_registered(id));
    assert!(!clear_id(id));
}

#[test]
fn test_store_without_clear_is_left_alone() {
    static CALLS: AtomicUsize = AtomicUsize::new(0);

    let memo = memoize(
        |x: u32| {
            CALLS.fetch_add(1, Ordering::SeqCst);
            x
        },
        MemoizeConfig::default().with_store(Permanent::default()),
    );

    memo.call(5).unwrap();
    assert!(!memfn::clear(&memo));

    memo.call(5).unwrap();
    assert_eq!(CALLS.load(Ordering::SeqCst), 1);
}

#[test]
fn test_default_name_comes_from_function() {
    fn lookup_price(item: u32) -> u32 {
        item * 100
    }

    let memo = memoize(lookup_price, MemoizeConfig::default());
    assert_eq!(memo.name(), "lookup_price");
    assert!(registry::names().contains(&"lookup_price".to_string()));

    let renamed = memoize(
        lookup_price,
        MemoizeConfig::default()
            .name("price_v2")
            .description("prices in cents"),
    );
    assert_eq!(renamed.name(), "price_v2");
    assert_eq!(renamed.description(), Some("prices in cents"));
}

#[cfg(feature = "stats")]
#[test]
fn test_stats_by_name() {
    let memo = memoize(|x: u32| x * 3, MemoizeConfig::default().name("tripled"));

    memo.call(1).unwrap();
    memo.call(1).unwrap();
    memo.call(2).unwrap();

    let stats = registry::stats("tripled").unwrap();
    assert_eq!(stats.hits(), 1);
    assert_eq!(stats.misses(), 2);
    assert_eq!(stats.commits(), 2);
    assert!((stats.hit_rate() - 1.0 / 3.0).abs() < 1e-9);
}
