//! # Synchronous Memoization
//!
//! [`memoize`] turns any `Fn(A) -> R` into a [`Memoized`] wrapper whose
//! [`call`](Memoized::call) consults a per-wrapper store before running the
//! target:
//!
//! 1. derive the key from the arguments
//! 2. a present entry is returned as is, unless `max_age` is set and it has expired
//! 3. otherwise run the target, commit the result and return it
//!
//! The store lock is released before the target runs, so a memoized
//! function may call itself recursively.

use crate::key::KeyFn;
use crate::mimic::FnInfo;
use crate::registry::{self, Clearable, MemoId};
use crate::shared_store::{Lookup, StoreCell};
use crate::store::StoreSource;
#[cfg(feature = "stats")]
use crate::CacheStats;
use crate::{CacheEntry, CacheKey, CacheStore, KeyResult, MemoizeConfig, OrderedStore};
use std::fmt;
use std::sync::{Arc, Weak};
use std::time::{Duration, Instant};

/// Shared identity of memoized wrappers, used by the free-standing `clear`.
pub trait Memo {
    fn memo_id(&self) -> MemoId;

    fn memo_info(&self) -> &FnInfo;
}

/// A memoized wrapper with the default key derivation and store.
pub type DefaultMemoized<A, R> = Memoized<A, R, CacheKey, OrderedStore<CacheKey, CacheEntry<R>>>;

type Target<A, R> = Box<dyn Fn(A) -> R + Send + Sync>;
type CachePredicate<R> = Arc<dyn Fn(&R) -> bool + Send + Sync>;

/// A function wrapped with a result cache.
///
/// Built by [`memoize`] or [`memoize_result`]. The wrapper owns its store;
/// the process-wide registry only holds a weak handle to it.
///
/// # Examples
///
/// ```
/// use memfn_core::{memoize, MemoizeConfig};
/// use std::sync::atomic::{AtomicUsize, Ordering};
/// use std::sync::Arc;
///
/// let calls = Arc::new(AtomicUsize::new(0));
/// let counter = Arc::clone(&calls);
/// let square = memoize(
///     move |x: u64| {
///         counter.fetch_add(1, Ordering::SeqCst);
///         x * x
///     },
///     MemoizeConfig::default(),
/// );
///
/// assert_eq!(square.call(3).unwrap(), 9);
/// assert_eq!(square.call(3).unwrap(), 9);
/// assert_eq!(calls.load(Ordering::SeqCst), 1);
/// ```
pub struct Memoized<A, R, K, S> {
    id: MemoId,
    info: FnInfo,
    target: Target<A, R>,
    cache_key: KeyFn<A, K>,
    store: Arc<StoreCell<K, CacheEntry<R>, S>>,
    max_age: Option<Duration>,
    cache_rejection: bool,
    is_rejection: Option<fn(&R) -> bool>,
    cache_if: Option<CachePredicate<R>>,
    #[cfg(feature = "stats")]
    stats: Arc<CacheStats>,
}

/// Wraps `f` so results are cached by argument.
///
/// Every returned value is committed. Panics inside `f` propagate and leave
/// the store untouched.
pub fn memoize<A, R, K, C, F>(
    f: F,
    config: MemoizeConfig<A, K, C>,
) -> Memoized<A, R, K, C::Store>
where
    F: Fn(A) -> R + Send + Sync + 'static,
    R: Clone + 'static,
    K: 'static,
    C: StoreSource<K, CacheEntry<R>>,
    C::Store: 'static,
{
    Memoized::build(f, config, None)
}

/// Wraps a fallible `f`; an `Err` is only cached with `cache_rejection(true)`.
///
/// # Examples
///
/// ```
/// use memfn_core::{memoize_result, MemoizeConfig};
///
/// let parse = memoize_result(
///     |s: String| s.parse::<i32>().map_err(|e| e.to_string()),
///     MemoizeConfig::default(),
/// );
///
/// assert_eq!(parse.call("42".to_string()).unwrap(), Ok(42));
/// assert!(parse.call("x".to_string()).unwrap().is_err());
/// assert!(parse.is_cached(&"42".to_string()).unwrap());
/// assert!(!parse.is_cached(&"x".to_string()).unwrap());
/// ```
pub fn memoize_result<A, T, E, K, C, F>(
    f: F,
    config: MemoizeConfig<A, K, C>,
) -> Memoized<A, Result<T, E>, K, C::Store>
where
    F: Fn(A) -> Result<T, E> + Send + Sync + 'static,
    T: Clone + 'static,
    E: Clone + 'static,
    K: 'static,
    C: StoreSource<K, CacheEntry<Result<T, E>>>,
    C::Store: 'static,
{
    Memoized::build(f, config, Some(Result::is_err))
}

impl<A, R, K, S> Memoized<A, R, K, S>
where
    R: Clone + 'static,
    K: 'static,
    S: CacheStore<K, CacheEntry<R>> + 'static,
{
    fn build<C, F>(
        f: F,
        config: MemoizeConfig<A, K, C>,
        is_rejection: Option<fn(&R) -> bool>,
    ) -> Self
    where
        F: Fn(A) -> R + Send + Sync + 'static,
        C: StoreSource<K, CacheEntry<R>, Store = S>,
    {
        let info = FnInfo::of::<F>().with_overrides(config.name, config.description);
        let store = Arc::new(StoreCell::new(config.cache.into_store()));
        let id = MemoId::next();

        #[cfg(feature = "stats")]
        let stats = Arc::new(CacheStats::new());

        let handle: Weak<dyn Clearable> = Arc::downgrade(&store) as Weak<dyn Clearable>;
        registry::register(
            id,
            &info.name,
            handle,
            #[cfg(feature = "stats")]
            Arc::downgrade(&stats),
        );

        Self {
            id,
            info,
            target: Box::new(f),
            cache_key: config.cache_key,
            store,
            max_age: config.max_age,
            cache_rejection: config.cache_rejection,
            is_rejection,
            cache_if: None,
            #[cfg(feature = "stats")]
            stats,
        }
    }

    /// Only commit results for which `predicate` returns true.
    ///
    /// Applies on top of the rejection rule: an `Err` from a
    /// [`memoize_result`] wrapper still needs `cache_rejection` as well.
    pub fn cache_if<P>(mut self, predicate: P) -> Self
    where
        P: Fn(&R) -> bool + Send + Sync + 'static,
    {
        self.cache_if = Some(Arc::new(predicate));
        self
    }

    /// Invokes the wrapper.
    ///
    /// # Errors
    ///
    /// Fails with [`KeyError`](crate::KeyError) only when the key cannot be
    /// derived; the target is not run in that case.
    pub fn call(&self, args: A) -> KeyResult<R> {
        let key = (self.cache_key)(&args)?;

        match self.store.lookup(&key, self.max_age.is_some(), Instant::now()) {
            Lookup::Hit(data) => {
                #[cfg(feature = "stats")]
                self.stats.record_hit();
                tracing::trace!(memo = %self.info.name, "cache hit");
                return Ok(data);
            }
            Lookup::Stale => tracing::trace!(memo = %self.info.name, "stale entry, recomputing"),
            Lookup::Miss => tracing::trace!(memo = %self.info.name, "cache miss"),
        }

        #[cfg(feature = "stats")]
        self.stats.record_miss();

        let result = (self.target)(args);

        if self.should_commit(&result) {
            self.store
                .commit(key, CacheEntry::new(result.clone(), self.max_age));
            #[cfg(feature = "stats")]
            self.stats.record_commit();
            tracing::trace!(memo = %self.info.name, "committed result");
        } else {
            #[cfg(feature = "stats")]
            self.stats.record_skip();
            tracing::trace!(memo = %self.info.name, "result not cached");
        }

        Ok(result)
    }

    fn should_commit(&self, result: &R) -> bool {
        let rejected = self.is_rejection.map_or(false, |is_err| is_err(result));
        (!rejected || self.cache_rejection)
            && self.cache_if.as_ref().map_or(true, |predicate| predicate(result))
    }

    /// Returns true if a call with `args` would be served from the store right now.
    pub fn is_cached(&self, args: &A) -> KeyResult<bool> {
        let key = (self.cache_key)(args)?;
        Ok(matches!(
            self.store.lookup(&key, self.max_age.is_some(), Instant::now()),
            Lookup::Hit(_)
        ))
    }

    /// Empties the store, if it supports clearing.
    pub fn clear(&self) -> bool {
        registry::clear(self.id)
    }

    /// Gives `f` exclusive access to the underlying store.
    pub fn inspect_store<T>(&self, f: impl FnOnce(&mut S) -> T) -> T {
        self.store.with(f)
    }
}

impl<A, R, K, S> Memoized<A, R, K, S> {
    pub fn id(&self) -> MemoId {
        self.id
    }

    /// Name copied from the target, or the configured override.
    pub fn name(&self) -> &str {
        &self.info.name
    }

    pub fn description(&self) -> Option<&str> {
        self.info.description.as_deref()
    }

    pub fn info(&self) -> &FnInfo {
        &self.info
    }

    pub fn max_age(&self) -> Option<Duration> {
        self.max_age
    }

    #[cfg(feature = "stats")]
    pub fn stats(&self) -> &CacheStats {
        &self.stats
    }
}

impl<A, R, K, S> Memo for Memoized<A, R, K, S> {
    fn memo_id(&self) -> MemoId {
        self.id
    }

    fn memo_info(&self) -> &FnInfo {
        &self.info
    }
}

impl<A, R, K, S> fmt::Debug for Memoized<A, R, K, S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Memoized")
            .field("id", &self.id)
            .field("name", &self.info.name)
            .field("max_age", &self.max_age)
            .field("cache_rejection", &self.cache_rejection)
            .finish_non_exhaustive()
    }
}
