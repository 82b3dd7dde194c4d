//! # memfn Async
//!
//! Memoization for functions that return futures.
//!
//! The cached value is the *shared future handle* itself, not its output:
//! every hit hands out a clone of the same [`Shared`] future, so callers
//! awaiting it observe one computation.
//!
//! ## Commit rules
//!
//! - **Default**: the entry is written only once the future resolves `Ok`,
//!   under the key computed when the call was made. An `Err` writes nothing,
//!   so the next call runs the function again. Calls made while the first
//!   future is still pending are misses.
//! - **`cache_rejection(true)`**: the pending handle is written immediately.
//!   Later calls for the same key share the in-flight future, and a rejected
//!   result is served from the store like any other.
//!
//! Futures are lazy: a deferred commit happens when some holder of the
//! handle polls it to completion. A handle dropped without being awaited
//! commits nothing.
//!
//! ## Example
//!
//! ```rust,ignore
//! use memfn_async::memoize_async;
//! use memfn_core::MemoizeConfig;
//! use std::time::Duration;
//!
//! #[tokio::main]
//! async fn main() {
//!     let fetch = memoize_async(
//!         |id: u64| async move {
//!             tokio::time::sleep(Duration::from_millis(100)).await;
//!             Ok::<_, String>(format!("user-{id}"))
//!         },
//!         MemoizeConfig::default().max_age(Duration::from_secs(60)),
//!     );
//!
//!     // First call runs the function
//!     let user = fetch.call(7).unwrap().await;
//!     // Second call is served from the store
//!     let again = fetch.call(7).unwrap().await;
//!     assert_eq!(user, again);
//! }
//! ```

use futures_util::future::{BoxFuture, FutureExt, Shared, WeakShared};
use memfn_core::registry::{self, Clearable, MemoId};
#[cfg(feature = "stats")]
use memfn_core::CacheStats;
use memfn_core::{
    CacheEntry, CacheKey, CacheStore, FnInfo, KeyFn, KeyResult, Lookup, Memo, MemoizeConfig,
    OrderedStore, StoreCell, StoreSource,
};
use once_cell::sync::OnceCell;
use std::fmt;
use std::future::Future;
use std::sync::{Arc, Weak};
use std::time::{Duration, Instant};

/// A pending or settled result that any number of callers can await.
pub type SharedResult<T, E> = Shared<BoxFuture<'static, Result<T, E>>>;

/// An async memoized wrapper with the default key derivation and store.
pub type DefaultAsyncMemoized<A, T, E> =
    AsyncMemoized<A, T, E, CacheKey, OrderedStore<CacheKey, CacheEntry<SharedResult<T, E>>>>;

type Target<A, T, E> = Box<dyn Fn(A) -> BoxFuture<'static, Result<T, E>> + Send + Sync>;
type SharedCell<K, T, E, S> = StoreCell<K, CacheEntry<SharedResult<T, E>>, S>;

/// A future-returning function wrapped with a cache of shared results.
pub struct AsyncMemoized<A, T, E, K, S> {
    id: MemoId,
    info: FnInfo,
    target: Target<A, T, E>,
    cache_key: KeyFn<A, K>,
    store: Arc<SharedCell<K, T, E, S>>,
    max_age: Option<Duration>,
    cache_rejection: bool,
    #[cfg(feature = "stats")]
    stats: Arc<CacheStats>,
}

/// Wraps an async `f` so results are cached by argument.
///
/// `Err` outputs are rejections: they are cached only with
/// `cache_rejection(true)`.
pub fn memoize_async<A, T, E, K, C, F, Fut>(
    f: F,
    config: MemoizeConfig<A, K, C>,
) -> AsyncMemoized<A, T, E, K, C::Store>
where
    A: 'static,
    F: Fn(A) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<T, E>> + Send + 'static,
    T: Clone + Send + Sync + 'static,
    E: Clone + Send + Sync + 'static,
    K: Send + 'static,
    C: StoreSource<K, CacheEntry<SharedResult<T, E>>>,
    C::Store: 'static,
{
    let parts = config.into_parts();
    let info = FnInfo::of::<F>().with_overrides(parts.name, parts.description);
    let store = Arc::new(StoreCell::new(parts.cache.into_store()));
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

    AsyncMemoized {
        id,
        info,
        target: Box::new(move |args: A| f(args).boxed()),
        cache_key: parts.cache_key,
        store,
        max_age: parts.max_age,
        cache_rejection: parts.cache_rejection,
        #[cfg(feature = "stats")]
        stats,
    }
}

impl<A, T, E, K, S> AsyncMemoized<A, T, E, K, S>
where
    T: Clone + Send + Sync + 'static,
    E: Clone + Send + Sync + 'static,
    K: Send + 'static,
    S: CacheStore<K, CacheEntry<SharedResult<T, E>>> + 'static,
{
    /// Invokes the wrapper without waiting for the result.
    ///
    /// Returns the shared handle: on a hit, a clone of the cached one; on a
    /// miss, a fresh one around the function's future. The function itself is
    /// called synchronously, before this returns.
    ///
    /// # Errors
    ///
    /// Fails with [`KeyError`](memfn_core::KeyError) when the key cannot be
    /// derived; the function is not called in that case.
    pub fn call(&self, args: A) -> KeyResult<SharedResult<T, E>> {
        let key = (self.cache_key)(&args)?;

        match self.store.lookup(&key, self.max_age.is_some(), Instant::now()) {
            Lookup::Hit(shared) => {
                #[cfg(feature = "stats")]
                self.stats.record_hit();
                tracing::trace!(memo = %self.info.name, "cache hit");
                return Ok(shared);
            }
            Lookup::Stale => tracing::trace!(memo = %self.info.name, "stale entry, recomputing"),
            Lookup::Miss => tracing::trace!(memo = %self.info.name, "cache miss"),
        }

        #[cfg(feature = "stats")]
        self.stats.record_miss();

        let pending = (self.target)(args);

        if self.cache_rejection {
            let shared = pending.shared();
            self.store
                .commit(key, CacheEntry::new(shared.clone(), self.max_age));
            #[cfg(feature = "stats")]
            self.stats.record_commit();
            tracing::trace!(memo = %self.info.name, "committed pending result");
            return Ok(shared);
        }

        Ok(self.commit_on_success(key, pending))
    }

    /// Invokes the wrapper and awaits the result.
    pub async fn resolve(&self, args: A) -> KeyResult<Result<T, E>> {
        let shared = self.call(args)?;
        Ok(shared.await)
    }

    // The future stores a handle to itself once it resolves Ok. It only holds
    // a weak handle while pending, so an unpolled future is not kept alive.
    fn commit_on_success(
        &self,
        key: K,
        pending: BoxFuture<'static, Result<T, E>>,
    ) -> SharedResult<T, E> {
        let slot: Arc<OnceCell<WeakShared<BoxFuture<'static, Result<T, E>>>>> =
            Arc::new(OnceCell::new());
        let own_handle = Arc::clone(&slot);
        let store = Arc::clone(&self.store);
        let max_age = self.max_age;
        let name = self.info.name.clone();
        #[cfg(feature = "stats")]
        let stats = Arc::clone(&self.stats);

        let shared = async move {
            let outcome = pending.await;
            match (&outcome, own_handle.get().and_then(WeakShared::upgrade)) {
                (Ok(_), Some(handle)) => {
                    store.commit(key, CacheEntry::new(handle, max_age));
                    #[cfg(feature = "stats")]
                    stats.record_commit();
                    tracing::trace!(memo = %name, "committed resolved result");
                }
                (Ok(_), None) => {
                    #[cfg(feature = "stats")]
                    stats.record_skip();
                    tracing::warn!(memo = %name, "resolved result has no handle to commit");
                }
                (Err(_), _) => {
                    #[cfg(feature = "stats")]
                    stats.record_skip();
                    tracing::trace!(memo = %name, "rejected result not cached");
                }
            }
            outcome
        }
        .boxed()
        .shared();

        // Nothing has polled `shared` yet, so its state is live and the slot
        // is still empty; both branches below are never expected to fail.
        match shared.downgrade() {
            Some(weak) => {
                let armed = slot.set(weak).is_ok();
                debug_assert!(armed, "commit slot is armed exactly once");
            }
            None => tracing::warn!(
                memo = %self.info.name,
                "shared result settled before its commit hook was armed"
            ),
        }
        shared
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
    pub fn inspect_store<R>(&self, f: impl FnOnce(&mut S) -> R) -> R {
        self.store.with(f)
    }
}

impl<A, T, E, K, S> AsyncMemoized<A, T, E, K, S> {
    pub fn id(&self) -> MemoId {
        self.id
    }

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

impl<A, T, E, K, S> Memo for AsyncMemoized<A, T, E, K, S> {
    fn memo_id(&self) -> MemoId {
        self.id
    }

    fn memo_info(&self) -> &FnInfo {
        &self.info
    }
}

impl<A, T, E, K, S> fmt::Debug for AsyncMemoized<A, T, E, K, S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AsyncMemoized")
            .field("id", &self.id)
            .field("name", &self.info.name)
            .field("max_age", &self.max_age)
            .field("cache_rejection", &self.cache_rejection)
            .finish_non_exhaustive()
    }
}
