use crate::key::{default_key_fn, key_fn, KeyFn};
use crate::store::{FreshStore, SuppliedStore};
use crate::CacheKey;
use serde::Serialize;
use std::time::Duration;

/// Options accepted by the memoizers.
///
/// * `cache_key` - derives the key from the argument list (default: [`default_cache_key`](crate::default_cache_key))
/// * `cache` - where the store comes from (default: a fresh [`OrderedStore`](crate::OrderedStore))
/// * `max_age` - entries older than this are recomputed (default: never expire)
/// * `cache_rejection` - also cache rejected results (default: `false`)
/// * `name` / `description` - override the metadata copied from the target
///
/// # Examples
///
/// ```
/// use memfn_core::{memoize, BoundedStore, MemoizeConfig};
/// use std::time::Duration;
///
/// // Defaults with a one-minute expiry
/// let double = memoize(
///     |x: u64| x * 2,
///     MemoizeConfig::default().max_age(Duration::from_secs(60)),
/// );
/// assert_eq!(double.call(21).unwrap(), 42);
///
/// // Custom key and an LRU-bounded store
/// let greet = memoize(
///     |(id, name): (u64, String)| format!("{id}:{name}"),
///     MemoizeConfig::default()
///         .keyed_by(|args: &(u64, String)| args.0)
///         .with_store(BoundedStore::lru(100)),
/// );
/// assert_eq!(greet.call((1, "ann".to_string())).unwrap(), "1:ann");
/// // Same id, same key: the first result is reused
/// assert_eq!(greet.call((1, "bob".to_string())).unwrap(), "1:ann");
/// ```
pub struct MemoizeConfig<A, K, C> {
    pub(crate) cache_key: KeyFn<A, K>,
    pub(crate) cache: C,
    pub(crate) max_age: Option<Duration>,
    pub(crate) cache_rejection: bool,
    pub(crate) name: Option<String>,
    pub(crate) description: Option<String>,
}

impl<A> Default for MemoizeConfig<A, CacheKey, FreshStore>
where
    A: Serialize + 'static,
{
    fn default() -> Self {
        Self::new(default_key_fn(), FreshStore)
    }
}

impl<A, K> MemoizeConfig<A, K, FreshStore> {
    /// Starts a config with a custom key function and otherwise default options.
    ///
    /// Unlike `default().keyed_by(..)`, the arguments need not be `Serialize`.
    pub fn keyed<F>(f: F) -> Self
    where
        A: 'static,
        K: 'static,
        F: Fn(&A) -> K + Send + Sync + 'static,
    {
        Self::new(key_fn(f), FreshStore)
    }
}

impl<A, K, C> MemoizeConfig<A, K, C> {
    /// Builds a config from an explicit key function and store source.
    pub fn new(cache_key: KeyFn<A, K>, cache: C) -> Self {
        Self {
            cache_key,
            cache,
            max_age: None,
            cache_rejection: false,
            name: None,
            description: None,
        }
    }

    /// Replaces the key derivation with `f`.
    ///
    /// The store source is kept: a default config still builds a fresh
    /// store for the new key type, and a store given to
    /// [`with_store`](Self::with_store) stays in place. Returning the same
    /// key for different arguments makes them share one entry.
    pub fn keyed_by<K2, F>(self, f: F) -> MemoizeConfig<A, K2, C>
    where
        A: 'static,
        K2: 'static,
        F: Fn(&A) -> K2 + Send + Sync + 'static,
    {
        MemoizeConfig {
            cache_key: key_fn(f),
            cache: self.cache,
            max_age: self.max_age,
            cache_rejection: self.cache_rejection,
            name: self.name,
            description: self.description,
        }
    }

    /// Backs the wrapper with `store` instead of a fresh default one.
    pub fn with_store<S>(self, store: S) -> MemoizeConfig<A, K, SuppliedStore<S>> {
        MemoizeConfig {
            cache_key: self.cache_key,
            cache: SuppliedStore(store),
            max_age: self.max_age,
            cache_rejection: self.cache_rejection,
            name: self.name,
            description: self.description,
        }
    }

    pub fn max_age(mut self, max_age: Duration) -> Self {
        self.max_age = Some(max_age);
        self
    }

    /// Whether rejected results (an `Err`) are cached like successful ones.
    pub fn cache_rejection(mut self, enabled: bool) -> Self {
        self.cache_rejection = enabled;
        self
    }

    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn max_age_value(&self) -> Option<Duration> {
        self.max_age
    }

    pub fn cache_rejection_value(&self) -> bool {
        self.cache_rejection
    }

    /// Splits the config into its parts, for memoizers living outside this crate.
    pub fn into_parts(self) -> ConfigParts<A, K, C> {
        ConfigParts {
            cache_key: self.cache_key,
            cache: self.cache,
            max_age: self.max_age,
            cache_rejection: self.cache_rejection,
            name: self.name,
            description: self.description,
        }
    }
}

/// Owned fields of a [`MemoizeConfig`].
pub struct ConfigParts<A, K, C> {
    pub cache_key: KeyFn<A, K>,
    pub cache: C,
    pub max_age: Option<Duration>,
    pub cache_rejection: bool,
    pub name: Option<String>,
    pub description: Option<String>,
}
