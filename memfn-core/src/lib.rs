//! # memfn Core
//!
//! Building blocks for memoizing arbitrary functions.
//!
//! ## Features
//!
//! - **Typed cache keys**: single scalar arguments keep their type, composite
//!   argument lists are serialized structurally
//! - **Pluggable stores**: anything implementing [`CacheStore`], with an
//!   insertion-ordered default and an entry-limited [`BoundedStore`]
//! - **Expiry**: optional `max_age` per wrapper; stale entries are recomputed
//! - **Rejection-aware**: `Err` results are only cached on request
//! - **Process-wide invalidation**: every wrapper is weakly registered and can
//!   be cleared by id or name
//! - **Statistics**: hit/miss/commit counters (with the `stats` feature)
//!
//! ## Module Organization
//!
//! - [`key`] - cache key derivation
//! - [`cache_entry`] - entries with expiry deadlines
//! - [`store`] - the store trait and the default ordered store
//! - [`registry`] - the weak wrapper-to-store registry
//! - [`memoize`] - the synchronous memoizer
//!
//! ## Example
//!
//! ```
//! use memfn_core::{memoize, MemoizeConfig};
//! use std::time::Duration;
//!
//! let slow_square = memoize(
//!     |x: u64| x * x,
//!     MemoizeConfig::default().max_age(Duration::from_secs(30)),
//! );
//!
//! assert_eq!(slow_square.call(12).unwrap(), 144);
//! assert!(slow_square.is_cached(&12).unwrap());
//! ```
pub mod cache_entry;
mod bounded_store;
mod config;
mod error;
mod eviction_policy;
pub mod key;
pub mod memoize;
mod mimic;
pub mod registry;
mod shape;
mod shared_store;
pub mod store;
pub mod utils;

#[cfg(feature = "stats")]
mod stats;

pub use bounded_store::BoundedStore;
pub use cache_entry::CacheEntry;
pub use config::{ConfigParts, MemoizeConfig};
pub use error::{KeyError, KeyResult};
pub use eviction_policy::EvictionPolicy;
pub use key::{default_cache_key, CacheKey, KeyFn};
pub use memoize::{memoize, memoize_result, DefaultMemoized, Memo, Memoized};
pub use mimic::FnInfo;
pub use registry::{Clearable, MemoId};
pub use shared_store::{Lookup, StoreCell};
pub use store::{CacheStore, FreshStore, OrderedStore, StoreSource, SuppliedStore};

#[cfg(feature = "stats")]
pub use stats::CacheStats;
