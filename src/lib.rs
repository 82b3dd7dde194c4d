//! # memfn
//!
//! Memoization for plain Rust functions and closures: wrap a function once,
//! and repeated calls with equal arguments are answered from a cache.
//!
//! ## Features
//!
//! - **Any callable**: `fn` items and closures, wrapped at runtime with [`memoize`]
//! - **Type-sensitive keys**: `1` and `"1"` are different arguments
//! - **Expiry**: `max_age` turns old entries into misses
//! - **Rejection-aware**: [`memoize_result`] only caches `Err` on request
//! - **Pluggable stores**: bring your own [`CacheStore`] or use [`BoundedStore`]
//! - **Invalidation from anywhere**: [`clear`], [`clear_id`], [`clear_by_name`]
//!
//! Futures are handled by the companion `memfn-async` crate.
//!
//! ## Quick Start
//!
//! ```rust
//! use memfn::{memoize, MemoizeConfig};
//!
//! fn fibonacci(n: u64) -> u64 {
//!     if n <= 1 {
//!         return n;
//!     }
//!     fibonacci(n - 1) + fibonacci(n - 2)
//! }
//!
//! let fib = memoize(fibonacci, MemoizeConfig::default());
//!
//! // First call computes the result
//! let result1 = fib.call(20).unwrap();
//! // Second call returns the cached result
//! let result2 = fib.call(20).unwrap();
//! assert_eq!(result1, result2);
//! assert_eq!(fib.name(), "fibonacci");
//! ```
//!
//! ## Custom Keys
//!
//! ```rust
//! use memfn::{memoize, MemoizeConfig};
//!
//! #[derive(Debug, Clone)]
//! struct User {
//!     id: u64,
//!     name: String,
//! }
//!
//! // Users are looked up by id only; the name does not affect the key
//! let greet = memoize(
//!     |user: User| format!("hello {}", user.name),
//!     MemoizeConfig::keyed(|user: &User| user.id),
//! );
//!
//! let ann = User { id: 1, name: "ann".into() };
//! assert_eq!(greet.call(ann).unwrap(), "hello ann");
//! ```
//!
//! ## Error Handling
//!
//! Functions returning `Result<T, E>` only cache successful results:
//!
//! ```rust
//! use memfn::{memoize_result, MemoizeConfig};
//!
//! let divide = memoize_result(
//!     |(a, b): (i32, i32)| {
//!         if b == 0 {
//!             Err("Division by zero".to_string())
//!         } else {
//!             Ok(a / b)
//!         }
//!     },
//!     MemoizeConfig::default(),
//! );
//!
//! // Ok results are cached
//! let _ = divide.call((10, 2));
//! assert!(divide.is_cached(&(10, 2)).unwrap());
//! // Err results are NOT cached
//! let _ = divide.call((10, 0));
//! assert!(!divide.is_cached(&(10, 0)).unwrap());
//! ```

pub use memfn_core::*;

/// Clears the store behind a memoized wrapper.
///
/// # Returns
///
/// `true` if the store was cleared, `false` if its store has no clear capability
///
/// # Examples
///
/// ```rust
/// use memfn::{clear, memoize, MemoizeConfig};
///
/// let square = memoize(|x: u32| x * x, MemoizeConfig::default());
/// square.call(3).unwrap();
///
/// assert!(clear(&square));
/// assert!(!square.is_cached(&3).unwrap());
/// ```
pub fn clear<M: Memo + ?Sized>(memo: &M) -> bool {
    registry::clear(memo.memo_id())
}

/// Clears a wrapper by id.
///
/// An id whose wrapper has been dropped, or was never issued, is a silent no-op.
///
/// # Returns
///
/// `true` if a live store was found and cleared, `false` otherwise
pub fn clear_id(id: MemoId) -> bool {
    registry::clear(id)
}

/// Clears every live wrapper registered under `name`.
///
/// Names come from the wrapped function, or from `MemoizeConfig::name`.
///
/// # Returns
///
/// The number of stores that were cleared
///
/// # Examples
///
/// ```rust
/// use memfn::{clear_by_name, memoize, MemoizeConfig};
///
/// let rates = memoize(|day: u32| day * 2, MemoizeConfig::default().name("exchange_rates"));
/// rates.call(1).unwrap();
///
/// assert_eq!(clear_by_name("exchange_rates"), 1);
/// ```
pub fn clear_by_name(name: &str) -> usize {
    registry::clear_by_name(name)
}
