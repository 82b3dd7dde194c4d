use std::time::{Duration, Instant};

/// A committed result together with its expiry deadline.
///
/// Entries are always written whole: a miss either produces a complete
/// `CacheEntry` or no write at all.
///
/// # Fields
///
/// * `data` - The cached result (for async memoizers, the shared pending handle)
/// * `expires_at` - Deadline after which the entry is stale; `None` never expires
///
/// # Examples
///
/// ```
/// use memfn_core::CacheEntry;
/// use std::time::{Duration, Instant};
///
/// let entry = CacheEntry::new(42, Some(Duration::from_secs(60)));
/// assert_eq!(entry.data, 42);
/// assert!(entry.is_fresh(Instant::now()));
///
/// let forever = CacheEntry::new("data", None);
/// assert!(forever.expires_at.is_none());
/// ```
#[derive(Clone, Debug)]
pub struct CacheEntry<R> {
    pub data: R,
    pub expires_at: Option<Instant>,
}

impl<R> CacheEntry<R> {
    /// Creates an entry stamped at the current instant.
    ///
    /// The deadline is `now + max_age`; without a `max_age` the entry never expires.
    pub fn new(data: R, max_age: Option<Duration>) -> Self {
        Self::stamped(data, max_age, Instant::now())
    }

    /// Creates an entry as if it had been written at `now`.
    pub fn stamped(data: R, max_age: Option<Duration>, now: Instant) -> Self {
        Self {
            data,
            expires_at: max_age.map(|age| now + age),
        }
    }

    /// Returns true while `now` is strictly before the deadline.
    ///
    /// # Examples
    ///
    /// ```
    /// use memfn_core::CacheEntry;
    /// use std::time::{Duration, Instant};
    ///
    /// let written = Instant::now();
    /// let entry = CacheEntry::stamped(1, Some(Duration::from_millis(50)), written);
    ///
    /// assert!(entry.is_fresh(written + Duration::from_millis(10)));
    /// assert!(!entry.is_fresh(written + Duration::from_millis(50)));
    /// assert!(!entry.is_fresh(written + Duration::from_millis(100)));
    /// ```
    pub fn is_fresh(&self, now: Instant) -> bool {
        self.expires_at.map_or(true, |deadline| now < deadline)
    }
}
