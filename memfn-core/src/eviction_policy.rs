/// Policy a [`BoundedStore`](crate::BoundedStore) uses to pick a victim once
/// it holds more entries than its limit.
///
/// # Variants
///
/// * `FIFO` - **First In, First Out**
///   - The oldest written key is evicted
///   - Reads do NOT change a key's position
///
/// * `LRU` - **Least Recently Used** (default)
///   - The least recently read or written key is evicted
///   - Every `get` moves the key to the "most recent" position
///
/// * `Random` - **Random replacement**
///   - A uniformly random key is evicted
///   - No bookkeeping on reads
///
/// # Examples
///
/// ```
/// use memfn_core::EvictionPolicy;
///
/// assert_eq!(EvictionPolicy::default(), EvictionPolicy::LRU);
///
/// let policy: EvictionPolicy = "fifo".into();
/// assert_eq!(policy, EvictionPolicy::FIFO);
/// ```
///
/// | Policy | Eviction | Read  | Write |
/// |--------|----------|-------|-------|
/// | FIFO   | O(1)     | O(1)  | O(1)  |
/// | LRU    | O(1)     | O(n)  | O(n)  |
/// | Random | O(n)     | O(1)  | O(1)  |
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum EvictionPolicy {
    FIFO,
    #[default]
    LRU,
    Random,
}

impl EvictionPolicy {
    /// Returns true if reads reorder keys under this policy.
    pub fn tracks_reads(&self) -> bool {
        matches!(self, EvictionPolicy::LRU)
    }
}

/// Converts a string slice to an `EvictionPolicy`.
///
/// Matching is case-insensitive; unrecognized values fall back to LRU.
///
/// ```
/// use memfn_core::EvictionPolicy;
///
/// let random: EvictionPolicy = "Random".into();
/// assert_eq!(random, EvictionPolicy::Random);
///
/// let unknown: EvictionPolicy = "lfu".into();
/// assert_eq!(unknown, EvictionPolicy::LRU);
/// ```
impl From<&str> for EvictionPolicy {
    fn from(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "fifo" => EvictionPolicy::FIFO,
            "random" => EvictionPolicy::Random,
            _ => EvictionPolicy::LRU,
        }
    }
}
