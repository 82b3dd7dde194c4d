//! Order-queue helpers shared by the stores.

use std::collections::VecDeque;

/// Moves a key to the back of the order queue (marks it as most recently used).
///
/// Does nothing if the key is not in the queue.
///
/// # Examples
///
/// ```
/// use std::collections::VecDeque;
/// use memfn_core::utils::move_key_to_end;
///
/// let mut order = VecDeque::from(vec![1, 2, 3]);
/// move_key_to_end(&mut order, &2);
/// assert_eq!(order, VecDeque::from(vec![1, 3, 2]));
///
/// move_key_to_end(&mut order, &9);
/// assert_eq!(order.len(), 3);
/// ```
pub fn move_key_to_end<K: PartialEq>(order: &mut VecDeque<K>, key: &K) {
    if let Some(pos) = order.iter().position(|k| k == key) {
        if let Some(k) = order.remove(pos) {
            order.push_back(k);
        }
    }
}

/// Removes a key from the order queue, returning true if it was present.
pub fn remove_key<K: PartialEq>(order: &mut VecDeque<K>, key: &K) -> bool {
    if let Some(pos) = order.iter().position(|k| k == key) {
        order.remove(pos);
        true
    } else {
        false
    }
}
