//! # Cache Keys
//!
//! Every invocation of a memoized function is reduced to a key before the
//! store is consulted. The default derivation keeps single scalar arguments
//! as typed scalars and serializes everything else structurally:
//!
//! | Arguments         | Key                               |
//! |-------------------|-----------------------------------|
//! | `(1,)`            | `CacheKey::Number("1")`           |
//! | `("1",)`          | `CacheKey::String("1")`           |
//! | `(None::<u8>,)`   | `CacheKey::Null`                  |
//! | `(1, 2)`          | `CacheKey::Structural("[1,2]")`   |
//! | `(vec![1],)`      | `CacheKey::Structural("[[1]]")`   |
//! | `vec![1]`         | `CacheKey::Structural("[1]")`     |
//! | `f64::INFINITY`   | `CacheKey::Number("inf")`         |
//!
//! Two argument lists that serialize to the same JSON collapse onto the same
//! key, even when they are distinct values in memory.

use crate::error::{KeyError, KeyResult};
use crate::shape::{self, Outer};
use serde::Serialize;
use serde_json::Value;
use std::sync::Arc;

/// Function deriving a key of type `K` from the argument list `A`.
pub type KeyFn<A, K> = Arc<dyn Fn(&A) -> KeyResult<K> + Send + Sync>;

/// Key produced by [`default_cache_key`].
///
/// Scalar variants keep their type, so `1` and `"1"` never share a slot.
/// Composite argument lists land in `Structural` as their JSON text.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum CacheKey {
    Null,
    Bool(bool),
    Number(String),
    String(String),
    Structural(String),
}

impl CacheKey {
    /// Returns true if this key was built from a single scalar argument.
    pub fn is_scalar(&self) -> bool {
        !matches!(self, CacheKey::Structural(_))
    }

    fn from_scalar(value: &Value) -> Option<Self> {
        match value {
            Value::Null => Some(CacheKey::Null),
            Value::Bool(b) => Some(CacheKey::Bool(*b)),
            Value::Number(n) => Some(CacheKey::Number(n.to_string())),
            Value::String(s) => Some(CacheKey::String(s.clone())),
            Value::Array(_) | Value::Object(_) => None,
        }
    }

    fn non_finite(v: f64) -> Self {
        let text = if v.is_nan() {
            "NaN"
        } else if v.is_sign_positive() {
            "inf"
        } else {
            "-inf"
        };
        CacheKey::Number(text.to_string())
    }
}

/// Derives the default cache key for an argument list.
///
/// A lone scalar, given bare or as a 1-tuple, keeps its type. Non-finite
/// floats get their own `Number` spellings (`NaN`, `inf`, `-inf`), which JSON
/// number text can never produce.
///
/// # Errors
///
/// Returns [`KeyError::NotSerializable`] when `serde_json` rejects the
/// arguments (e.g. a map whose keys are not strings), or when a non-finite
/// float sits inside a composite argument, where JSON would write it as
/// `null`.
///
/// # Examples
///
/// ```
/// use memfn_core::{default_cache_key, CacheKey};
///
/// assert_eq!(default_cache_key(&(1,)).unwrap(), CacheKey::Number("1".into()));
/// assert_eq!(default_cache_key(&("1",)).unwrap(), CacheKey::String("1".into()));
/// assert_eq!(default_cache_key(&f64::NAN).unwrap(), CacheKey::Number("NaN".into()));
/// assert_eq!(
///     default_cache_key(&(1, "a")).unwrap(),
///     CacheKey::Structural(r#"[1,"a"]"#.into())
/// );
/// assert_eq!(
///     default_cache_key(&vec![1]).unwrap(),
///     CacheKey::Structural("[1]".into())
/// );
/// ```
pub fn default_cache_key<A: Serialize + ?Sized>(args: &A) -> KeyResult<CacheKey> {
    let outline = shape::scan(args)?;

    if let Some(v) = outline.lone_non_finite() {
        return Ok(CacheKey::non_finite(v));
    }
    if outline.buried_non_finite {
        return Err(KeyError::NotSerializable {
            reason: "non-finite float inside a composite argument".to_string(),
        });
    }

    let value = serde_json::to_value(args)?;

    if let Some(key) = CacheKey::from_scalar(&value) {
        return Ok(key);
    }

    // Only a real 1-tuple is unwrapped; a one-element Vec stays structural
    if outline.outer == Outer::Single {
        if let Value::Array(items) = &value {
            if let [single] = items.as_slice() {
                if let Some(key) = CacheKey::from_scalar(single) {
                    return Ok(key);
                }
            }
        }
    }

    Ok(CacheKey::Structural(serde_json::to_string(&value)?))
}

/// Wraps [`default_cache_key`] as a shareable [`KeyFn`].
pub fn default_key_fn<A: Serialize + ?Sized + 'static>() -> KeyFn<A, CacheKey> {
    Arc::new(|args: &A| default_cache_key(args))
}

/// Lifts an infallible key function into a [`KeyFn`].
pub fn key_fn<A, K, F>(f: F) -> KeyFn<A, K>
where
    A: ?Sized + 'static,
    K: 'static,
    F: Fn(&A) -> K + Send + Sync + 'static,
{
    Arc::new(move |args: &A| Ok::<K, KeyError>(f(args)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Serialize;
    use std::collections::HashMap;

    #[derive(Serialize)]
    struct Point {
        x: i32,
        y: i32,
    }

    #[test]
    fn test_number_and_string_are_distinct() {
        let number = default_cache_key(&(1,)).unwrap();
        let string = default_cache_key(&("1",)).unwrap();
        assert_ne!(number, string);
        assert!(number.is_scalar());
        assert!(string.is_scalar());
    }

    #[test]
    fn test_bare_scalar_is_single_argument() {
        assert_eq!(default_cache_key(&42u32).unwrap(), default_cache_key(&(42u32,)).unwrap());
        assert_eq!(default_cache_key(&true).unwrap(), CacheKey::Bool(true));
    }

    #[test]
    fn test_none_is_null() {
        assert_eq!(default_cache_key(&(None::<u8>,)).unwrap(), CacheKey::Null);
        assert_eq!(default_cache_key(&()).unwrap(), CacheKey::Null);
    }

    #[test]
    fn test_multiple_arguments_are_structural_and_ordered() {
        let ab = default_cache_key(&(1, 2)).unwrap();
        let ba = default_cache_key(&(2, 1)).unwrap();
        assert_eq!(ab, CacheKey::Structural("[1,2]".to_string()));
        assert_ne!(ab, ba);
    }

    #[test]
    fn test_equal_structures_collapse() {
        let a = default_cache_key(&(Point { x: 1, y: 2 },)).unwrap();
        let b = default_cache_key(&(Point { x: 1, y: 2 },)).unwrap();
        let c = default_cache_key(&(Point { x: 2, y: 1 },)).unwrap();
        assert_eq!(a, b);
        assert_ne!(a, c);
        assert!(!a.is_scalar());
    }

    #[test]
    fn test_single_sequence_argument_is_structural() {
        let key = default_cache_key(&(vec![7],)).unwrap();
        assert_eq!(key, CacheKey::Structural("[[7]]".to_string()));
    }

    #[test]
    fn test_bare_sequence_is_not_unwrapped() {
        assert_eq!(
            default_cache_key(&vec![7]).unwrap(),
            CacheKey::Structural("[7]".to_string())
        );
        assert_ne!(default_cache_key(&vec![7]).unwrap(), default_cache_key(&7).unwrap());

        let value = serde_json::json!([7]);
        assert_eq!(
            default_cache_key(&value).unwrap(),
            CacheKey::Structural("[7]".to_string())
        );
    }

    #[test]
    fn test_untagged_scalar_and_sequence_are_distinct() {
        #[derive(Serialize)]
        #[serde(untagged)]
        enum Arg {
            One(u32),
            Many(Vec<u32>),
        }

        let one = default_cache_key(&Arg::One(7)).unwrap();
        let many = default_cache_key(&Arg::Many(vec![7])).unwrap();
        assert_eq!(one, CacheKey::Number("7".to_string()));
        assert_eq!(many, CacheKey::Structural("[7]".to_string()));
    }

    #[test]
    fn test_non_finite_floats_get_own_keys() {
        let nan = default_cache_key(&f64::NAN).unwrap();
        let inf = default_cache_key(&f64::INFINITY).unwrap();
        let neg_inf = default_cache_key(&(f64::NEG_INFINITY,)).unwrap();
        let null = default_cache_key(&None::<f64>).unwrap();

        assert_eq!(nan, CacheKey::Number("NaN".to_string()));
        assert_eq!(inf, CacheKey::Number("inf".to_string()));
        assert_eq!(neg_inf, CacheKey::Number("-inf".to_string()));
        assert_eq!(null, CacheKey::Null);
        assert_eq!(default_cache_key(&f32::NAN).unwrap(), nan);
    }

    #[test]
    fn test_non_finite_inside_composite_is_rejected() {
        let err = default_cache_key(&(f64::NAN, 1)).unwrap_err();
        assert!(matches!(err, KeyError::NotSerializable { .. }));

        let err = default_cache_key(&(vec![1.0, f64::INFINITY],)).unwrap_err();
        assert!(matches!(err, KeyError::NotSerializable { .. }));
    }

    #[test]
    fn test_signed_zero_is_distinct() {
        let pos = default_cache_key(&0.0f64).unwrap();
        let neg = default_cache_key(&-0.0f64).unwrap();
        assert_ne!(pos, neg);
        assert_ne!(pos, default_cache_key(&0u32).unwrap());
    }

    #[test]
    fn test_non_string_map_keys_are_rejected() {
        let mut map = HashMap::new();
        map.insert((1u8, 2u8), "pair");

        let err = default_cache_key(&(map,)).unwrap_err();
        assert!(matches!(err, KeyError::NotSerializable { .. }));
    }

    #[test]
    fn test_custom_key_fn() {
        let f = key_fn(|_: &(u32,)| "x");
        assert_eq!(f(&(1,)).unwrap(), "x");
        assert_eq!(f(&(2,)).unwrap(), "x");
    }
}
