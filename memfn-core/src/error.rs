use thiserror::Error;

/// Errors produced while deriving a cache key from an argument list.
///
/// This is the only error the memoization layer raises on its own. Errors
/// coming from the wrapped function are never wrapped; they travel inside
/// its return value untouched.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum KeyError {
    /// The arguments could not be turned into a structural key
    #[error("arguments are not serializable into a cache key: {reason}")]
    NotSerializable { reason: String },
}

impl From<serde_json::Error> for KeyError {
    fn from(err: serde_json::Error) -> Self {
        KeyError::NotSerializable {
            reason: err.to_string(),
        }
    }
}

// Lets `KeyError` double as the error of the crate's own serializers
impl serde::ser::Error for KeyError {
    fn custom<T: std::fmt::Display>(msg: T) -> Self {
        KeyError::NotSerializable {
            reason: msg.to_string(),
        }
    }
}

pub type KeyResult<T> = Result<T, KeyError>;
