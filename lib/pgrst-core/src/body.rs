//! Body serialization utilities.

use bytes::Bytes;

use crate::Result;

/// MIME type of every request body sent to PostgREST.
pub const JSON_CONTENT_TYPE: &str = "application/json";

/// Serialize a value to JSON bytes.
///
/// # Errors
///
/// Returns an error if JSON serialization fails.
///
/// # Example
///
/// ```
/// use pgrst_core::to_json;
/// use serde::Serialize;
///
/// #[derive(Serialize)]
/// struct Todo { task: String }
///
/// let todo = Todo { task: "water plants".to_string() };
/// let bytes = to_json(&todo).expect("serialize");
/// assert_eq!(bytes.as_ref(), br#"{"task":"water plants"}"#);
/// ```
pub fn to_json<T: serde::Serialize + ?Sized>(value: &T) -> Result<Bytes> {
    serde_json::to_vec(value)
        .map(Bytes::from)
        .map_err(Into::into)
}

/// Deserialize JSON bytes to a value with path-aware error messages.
///
/// Uses `serde_path_to_error` to provide detailed error messages that include
/// the exact path to the field that failed to deserialize.
///
/// # Errors
///
/// Returns [`crate::Error::Decode`] if JSON deserialization fails, with the
/// path to the problematic field (e.g., `[0].owner.id`).
///
/// # Example
///
/// ```
/// use pgrst_core::from_json;
/// use serde::Deserialize;
///
/// #[derive(Debug, PartialEq, Deserialize)]
/// struct Todo { id: u64 }
///
/// let todos: Vec<Todo> = from_json(br#"[{"id":1}]"#).expect("deserialize");
/// assert_eq!(todos, vec![Todo { id: 1 }]);
/// ```
pub fn from_json<T: serde::de::DeserializeOwned>(bytes: &[u8]) -> Result<T> {
    let mut deserializer = serde_json::Deserializer::from_slice(bytes);
    serde_path_to_error::deserialize(&mut deserializer)
        .map_err(|e| crate::Error::decode(e.path().to_string(), e.inner().to_string()))
}
