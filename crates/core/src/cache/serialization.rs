//! Pure functions for converting weather payloads to and from cache bytes.
//!
//! Payloads are stored as the provider's raw JSON.

use serde_json::Value;

use super::CacheError;

/// Serializes a weather payload to JSON bytes.
pub fn serialize_payload(payload: &Value) -> Result<Vec<u8>, CacheError> {
    serde_json::to_vec(payload).map_err(|e| CacheError::Serialization(e.to_string()))
}

/// Deserializes JSON bytes to a weather payload.
pub fn deserialize_payload(bytes: &[u8]) -> Result<Value, CacheError> {
    serde_json::from_slice(bytes).map_err(|e| CacheError::Serialization(e.to_string()))
}
