mod error;
mod keys;
mod serialization;
mod traits;

pub use error::{CacheError, Result};
pub use keys::{normalize_key, weather_key, KEY_PLACEHOLDER, WEATHER_KEY_PREFIX};
pub use serialization::{deserialize_payload, serialize_payload};
pub use traits::Cache;
