use std::time::Duration;

use async_trait::async_trait;

use super::Result;

/// Trait for basic key-value cache operations.
///
/// Keys are normalized strings (see [`weather_key`](super::weather_key)).
#[async_trait]
pub trait Cache: Send + Sync {
    /// Gets a value from the cache by key. Expired values are `None`.
    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>>;

    /// Sets a value in the cache with an optional TTL.
    async fn set(&self, key: &str, value: &[u8], ttl: Option<Duration>) -> Result<()>;
}
