//! Cache-aside weather lookup with per-city single-flight.

use std::sync::Arc;

use serde_json::Value;

use ecogarden_core::cache::{deserialize_payload, serialize_payload, weather_key, Cache};
use ecogarden_core::weather::{
    weather_request, HttpFetcher, ProviderSettings, WeatherError, WEATHER_CACHE_TTL,
};

use crate::locks::KeyedLocks;

/// Fetches current weather by city, caching successful payloads for an hour.
///
/// Concurrent misses for the same normalized city share one remote call:
/// the first caller fetches while the others wait on the key, then read the
/// payload it cached. Failures are never cached.
pub struct WeatherClient {
    cache: Arc<dyn Cache>,
    fetcher: Arc<dyn HttpFetcher>,
    settings: ProviderSettings,
    in_flight: KeyedLocks<String>,
}

impl WeatherClient {
    pub fn new(
        cache: Arc<dyn Cache>,
        fetcher: Arc<dyn HttpFetcher>,
        settings: ProviderSettings,
    ) -> Self {
        Self {
            cache,
            fetcher,
            settings,
            in_flight: KeyedLocks::new(),
        }
    }

    /// Returns the provider's JSON payload for `city`.
    pub async fn fetch_weather(&self, city: &str) -> Result<Value, WeatherError> {
        let city = city.trim();
        if city.is_empty() {
            return Err(WeatherError::InvalidCity);
        }

        let key = weather_key(city);
        if let Some(payload) = self.cached(&key).await {
            return Ok(payload);
        }

        let _guard = self.in_flight.lock(key.clone()).await;
        tracing::trace!(key = %key, in_flight = self.in_flight.len(), "Acquired weather key");
        // Another caller may have filled the key while we waited.
        if let Some(payload) = self.cached(&key).await {
            return Ok(payload);
        }

        let (url, query) = weather_request(&self.settings, city);
        tracing::debug!(city = %city, key = %key, "Fetching weather from provider");

        let response = self.fetcher.get_json(&url, &query).await.inspect_err(|e| {
            tracing::error!(
                city = %city,
                timed_out = e.timed_out,
                error = %e,
                "Weather provider unreachable"
            );
        })?;

        if !response.is_success() {
            tracing::warn!(city = %city, status = response.status, "Weather provider returned an error");
            return Err(WeatherError::Provider {
                status: response.status,
                body: response.body_text(),
            });
        }

        self.store(&key, &response.body).await;
        Ok(response.body)
    }

    async fn cached(&self, key: &str) -> Option<Value> {
        match self.cache.get(key).await {
            Ok(Some(bytes)) => match deserialize_payload(&bytes) {
                Ok(payload) => {
                    tracing::trace!(key = %key, "Cache hit for weather");
                    Some(payload)
                }
                Err(e) => {
                    tracing::warn!(key = %key, error = %e, "Unreadable cached weather, refetching");
                    None
                }
            },
            Ok(None) => {
                tracing::trace!(key = %key, "Cache miss for weather");
                None
            }
            Err(e) => {
                tracing::warn!(key = %key, error = %e, "Cache read failed, treating as miss");
                None
            }
        }
    }

    async fn store(&self, key: &str, payload: &Value) {
        let bytes = match serialize_payload(payload) {
            Ok(bytes) => bytes,
            Err(e) => {
                tracing::warn!(key = %key, error = %e, "Failed to serialize weather payload");
                return;
            }
        };

        if let Err(e) = self.cache.set(key, &bytes, Some(WEATHER_CACHE_TTL)).await {
            tracing::warn!(key = %key, error = %e, "Failed to cache weather payload");
        }
    }
}
