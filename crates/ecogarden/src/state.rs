//! Application state with repository-based storage.
//!
//! This module defines the shared application state that is passed to all
//! request handlers. It uses repository trait objects for storage abstraction
//! and supports different backend combinations via feature flags.

use std::sync::Arc;

use ecogarden_auth::{AuthConfig, AuthState, Argon2PasswordHasher};
use ecogarden_core::advice::YearRange;
use ecogarden_core::cache::Cache;
use ecogarden_core::clock::{Clock, SystemClock};
use ecogarden_core::storage::{AdviceRepository, UserRepository};
use ecogarden_core::weather::HttpFetcher;

use crate::config::Config;
use crate::http_client::ReqwestFetcher;
use crate::services::{PeriodReconciler, WeatherClient};

/// Shared application state.
///
/// This is cloned for each request handler and contains shared resources
/// including repository trait objects for database access.
#[derive(Clone)]
pub struct AppState {
    pub advice_repo: Arc<dyn AdviceRepository>,
    pub user_repo: Arc<dyn UserRepository>,
    /// Applies period directives, one advice at a time.
    pub reconciler: Arc<PeriodReconciler>,
    /// Cache-aside weather lookups.
    pub weather: Arc<WeatherClient>,
    pub clock: Arc<dyn Clock>,
    pub auth: AuthState,
    /// Years accepted in advice periods.
    pub years: YearRange,
}

impl AsRef<AuthState> for AppState {
    fn as_ref(&self) -> &AuthState {
        &self.auth
    }
}

impl AppState {
    /// Wires the services around the given backends.
    fn build<R>(
        repo: Arc<R>,
        cache: Arc<dyn Cache>,
        fetcher: Arc<dyn HttpFetcher>,
        clock: Arc<dyn Clock>,
        auth_config: AuthConfig,
        config: &Config,
    ) -> Self
    where
        R: AdviceRepository + UserRepository + 'static,
    {
        let advice_repo: Arc<dyn AdviceRepository> = repo.clone();
        let user_repo: Arc<dyn UserRepository> = repo;

        let reconciler = Arc::new(PeriodReconciler::new(
            advice_repo.clone(),
            clock.clone(),
            config.years,
        ));
        let weather = Arc::new(WeatherClient::new(cache, fetcher, config.weather.clone()));
        let auth = AuthState::new(
            auth_config,
            user_repo.clone(),
            Arc::new(Argon2PasswordHasher),
            clock.clone(),
        );

        Self {
            advice_repo,
            user_repo,
            reconciler,
            weather,
            clock,
            auth,
            years: config.years,
        }
    }

    fn fetcher(config: &Config) -> Result<Arc<dyn HttpFetcher>, anyhow::Error> {
        Ok(Arc::new(ReqwestFetcher::new(config.weather_timeout())?))
    }
}

// ============================================================================
// Factory functions for different backend combinations
// ============================================================================

#[cfg(all(feature = "inmemory", feature = "memory"))]
mod inmemory_memory {
    use super::*;
    use crate::cache::memory::MemoryCache;
    use crate::storage::InMemoryRepository;

    impl AppState {
        /// Creates AppState with in-memory storage and in-memory cache.
        pub async fn new(config: &Config, auth_config: AuthConfig) -> Result<Self, anyhow::Error> {
            Ok(Self::build(
                Arc::new(InMemoryRepository::new()),
                Arc::new(MemoryCache::new(config.cache_max_entries)),
                Self::fetcher(config)?,
                Arc::new(SystemClock),
                auth_config,
                config,
            ))
        }
    }
}

#[cfg(all(feature = "inmemory", feature = "redis"))]
mod inmemory_redis {
    use super::*;
    use crate::cache::redis_impl::RedisCache;
    use crate::storage::InMemoryRepository;

    impl AppState {
        /// Creates AppState with in-memory storage and Redis cache.
        pub async fn new(config: &Config, auth_config: AuthConfig) -> Result<Self, anyhow::Error> {
            Ok(Self::build(
                Arc::new(InMemoryRepository::new()),
                Arc::new(RedisCache::new(&config.redis_url).await?),
                Self::fetcher(config)?,
                Arc::new(SystemClock),
                auth_config,
                config,
            ))
        }
    }
}

#[cfg(all(feature = "sqlite", feature = "memory"))]
mod sqlite_memory {
    use super::*;
    use crate::cache::memory::MemoryCache;
    use crate::storage::SqliteRepository;

    impl AppState {
        /// Creates AppState with SQLite storage and in-memory cache.
        pub async fn new(config: &Config, auth_config: AuthConfig) -> Result<Self, anyhow::Error> {
            Ok(Self::build(
                Arc::new(SqliteRepository::new(&config.sqlite_path).await?),
                Arc::new(MemoryCache::new(config.cache_max_entries)),
                Self::fetcher(config)?,
                Arc::new(SystemClock),
                auth_config,
                config,
            ))
        }
    }
}

#[cfg(all(feature = "sqlite", feature = "redis"))]
mod sqlite_redis {
    use super::*;
    use crate::cache::redis_impl::RedisCache;
    use crate::storage::SqliteRepository;

    impl AppState {
        /// Creates AppState with SQLite storage and Redis cache.
        pub async fn new(config: &Config, auth_config: AuthConfig) -> Result<Self, anyhow::Error> {
            Ok(Self::build(
                Arc::new(SqliteRepository::new(&config.sqlite_path).await?),
                Arc::new(RedisCache::new(&config.redis_url).await?),
                Self::fetcher(config)?,
                Arc::new(SystemClock),
                auth_config,
                config,
            ))
        }
    }
}
