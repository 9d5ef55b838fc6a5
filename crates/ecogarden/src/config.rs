use std::{env, time::Duration};

use ecogarden_core::advice::YearRange;
use ecogarden_core::weather::ProviderSettings;

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    /// Maximum number of cache entries (default: 10,000)
    pub cache_max_entries: usize,
    /// Path to SQLite database file (default: "ecogarden.db")
    #[allow(dead_code)]
    pub sqlite_path: String,
    /// Redis connection URL (default: "redis://localhost:6379")
    /// Note: Only used when the `redis` feature is enabled.
    #[allow(dead_code)]
    pub redis_url: String,
    /// Weather provider connection settings.
    pub weather: ProviderSettings,
    /// Weather request timeout in seconds (default: 10)
    pub weather_timeout_seconds: u64,
    /// Years accepted in advice periods (default: 1970..=2100)
    pub years: YearRange,
}

fn parsed<T: std::str::FromStr>(lookup: &impl Fn(&str) -> Option<String>, key: &str) -> Option<T> {
    lookup(key).and_then(|v| v.trim().parse().ok())
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// Environment variables:
    /// - `CACHE_MAX_ENTRIES` - Maximum cache entries (default: 10,000)
    /// - `SQLITE_PATH` - SQLite database path (default: "ecogarden.db")
    /// - `REDIS_URL` - Redis connection URL (default: "redis://localhost:6379")
    /// - `WEATHER_API_KEY` - Weather provider API key (default: empty)
    /// - `WEATHER_BASE_URL` - Provider base URL (default: OpenWeatherMap 2.5)
    /// - `WEATHER_LANG` - Description language (default: "fr")
    /// - `WEATHER_UNITS` - Unit system (default: "metric")
    /// - `WEATHER_TIMEOUT_SECONDS` - Provider timeout (default: 10)
    /// - `ADVICE_YEAR_MIN` / `ADVICE_YEAR_MAX` - Accepted years (default: 1970 / 2100)
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds the configuration from an arbitrary variable source.
    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let provider_defaults = ProviderSettings::default();
        let mut years = YearRange::new(
            parsed(&lookup, "ADVICE_YEAR_MIN").unwrap_or(YearRange::DEFAULT.min),
            parsed(&lookup, "ADVICE_YEAR_MAX").unwrap_or(YearRange::DEFAULT.max),
        );
        if years.min > years.max {
            tracing::warn!(
                min = years.min,
                max = years.max,
                "ADVICE_YEAR_MIN is above ADVICE_YEAR_MAX, using defaults"
            );
            years = YearRange::DEFAULT;
        }

        Self {
            cache_max_entries: parsed(&lookup, "CACHE_MAX_ENTRIES").unwrap_or(10_000),
            sqlite_path: lookup("SQLITE_PATH").unwrap_or_else(|| "ecogarden.db".to_string()),
            redis_url: lookup("REDIS_URL")
                .unwrap_or_else(|| "redis://localhost:6379".to_string()),
            weather: ProviderSettings {
                base_url: lookup("WEATHER_BASE_URL").unwrap_or(provider_defaults.base_url),
                api_key: lookup("WEATHER_API_KEY").unwrap_or(provider_defaults.api_key),
                lang: lookup("WEATHER_LANG").unwrap_or(provider_defaults.lang),
                units: lookup("WEATHER_UNITS").unwrap_or(provider_defaults.units),
            },
            weather_timeout_seconds: parsed(&lookup, "WEATHER_TIMEOUT_SECONDS").unwrap_or(10),
            years,
        }
    }

    /// Get the weather request timeout as a Duration.
    pub fn weather_timeout(&self) -> Duration {
        Duration::from_secs(self.weather_timeout_seconds)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::from_env()
    }
}
