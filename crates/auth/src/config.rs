use std::time::Duration;

/// Default token lifetime: one hour.
const DEFAULT_TOKEN_TTL_SECS: u64 = 3600;

/// Auth configuration.
#[derive(Debug, Clone)]
pub struct AuthConfig {
    /// HMAC secret used to sign tokens.
    pub jwt_secret: String,
    pub token_ttl: Duration,
}

impl AuthConfig {
    pub fn new(jwt_secret: impl Into<String>, token_ttl: Duration) -> Self {
        Self {
            jwt_secret: jwt_secret.into(),
            token_ttl,
        }
    }

    /// Load from environment variables.
    ///
    /// # Environment Variables
    ///
    /// - `JWT_SECRET`: HMAC signing secret (required)
    /// - `JWT_TTL_SECONDS`: Token lifetime in seconds (default: 3600)
    ///
    /// # Errors
    ///
    /// Returns an error if `JWT_SECRET` is unset.
    pub fn from_env() -> Result<Self, std::env::VarError> {
        let jwt_secret = std::env::var("JWT_SECRET")?;

        let token_ttl = std::env::var("JWT_TTL_SECONDS")
            .ok()
            .and_then(|s| s.parse::<u64>().ok())
            .map(Duration::from_secs)
            .unwrap_or(Duration::from_secs(DEFAULT_TOKEN_TTL_SECS));

        Ok(Self {
            jwt_secret,
            token_ttl,
        })
    }
}
