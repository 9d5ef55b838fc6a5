//! HS256 token issuance and verification.
//!
//! Expiry is checked against the injected clock rather than by
//! `jsonwebtoken`, so tests can pin time.

use std::collections::HashSet;

use chrono::{DateTime, Duration, Utc};
use ecogarden_core::advice::User;
use ecogarden_core::auth::{AuthError as CoreError, Claims};
use jsonwebtoken::{decode, encode, errors::ErrorKind, Algorithm, DecodingKey, EncodingKey, Header, Validation};

use crate::config::AuthConfig;
use crate::error::AuthError;

/// Signs and verifies access tokens.
pub struct TokenService {
    encoding: EncodingKey,
    decoding: DecodingKey,
    ttl: Duration,
}

impl TokenService {
    pub fn new(config: &AuthConfig) -> Self {
        let secret = config.jwt_secret.as_bytes();
        Self {
            encoding: EncodingKey::from_secret(secret),
            decoding: DecodingKey::from_secret(secret),
            ttl: Duration::from_std(config.token_ttl).unwrap_or_else(|_| Duration::hours(1)),
        }
    }

    /// Issues a token for `user`, valid from `now` for the configured TTL.
    pub fn issue(&self, user: &User, now: DateTime<Utc>) -> Result<(String, Claims), AuthError> {
        let claims = Claims::for_user(user, now, self.ttl);
        let token = encode(&Header::new(Algorithm::HS256), &claims, &self.encoding)
            .map_err(|e| AuthError::Signing(e.to_string()))?;
        Ok((token, claims))
    }

    /// Verifies the signature of `token` and that it is not expired at `now`.
    pub fn verify(&self, token: &str, now: DateTime<Utc>) -> Result<Claims, CoreError> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = false;
        validation.validate_nbf = false;
        validation.required_spec_claims = HashSet::from(["exp".to_string()]);

        let claims = decode::<Claims>(token, &self.decoding, &validation)
            .map_err(|e| match e.kind() {
                ErrorKind::InvalidSignature => {
                    CoreError::InvalidToken("signature is invalid".to_string())
                }
                _ => CoreError::InvalidToken(e.to_string()),
            })?
            .claims;

        if claims.is_expired(now) {
            return Err(CoreError::TokenExpired);
        }
        Ok(claims)
    }
}
