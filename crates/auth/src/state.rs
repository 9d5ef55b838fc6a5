//! Application state for auth.

use std::sync::Arc;

use axum::extract::FromRef;
use ecogarden_core::auth::PasswordHasher;
use ecogarden_core::clock::Clock;
use ecogarden_core::storage::UserRepository;

use crate::config::AuthConfig;
use crate::tokens::TokenService;

/// Shared state for auth handlers and extractors.
#[derive(Clone)]
pub struct AuthState {
    pub config: AuthConfig,
    pub tokens: Arc<TokenService>,
    pub users: Arc<dyn UserRepository>,
    pub hasher: Arc<dyn PasswordHasher>,
    pub clock: Arc<dyn Clock>,
}

impl AuthState {
    pub fn new(
        config: AuthConfig,
        users: Arc<dyn UserRepository>,
        hasher: Arc<dyn PasswordHasher>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        let tokens = Arc::new(TokenService::new(&config));
        Self {
            config,
            tokens,
            users,
            hasher,
            clock,
        }
    }
}

/// Allows AuthState to be extracted from a parent state.
impl<S> FromRef<S> for AuthState
where
    S: AsRef<AuthState>,
{
    fn from_ref(state: &S) -> Self {
        state.as_ref().clone()
    }
}
