//! Axum extractors for authentication.

use axum::{
    extract::{FromRef, FromRequestParts},
    http::{header::AUTHORIZATION, request::Parts},
};
use ecogarden_core::advice::User;
use ecogarden_core::auth::AuthError as CoreError;

use crate::error::AuthError;
use crate::AuthState;

/// Extractor for the authenticated user. Rejects with 401 without a valid
/// bearer token.
pub struct CurrentUser(pub User);

impl<S> FromRequestParts<S> for CurrentUser
where
    AuthState: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = AuthError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let auth_state = AuthState::from_ref(state);

        let token = bearer_token(parts).ok_or(CoreError::MissingToken)?;
        let claims = auth_state.tokens.verify(token, auth_state.clock.now())?;

        // The account may have been deleted since the token was issued.
        let user = auth_state
            .users
            .get_user(claims.sub)
            .await?
            .ok_or(CoreError::UnknownUser)?;

        Ok(CurrentUser(user))
    }
}

fn bearer_token(parts: &Parts) -> Option<&str> {
    parts
        .headers
        .get(AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")
        .map(str::trim)
        .filter(|token| !token.is_empty())
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use axum::{body::Body, http::Request, http::StatusCode, routing::get, Router};
    use chrono::Utc;
    use ecogarden_core::storage::UserRepository;
    use tower::ServiceExt;

    use super::*;
    use crate::state::testing::{auth_state, FakeUsers};

    async fn whoami(CurrentUser(user): CurrentUser) -> String {
        user.email
    }

    fn app(state: AuthState) -> Router {
        Router::new().route("/me", get(whoami)).with_state(state)
    }

    async fn status_for(state: AuthState, header: Option<String>) -> StatusCode {
        let mut request = Request::builder().uri("/me");
        if let Some(value) = header {
            request = request.header(AUTHORIZATION, value);
        }
        app(state)
            .oneshot(request.body(Body::empty()).unwrap())
            .await
            .unwrap()
            .status()
    }

    #[tokio::test]
    async fn test_valid_token_resolves_user() {
        let users = Arc::new(FakeUsers::default());
        let user = User::new("ana@example.com", "Lille", "h");
        users.create_user(&user).await.unwrap();
        let state = auth_state(users);
        let (token, _) = state.tokens.issue(&user, Utc::now()).unwrap();

        let status = status_for(state, Some(format!("Bearer {token}"))).await;

        assert_eq!(status, StatusCode::OK);
    }

    #[tokio::test]
    async fn test_missing_or_malformed_header_is_unauthorized() {
        let state = auth_state(Arc::new(FakeUsers::default()));

        assert_eq!(status_for(state.clone(), None).await, StatusCode::UNAUTHORIZED);
        assert_eq!(
            status_for(state.clone(), Some("Basic abc".to_string())).await,
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            status_for(state, Some("Bearer ".to_string())).await,
            StatusCode::UNAUTHORIZED
        );
    }

    #[tokio::test]
    async fn test_token_for_deleted_user_is_unauthorized() {
        let users = Arc::new(FakeUsers::default());
        let user = User::new("gone@example.com", "Lille", "h");
        let state = auth_state(users);
        let (token, _) = state.tokens.issue(&user, Utc::now()).unwrap();

        let status = status_for(state, Some(format!("Bearer {token}"))).await;

        assert_eq!(status, StatusCode::UNAUTHORIZED);
    }
}
