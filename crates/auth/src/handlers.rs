//! HTTP handlers for auth routes.

use axum::{extract::State, routing::post, Json, Router};
use ecogarden_core::auth::AuthError as CoreError;
use serde::{Deserialize, Serialize};

use crate::error::AuthError;
use crate::AuthState;

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct LoginResponse {
    pub token: String,
    pub email: String,
    /// Token lifetime in seconds.
    pub expires_in: i64,
}

/// Creates the auth router.
///
/// Routes:
/// - `POST /api/auth/login` - Exchange credentials for a bearer token
pub fn auth_routes() -> Router<AuthState> {
    Router::new().route("/api/auth/login", post(login))
}

async fn login(
    State(state): State<AuthState>,
    Json(request): Json<LoginRequest>,
) -> Result<Json<LoginResponse>, AuthError> {
    let email = request.email.trim().to_lowercase();

    let user = match state.users.get_user_by_email(&email).await? {
        Some(user) if state.hasher.verify(&request.password, &user.password_hash) => user,
        _ => {
            tracing::debug!(email = %email, "Rejected login");
            return Err(CoreError::InvalidCredentials.into());
        }
    };

    let (token, claims) = state.tokens.issue(&user, state.clock.now())?;
    tracing::info!(user_id = %user.id, "User logged in");

    Ok(Json(LoginResponse {
        token,
        email: user.email,
        expires_in: claims.lifetime_secs(),
    }))
}
