//! Account handlers.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use uuid::Uuid;

use ecogarden_auth::CurrentUser;
use ecogarden_core::advice::User;
use ecogarden_core::auth::{ensure_can_modify, AuthError};
use ecogarden_core::storage::RepositoryError;

use crate::{
    handlers::{error::MissingField, AppError},
    models::{required, RegisterUser, UpdateUser},
    state::AppState,
};

async fn load_user(state: &AppState, id: Uuid) -> Result<User, AppError> {
    state.user_repo.get_user(id).await?.ok_or_else(|| {
        RepositoryError::NotFound {
            entity_type: "User",
            id: id.to_string(),
        }
        .into()
    })
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Register an account (POST /api/users). No token required.
pub async fn register_user(
    State(state): State<AppState>,
    Json(request): Json<RegisterUser>,
) -> Result<impl IntoResponse, AppError> {
    let email = required(&request.email, "email").map_err(MissingField)?;
    required(&request.password, "password").map_err(MissingField)?;
    let city = required(&request.city, "city").map_err(MissingField)?;

    let password = request.password.as_deref().unwrap_or_default();
    let hash = state.auth.hasher.hash(password)?;

    let mut user = User::new(email.to_lowercase(), city, hash);
    user.postal_code = non_blank(request.postal_code);

    state.user_repo.create_user(&user).await?;
    tracing::info!(user_id = %user.id, "User registered");

    Ok((StatusCode::CREATED, Json(user)))
}

/// Partially update an account (PUT /api/users/{id}).
///
/// Users may edit themselves; admins anyone. Only admins may change roles.
pub async fn update_user(
    CurrentUser(actor): CurrentUser,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(request): Json<UpdateUser>,
) -> Result<Json<User>, AppError> {
    let mut user = load_user(&state, id).await?;
    ensure_can_modify(&actor, user.id)?;

    if request.role.is_some() && !actor.role.is_admin() {
        return Err(AuthError::Forbidden.into());
    }

    if request.email.is_some() {
        user.email = required(&request.email, "email")
            .map_err(MissingField)?
            .to_lowercase();
    }
    if request.city.is_some() {
        user.city = required(&request.city, "city")
            .map_err(MissingField)?
            .to_string();
    }
    if let Some(password) = request.password.as_deref() {
        required(&request.password, "password").map_err(MissingField)?;
        user.password_hash = state.auth.hasher.hash(password)?;
    }
    if request.postal_code.is_some() {
        user.postal_code = non_blank(request.postal_code);
    }
    if let Some(role) = request.role {
        user.role = role;
    }
    user.updated_at = Some(state.clock.now());

    state.user_repo.update_user(&user).await?;
    tracing::info!(user_id = %user.id, actor_id = %actor.id, "User updated");

    Ok(Json(user))
}

/// Delete an account and everything it authored (DELETE /api/users/{id}).
pub async fn delete_user(
    CurrentUser(actor): CurrentUser,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    let user = load_user(&state, id).await?;
    ensure_can_modify(&actor, user.id)?;

    state.user_repo.delete_user(id).await?;
    tracing::info!(user_id = %id, actor_id = %actor.id, "User deleted");

    Ok(StatusCode::NO_CONTENT)
}
