//! Advice handlers.
//!
//! Every route requires a bearer token. Updates and deletions are limited to
//! the author and admins.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use uuid::Uuid;

use ecogarden_auth::CurrentUser;
use ecogarden_core::advice::{
    validate_period_query, Advice, CreateAdviceRequest, MonthYear, UpdateAdviceRequest,
};
use ecogarden_core::auth::ensure_can_modify;
use ecogarden_core::storage::RepositoryError;

use crate::{handlers::AppError, models::UpdateAdviceResponse, state::AppState};

async fn load_advice(state: &AppState, id: Uuid) -> Result<Advice, AppError> {
    state
        .advice_repo
        .get_advice(id)
        .await?
        .ok_or_else(|| {
            RepositoryError::NotFound {
                entity_type: "Advice",
                id: id.to_string(),
            }
            .into()
        })
}

// ============================================================================
// Listing
// ============================================================================

/// List advice for the current month (GET /api/advice).
///
/// An empty month is an empty list, not an error.
pub async fn list_current_advice(
    _user: CurrentUser,
    State(state): State<AppState>,
) -> Result<Json<Vec<Advice>>, AppError> {
    let period = MonthYear::new(state.clock.current_month(), state.clock.current_year());
    let advice = state.advice_repo.list_advice_for_period(period).await?;
    Ok(Json(advice))
}

/// List advice for a month of the current year (GET /api/advice/{month}).
pub async fn list_advice_for_month(
    _user: CurrentUser,
    State(state): State<AppState>,
    Path(month): Path<i64>,
) -> Result<Response, AppError> {
    list_for_period(&state, month, None).await
}

/// List advice for a month and year (GET /api/advice/{month}/{year}).
pub async fn list_advice_for_month_year(
    _user: CurrentUser,
    State(state): State<AppState>,
    Path((month, year)): Path<(i64, i64)>,
) -> Result<Response, AppError> {
    list_for_period(&state, month, Some(year)).await
}

async fn list_for_period(
    state: &AppState,
    month: i64,
    year: Option<i64>,
) -> Result<Response, AppError> {
    let period = validate_period_query(month, year, state.clock.current_year(), state.years)?;
    let advice = state.advice_repo.list_advice_for_period(period).await?;

    if advice.is_empty() {
        return Err(RepositoryError::NotFound {
            entity_type: "Advice",
            id: format!("period {period}"),
        }
        .into());
    }

    Ok(Json(advice).into_response())
}

// ============================================================================
// Mutations
// ============================================================================

/// Create an advice (POST /api/advice).
pub async fn create_advice(
    CurrentUser(user): CurrentUser,
    State(state): State<AppState>,
    Json(request): Json<CreateAdviceRequest>,
) -> Result<impl IntoResponse, AppError> {
    let advice = request.into_advice(user.id, state.years)?;
    state.advice_repo.create_advice(&advice).await?;

    tracing::info!(
        advice_id = %advice.id,
        user_id = %user.id,
        periods = advice.periods.len(),
        "Advice created"
    );

    Ok((StatusCode::CREATED, Json(advice)))
}

/// Update content and periods of an advice (PUT /api/advice/{id}).
///
/// Skipped directives do not fail the request; they are reported under
/// `changes.skipped`.
pub async fn update_advice(
    CurrentUser(user): CurrentUser,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(request): Json<UpdateAdviceRequest>,
) -> Result<Json<UpdateAdviceResponse>, AppError> {
    let advice = load_advice(&state, id).await?;
    ensure_can_modify(&user, advice.user_id)?;

    let content = request.validated_content()?;
    let directives = request.periods.unwrap_or_default();
    let changes = state.reconciler.reconcile(id, &directives, content).await?;

    let advice = load_advice(&state, id).await?;
    Ok(Json(UpdateAdviceResponse { advice, changes }))
}

/// Delete an advice and its periods (DELETE /api/advice/{id}).
pub async fn delete_advice(
    CurrentUser(user): CurrentUser,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    let advice = load_advice(&state, id).await?;
    ensure_can_modify(&user, advice.user_id)?;

    state.advice_repo.delete_advice(id).await?;
    tracing::info!(advice_id = %id, user_id = %user.id, "Advice deleted");

    Ok(StatusCode::NO_CONTENT)
}
