//! Weather handlers.

use axum::{
    extract::{Path, State},
    Json,
};

use ecogarden_auth::CurrentUser;

use crate::{handlers::AppError, models::WeatherResponse, state::AppState};

/// Weather for the caller's home city (GET /api/weather).
pub async fn weather_for_user(
    CurrentUser(user): CurrentUser,
    State(state): State<AppState>,
) -> Result<Json<WeatherResponse>, AppError> {
    let weather = state.weather.fetch_weather(&user.city).await?;
    Ok(Json(WeatherResponse::new(user.city.trim(), weather)))
}

/// Weather for a named city (GET /api/weather/{city}).
pub async fn weather_for_city(
    _user: CurrentUser,
    State(state): State<AppState>,
    Path(city): Path<String>,
) -> Result<Json<WeatherResponse>, AppError> {
    let weather = state.weather.fetch_weather(&city).await?;
    Ok(Json(WeatherResponse::new(city.trim(), weather)))
}
