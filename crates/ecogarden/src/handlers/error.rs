use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;

use ecogarden_core::advice::AdviceError;
use ecogarden_core::auth::{auth_error_to_status_code, AuthError};
use ecogarden_core::storage::{repository_error_to_status_code, RepositoryError};
use ecogarden_core::weather::{weather_error_to_status_code, WeatherError};

/// A required request field was absent or blank.
#[derive(Debug, Error)]
#[error("The \"{0}\" field is required")]
pub struct MissingField(pub &'static str);

pub struct AppError(pub anyhow::Error);

fn status(code: u16) -> StatusCode {
    StatusCode::from_u16(code).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
}

impl AppError {
    /// Picks the status and client-facing message for the wrapped error.
    fn status_and_message(&self) -> (StatusCode, String) {
        let err = &self.0;

        if let Some(repo_error) = err.downcast_ref::<RepositoryError>() {
            (status(repository_error_to_status_code(repo_error)), err.to_string())
        } else if let Some(weather_error) = err.downcast_ref::<WeatherError>() {
            let message = match weather_error {
                WeatherError::Provider { body, .. } => body.clone(),
                other => other.to_string(),
            };
            (status(weather_error_to_status_code(weather_error)), message)
        } else if let Some(auth_error) = err.downcast_ref::<AuthError>() {
            (status(auth_error_to_status_code(auth_error)), err.to_string())
        } else if err.is::<AdviceError>() || err.is::<MissingField>() {
            (StatusCode::BAD_REQUEST, err.to_string())
        } else {
            (StatusCode::INTERNAL_SERVER_ERROR, err.to_string())
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let err = match self.0.downcast::<ecogarden_auth::AuthError>() {
            Ok(auth_error) => return auth_error.into_response(),
            Err(err) => AppError(err),
        };

        let (status_code, message) = err.status_and_message();
        if status_code.is_server_error() {
            tracing::error!(status = %status_code, error = %err.0, "Request failed");
        } else {
            tracing::debug!(status = %status_code, error = %err.0, "Request rejected");
        }

        let message = if status_code == StatusCode::INTERNAL_SERVER_ERROR {
            "Internal server error".to_string()
        } else {
            message
        };

        (status_code, message).into_response()
    }
}

impl<E> From<E> for AppError
where
    E: Into<anyhow::Error>,
{
    fn from(err: E) -> Self {
        Self(err.into())
    }
}

#[cfg(test)]
mod tests {
    use http_body_util::BodyExt;

    use super::*;
    use ecogarden_core::weather::TransportError;

    async fn render(err: impl Into<anyhow::Error>) -> (StatusCode, String) {
        let response = AppError(err.into()).into_response();
        let status = response.status();
        let body = response.into_body().collect().await.unwrap().to_bytes();
        (status, String::from_utf8(body.to_vec()).unwrap())
    }

    #[tokio::test]
    async fn test_repository_errors_use_their_mapping() {
        let (status, _) = render(RepositoryError::NotFound {
            entity_type: "Advice",
            id: "x".to_string(),
        })
        .await;
        assert_eq!(status, StatusCode::NOT_FOUND);

        let (status, _) = render(RepositoryError::AlreadyExists {
            entity_type: "User",
            id: "a@example.com".to_string(),
        })
        .await;
        assert_eq!(status, StatusCode::CONFLICT);
    }

    #[tokio::test]
    async fn test_internal_errors_hide_details() {
        let (status, body) = render(RepositoryError::QueryFailed("disk I/O".to_string())).await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert!(!body.contains("disk"));
    }

    #[tokio::test]
    async fn test_validation_errors_are_bad_requests() {
        let (status, body) = render(AdviceError::InvalidMonth(13)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body, "Invalid month 13 (1-12 expected)");

        let (status, body) = render(MissingField("city")).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body, "The \"city\" field is required");
    }

    #[tokio::test]
    async fn test_provider_error_passes_body_through() {
        let (status, body) = render(WeatherError::Provider {
            status: 404,
            body: "{\"cod\":\"404\",\"message\":\"city not found\"}".to_string(),
        })
        .await;

        assert_eq!(status, StatusCode::BAD_GATEWAY);
        assert!(body.contains("city not found"));
    }

    #[tokio::test]
    async fn test_transport_timeout_is_gateway_timeout() {
        let (status, _) = render(WeatherError::from(TransportError::timeout("deadline"))).await;
        assert_eq!(status, StatusCode::GATEWAY_TIMEOUT);
    }

    #[tokio::test]
    async fn test_auth_errors_map_to_401_and_403() {
        let (status, _) = render(AuthError::Forbidden).await;
        assert_eq!(status, StatusCode::FORBIDDEN);

        let (status, _) = render(ecogarden_auth::AuthError::from(AuthError::MissingToken)).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
    }
}
