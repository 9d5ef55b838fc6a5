use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use ecogarden_core::auth::auth_error_to_status_code;
use ecogarden_core::storage::RepositoryError;
use thiserror::Error;

/// Auth errors for the ecogarden_auth crate.
///
/// Wraps the core `AuthError` and adds the I/O failures that can happen
/// while authenticating.
#[derive(Debug, Error)]
pub enum AuthError {
    #[error(transparent)]
    Core(#[from] ecogarden_core::auth::AuthError),

    /// User lookup failed
    #[error("user lookup failed: {0}")]
    Repository(#[from] RepositoryError),

    /// Token could not be signed
    #[error("token signing failed: {0}")]
    Signing(String),
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            AuthError::Core(core_err) => {
                let status = StatusCode::from_u16(auth_error_to_status_code(core_err))
                    .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
                if status.is_server_error() {
                    tracing::error!(error = %self, "Auth error");
                    (status, "Internal server error".to_string())
                } else {
                    (status, self.to_string())
                }
            }
            AuthError::Repository(_) | AuthError::Signing(_) => {
                tracing::error!(error = %self, "Auth error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal server error".to_string(),
                )
            }
        };

        (status, message).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ecogarden_core::auth::AuthError as CoreError;

    #[test]
    fn test_core_errors_keep_their_status() {
        let response = AuthError::from(CoreError::Forbidden).into_response();
        assert_eq!(response.status(), StatusCode::FORBIDDEN);

        let response = AuthError::from(CoreError::TokenExpired).into_response();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[test]
    fn test_repository_errors_are_internal() {
        let response =
            AuthError::from(RepositoryError::ConnectionFailed("gone".to_string())).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
