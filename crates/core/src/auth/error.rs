use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AuthError {
    #[error("missing bearer token")]
    MissingToken,

    #[error("invalid token: {0}")]
    InvalidToken(String),

    #[error("token expired")]
    TokenExpired,

    #[error("invalid email or password")]
    InvalidCredentials,

    #[error("user no longer exists")]
    UnknownUser,

    #[error("not allowed to modify this resource")]
    Forbidden,

    #[error("password hashing failed: {0}")]
    Hashing(String),
}
