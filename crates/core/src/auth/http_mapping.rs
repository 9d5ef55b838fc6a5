use super::AuthError;

/// Maps an [`AuthError`] to an HTTP status code.
///
/// Every failure to establish identity is a 401; an identified caller acting
/// on somebody else's resource gets a 403.
pub fn auth_error_to_status_code(error: &AuthError) -> u16 {
    match error {
        AuthError::MissingToken
        | AuthError::InvalidToken(_)
        | AuthError::TokenExpired
        | AuthError::InvalidCredentials
        | AuthError::UnknownUser => 401,
        AuthError::Forbidden => 403,
        AuthError::Hashing(_) => 500,
    }
}
