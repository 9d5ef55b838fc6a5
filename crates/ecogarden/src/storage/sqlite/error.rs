//! SQLite error mapping.
//!
//! Maps `tokio_rusqlite::Error` and `rusqlite::Error` to `RepositoryError`
//! from `ecogarden_core::storage`.

use ecogarden_core::storage::RepositoryError;

fn constraint_code(err: &rusqlite::Error) -> Option<i32> {
    match err {
        rusqlite::Error::SqliteFailure(sqlite_err, _)
            if sqlite_err.code == rusqlite::ErrorCode::ConstraintViolation =>
        {
            Some(sqlite_err.extended_code)
        }
        _ => None,
    }
}

/// Maps a rusqlite error with a known ID to a RepositoryError.
///
/// # Error Mapping
///
/// - `SQLITE_CONSTRAINT_UNIQUE` / `PRIMARYKEY` → `RepositoryError::AlreadyExists`
/// - `SQLITE_CONSTRAINT_FOREIGNKEY` → `RepositoryError::InvalidData`
/// - No rows → `RepositoryError::NotFound`
/// - Unopenable database → `RepositoryError::ConnectionFailed`
/// - All other errors → `RepositoryError::QueryFailed`
fn map_rusqlite_error(err: &rusqlite::Error, entity_type: &'static str, id: &str) -> RepositoryError {
    match (err, constraint_code(err)) {
        (_, Some(rusqlite::ffi::SQLITE_CONSTRAINT_UNIQUE))
        | (_, Some(rusqlite::ffi::SQLITE_CONSTRAINT_PRIMARYKEY)) => {
            RepositoryError::AlreadyExists {
                entity_type,
                id: id.to_string(),
            }
        }
        (_, Some(rusqlite::ffi::SQLITE_CONSTRAINT_FOREIGNKEY)) => RepositoryError::InvalidData(
            format!("Foreign key constraint violation for {entity_type}"),
        ),
        (rusqlite::Error::QueryReturnedNoRows, _) => RepositoryError::NotFound {
            entity_type,
            id: id.to_string(),
        },
        (rusqlite::Error::SqliteFailure(sqlite_err, _), _)
            if sqlite_err.code == rusqlite::ErrorCode::CannotOpen =>
        {
            RepositoryError::ConnectionFailed(format!("Cannot open database: {err}"))
        }
        _ => RepositoryError::QueryFailed(err.to_string()),
    }
}

/// Maps a tokio_rusqlite error with a known ID to a RepositoryError.
pub fn map_tokio_rusqlite_error_with_id(
    err: tokio_rusqlite::Error,
    entity_type: &'static str,
    id: impl Into<String>,
) -> RepositoryError {
    match &err {
        tokio_rusqlite::Error::Rusqlite(rusqlite_err) => {
            map_rusqlite_error(rusqlite_err, entity_type, &id.into())
        }
        tokio_rusqlite::Error::ConnectionClosed | tokio_rusqlite::Error::Close(_) => {
            RepositoryError::ConnectionFailed("Connection closed unexpectedly".to_string())
        }
        _ => RepositoryError::QueryFailed(err.to_string()),
    }
}

/// Maps a failed period batch commit.
///
/// A missing advice stays `NotFound`; everything else rolled back the
/// transaction and becomes `CommitFailed`.
pub fn map_commit_error(err: tokio_rusqlite::Error, advice_id: impl Into<String>) -> RepositoryError {
    match &err {
        tokio_rusqlite::Error::Rusqlite(rusqlite::Error::QueryReturnedNoRows) => {
            RepositoryError::NotFound {
                entity_type: "Advice",
                id: advice_id.into(),
            }
        }
        tokio_rusqlite::Error::ConnectionClosed | tokio_rusqlite::Error::Close(_) => {
            RepositoryError::ConnectionFailed("Connection closed unexpectedly".to_string())
        }
        _ => RepositoryError::CommitFailed(err.to_string()),
    }
}
