//! SQLite row conversion functions.
//!
//! Pure functions for converting between SQLite rows and domain types.

use chrono::{DateTime, Utc};
use rusqlite::Row;
use uuid::Uuid;

use ecogarden_core::advice::{Advice, Period, Role, User};

/// Convert a SQLite row to a User.
///
/// Expected columns: id, email, city, postal_code, role, password_hash,
/// created_at, updated_at
pub fn row_to_user(row: &Row) -> rusqlite::Result<User> {
    let id: String = row.get(0)?;
    let role: String = row.get(4)?;
    let created_at: String = row.get(6)?;
    let updated_at: Option<String> = row.get(7)?;

    Ok(User {
        id: parse_uuid(&id)?,
        email: row.get(1)?,
        city: row.get(2)?,
        postal_code: row.get(3)?,
        role: Role::parse(&role),
        password_hash: row.get(5)?,
        created_at: parse_datetime(&created_at)?,
        updated_at: updated_at.as_deref().map(parse_datetime).transpose()?,
    })
}

/// Convert a SQLite row to an Advice with no periods loaded.
///
/// Expected columns: id, user_id, content, created_at, updated_at
pub fn row_to_advice(row: &Row) -> rusqlite::Result<Advice> {
    let id: String = row.get(0)?;
    let user_id: String = row.get(1)?;
    let created_at: String = row.get(3)?;
    let updated_at: Option<String> = row.get(4)?;

    Ok(Advice {
        id: parse_uuid(&id)?,
        user_id: parse_uuid(&user_id)?,
        content: row.get(2)?,
        created_at: parse_datetime(&created_at)?,
        updated_at: updated_at.as_deref().map(parse_datetime).transpose()?,
        periods: Vec::new(),
    })
}

/// Convert a SQLite row to a Period.
///
/// Expected columns: id, advice_id, month, year
pub fn row_to_period(row: &Row) -> rusqlite::Result<Period> {
    let id: String = row.get(0)?;
    let advice_id: String = row.get(1)?;

    Ok(Period {
        id: parse_uuid(&id)?,
        advice_id: parse_uuid(&advice_id)?,
        month: row.get(2)?,
        year: row.get(3)?,
    })
}

/// Parse a UUID from string.
fn parse_uuid(s: &str) -> rusqlite::Result<Uuid> {
    Uuid::parse_str(s).map_err(|e| {
        rusqlite::Error::FromSqlConversionFailure(0, rusqlite::types::Type::Text, Box::new(e))
    })
}

/// Parse a datetime from RFC 3339 string.
fn parse_datetime(s: &str) -> rusqlite::Result<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(s)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| {
            rusqlite::Error::FromSqlConversionFailure(0, rusqlite::types::Type::Text, Box::new(e))
        })
}

/// Format a DateTime for SQLite storage (RFC 3339).
pub fn format_datetime(dt: &DateTime<Utc>) -> String {
    dt.to_rfc3339()
}
