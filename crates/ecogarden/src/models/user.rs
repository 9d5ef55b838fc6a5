use serde::Deserialize;

use ecogarden_core::advice::Role;

/// Request payload for registering an account.
///
/// Fields are optional so a missing one is reported as a 400 naming it.
#[derive(Debug, Default, Deserialize)]
pub struct RegisterUser {
    pub email: Option<String>,
    pub password: Option<String>,
    pub city: Option<String>,
    pub postal_code: Option<String>,
}

/// Partial account update. Absent fields are left unchanged.
#[derive(Debug, Default, Deserialize)]
pub struct UpdateUser {
    pub email: Option<String>,
    pub password: Option<String>,
    pub city: Option<String>,
    pub postal_code: Option<String>,
    /// Admin only.
    pub role: Option<Role>,
}

/// Returns the trimmed value of a required text field.
pub(crate) fn required<'a>(value: &'a Option<String>, field: &'static str) -> Result<&'a str, &'static str> {
    match value.as_deref().map(str::trim) {
        Some(v) if !v.is_empty() => Ok(v),
        _ => Err(field),
    }
}
