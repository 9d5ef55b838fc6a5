use uuid::Uuid;

use crate::advice::User;

use super::{AuthError, Result};

/// Returns true if `actor` may modify a resource owned by `owner_id`.
///
/// Admins may modify anything; users only what they own.
pub fn can_modify(actor: &User, owner_id: Uuid) -> bool {
    actor.role.is_admin() || actor.id == owner_id
}

/// Like [`can_modify`], failing with [`AuthError::Forbidden`].
pub fn ensure_can_modify(actor: &User, owner_id: Uuid) -> Result<()> {
    if can_modify(actor, owner_id) {
        Ok(())
    } else {
        Err(AuthError::Forbidden)
    }
}
