mod access;
mod claims;
mod error;
mod http_mapping;
mod traits;

pub use access::{can_modify, ensure_can_modify};
pub use claims::Claims;
pub use error::AuthError;
pub use http_mapping::auth_error_to_status_code;
pub use traits::{PasswordHasher, Result};
