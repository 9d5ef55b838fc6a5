//! JWT authentication for ecogarden.
//!
//! This crate provides:
//! - HS256 token issuance and verification
//! - Argon2id password hashing
//! - The `CurrentUser` axum extractor and the login route

mod config;
mod error;
mod extractors;
mod handlers;
mod password;
mod state;
mod tokens;

pub use config::AuthConfig;
pub use error::AuthError;
pub use extractors::CurrentUser;
pub use handlers::{auth_routes, LoginRequest, LoginResponse};
pub use password::Argon2PasswordHasher;
pub use state::AuthState;
pub use tokens::TokenService;
