use super::AuthError;

/// Result type for auth operations.
pub type Result<T> = std::result::Result<T, AuthError>;

/// One-way password hashing.
pub trait PasswordHasher: Send + Sync {
    /// Hashes `password` into a self-describing string safe to store.
    fn hash(&self, password: &str) -> Result<String>;

    /// Checks `password` against a hash produced by [`PasswordHasher::hash`].
    ///
    /// A malformed hash never verifies.
    fn verify(&self, password: &str, hash: &str) -> bool;
}
