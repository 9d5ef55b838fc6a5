use argon2::password_hash::{rand_core::OsRng, PasswordHash, SaltString};
use argon2::{Argon2, PasswordHasher as _, PasswordVerifier};
use ecogarden_core::auth::{AuthError, PasswordHasher, Result};

/// Argon2id hasher with the crate's default parameters.
///
/// Hashes are stored as PHC strings (`$argon2id$v=19$...`), which carry
/// their own salt and cost parameters.
#[derive(Debug, Clone, Copy, Default)]
pub struct Argon2PasswordHasher;

impl PasswordHasher for Argon2PasswordHasher {
    fn hash(&self, password: &str) -> Result<String> {
        let salt = SaltString::generate(&mut OsRng);
        Argon2::default()
            .hash_password(password.as_bytes(), &salt)
            .map(|hash| hash.to_string())
            .map_err(|e| AuthError::Hashing(e.to_string()))
    }

    fn verify(&self, password: &str, hash: &str) -> bool {
        let Ok(parsed) = PasswordHash::new(hash) else {
            return false;
        };
        Argon2::default()
            .verify_password(password.as_bytes(), &parsed)
            .is_ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_then_verify() {
        let hasher = Argon2PasswordHasher;
        let hash = hasher.hash("tomato-season").unwrap();

        assert!(hash.starts_with("$argon2id$"));
        assert!(hasher.verify("tomato-season", &hash));
        assert!(!hasher.verify("Tomato-season", &hash));
    }

    #[test]
    fn test_same_password_gets_distinct_salts() {
        let hasher = Argon2PasswordHasher;
        assert_ne!(hasher.hash("pw").unwrap(), hasher.hash("pw").unwrap());
    }

    #[test]
    fn test_malformed_hashes_never_verify() {
        let hasher = Argon2PasswordHasher;
        let legacy = "sha256$00112233$445566";
        for hash in ["", "pw", legacy, "$argon2id$v=19$m=19456,t=2,p=1$zz"] {
            assert!(!hasher.verify("pw", hash), "{hash:?}");
        }
    }
}
