//! Hashed password value object.

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};

use crate::config::MIN_PASSWORD_LENGTH;
use crate::errors::{AppError, AppResult};

/// Argon2 hash that always verifies to false, used when a username is unknown
/// so that failed logins cost the same whether or not the account exists.
pub const UNKNOWN_USER_HASH: &str =
    "$argon2id$v=19$m=19456,t=2,p=1$c2F3dG5hLWR1bW15LXNhbHQ$6L0f8Qe7o5HhUuUu7l7b8m1fJ3lHc0m4n9Vb3kXx2aQ";

/// An argon2 password hash. Never holds plain text.
#[derive(Clone, PartialEq, Eq)]
pub struct Password {
    hash: String,
}

impl std::fmt::Debug for Password {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("Password([REDACTED])")
    }
}

impl Password {
    /// Hash a new plain-text password.
    ///
    /// # Errors
    /// Returns a validation error if the password is shorter than
    /// `MIN_PASSWORD_LENGTH` characters.
    pub fn new(plain_text: &str) -> AppResult<Self> {
        if plain_text.chars().count() < MIN_PASSWORD_LENGTH as usize {
            return Err(AppError::validation(format!(
                "Password must be at least {} characters",
                MIN_PASSWORD_LENGTH
            )));
        }

        let salt = SaltString::generate(&mut OsRng);
        let hash = Argon2::default()
            .hash_password(plain_text.as_bytes(), &salt)
            .map_err(|e| AppError::internal(format!("Password hash failed: {}", e)))?
            .to_string();

        Ok(Self { hash })
    }

    /// Wrap a hash loaded from storage.
    pub fn from_hash(hash: impl Into<String>) -> Self {
        Self { hash: hash.into() }
    }

    pub fn as_str(&self) -> &str {
        &self.hash
    }

    pub fn into_string(self) -> String {
        self.hash
    }

    /// Check a plain-text candidate. Malformed hashes never verify.
    pub fn verify(&self, plain_text: &str) -> bool {
        match PasswordHash::new(&self.hash) {
            Ok(parsed) => Argon2::default()
                .verify_password(plain_text.as_bytes(), &parsed)
                .is_ok(),
            Err(e) => {
                tracing::debug!("Unparseable password hash: {}", e);
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hash_then_verify() {
        let password = Password::new("correct horse").unwrap();
        assert!(password.verify("correct horse"));
        assert!(!password.verify("wrong horse"));
    }

    #[test]
    fn restored_hash_still_verifies() {
        let original = Password::new("SawtnaPass1").unwrap();
        let restored = Password::from_hash(original.as_str());
        assert!(restored.verify("SawtnaPass1"));
    }

    #[test]
    fn salts_differ_per_hash() {
        let a = Password::new("same-password").unwrap();
        let b = Password::new("same-password").unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn rejects_short_passwords() {
        assert!(matches!(Password::new("short"), Err(AppError::Validation(_))));
        assert!(Password::new("12345678").is_ok());
    }

    #[test]
    fn length_counts_characters_not_bytes() {
        // seven Arabic letters are fourteen bytes
        assert!(Password::new("كلمةسرس").is_err());
    }

    #[test]
    fn unknown_user_hash_never_verifies() {
        let dummy = Password::from_hash(UNKNOWN_USER_HASH);
        assert!(!dummy.verify(""));
        assert!(!dummy.verify("anything"));
    }

    #[test]
    fn debug_is_redacted() {
        let password = Password::new("SecretValue").unwrap();
        assert_eq!(format!("{:?}", password), "Password([REDACTED])");
    }
}
