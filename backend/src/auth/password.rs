//! Password hashing using argon2
//!
//! Stored credentials are argon2id PHC strings. Accounts created without a
//! password receive an unusable marker that no input can verify against.

use anyhow::Result;
use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};

/// Prefix marking a password that can never be used to log in
pub const UNUSABLE_PASSWORD_PREFIX: char = '!';

/// Password hashing service
pub struct PasswordService;

impl PasswordService {
    /// Hash a password using argon2 (blocking operation)
    pub fn hash(password: &str) -> Result<String> {
        let salt = SaltString::generate(&mut OsRng);
        let argon2 = Argon2::default();
        let hash = argon2
            .hash_password(password.as_bytes(), &salt)
            .map_err(|e| anyhow::anyhow!("Failed to hash password: {}", e))?;
        Ok(hash.to_string())
    }

    /// Produce the stored form of an optional password
    ///
    /// `None` yields an unusable password; `Some` is hashed on the blocking
    /// thread pool.
    pub async fn make_password(password: Option<String>) -> Result<String> {
        match password {
            Some(password) => tokio::task::spawn_blocking(move || Self::hash(&password))
                .await
                .map_err(|e| anyhow::anyhow!("Task join error: {}", e))?,
            None => Ok(Self::unusable()),
        }
    }

    /// A random unusable password marker
    pub fn unusable() -> String {
        let salt = SaltString::generate(&mut OsRng);
        format!("{}{}", UNUSABLE_PASSWORD_PREFIX, salt.as_str())
    }

    /// Whether a stored password can ever verify
    pub fn is_usable(stored: &str) -> bool {
        !stored.starts_with(UNUSABLE_PASSWORD_PREFIX)
    }

    /// Verify a password against a stored hash (blocking operation)
    ///
    /// Unusable passwords never verify.
    pub fn verify(password: &str, stored: &str) -> Result<bool> {
        if !Self::is_usable(stored) {
            return Ok(false);
        }
        let parsed_hash =
            PasswordHash::new(stored).map_err(|e| anyhow::anyhow!("Invalid hash format: {}", e))?;
        Ok(Argon2::default()
            .verify_password(password.as_bytes(), &parsed_hash)
            .is_ok())
    }

    /// Verify a password on the blocking thread pool
    pub async fn verify_async(password: String, stored: String) -> Result<bool> {
        tokio::task::spawn_blocking(move || Self::verify(&password, &stored))
            .await
            .map_err(|e| anyhow::anyhow!("Task join error: {}", e))?
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_and_verify() {
        let password = "secure_password_123";
        let hash = PasswordService::hash(password).unwrap();

        assert_ne!(hash, password);
        assert!(hash.starts_with("$argon2"));
        assert!(PasswordService::verify(password, &hash).unwrap());
        assert!(!PasswordService::verify("wrong_password", &hash).unwrap());
    }

    #[test]
    fn test_different_hashes_for_same_password() {
        let hash1 = PasswordService::hash("pw").unwrap();
        let hash2 = PasswordService::hash("pw").unwrap();
        assert_ne!(hash1, hash2);
    }

    #[test]
    fn test_unusable_password_never_verifies() {
        let stored = PasswordService::unusable();
        assert!(!PasswordService::is_usable(&stored));
        assert!(!PasswordService::verify("", &stored).unwrap());
        assert!(!PasswordService::verify(&stored, &stored).unwrap());
        assert_ne!(PasswordService::unusable(), stored);
    }

    #[tokio::test]
    async fn test_make_password() {
        let hashed = PasswordService::make_password(Some("pw".to_string())).await.unwrap();
        assert!(PasswordService::is_usable(&hashed));
        assert!(PasswordService::verify_async("pw".to_string(), hashed).await.unwrap());

        let unusable = PasswordService::make_password(None).await.unwrap();
        assert!(!PasswordService::is_usable(&unusable));
    }
}
