//! Salted password hashing with Argon2id

use argon2::password_hash::SaltString;
use argon2::{Argon2, PasswordHash, PasswordHasher, PasswordVerifier};
use ring::rand::{SecureRandom, SystemRandom};
use thiserror::Error;

const SALT_LEN: usize = 16;

/// Hash a password with a fresh random salt, returning a PHC string.
///
/// Runs on the blocking pool; Argon2 is deliberately slow.
pub(crate) async fn hash_password(password: String) -> Result<String, PasswordError> {
    tokio::task::spawn_blocking(move || hash_password_blocking(&password))
        .await
        .map_err(|e| PasswordError::Task(e.to_string()))?
}

/// Check a password against a stored PHC string
pub(crate) async fn verify_password(password: String, hash: String) -> Result<bool, PasswordError> {
    tokio::task::spawn_blocking(move || verify_password_blocking(&password, &hash))
        .await
        .map_err(|e| PasswordError::Task(e.to_string()))?
}

fn gen_salt() -> Result<SaltString, PasswordError> {
    let mut salt = [0u8; SALT_LEN];
    SystemRandom::new()
        .fill(&mut salt)
        .map_err(|_| PasswordError::Crypto("Failed to generate salt".to_string()))?;
    SaltString::encode_b64(&salt).map_err(|e| PasswordError::Crypto(e.to_string()))
}

fn hash_password_blocking(password: &str) -> Result<String, PasswordError> {
    let salt = gen_salt()?;
    let hash = Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| PasswordError::Crypto(e.to_string()))?;
    Ok(hash.to_string())
}

fn verify_password_blocking(password: &str, hash: &str) -> Result<bool, PasswordError> {
    let parsed = PasswordHash::new(hash).map_err(|e| PasswordError::MalformedHash(e.to_string()))?;

    match Argon2::default().verify_password(password.as_bytes(), &parsed) {
        Ok(()) => Ok(true),
        Err(argon2::password_hash::Error::Password) => Ok(false),
        Err(e) => Err(PasswordError::Crypto(e.to_string())),
    }
}

#[derive(Debug, Error, Clone)]
pub enum PasswordError {
    #[error("Crypto error: {0}")]
    Crypto(String),

    #[error("Stored password hash is malformed: {0}")]
    MalformedHash(String),

    #[error("Hashing task failed: {0}")]
    Task(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_hash_then_verify() {
        let hash = hash_password("secret123".to_string()).await.unwrap();

        assert!(hash.starts_with("$argon2id$"));
        assert!(!hash.contains("secret123"));
        assert!(
            verify_password("secret123".to_string(), hash.clone())
                .await
                .unwrap()
        );
        assert!(!verify_password("secret124".to_string(), hash).await.unwrap());
    }

    #[tokio::test]
    async fn test_same_password_gets_distinct_salts() {
        let a = hash_password("p1".to_string()).await.unwrap();
        let b = hash_password("p1".to_string()).await.unwrap();

        assert_ne!(a, b);
        assert!(verify_password("p1".to_string(), a).await.unwrap());
        assert!(verify_password("p1".to_string(), b).await.unwrap());
    }

    #[tokio::test]
    async fn test_malformed_hash_is_an_error_not_a_mismatch() {
        let result = verify_password("p1".to_string(), "not-a-phc-string".to_string()).await;
        assert!(matches!(result, Err(PasswordError::MalformedHash(_))));
    }

    #[test]
    fn test_salt_is_random() {
        let a = gen_salt().unwrap();
        let b = gen_salt().unwrap();
        assert_ne!(a.as_str(), b.as_str());
    }
}
