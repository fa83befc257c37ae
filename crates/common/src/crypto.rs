//! Password hashing.

use anyhow::{Context, Result};
use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};

/// Hash a password using Argon2.
///
/// # Examples
///
/// ```
/// use accredigo_common::crypto::hash_password;
///
/// let hash = hash_password("my_secure_password").expect("Failed to hash password");
/// assert!(hash.starts_with("$argon2"));
/// ```
pub fn hash_password(password: &str) -> Result<String> {
    let salt = SaltString::generate(&mut OsRng);
    let argon2 = Argon2::default();

    let password_hash = argon2
        .hash_password(password.as_bytes(), &salt)
        .context("Failed to hash password")?
        .to_string();

    Ok(password_hash)
}

/// Verify a password against a hash.
///
/// # Examples
///
/// ```
/// use accredigo_common::crypto::{hash_password, verify_password};
///
/// let hash = hash_password("my_password").expect("Failed to hash");
/// assert!(verify_password("my_password", &hash).expect("Failed to verify"));
/// assert!(!verify_password("wrong_password", &hash).expect("Failed to verify"));
/// ```
pub fn verify_password(password: &str, hash: &str) -> Result<bool> {
    let parsed_hash = PasswordHash::new(hash).context("Invalid password hash format")?;

    Ok(Argon2::default()
        .verify_password(password.as_bytes(), &parsed_hash)
        .is_ok())
}
