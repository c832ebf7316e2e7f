//! Password hashing and verification (Argon2id, PHC string format).

use anyhow::{Result, anyhow};
use argon2::{Argon2, PasswordHash, PasswordHasher, PasswordVerifier, password_hash::SaltString};
use rand::rngs::OsRng;
use tracing::warn;

/// Normalize an email for lookup/uniqueness checks.
#[must_use]
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

/// Hash a plaintext password with a fresh random salt.
///
/// # Errors
/// Returns an error if Argon2 fails to produce a hash.
pub fn hash_password(password: &str) -> Result<String> {
    let salt = SaltString::generate(&mut OsRng);
    let hash = Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map_err(|err| anyhow!("failed to hash password: {err}"))?;
    Ok(hash.to_string())
}

/// Check a submitted password against a stored PHC hash.
///
/// An unparsable stored hash never matches.
#[must_use]
pub fn matches_hash(password: &str, stored_hash: &str) -> bool {
    let parsed = match PasswordHash::new(stored_hash) {
        Ok(parsed) => parsed,
        Err(err) => {
            warn!("Stored password hash is not a valid PHC string: {err}");
            return false;
        }
    };
    Argon2::default()
        .verify_password(password.as_bytes(), &parsed)
        .is_ok()
}

/// Run [`matches_hash`] off the async executor; Argon2 is deliberately slow.
///
/// # Errors
/// Returns an error if the blocking task panics or is cancelled.
pub async fn verify_password(password: String, stored_hash: String) -> Result<bool> {
    tokio::task::spawn_blocking(move || matches_hash(&password, &stored_hash))
        .await
        .map_err(|err| anyhow!("password verification task failed: {err}"))
}
