//! # Key Derivation with PBKDF2
//!
//! Turns a password and the per-container salt into the AES-256 key using
//! PBKDF2-HMAC-SHA256. Derivation is deterministic: the same password and
//! salt always give the same key, which is why the salt travels unencrypted
//! in the container header.

use anyhow::{Result, anyhow, ensure};
use hmac::Hmac;
use pbkdf2::pbkdf2;
use sha2::Sha256;

use crate::config::SALT_SIZE;
use crate::secret::{Password, SecretKey};

/// Derives the container key from `password` and `salt`.
///
/// # Errors
///
/// Returns an error if the password is empty or `iterations` is zero. Both
/// are caller contract violations rather than decryption failures.
pub fn derive_key(password: &Password, salt: &[u8; SALT_SIZE], iterations: u32) -> Result<SecretKey> {
    ensure!(!password.is_empty(), "password cannot be empty");
    ensure!(iterations > 0, "PBKDF2 iterations must be at least 1");

    let mut key = SecretKey::zeroed();
    pbkdf2::<Hmac<Sha256>>(password.expose_secret().as_bytes(), salt, iterations, key.expose_secret_mut())
        .map_err(|e| anyhow!("key derivation failed: {e}"))?;

    Ok(key)
}
