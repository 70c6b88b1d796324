// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Password hashing and verification.
//!
//! Argon2id with per-password random salts, stored as PHC strings. The PHC
//! format records algorithm and parameters alongside the salt and digest, so
//! stored hashes survive future parameter changes.

use argon2::{Argon2, PasswordHash, PasswordHasher, PasswordVerifier, password_hash::SaltString};
use rand::rngs::OsRng;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PasswordError {
    #[error("password hashing failed: {0}")]
    Hashing(String),
}

/// Hash a plaintext password into a PHC string for storage.
pub fn hash_password(password: &str) -> Result<String, PasswordError> {
    let salt = SaltString::generate(OsRng);
    let argon2 = Argon2::default();

    let hash = argon2
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| PasswordError::Hashing(e.to_string()))?;

    Ok(hash.to_string())
}

/// Verify a plaintext password against a stored PHC string.
///
/// Unparseable hashes verify as false rather than erroring; to a caller a
/// corrupt stored hash is indistinguishable from a wrong password.
pub fn verify_password(password: &str, phc_hash: &str) -> bool {
    let parsed = match PasswordHash::new(phc_hash) {
        Ok(h) => h,
        Err(_) => return false,
    };

    // Argon2 compares digests in constant time internally.
    Argon2::default()
        .verify_password(password.as_bytes(), &parsed)
        .is_ok()
}
