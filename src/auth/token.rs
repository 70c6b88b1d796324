// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Session token issuance and verification.
//!
//! Tokens are HS256-signed with the secret loaded at startup. There is no
//! fallback secret: a process that cannot load one refuses to start, so a
//! token that verifies here was always signed by a correctly configured
//! deployment.

use std::sync::Arc;

use chrono::Utc;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use thiserror::Error;

use super::claims::{Claims, ROLE_DOCTOR};

/// Session lifetime (7 days).
pub const SESSION_TTL_SECONDS: i64 = 7 * 24 * 60 * 60;

/// Clock skew tolerance (60 seconds).
const CLOCK_SKEW_LEEWAY: u64 = 60;

#[derive(Debug, Error)]
pub enum TokenError {
    #[error("failed to sign session token: {0}")]
    Signing(#[from] jsonwebtoken::errors::Error),
}

/// Issues and verifies the signed session tokens held in the session cookie.
///
/// Cloning is cheap; all clones share the same key material.
#[derive(Clone)]
pub struct TokenService {
    inner: Arc<Inner>,
}

struct Inner {
    encoding: EncodingKey,
    decoding: DecodingKey,
    validation: Validation,
}

impl TokenService {
    pub fn new(secret: &str) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = CLOCK_SKEW_LEEWAY;
        validation.validate_aud = false;

        Self {
            inner: Arc::new(Inner {
                encoding: EncodingKey::from_secret(secret.as_bytes()),
                decoding: DecodingKey::from_secret(secret.as_bytes()),
                validation,
            }),
        }
    }

    /// Mint a session token for a doctor, valid for [`SESSION_TTL_SECONDS`].
    pub fn issue(&self, doctor_id: &str, email: &str) -> Result<String, TokenError> {
        let now = Utc::now().timestamp();
        let claims = Claims {
            sub: doctor_id.to_string(),
            email: email.to_string(),
            role: ROLE_DOCTOR.to_string(),
            iat: now,
            exp: now + SESSION_TTL_SECONDS,
        };

        Ok(encode(
            &Header::new(Algorithm::HS256),
            &claims,
            &self.inner.encoding,
        )?)
    }

    /// Verify a token and return its claims.
    ///
    /// Expired, tampered, malformed, and wrong-key tokens all come back as
    /// `None`; callers make no distinction between failure modes.
    pub fn verify(&self, token: &str) -> Option<Claims> {
        decode::<Claims>(token, &self.inner.decoding, &self.inner.validation)
            .map(|data| data.claims)
            .ok()
    }
}
