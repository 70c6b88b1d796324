// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Session token claims and the identity derived from them.

use serde::{Deserialize, Serialize};

/// Role recorded in every session token this service issues.
pub const ROLE_DOCTOR: &str = "DOCTOR";

/// Claims carried by a session token.
///
/// `iat` and `exp` are seconds since the Unix epoch, as required by the
/// token library's expiry validation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Doctor id the session belongs to.
    pub sub: String,
    /// Email at the time the token was issued.
    pub email: String,
    /// Always [`ROLE_DOCTOR`] for tokens this service mints.
    pub role: String,
    /// Issued-at, seconds since epoch.
    pub iat: i64,
    /// Expiry, seconds since epoch.
    pub exp: i64,
}

/// The authenticated caller, as established by a verified session token.
///
/// Handlers receive this rather than raw claims; timestamp and role plumbing
/// stay inside the auth layer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    pub doctor_id: String,
    pub email: String,
}

impl Identity {
    pub fn from_claims(claims: &Claims) -> Self {
        Self {
            doctor_id: claims.sub.clone(),
            email: claims.email.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identity_carries_subject_and_email() {
        let claims = Claims {
            sub: "doctor-1".to_string(),
            email: "ada@example.com".to_string(),
            role: ROLE_DOCTOR.to_string(),
            iat: 1_700_000_000,
            exp: 1_700_604_800,
        };

        let identity = Identity::from_claims(&claims);
        assert_eq!(identity.doctor_id, "doctor-1");
        assert_eq!(identity.email, "ada@example.com");
    }
}
