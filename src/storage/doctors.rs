// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Doctor accounts.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A registered doctor account, as stored.
///
/// This is the storage shape: it carries the password hash and is never
/// serialized into a response body. Responses use the DTOs in
/// [`crate::models`].
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Doctor {
    pub id: String,
    pub name: String,
    /// Normalized login email, unique across accounts.
    pub email: String,
    /// Argon2id hash in PHC string format.
    pub password_hash: String,
    pub specialization: String,
    pub created_at: DateTime<Utc>,
}

impl Doctor {
    /// Create a new account with a fresh id.
    ///
    /// `email` must already be normalized via [`normalize_email`].
    pub fn new(name: String, email: String, password_hash: String, specialization: String) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            name,
            email,
            password_hash,
            specialization,
            created_at: Utc::now(),
        }
    }
}

/// Normalize an email for storage and lookup: trim whitespace, lowercase.
///
/// Register and login both pass through here, so `Ada@X.com` and `ada@x.com`
/// name the same account.
pub fn normalize_email(raw: &str) -> String {
    raw.trim().to_lowercase()
}
