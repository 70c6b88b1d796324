// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Authentication errors.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};

use crate::error::ApiError;

/// Body text returned for every authentication failure.
///
/// A missing cookie, an expired token, and a forged token all produce this
/// exact response, so a caller cannot probe which condition they hit.
pub const UNAUTHORIZED_MESSAGE: &str = "Unauthorized: Please log in";

/// Authentication failure.
///
/// The variants are distinguished internally for logging; on the wire they
/// are identical 401 responses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthError {
    /// No session cookie on the request.
    MissingSession,
    /// Session cookie present but the token did not verify.
    InvalidSession,
}

impl AuthError {
    pub fn status_code(&self) -> StatusCode {
        StatusCode::UNAUTHORIZED
    }
}

impl std::fmt::Display for AuthError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AuthError::MissingSession => write!(f, "session cookie missing"),
            AuthError::InvalidSession => write!(f, "session token invalid or expired"),
        }
    }
}

impl std::error::Error for AuthError {}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        ApiError::unauthorized(UNAUTHORIZED_MESSAGE).into_response()
    }
}
