// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Axum extractor for the authenticated doctor.
//!
//! Use the `Auth` extractor in handlers that require a session:
//!
//! ```rust,ignore
//! async fn my_handler(Auth(identity): Auth) -> impl IntoResponse {
//!     // identity is the verified doctor
//! }
//! ```

use axum::{extract::FromRequestParts, http::request::Parts};

use super::cookie::extract_session_token;
use super::{AuthError, Identity};
use crate::state::AppState;

/// Extractor for the authenticated doctor.
///
/// Routes behind the session gate receive the identity the gate already
/// verified; routes mounted outside it fall back to verifying the session
/// cookie directly. Either way a handler taking `Auth` never runs without a
/// verified session.
///
/// # Example
///
/// ```rust,ignore
/// async fn list_patients(
///     Auth(identity): Auth,
///     State(state): State<AppState>,
/// ) -> Result<Json<Vec<Patient>>, ApiError> {
///     // identity.doctor_id owns every record this handler touches
/// }
/// ```
pub struct Auth(pub Identity);

impl FromRequestParts<AppState> for Auth {
    type Rejection = AuthError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        // First check if the session gate already verified this request
        if let Some(identity) = parts.extensions.get::<Identity>().cloned() {
            return Ok(Auth(identity));
        }

        // Verify the session cookie directly
        let token = extract_session_token(&parts.headers).ok_or(AuthError::MissingSession)?;
        let claims = state.tokens.verify(&token).ok_or(AuthError::InvalidSession)?;

        Ok(Auth(Identity::from_claims(&claims)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::{SessionCookie, TokenService};
    use crate::state::AppState;
    use crate::storage::EmcDatabase;
    use axum::http::Request;
    use tempfile::TempDir;

    /// Helper to create a test AppState backed by a temporary database.
    fn create_test_state() -> (AppState, TempDir) {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let db = EmcDatabase::open(temp_dir.path().join("emc.redb"))
            .expect("Failed to open database");
        let state = AppState::new(db, TokenService::new("test-secret"), SessionCookie::new(false));
        (state, temp_dir)
    }

    #[tokio::test]
    async fn auth_extractor_requires_session_cookie() {
        let (state, _temp_dir) = create_test_state();
        let mut parts = Request::builder()
            .uri("/test")
            .body(())
            .unwrap()
            .into_parts()
            .0;

        let result = Auth::from_request_parts(&mut parts, &state).await;
        assert!(matches!(result, Err(AuthError::MissingSession)));
    }

    #[tokio::test]
    async fn auth_extractor_succeeds_with_session_cookie() {
        let (state, _temp_dir) = create_test_state();
        let token = state.tokens.issue("doctor-1", "ada@example.com").unwrap();
        let mut parts = Request::builder()
            .uri("/test")
            .header("Cookie", format!("token={}", token))
            .body(())
            .unwrap()
            .into_parts()
            .0;

        let result = Auth::from_request_parts(&mut parts, &state).await;
        assert!(result.is_ok());
        assert_eq!(result.unwrap().0.doctor_id, "doctor-1");
    }

    #[tokio::test]
    async fn auth_extractor_rejects_invalid_token() {
        let (state, _temp_dir) = create_test_state();
        let mut parts = Request::builder()
            .uri("/test")
            .header("Cookie", "token=not-a-real-token")
            .body(())
            .unwrap()
            .into_parts()
            .0;

        let result = Auth::from_request_parts(&mut parts, &state).await;
        assert!(matches!(result, Err(AuthError::InvalidSession)));
    }

    #[tokio::test]
    async fn auth_extractor_prefers_extensions() {
        let (state, _temp_dir) = create_test_state();
        // If the gate already verified this request, use its identity
        let mut parts = Request::builder()
            .uri("/test")
            .body(())
            .unwrap()
            .into_parts()
            .0;

        let identity = Identity {
            doctor_id: "doctor-from-gate".to_string(),
            email: "ada@example.com".to_string(),
        };
        parts.extensions.insert(identity.clone());

        let result = Auth::from_request_parts(&mut parts, &state).await;
        assert!(result.is_ok());
        assert_eq!(result.unwrap().0.doctor_id, "doctor-from-gate");
    }
}
