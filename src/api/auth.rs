// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Authentication endpoints: register, login, logout, current profile.
//!
//! Register and login issue a session token and set the session cookie in
//! one response. Login failures are deliberately uniform: an unknown email
//! and a wrong password produce byte-identical responses.

use axum::{
    extract::State,
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};

use crate::auth::error::UNAUTHORIZED_MESSAGE;
use crate::auth::password::{hash_password, verify_password};
use crate::auth::Auth;
use crate::error::{ApiError, ApiJson};
use crate::models::{
    AuthResponse, DoctorProfile, LoginRequest, MessageResponse, RegisterRequest, UserSummary,
};
use crate::state::AppState;
use crate::storage::{normalize_email, DbError, Doctor};

/// Issue a session token for a doctor, mapping failure to a plain 500.
fn issue_session(state: &AppState, doctor: &Doctor) -> Result<String, ApiError> {
    state.tokens.issue(&doctor.id, &doctor.email).map_err(|e| {
        tracing::error!(error = %e, "Failed to issue session token");
        ApiError::internal("Internal Server Error")
    })
}

/// Build a 200 response that both sets the session cookie and carries `body`.
fn session_response(state: &AppState, token: &str, body: AuthResponse) -> Response {
    let cookie = state.cookie.build_set_cookie(token);
    (StatusCode::OK, [(header::SET_COOKIE, cookie)], Json(body)).into_response()
}

/// Register a new doctor account.
#[utoipa::path(
    post,
    path = "/api/auth/register",
    tag = "Auth",
    request_body = RegisterRequest,
    responses(
        (status = 200, description = "Account created, session established", body = AuthResponse),
        (status = 400, description = "Validation failed or email already registered"),
        (status = 500, description = "Internal error")
    )
)]
pub async fn register(
    State(state): State<AppState>,
    ApiJson(request): ApiJson<RegisterRequest>,
) -> Result<Response, ApiError> {
    request.validate()?;

    let email = normalize_email(&request.email);
    let password_hash = hash_password(&request.password).map_err(|e| {
        tracing::error!(error = %e, "Password hashing failed");
        ApiError::internal("Internal Server Error")
    })?;

    let doctor = Doctor::new(request.name, email, password_hash, request.specialization);

    match state.db.insert_doctor(&doctor) {
        Ok(()) => {}
        Err(DbError::AlreadyExists(_)) => {
            return Err(ApiError::bad_request("Email already registered"));
        }
        Err(e) => {
            tracing::error!(error = %e, "Failed to store doctor account");
            return Err(ApiError::internal("Internal Server Error"));
        }
    }

    tracing::info!(doctor_id = %doctor.id, "Doctor account registered");

    let token = issue_session(&state, &doctor)?;
    Ok(session_response(
        &state,
        &token,
        AuthResponse {
            message: "Registration successful".to_string(),
            user: UserSummary::from(&doctor),
        },
    ))
}

/// Log into an existing doctor account.
#[utoipa::path(
    post,
    path = "/api/auth/login",
    tag = "Auth",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Session established", body = AuthResponse),
        (status = 400, description = "Validation failed"),
        (status = 401, description = "Invalid credentials"),
        (status = 500, description = "Internal error")
    )
)]
pub async fn login(
    State(state): State<AppState>,
    ApiJson(request): ApiJson<LoginRequest>,
) -> Result<Response, ApiError> {
    request.validate()?;

    let doctor = state.db.find_doctor_by_email(&request.email).map_err(|e| {
        tracing::error!(error = %e, "Failed to look up doctor account");
        ApiError::internal("Internal Server Error")
    })?;

    // Unknown email and wrong password take the same exit
    let doctor = doctor.ok_or_else(|| ApiError::unauthorized("Invalid credentials"))?;
    if !verify_password(&request.password, &doctor.password_hash) {
        return Err(ApiError::unauthorized("Invalid credentials"));
    }

    tracing::info!(doctor_id = %doctor.id, "Doctor logged in");

    let token = issue_session(&state, &doctor)?;
    Ok(session_response(
        &state,
        &token,
        AuthResponse {
            message: "Login successful".to_string(),
            user: UserSummary::from(&doctor),
        },
    ))
}

/// End the session by clearing the session cookie.
///
/// Always succeeds; logging out without a session is a no-op.
#[utoipa::path(
    post,
    path = "/api/auth/logout",
    tag = "Auth",
    responses(
        (status = 200, description = "Session cleared", body = MessageResponse)
    )
)]
pub async fn logout(State(state): State<AppState>) -> Response {
    let cookie = state.cookie.build_clear_cookie();
    (
        StatusCode::OK,
        [(header::SET_COOKIE, cookie)],
        Json(MessageResponse {
            message: "Logout successful".to_string(),
        }),
    )
        .into_response()
}

/// Return the authenticated doctor's own profile.
#[utoipa::path(
    get,
    path = "/api/auth/me",
    tag = "Auth",
    responses(
        (status = 200, description = "Authenticated doctor's profile", body = DoctorProfile),
        (status = 401, description = "Not authenticated"),
        (status = 500, description = "Internal error")
    )
)]
pub async fn me(
    Auth(identity): Auth,
    State(state): State<AppState>,
) -> Result<Json<DoctorProfile>, ApiError> {
    let doctor = state.db.get_doctor(&identity.doctor_id).map_err(|e| {
        tracing::error!(error = %e, "Failed to load doctor profile");
        ApiError::internal("Internal Server Error")
    })?;

    // A valid token whose account no longer exists is still an invalid session
    let doctor = doctor.ok_or_else(|| ApiError::unauthorized(UNAUTHORIZED_MESSAGE))?;

    Ok(Json(DoctorProfile::from(&doctor)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::{Identity, SessionCookie, TokenService};
    use crate::storage::EmcDatabase;
    use axum::body::to_bytes;
    use tempfile::TempDir;

    fn create_test_state() -> (AppState, TempDir) {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let db = EmcDatabase::open(temp_dir.path().join("emc.redb"))
            .expect("Failed to open database");
        let state = AppState::new(db, TokenService::new("test-secret"), SessionCookie::new(false));
        (state, temp_dir)
    }

    fn register_request(email: &str) -> RegisterRequest {
        RegisterRequest {
            name: "Ada Lovelace".to_string(),
            email: email.to_string(),
            password: "secret1".to_string(),
            specialization: "Cardiology".to_string(),
        }
    }

    async fn body_json(response: Response) -> serde_json::Value {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn register_creates_account_and_sets_cookie() {
        let (state, _temp_dir) = create_test_state();

        let response = register(
            State(state.clone()),
            ApiJson(register_request("Ada@Example.com")),
        )
        .await
        .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let cookie = response
            .headers()
            .get(header::SET_COOKIE)
            .unwrap()
            .to_str()
            .unwrap()
            .to_string();
        assert!(cookie.starts_with("token="));
        assert!(cookie.contains("HttpOnly"));

        let body = body_json(response).await;
        assert_eq!(body["message"], "Registration successful");
        assert_eq!(body["user"]["email"], "ada@example.com");
        assert!(body["user"].get("passwordHash").is_none());
    }

    #[tokio::test]
    async fn register_rejects_duplicate_email_case_insensitively() {
        let (state, _temp_dir) = create_test_state();

        register(State(state.clone()), ApiJson(register_request("ada@example.com")))
            .await
            .unwrap();

        let err = register(
            State(state.clone()),
            ApiJson(register_request("ADA@EXAMPLE.COM")),
        )
        .await
        .unwrap_err();

        assert_eq!(err.status, StatusCode::BAD_REQUEST);
        assert_eq!(err.message, "Email already registered");
    }

    #[tokio::test]
    async fn register_reports_validation_failures() {
        let (state, _temp_dir) = create_test_state();

        let mut request = register_request("ada@example.com");
        request.password = "short".to_string();
        let err = register(State(state), ApiJson(request)).await.unwrap_err();

        assert_eq!(err.status, StatusCode::BAD_REQUEST);
        assert_eq!(err.message, "Password must be at least 6 characters");
    }

    #[tokio::test]
    async fn login_succeeds_with_correct_credentials() {
        let (state, _temp_dir) = create_test_state();
        register(State(state.clone()), ApiJson(register_request("ada@example.com")))
            .await
            .unwrap();

        let response = login(
            State(state),
            ApiJson(LoginRequest {
                email: "ada@example.com".to_string(),
                password: "secret1".to_string(),
            }),
        )
        .await
        .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert!(response.headers().get(header::SET_COOKIE).is_some());

        let body = body_json(response).await;
        assert_eq!(body["message"], "Login successful");
        assert_eq!(body["user"]["email"], "ada@example.com");
    }

    #[tokio::test]
    async fn login_failures_are_uniform() {
        let (state, _temp_dir) = create_test_state();
        register(State(state.clone()), ApiJson(register_request("ada@example.com")))
            .await
            .unwrap();

        // Unknown account
        let unknown = login(
            State(state.clone()),
            ApiJson(LoginRequest {
                email: "nobody@example.com".to_string(),
                password: "secret1".to_string(),
            }),
        )
        .await
        .unwrap_err();

        // Known account, wrong password
        let wrong_password = login(
            State(state),
            ApiJson(LoginRequest {
                email: "ada@example.com".to_string(),
                password: "not-the-password".to_string(),
            }),
        )
        .await
        .unwrap_err();

        assert_eq!(unknown.status, StatusCode::UNAUTHORIZED);
        assert_eq!(unknown.status, wrong_password.status);
        assert_eq!(unknown.message, wrong_password.message);
        assert_eq!(unknown.message, "Invalid credentials");
    }

    #[tokio::test]
    async fn logout_clears_the_session_cookie() {
        let (state, _temp_dir) = create_test_state();

        let response = logout(State(state)).await;
        assert_eq!(response.status(), StatusCode::OK);

        let cookie = response
            .headers()
            .get(header::SET_COOKIE)
            .unwrap()
            .to_str()
            .unwrap()
            .to_string();
        assert_eq!(cookie, "token=; HttpOnly; Path=/; Max-Age=0");

        let body = body_json(response).await;
        assert_eq!(body["message"], "Logout successful");
    }

    #[tokio::test]
    async fn me_returns_the_profile_without_the_hash() {
        let (state, _temp_dir) = create_test_state();
        let response = register(
            State(state.clone()),
            ApiJson(register_request("ada@example.com")),
        )
        .await
        .unwrap();
        let doctor_id = body_json(response).await["user"]["id"]
            .as_str()
            .unwrap()
            .to_string();

        let identity = Identity {
            doctor_id: doctor_id.clone(),
            email: "ada@example.com".to_string(),
        };
        let Json(profile) = me(Auth(identity), State(state)).await.unwrap();

        assert_eq!(profile.id, doctor_id);
        assert_eq!(profile.email, "ada@example.com");
        assert_eq!(profile.specialization, "Cardiology");

        let json = serde_json::to_value(&profile).unwrap();
        assert!(json.get("passwordHash").is_none());
    }

    #[tokio::test]
    async fn me_with_a_gone_account_is_unauthorized() {
        let (state, _temp_dir) = create_test_state();

        let identity = Identity {
            doctor_id: "deleted-doctor".to_string(),
            email: "gone@example.com".to_string(),
        };
        let err = me(Auth(identity), State(state)).await.unwrap_err();

        assert_eq!(err.status, StatusCode::UNAUTHORIZED);
        assert_eq!(err.message, "Unauthorized: Please log in");
    }
}
