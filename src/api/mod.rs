// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use axum::{
    middleware,
    routing::get,
    routing::post,
    Router,
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::{
    auth::middleware::session_gate,
    models::{
        AuthResponse, CreatePatientRequest, DoctorProfile, Gender, LoginRequest, MessageResponse,
        RegisterRequest, UpdatePatientRequest, UserSummary,
    },
    state::AppState,
    storage::Patient,
};

pub mod auth;
pub mod health;
pub mod patients;

pub fn router(state: AppState) -> Router {
    let api_routes = Router::new()
        .route("/auth/register", post(auth::register))
        .route("/auth/login", post(auth::login))
        .route("/auth/logout", post(auth::logout))
        .route("/auth/me", get(auth::me))
        .route(
            "/patients",
            get(patients::list_patients).post(patients::create_patient),
        )
        .route(
            "/patients/{id}",
            get(patients::get_patient)
                .put(patients::update_patient)
                .delete(patients::delete_patient),
        )
        .with_state(state.clone());

    let health_routes = Router::new()
        .route("/health", get(health::health))
        .route("/health/ready", get(health::readiness))
        .with_state(state.clone());

    // The session gate is a plain `layer`, not a `route_layer`, so it also
    // covers unrouted paths: page URLs get their redirects and unknown API
    // paths still answer 401 before the 404 fallback.
    Router::new()
        .nest("/api", api_routes)
        .merge(health_routes)
        .merge(SwaggerUi::new("/docs").url("/api-doc/openapi.json", ApiDoc::openapi()))
        .layer(middleware::from_fn_with_state(state, session_gate))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
}

#[derive(OpenApi)]
#[openapi(
    paths(
        health::health,
        health::readiness,
        auth::register,
        auth::login,
        auth::logout,
        auth::me,
        patients::list_patients,
        patients::create_patient,
        patients::get_patient,
        patients::update_patient,
        patients::delete_patient
    ),
    components(
        schemas(
            Gender,
            Patient,
            RegisterRequest,
            LoginRequest,
            AuthResponse,
            UserSummary,
            DoctorProfile,
            MessageResponse,
            CreatePatientRequest,
            UpdatePatientRequest,
            health::HealthResponse,
            health::ReadyResponse,
            health::HealthChecks
        )
    ),
    tags(
        (name = "Health", description = "Service health and readiness"),
        (name = "Auth", description = "Doctor registration and session management"),
        (name = "Patients", description = "Patient record management")
    )
)]
struct ApiDoc;
