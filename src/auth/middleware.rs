// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Session gate middleware.
//!
//! Every request passes through the gate. It classifies the path, verifies
//! the session cookie when one is present, and either forwards the request,
//! denies it, or redirects the browser.
//!
//! The outcome is a pure function of path class and token verification;
//! [`evaluate`] has no side effects and is tested as a decision table.

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
};

use super::cookie::extract_session_token;
use super::token::TokenService;
use super::{AuthError, Identity};
use crate::state::AppState;

/// Route classes the gate distinguishes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PathClass {
    /// Patient API routes; denied with a 401 body without a valid session.
    ProtectedApi,
    /// Dashboard pages; redirected to the login page without a valid session.
    ProtectedPage,
    /// Login and registration pages; signed-in callers are redirected away.
    AuthPage,
    /// Everything else passes through.
    Public,
}

/// Classify a request path.
///
/// Prefix matches respect segment boundaries: `/api/patientsextra` is not a
/// patient route.
pub fn classify(path: &str) -> PathClass {
    if path == "/api/patients" || path.starts_with("/api/patients/") {
        PathClass::ProtectedApi
    } else if path == "/dashboard" || path.starts_with("/dashboard/") {
        PathClass::ProtectedPage
    } else if path == "/login" || path == "/register" {
        PathClass::AuthPage
    } else {
        PathClass::Public
    }
}

/// Outcome of the gate for one request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GateDecision {
    /// Forward the request, with the verified identity when there is one.
    Proceed(Option<Identity>),
    /// Reject with the fixed 401 body.
    DenyApi,
    /// Send the browser to the login page.
    RedirectToLogin,
    /// Send the browser to the dashboard.
    RedirectToDashboard,
}

/// Decide what to do with a request.
///
/// A cookie whose token fails verification counts exactly as no cookie at
/// all; presence alone never grants anything.
pub fn evaluate(path: &str, token: Option<&str>, tokens: &TokenService) -> GateDecision {
    let identity = token
        .and_then(|t| tokens.verify(t))
        .map(|claims| Identity::from_claims(&claims));

    match (classify(path), identity) {
        (PathClass::ProtectedApi, Some(identity)) => GateDecision::Proceed(Some(identity)),
        (PathClass::ProtectedApi, None) => GateDecision::DenyApi,
        (PathClass::ProtectedPage, Some(identity)) => GateDecision::Proceed(Some(identity)),
        (PathClass::ProtectedPage, None) => GateDecision::RedirectToLogin,
        (PathClass::AuthPage, Some(_)) => GateDecision::RedirectToDashboard,
        (PathClass::AuthPage, None) => GateDecision::Proceed(None),
        (PathClass::Public, identity) => GateDecision::Proceed(identity),
    }
}

/// Session gate middleware function.
///
/// Applied to the whole router, including the fallback, so unrouted paths
/// like `/dashboard` still get gate treatment.
pub async fn session_gate(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Response {
    let token = extract_session_token(request.headers());
    let had_token = token.is_some();

    match evaluate(request.uri().path(), token.as_deref(), &state.tokens) {
        GateDecision::Proceed(identity) => {
            if let Some(identity) = identity {
                request.extensions_mut().insert(identity);
            }
            next.run(request).await
        }
        GateDecision::DenyApi => {
            let error = if had_token {
                AuthError::InvalidSession
            } else {
                AuthError::MissingSession
            };
            tracing::debug!(path = %request.uri().path(), error = %error, "session gate denied request");
            error.into_response()
        }
        GateDecision::RedirectToLogin => Redirect::to("/login").into_response(),
        GateDecision::RedirectToDashboard => Redirect::to("/dashboard").into_response(),
    }
}
