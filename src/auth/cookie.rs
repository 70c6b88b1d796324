// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Session cookie handling.
//!
//! The session token travels in a single HttpOnly cookie. Browsers never
//! expose it to page scripts, and `SameSite=Strict` keeps it off cross-site
//! requests entirely.

use axum::http::{header, HeaderMap};

use super::token::SESSION_TTL_SECONDS;

/// Name of the cookie that carries the session token.
pub const SESSION_COOKIE_NAME: &str = "token";

/// Builds `Set-Cookie` values for the session cookie.
///
/// `Secure` is attached only in production so local HTTP development still
/// gets a cookie the browser will send back.
#[derive(Debug, Clone, Copy)]
pub struct SessionCookie {
    secure: bool,
}

impl SessionCookie {
    pub fn new(secure: bool) -> Self {
        Self { secure }
    }

    /// Build a `Set-Cookie` value establishing a session.
    ///
    /// The cookie lifetime matches the token lifetime, so an expired cookie
    /// and an expired token happen together.
    pub fn build_set_cookie(&self, token: &str) -> String {
        let mut cookie = format!("{}={}", SESSION_COOKIE_NAME, token);

        cookie.push_str("; HttpOnly");
        if self.secure {
            cookie.push_str("; Secure");
        }
        cookie.push_str("; SameSite=Strict");
        cookie.push_str("; Path=/");
        cookie.push_str(&format!("; Max-Age={}", SESSION_TTL_SECONDS));

        cookie
    }

    /// Build a `Set-Cookie` value clearing the session.
    pub fn build_clear_cookie(&self) -> String {
        format!("{}=; HttpOnly; Path=/; Max-Age=0", SESSION_COOKIE_NAME)
    }
}

/// Extract the session token from a request's `Cookie` header, if present.
pub fn extract_session_token(headers: &HeaderMap) -> Option<String> {
    headers
        .get(header::COOKIE)?
        .to_str()
        .ok()?
        .split(';')
        .find_map(|cookie| {
            let (key, value) = cookie.trim().split_once('=')?;

            if key == SESSION_COOKIE_NAME {
                Some(value.to_string())
            } else {
                None
            }
        })
}
