// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Authentication Module
//!
//! Cookie-based session authentication for the EMC API.
//!
//! ## Auth Flow
//!
//! 1. A doctor registers or logs in; the handler issues an HS256 session token
//! 2. The token travels in an HttpOnly `token` cookie (7-day lifetime)
//! 3. The session gate classifies each request path and verifies the cookie,
//!    stashing the caller's [`Identity`] for handlers
//!
//! ## Security
//!
//! - The signing secret must be configured; the process refuses to start
//!   without one
//! - Cookie presence is never trusted: tokens are verified on every use
//! - All authentication failures respond identically, so callers cannot
//!   probe which check failed
//! - Clock skew tolerance is 60 seconds

pub mod claims;
pub mod cookie;
pub mod error;
pub mod extractor;
pub mod middleware;
pub mod password;
pub mod token;

pub use claims::Identity;
pub use cookie::SessionCookie;
pub use error::AuthError;
pub use extractor::Auth;
pub use token::TokenService;
