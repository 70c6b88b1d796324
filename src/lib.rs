// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! EMC Server - Electronic Medical Records Service
//!
//! This crate provides a doctor-facing medical records API with cookie-based
//! session authentication (signed JWTs) and owner-scoped patient records
//! persisted in an embedded redb store.
//!
//! ## Modules
//!
//! - `api` - HTTP API handlers (Axum)
//! - `auth` - Sessions, credentials and the request gate (JWT, Argon2)
//! - `storage` - Embedded persistence (redb)

pub mod api;
pub mod auth;
pub mod config;
pub mod error;
pub mod models;
pub mod state;
pub mod storage;
