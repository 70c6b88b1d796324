// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Storage Module
//!
//! Persistent storage for doctor accounts and patient records, backed by an
//! embedded redb database.
//!
//! ## Model
//!
//! - One database file (`emc.redb`) holds every table
//! - Transactions are ACID; multi-table writes land atomically or not at all
//! - Patient reads are owner-scoped before they leave this module: a record
//!   owned by another doctor is reported as absent, never as forbidden
//!
//! ## Storage Layout
//!
//! ```text
//! {DATA_DIR}/
//!   emc.redb    # doctors, doctor_email_index, patients, patient_owner_index
//! ```

pub mod database;
pub mod doctors;
pub mod ownership;
pub mod patients;

pub use database::{DbError, DbResult, EmcDatabase};
pub use doctors::{normalize_email, Doctor};
pub use ownership::{Owned, OwnerScoped};
pub use patients::Patient;
