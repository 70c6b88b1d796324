// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Embedded records database backed by redb (pure Rust, ACID).
//!
//! ## Table Layout
//!
//! - `doctors`: doctor_id → serialized Doctor
//! - `doctor_email_index`: normalized email → doctor_id
//! - `patients`: patient_id → serialized Patient
//! - `patient_owner_index`: composite key (doctor_id|!created_at|patient_id) → patient_id
//!
//! Every patient read is scoped to the requesting doctor before it leaves
//! this module, so "someone else's record" and "no record" are the same
//! `None` to callers.

use std::path::Path;

use redb::{Database, ReadableDatabase, ReadableTable, TableDefinition};

use super::doctors::{normalize_email, Doctor};
use super::ownership::OwnerScoped;
use super::patients::Patient;

// =============================================================================
// Table Definitions
// =============================================================================

/// Primary table: doctor_id → serialized Doctor (JSON bytes).
const DOCTORS: TableDefinition<&str, &[u8]> = TableDefinition::new("doctors");

/// Unique index: normalized email → doctor_id.
const DOCTOR_EMAIL_INDEX: TableDefinition<&str, &str> = TableDefinition::new("doctor_email_index");

/// Primary table: patient_id → serialized Patient (JSON bytes).
const PATIENTS: TableDefinition<&str, &[u8]> = TableDefinition::new("patients");

/// Index: composite key → patient_id.
/// Key format: `doctor_id|!created_at_millis_be|patient_id` for newest-first
/// forward range scans.
const PATIENT_OWNER_INDEX: TableDefinition<&[u8], &str> =
    TableDefinition::new("patient_owner_index");

// =============================================================================
// Error Type
// =============================================================================

#[derive(Debug, thiserror::Error)]
pub enum DbError {
    #[error("redb error: {0}")]
    Redb(#[from] redb::Error),

    #[error("redb database error: {0}")]
    RedbDatabase(#[from] redb::DatabaseError),

    #[error("redb transaction error: {0}")]
    RedbTransaction(#[from] redb::TransactionError),

    #[error("redb table error: {0}")]
    RedbTable(#[from] redb::TableError),

    #[error("redb storage error: {0}")]
    RedbStorage(#[from] redb::StorageError),

    #[error("redb commit error: {0}")]
    RedbCommit(#[from] redb::CommitError),

    #[error("serialization error: {0}")]
    Serde(#[from] serde_json::Error),

    #[error("already exists: {0}")]
    AlreadyExists(String),
}

pub type DbResult<T> = Result<T, DbError>;

// =============================================================================
// Index Key Helpers
// =============================================================================

/// Build a composite key for the patient_owner_index table.
///
/// Format: `doctor_id | inverted_millis_be_bytes | patient_id`
///
/// The inverted timestamp ensures newest-first ordering when scanning
/// forward; the trailing patient_id breaks ties between records created in
/// the same millisecond.
fn owner_index_key(doctor_id: &str, created_at_millis: i64, patient_id: &str) -> Vec<u8> {
    let mut key = Vec::with_capacity(doctor_id.len() + 1 + 8 + 1 + patient_id.len());
    key.extend_from_slice(doctor_id.as_bytes());
    key.push(b'|');
    // Invert timestamp for descending order (newest first)
    key.extend_from_slice(&(!created_at_millis as u64).to_be_bytes());
    key.push(b'|');
    key.extend_from_slice(patient_id.as_bytes());
    key
}

/// Build a prefix key for range scanning all records of one doctor.
fn owner_prefix(doctor_id: &str) -> Vec<u8> {
    let mut prefix = Vec::with_capacity(doctor_id.len() + 1);
    prefix.extend_from_slice(doctor_id.as_bytes());
    prefix.push(b'|');
    prefix
}

/// Build the upper bound for a range scan (prefix with 0xFF bytes appended).
fn owner_prefix_end(doctor_id: &str) -> Vec<u8> {
    let mut end = Vec::with_capacity(doctor_id.len() + 1 + 20);
    end.extend_from_slice(doctor_id.as_bytes());
    end.push(b'|');
    // Append enough 0xFF bytes to be past any valid key with this prefix
    end.extend_from_slice(&[0xFF; 20]);
    end
}

// =============================================================================
// EmcDatabase
// =============================================================================

/// Embedded ACID database holding doctor accounts and patient records.
pub struct EmcDatabase {
    db: Database,
}

impl EmcDatabase {
    /// Open (or create) the database at the given path.
    pub fn open(path: impl AsRef<Path>) -> DbResult<Self> {
        let path = path.as_ref();

        // Ensure parent directory exists
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).ok();
        }
        let db = Database::create(path)?;

        // Pre-create all tables so later read transactions don't fail
        let write_txn = db.begin_write()?;
        {
            let _ = write_txn.open_table(DOCTORS)?;
            let _ = write_txn.open_table(DOCTOR_EMAIL_INDEX)?;
            let _ = write_txn.open_table(PATIENTS)?;
            let _ = write_txn.open_table(PATIENT_OWNER_INDEX)?;
        }
        write_txn.commit()?;

        Ok(Self { db })
    }

    /// Cheap liveness probe for readiness checks.
    pub fn check_ready(&self) -> DbResult<()> {
        let read_txn = self.db.begin_read()?;
        let _ = read_txn.open_table(DOCTORS)?;
        Ok(())
    }

    // =========================================================================
    // Doctors
    // =========================================================================

    /// Insert a new doctor account.
    ///
    /// The email uniqueness check and both writes happen in one transaction,
    /// so two concurrent registrations of the same email cannot both land.
    pub fn insert_doctor(&self, doctor: &Doctor) -> DbResult<()> {
        let json = serde_json::to_vec(doctor)?;

        let write_txn = self.db.begin_write()?;
        {
            let mut email_index = write_txn.open_table(DOCTOR_EMAIL_INDEX)?;
            if email_index.get(doctor.email.as_str())?.is_some() {
                // Dropping the transaction aborts it
                return Err(DbError::AlreadyExists(doctor.email.clone()));
            }
            email_index.insert(doctor.email.as_str(), doctor.id.as_str())?;

            let mut doctors = write_txn.open_table(DOCTORS)?;
            doctors.insert(doctor.id.as_str(), json.as_slice())?;
        }
        write_txn.commit()?;
        Ok(())
    }

    /// Look up a doctor by id.
    pub fn get_doctor(&self, id: &str) -> DbResult<Option<Doctor>> {
        let read_txn = self.db.begin_read()?;
        let table = read_txn.open_table(DOCTORS)?;
        match table.get(id)? {
            Some(value) => {
                let doctor: Doctor = serde_json::from_slice(value.value())?;
                Ok(Some(doctor))
            }
            None => Ok(None),
        }
    }

    /// Look up a doctor by email. The input is normalized before lookup.
    pub fn find_doctor_by_email(&self, email: &str) -> DbResult<Option<Doctor>> {
        let email = normalize_email(email);

        let read_txn = self.db.begin_read()?;
        let email_index = read_txn.open_table(DOCTOR_EMAIL_INDEX)?;
        let doctor_id = match email_index.get(email.as_str())? {
            Some(value) => value.value().to_string(),
            None => return Ok(None),
        };

        let doctors = read_txn.open_table(DOCTORS)?;
        match doctors.get(doctor_id.as_str())? {
            Some(value) => {
                let doctor: Doctor = serde_json::from_slice(value.value())?;
                Ok(Some(doctor))
            }
            None => Ok(None),
        }
    }

    // =========================================================================
    // Patients
    // =========================================================================

    /// Insert a patient record and its owner index entry.
    pub fn insert_patient(&self, patient: &Patient) -> DbResult<()> {
        let json = serde_json::to_vec(patient)?;
        let key = owner_index_key(
            &patient.doctor_id,
            patient.created_at.timestamp_millis(),
            &patient.id,
        );

        let write_txn = self.db.begin_write()?;
        {
            let mut patients = write_txn.open_table(PATIENTS)?;
            patients.insert(patient.id.as_str(), json.as_slice())?;

            let mut index = write_txn.open_table(PATIENT_OWNER_INDEX)?;
            index.insert(key.as_slice(), patient.id.as_str())?;
        }
        write_txn.commit()?;
        Ok(())
    }

    /// Look up a patient record, scoped to the requesting doctor.
    pub fn get_patient(&self, doctor_id: &str, patient_id: &str) -> DbResult<Option<Patient>> {
        let read_txn = self.db.begin_read()?;
        let table = read_txn.open_table(PATIENTS)?;

        let patient = match table.get(patient_id)? {
            Some(value) => Some(serde_json::from_slice::<Patient>(value.value())?),
            None => None,
        };

        Ok(patient.scoped_to(doctor_id))
    }

    /// List one doctor's patient records, newest first.
    pub fn list_patients(&self, doctor_id: &str) -> DbResult<Vec<Patient>> {
        let read_txn = self.db.begin_read()?;
        let index = read_txn.open_table(PATIENT_OWNER_INDEX)?;
        let patients_table = read_txn.open_table(PATIENTS)?;

        let prefix = owner_prefix(doctor_id);
        let prefix_end = owner_prefix_end(doctor_id);

        let mut results = Vec::new();
        let range = index.range(prefix.as_slice()..prefix_end.as_slice())?;

        for entry in range {
            let entry = entry?;
            let patient_id = entry.1.value().to_string();

            if let Some(value) = patients_table.get(patient_id.as_str())? {
                let patient: Patient = serde_json::from_slice(value.value())?;
                results.push(patient);
            }
        }

        Ok(results)
    }

    /// Apply a mutation to a patient record, scoped to the requesting doctor.
    ///
    /// Returns the updated record, or `None` when no record with this id is
    /// visible to the doctor. `created_at` must not change; the owner index
    /// key is derived from it.
    pub fn update_patient<F>(
        &self,
        doctor_id: &str,
        patient_id: &str,
        apply: F,
    ) -> DbResult<Option<Patient>>
    where
        F: FnOnce(&mut Patient),
    {
        let write_txn = self.db.begin_write()?;
        let updated = {
            let mut table = write_txn.open_table(PATIENTS)?;

            // Read existing value and deserialize before mutating
            let existing_bytes = {
                match table.get(patient_id)? {
                    Some(value) => value.value().to_vec(),
                    None => return Ok(None),
                }
            };

            let existing: Patient = serde_json::from_slice(&existing_bytes)?;
            let Some(mut patient) = Some(existing).scoped_to(doctor_id) else {
                return Ok(None);
            };

            apply(&mut patient);

            let json = serde_json::to_vec(&patient)?;
            table.insert(patient_id, json.as_slice())?;
            patient
        };
        write_txn.commit()?;
        Ok(Some(updated))
    }

    /// Delete a patient record, scoped to the requesting doctor.
    ///
    /// Returns whether a record was removed. Deleting an id that is missing,
    /// already deleted, or owned by another doctor is `false` either way.
    pub fn delete_patient(&self, doctor_id: &str, patient_id: &str) -> DbResult<bool> {
        let write_txn = self.db.begin_write()?;
        {
            let mut table = write_txn.open_table(PATIENTS)?;

            let existing_bytes = {
                match table.get(patient_id)? {
                    Some(value) => value.value().to_vec(),
                    None => return Ok(false),
                }
            };

            let existing: Patient = serde_json::from_slice(&existing_bytes)?;
            let Some(patient) = Some(existing).scoped_to(doctor_id) else {
                return Ok(false);
            };

            table.remove(patient_id)?;

            let key = owner_index_key(
                &patient.doctor_id,
                patient.created_at.timestamp_millis(),
                &patient.id,
            );
            let mut index = write_txn.open_table(PATIENT_OWNER_INDEX)?;
            index.remove(key.as_slice())?;
        }
        write_txn.commit()?;
        Ok(true)
    }
}

// =============================================================================
// Tests
// =============================================================================
