// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Patient records.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use super::ownership::Owned;
use crate::models::{CreatePatientRequest, Gender, UpdatePatientRequest};

/// A patient record.
///
/// The same shape is stored and returned in responses; a record holds no
/// secret beyond itself, and ownership scoping decides who sees it.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Patient {
    pub id: String,
    pub name: String,
    pub age: i64,
    pub gender: Gender,
    pub diagnosis: String,
    pub phone: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    /// Id of the doctor who created, and therefore owns, this record.
    pub doctor_id: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Patient {
    /// Create a record owned by `doctor_id` from a validated request.
    ///
    /// `gender` is the parsed value the request's `validate` returned.
    pub fn new(doctor_id: &str, request: CreatePatientRequest, gender: Gender) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4().to_string(),
            name: request.name,
            age: request.age,
            gender,
            diagnosis: request.diagnosis,
            phone: request.phone,
            notes: request.notes,
            doctor_id: doctor_id.to_string(),
            created_at: now,
            updated_at: now,
        }
    }

    /// Apply a validated patch, bumping `updated_at`.
    ///
    /// Absent fields are left unchanged. `gender` is the parsed value from
    /// the patch, when one was supplied.
    pub fn apply_update(&mut self, patch: UpdatePatientRequest, gender: Option<Gender>) {
        if let Some(name) = patch.name {
            self.name = name;
        }
        if let Some(age) = patch.age {
            self.age = age;
        }
        if let Some(gender) = gender {
            self.gender = gender;
        }
        if let Some(diagnosis) = patch.diagnosis {
            self.diagnosis = diagnosis;
        }
        if let Some(phone) = patch.phone {
            self.phone = phone;
        }
        if let Some(notes) = patch.notes {
            self.notes = Some(notes);
        }
        self.updated_at = Utc::now();
    }
}

impl Owned for Patient {
    fn owner_id(&self) -> &str {
        &self.doctor_id
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_request() -> CreatePatientRequest {
        CreatePatientRequest {
            name: "Bob".to_string(),
            age: 40,
            gender: "Male".to_string(),
            diagnosis: "Flu".to_string(),
            phone: "12345".to_string(),
            notes: None,
        }
    }

    #[test]
    fn new_record_is_owned_by_its_creator() {
        let patient = Patient::new("doctor-1", sample_request(), Gender::Male);

        assert_eq!(patient.owner_id(), "doctor-1");
        assert_eq!(patient.created_at, patient.updated_at);
        assert!(!patient.id.is_empty());
    }

    #[test]
    fn apply_update_changes_only_supplied_fields() {
        let mut patient = Patient::new("doctor-1", sample_request(), Gender::Male);
        let created_at = patient.created_at;

        let patch = UpdatePatientRequest {
            diagnosis: Some("Pneumonia".to_string()),
            notes: Some("Follow up in two weeks".to_string()),
            ..Default::default()
        };
        patient.apply_update(patch, None);

        assert_eq!(patient.diagnosis, "Pneumonia");
        assert_eq!(patient.notes.as_deref(), Some("Follow up in two weeks"));
        assert_eq!(patient.name, "Bob");
        assert_eq!(patient.age, 40);
        assert_eq!(patient.gender, Gender::Male);
        assert_eq!(patient.created_at, created_at);
        assert!(patient.updated_at >= created_at);
    }

    #[test]
    fn apply_update_can_change_gender() {
        let mut patient = Patient::new("doctor-1", sample_request(), Gender::Male);

        let patch = UpdatePatientRequest {
            gender: Some("Other".to_string()),
            ..Default::default()
        };
        patient.apply_update(patch, Some(Gender::Other));

        assert_eq!(patient.gender, Gender::Other);
    }

    #[test]
    fn serializes_with_camel_case_keys() {
        let patient = Patient::new("doctor-1", sample_request(), Gender::Male);
        let json = serde_json::to_value(&patient).unwrap();

        assert_eq!(json["doctorId"], "doctor-1");
        assert!(json.get("createdAt").is_some());
        assert!(json.get("updatedAt").is_some());
        // Absent notes are omitted, not serialized as null
        assert!(json.get("notes").is_none());
    }

    #[test]
    fn round_trips_through_json() {
        let patient = Patient::new("doctor-1", sample_request(), Gender::Male);
        let bytes = serde_json::to_vec(&patient).unwrap();
        let restored: Patient = serde_json::from_slice(&bytes).unwrap();

        assert_eq!(restored, patient);
    }
}
